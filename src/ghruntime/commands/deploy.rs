//! # Deploy
//!
//! One deploy runs through these stages:
//!
//! ```text
//! ResolvingIdentity -> BuildingBundle -> ReadingBundle -> Uploading -> Cleanup -> Done
//! ```
//!
//! The bundle is written next to the source directory as `<dir>.zip`. Once the
//! file has been created it is owned by a [`TempPath`] guard, so it is removed
//! on every exit past that point: success, a failed build, a failed read or a
//! failed upload. If the file cannot be created, nothing is removed. Identity
//! resolution happens first and fails before any file exists. A config file
//! without an `app` name counts as no identity.
//!
//! The bundle name only depends on the source directory, so two deploys of the
//! same directory at the same time write to the same file. That is accepted for
//! a single-user CLI. An interrupt (Ctrl-C) before cleanup leaves the file
//! behind.

use crate::bundle::build_bundle_into;
use crate::client::{deployment_path, with_query, Body, RemoteClient};
use crate::commands::{require_identity, CmdMessage, CmdResult};
use crate::error::{Result, RuntimeError};
use crate::resolve::resolve_app_name;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone)]
pub struct DeployOptions {
    pub dir: PathBuf,
    pub app: Option<String>,
    pub config: Option<PathBuf>,
    pub revision_name: Option<String>,
    /// Commit SHA of the code being deployed.
    pub sha: Option<String>,
}

pub fn run<C: RemoteClient>(client: &C, cwd: &Path, options: &DeployOptions) -> Result<CmdResult> {
    if options.dir.as_os_str().is_empty() {
        return Err(RuntimeError::Usage("--dir flag is required".to_string()));
    }

    debug!("resolving app identity");
    let identity = require_identity(resolve_app_name(
        options.app.as_deref(),
        options.config.as_deref(),
        cwd,
    )?)?;

    let source = cwd.join(&options.dir);
    if !source.exists() {
        return Err(RuntimeError::SourceDirMissing(options.dir.clone()));
    }
    fs::read_dir(&source).map_err(|source_err| RuntimeError::FilesystemWalk {
        path: source.clone(),
        source: source_err,
    })?;

    let bundle_path = bundle_path_for(&source)?;
    let create_err = |source| RuntimeError::BundleCreate {
        path: bundle_path.clone(),
        source,
    };
    // Only a file this run created is handed to the guard.
    let file = File::create(&bundle_path).map_err(create_err)?;
    let bundle = TempPath::try_from_path(&bundle_path).map_err(create_err)?;

    debug!(bundle = %bundle_path.display(), "building bundle");
    let summary = build_bundle_into(&source, file, &bundle)?;

    debug!("reading bundle");
    let body = fs::read(&bundle).map_err(|source| RuntimeError::FilesystemWalk {
        path: bundle_path.clone(),
        source,
    })?;

    let url = with_query(
        &format!("{}/bundle", deployment_path(identity.as_str())),
        &[
            (
                "revision_name",
                options.revision_name.as_deref().unwrap_or_default(),
            ),
            ("revision", options.sha.as_deref().unwrap_or_default()),
        ],
    );

    let mut result = CmdResult::default()
        .with_app(identity.name.clone())
        .with_bundle(summary);
    info!("Deploying app to {}", url);
    result.add_message(CmdMessage::info(format!("Deploying app to {}", url)));

    debug!(bytes = body.len(), "uploading bundle");
    client.post(&url, Body::Binary(body))?;

    if let Err(e) = bundle.close() {
        warn!(bundle = %bundle_path.display(), "failed to remove bundle: {}", e);
    }

    result.add_message(CmdMessage::success("Successfully deployed app"));
    Ok(result)
}

/// Where the bundle for `source` is written: `<name>.zip` beside it.
///
/// The source is canonicalized first, so `dist`, `./dist/` and an absolute path
/// to the same directory all map to one bundle path outside the directory.
pub fn bundle_path_for(source: &Path) -> Result<PathBuf> {
    let canonical = fs::canonicalize(source).map_err(|e| RuntimeError::FilesystemWalk {
        path: source.to_path_buf(),
        source: e,
    })?;

    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    let parent = canonical.parent().unwrap_or(&canonical);

    Ok(parent.join(format!("{}.zip", name)))
}
