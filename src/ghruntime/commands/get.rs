use crate::client::{deployment_path, with_query, RemoteClient};
use crate::commands::{require_identity, CmdResult};
use crate::error::Result;
use crate::resolve::resolve_app_name;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct GetOptions {
    pub app: Option<String>,
    pub config: Option<PathBuf>,
    pub revision_name: Option<String>,
}

pub fn run<C: RemoteClient>(client: &C, cwd: &Path, options: &GetOptions) -> Result<CmdResult> {
    let identity = require_identity(resolve_app_name(
        options.app.as_deref(),
        options.config.as_deref(),
        cwd,
    )?)?;

    let path = with_query(
        &deployment_path(identity.as_str()),
        &[(
            "revision_name",
            options.revision_name.as_deref().unwrap_or_default(),
        )],
    );
    let details: serde_json::Value = client.get(&path)?.json()?;

    Ok(CmdResult::default()
        .with_app(identity.name)
        .with_details(details))
}
