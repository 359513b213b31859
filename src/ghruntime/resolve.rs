//! # App Identity Resolution
//!
//! Every command that targets an existing app needs exactly one app name. It can
//! come from three places, checked in this order:
//!
//! 1. The `--app` flag. Returned as-is, nothing is read from disk.
//! 2. The `--config` flag. The named file is parsed as [`RuntimeConfig`] and its
//!    `app` field is returned, even when empty.
//! 3. `runtime.config.json` in the working directory, if it exists.
//!
//! When all three come up empty the resolution fails with
//! [`RuntimeError::MissingIdentity`].
//!
//! The working directory is passed in rather than read from the process, so the
//! resolver stays a pure function of its arguments and the filesystem.

use crate::config::{RuntimeConfig, DEFAULT_CONFIG_FILENAME};
use crate::error::{Result, RuntimeError};
use std::path::Path;
use tracing::debug;

/// Where a resolved app name came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    Flag,
    ConfigFile,
    DefaultConfig,
}

/// A resolved app name together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub source: IdentitySource,
}

impl AppIdentity {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolve the target app name. See the module docs for the precedence rules.
///
/// Empty strings count as "not given" for both `explicit_app` and `config_path`.
/// A relative `config_path` is taken relative to `cwd`.
pub fn resolve_app_name(
    explicit_app: Option<&str>,
    config_path: Option<&Path>,
    cwd: &Path,
) -> Result<AppIdentity> {
    if let Some(app) = explicit_app.filter(|a| !a.is_empty()) {
        debug!(app, "app name taken from --app");
        return Ok(AppIdentity {
            name: app.to_string(),
            source: IdentitySource::Flag,
        });
    }

    if let Some(path) = config_path.filter(|p| !p.as_os_str().is_empty()) {
        let path = cwd.join(path);
        let config = RuntimeConfig::load(&path)?;
        debug!(app = %config.app, path = %path.display(), "app name taken from --config");
        return Ok(AppIdentity {
            name: config.app,
            source: IdentitySource::ConfigFile,
        });
    }

    let default_path = cwd.join(DEFAULT_CONFIG_FILENAME);
    if default_path.exists() {
        let config = RuntimeConfig::load(&default_path).map_err(|source| {
            RuntimeError::DefaultConfigUnreadable {
                path: default_path.clone(),
                source: Box::new(source),
            }
        })?;
        debug!(app = %config.app, "app name taken from {}", DEFAULT_CONFIG_FILENAME);
        return Ok(AppIdentity {
            name: config.app,
            source: IdentitySource::DefaultConfig,
        });
    }

    Err(RuntimeError::MissingIdentity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, name: &str, app: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!(r#"{{"app": "{}"}}"#, app)).unwrap();
        path
    }

    #[test]
    fn test_flag_wins_without_touching_disk() {
        let temp = TempDir::new().unwrap();
        // The config path does not exist; reading it would fail.
        let missing = temp.path().join("missing.json");

        let id = resolve_app_name(Some("flag-app"), Some(&missing), temp.path()).unwrap();
        assert_eq!(id.name, "flag-app");
        assert_eq!(id.source, IdentitySource::Flag);
    }

    #[test]
    fn test_flag_wins_over_all_sources() {
        let temp = TempDir::new().unwrap();
        let cfg = write_config(temp.path(), "custom.json", "config-app");
        write_config(temp.path(), DEFAULT_CONFIG_FILENAME, "default-app");

        let id = resolve_app_name(Some("flag-app"), Some(&cfg), temp.path()).unwrap();
        assert_eq!(id.name, "flag-app");
    }

    #[test]
    fn test_config_flag_beats_default_file() {
        let temp = TempDir::new().unwrap();
        let cfg = write_config(temp.path(), "custom.json", "config-app");
        write_config(temp.path(), DEFAULT_CONFIG_FILENAME, "default-app");

        let id = resolve_app_name(None, Some(&cfg), temp.path()).unwrap();
        assert_eq!(id.name, "config-app");
        assert_eq!(id.source, IdentitySource::ConfigFile);
    }

    #[test]
    fn test_relative_config_path_uses_cwd() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("conf")).unwrap();
        write_config(&temp.path().join("conf"), "rt.json", "nested-app");

        let id = resolve_app_name(None, Some(Path::new("conf/rt.json")), temp.path()).unwrap();
        assert_eq!(id.name, "nested-app");
    }

    #[test]
    fn test_default_config_is_probed() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILENAME, "my-app");

        let id = resolve_app_name(None, None, temp.path()).unwrap();
        assert_eq!(id.name, "my-app");
        assert_eq!(id.source, IdentitySource::DefaultConfig);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILENAME, "my-app");

        let id = resolve_app_name(Some(""), Some(Path::new("")), temp.path()).unwrap();
        assert_eq!(id.name, "my-app");
    }

    #[test]
    fn test_nothing_available_is_missing_identity() {
        let temp = TempDir::new().unwrap();

        let err = resolve_app_name(Some(""), Some(Path::new("")), temp.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::MissingIdentity));
        let msg = err.to_string();
        assert!(msg.contains("--app"));
        assert!(msg.contains("--config"));
        assert!(msg.contains("runtime.config.json"));
    }

    #[test]
    fn test_explicit_config_missing_is_read_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILENAME, "fallback");

        let err = resolve_app_name(None, Some(Path::new("gone.json")), temp.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigRead { .. }));
    }

    #[test]
    fn test_explicit_config_invalid_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = resolve_app_name(None, Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigParse { .. }));
    }

    #[test]
    fn test_broken_default_config_is_reported_as_found() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILENAME), "][").unwrap();

        let err = resolve_app_name(None, None, temp.path()).unwrap_err();
        match &err {
            RuntimeError::DefaultConfigUnreadable { source, .. } => {
                assert!(matches!(**source, RuntimeError::ConfigParse { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("found "));
    }

    #[test]
    fn test_empty_app_in_config_is_returned() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.json");
        fs::write(&path, "{}").unwrap();

        let id = resolve_app_name(None, Some(&path), temp.path()).unwrap();
        assert_eq!(id.name, "");
    }

    proptest! {
        #[test]
        fn prop_non_empty_flag_always_wins(
            flag in "[a-z][a-z0-9-]{0,20}",
            cfg_app in "[a-z0-9-]{0,20}",
            default_app in "[a-z0-9-]{0,20}",
        ) {
            let temp = TempDir::new().unwrap();
            let cfg = write_config(temp.path(), "custom.json", &cfg_app);
            write_config(temp.path(), DEFAULT_CONFIG_FILENAME, &default_app);

            let id = resolve_app_name(Some(&flag), Some(&cfg), temp.path()).unwrap();
            prop_assert_eq!(id.name, flag);
            prop_assert_eq!(id.source, IdentitySource::Flag);
        }
    }
}
