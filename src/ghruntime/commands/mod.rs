use crate::bundle::BundleSummary;
use crate::error::{Result, RuntimeError};
use crate::resolve::AppIdentity;
use std::path::PathBuf;

pub mod create;
pub mod delete;
pub mod deploy;
pub mod get;
pub mod init;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// App the command acted on.
    pub app: Option<String>,
    /// App details returned by the backend.
    pub details: Option<serde_json::Value>,
    /// What went into an uploaded bundle.
    pub bundle: Option<BundleSummary>,
    /// Config file written by the command.
    pub config_path: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_bundle(mut self, summary: BundleSummary) -> Self {
        self.bundle = Some(summary);
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }
}

/// Fail with a usage error unless `app` is a non-empty name.
pub(crate) fn require_app(app: Option<&str>) -> Result<&str> {
    match app {
        Some(app) if !app.is_empty() => Ok(app),
        _ => Err(RuntimeError::Usage("--app flag is required".to_string())),
    }
}

/// Reject a resolved identity with an empty name.
///
/// A config file without `app` resolves to `""`; commands that build a request
/// path from the name treat that as no identity at all.
pub(crate) fn require_identity(identity: AppIdentity) -> Result<AppIdentity> {
    if identity.name.is_empty() {
        return Err(RuntimeError::MissingIdentity);
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::IdentitySource;

    #[test]
    fn test_require_app() {
        assert_eq!(require_app(Some("a")).unwrap(), "a");
        assert!(matches!(require_app(Some("")), Err(RuntimeError::Usage(_))));
        assert!(matches!(require_app(None), Err(RuntimeError::Usage(_))));
    }

    #[test]
    fn test_require_identity_rejects_empty_name() {
        let empty = AppIdentity {
            name: String::new(),
            source: IdentitySource::DefaultConfig,
        };
        assert!(matches!(
            require_identity(empty),
            Err(RuntimeError::MissingIdentity)
        ));

        let named = AppIdentity {
            name: "a".into(),
            source: IdentitySource::ConfigFile,
        };
        assert_eq!(require_identity(named).unwrap().name, "a");
    }
}
