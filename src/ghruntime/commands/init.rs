use crate::client::{deployment_path, RemoteClient};
use crate::commands::{require_app, CmdMessage, CmdResult};
use crate::config::{RuntimeConfig, DEFAULT_CONFIG_FILENAME};
use crate::error::{Result, RuntimeError};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct AppResponse {
    #[serde(default)]
    app_url: Option<String>,
}

/// Bind a local project to an existing remote app.
///
/// The app is looked up first; the config file is only written once the
/// backend has confirmed it exists. `out` defaults to `runtime.config.json` in
/// `cwd`, and relative paths are taken from `cwd`.
pub fn run<C: RemoteClient>(
    client: &C,
    cwd: &Path,
    app: Option<&str>,
    out: Option<&Path>,
) -> Result<CmdResult> {
    let app = require_app(app)?;

    let response = client
        .get(&deployment_path(app))
        .map_err(|source| RuntimeError::AppNotAccessible {
            app: app.to_string(),
            source: Box::new(source),
        })?;
    let details: AppResponse = response.json::<Option<AppResponse>>()?.unwrap_or_default();

    let config_path = match out.filter(|p| !p.as_os_str().is_empty()) {
        Some(out) => cwd.join(out),
        None => cwd.join(DEFAULT_CONFIG_FILENAME),
    };
    RuntimeConfig::new(app).save(&config_path)?;

    let mut result = CmdResult::default()
        .with_app(app)
        .with_config_path(config_path.clone());
    result.add_message(CmdMessage::success(format!(
        "Successfully initialized local project for app '{}' at '{}'",
        app,
        config_path.display()
    )));
    if let Some(url) = details.app_url {
        result.add_message(CmdMessage::info(format!("App URL: {}", url)));
    }
    Ok(result)
}
