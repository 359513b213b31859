use crate::client::{deployment_path, RemoteClient};
use crate::commands::{require_app, CmdMessage, CmdResult};
use crate::error::Result;

pub fn run<C: RemoteClient>(client: &C, app: Option<&str>) -> Result<CmdResult> {
    let app = require_app(app)?;
    client.delete(&deployment_path(app))?;

    let mut result = CmdResult::default().with_app(app);
    result.add_message(CmdMessage::success(format!("App '{}' deleted", app)));
    Ok(result)
}
