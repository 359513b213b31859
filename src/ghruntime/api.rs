//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the command function
//! - **Carries context** the commands need: the remote client and the working
//!   directory used for relative paths and `runtime.config.json`
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not print, exit, or hold business logic.
//!
//! ## Generic Over RemoteClient
//!
//! `RuntimeApi<C: RemoteClient>` is generic over the transport:
//! - Production: `RuntimeApi<HttpClient>`
//! - Testing: `RuntimeApi<MemoryClient>`

use crate::client::RemoteClient;
use crate::commands;
use crate::error::Result;
use crate::resolve::{resolve_app_name, AppIdentity};
use std::path::{Path, PathBuf};

pub use crate::commands::create::CreateOptions;
pub use crate::commands::deploy::DeployOptions;
pub use crate::commands::get::GetOptions;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

/// The main API facade for runtime app operations.
pub struct RuntimeApi<C: RemoteClient> {
    client: C,
    cwd: PathBuf,
}

impl<C: RemoteClient> RuntimeApi<C> {
    pub fn new(client: C, cwd: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cwd: cwd.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn create_app(&self, options: &CreateOptions) -> Result<CmdResult> {
        commands::create::run(&self.client, options)
    }

    pub fn delete_app(&self, app: Option<&str>) -> Result<CmdResult> {
        commands::delete::run(&self.client, app)
    }

    pub fn deploy(&self, options: &DeployOptions) -> Result<CmdResult> {
        commands::deploy::run(&self.client, &self.cwd, options)
    }

    pub fn get_app(&self, options: &GetOptions) -> Result<CmdResult> {
        commands::get::run(&self.client, &self.cwd, options)
    }

    pub fn init_project(&self, app: Option<&str>, out: Option<&Path>) -> Result<CmdResult> {
        commands::init::run(&self.client, &self.cwd, app, out)
    }

    /// Resolve the target app without contacting the backend.
    pub fn resolve_app(&self, app: Option<&str>, config: Option<&Path>) -> Result<AppIdentity> {
        resolve_app_name(app, config, &self.cwd)
    }
}
