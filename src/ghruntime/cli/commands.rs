use super::render::{print_messages, render_details};
use super::setup::{get_version, Cli, Commands};
use clap::Parser;
use ghruntime::api::{CreateOptions, DeployOptions, GetOptions, RuntimeApi};
use ghruntime::client::http::HttpClient;
use ghruntime::config::ClientConfig;
use ghruntime::error::Result;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `debug`.
const LOG_ENV: &str = "GH_RUNTIME_LOG";

struct AppContext {
    api: RuntimeApi<HttpClient>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Version never talks to the backend, so it skips context setup.
    if let Commands::Version = cli.command {
        println!("{}", get_version());
        return Ok(());
    }

    let ctx = init_context()?;

    match cli.command {
        Commands::Create {
            app,
            env,
            secret,
            revision_name,
        } => handle_create(
            &ctx,
            CreateOptions {
                app,
                env,
                secrets: secret,
                revision_name,
            },
        ),
        Commands::Delete { app } => handle_delete(&ctx, app.as_deref()),
        Commands::Deploy {
            dir,
            app,
            config,
            revision_name,
            sha,
        } => handle_deploy(
            &ctx,
            DeployOptions {
                dir: dir.unwrap_or_default(),
                app,
                config,
                revision_name,
                sha,
            },
        ),
        Commands::Get {
            app,
            config,
            revision_name,
        } => handle_get(
            &ctx,
            GetOptions {
                app,
                config,
                revision_name,
            },
        ),
        Commands::Init { app, out } => handle_init(&ctx, app.as_deref(), out),
        Commands::Version => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    // Ignore the error: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .try_init();
}

fn init_context() -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = ClientConfig::from_env();
    debug!(base_url = %config.base_url, "using backend");
    let client = HttpClient::new(config)?;
    Ok(AppContext {
        api: RuntimeApi::new(client, cwd),
    })
}

fn handle_create(ctx: &AppContext, options: CreateOptions) -> Result<()> {
    let result = ctx.api.create_app(&options)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, app: Option<&str>) -> Result<()> {
    let result = ctx.api.delete_app(app)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_deploy(ctx: &AppContext, options: DeployOptions) -> Result<()> {
    let result = ctx.api.deploy(&options)?;
    if let Some(summary) = &result.bundle {
        debug!(
            files = summary.files,
            directories = summary.directories,
            "bundle uploaded"
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_get(ctx: &AppContext, options: GetOptions) -> Result<()> {
    let result = ctx.api.get_app(&options)?;
    if let Some(details) = &result.details {
        print!("{}", render_details(details));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext, app: Option<&str>, out: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.init_project(app, out.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}
