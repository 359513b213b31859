use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2024-01-15 14:30" for dev builds
pub fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "gh-runtime", bin_name = "gh-runtime", version = get_version())]
#[command(
    about = "Deploy and manage runtime apps",
    long_about = "Use the runtime CLI to deploy and manage apps on the runtime backend."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a runtime app
    #[command(after_help = "Example:\n  gh-runtime create --app my-app --env key1=value1 --secret key2=value2")]
    Create {
        /// The app to create
        #[arg(short, long)]
        app: Option<String>,

        /// Environment variables to set on the app in the form 'key=value'
        #[arg(short, long, value_name = "KEY=VALUE", value_delimiter = ',')]
        env: Vec<String>,

        /// Secrets to set on the app in the form 'key=value'
        #[arg(short, long, value_name = "KEY=VALUE", value_delimiter = ',')]
        secret: Vec<String>,

        /// The revision name to use for the app
        #[arg(short, long)]
        revision_name: Option<String>,
    },

    /// Delete a runtime app
    Delete {
        /// The app to delete
        #[arg(short, long)]
        app: Option<String>,
    },

    /// Deploy a directory to a runtime app
    #[command(
        long_about = "Deploys a directory to a runtime app.\n\
            The app name comes from --app, from the file given with --config, or from\n\
            runtime.config.json in the current directory, in that order.",
        after_help = "Examples:\n  gh-runtime deploy --dir ./dist --app my-app --sha <sha>\n  gh-runtime deploy --dir ./dist --config runtime.config.json\n  gh-runtime deploy --dir ./dist"
    )]
    Deploy {
        /// The directory to deploy
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// The app to deploy
        #[arg(short, long)]
        app: Option<String>,

        /// Path to runtime config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// The revision name to deploy
        #[arg(short, long)]
        revision_name: Option<String>,

        /// SHA of the app being deployed
        #[arg(short, long)]
        sha: Option<String>,
    },

    /// Get details of a runtime app
    Get {
        /// The app to retrieve details for
        #[arg(short, long)]
        app: Option<String>,

        /// Path to runtime config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// The revision name to retrieve
        #[arg(short, long)]
        revision_name: Option<String>,
    },

    /// Bind the local project to a runtime app
    #[command(
        long_about = "Initialize a local project to connect it to a runtime app.\n\
            This creates a runtime.config.json file that binds the local project to the\n\
            remote app. The app must exist."
    )]
    Init {
        /// The app name to initialize
        #[arg(short, long)]
        app: Option<String>,

        /// The output path for the config file (default: runtime.config.json in current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the version of the CLI
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gh-runtime").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_deploy_flags() {
        let cli = parse(&[
            "deploy", "-d", "./dist", "-a", "my-app", "-r", "rel", "-s", "abc", "-c", "rt.json",
        ]);
        match cli.command {
            Commands::Deploy {
                dir,
                app,
                config,
                revision_name,
                sha,
            } => {
                assert_eq!(dir, Some(PathBuf::from("./dist")));
                assert_eq!(app.as_deref(), Some("my-app"));
                assert_eq!(config, Some(PathBuf::from("rt.json")));
                assert_eq!(revision_name.as_deref(), Some("rel"));
                assert_eq!(sha.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_create_repeated_and_comma_separated_pairs() {
        let cli = parse(&[
            "create", "--app", "a", "--env", "k1=v1,k2=v2", "-e", "k3=v3", "--secret", "s=1",
        ]);
        match cli.command {
            Commands::Create { env, secret, .. } => {
                assert_eq!(env, vec!["k1=v1", "k2=v2", "k3=v3"]);
                assert_eq!(secret, vec!["s=1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = parse(&["get", "--app", "a", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["gh-runtime"]).is_err());
    }

    #[test]
    fn test_version_string_starts_with_crate_version() {
        assert!(get_version().starts_with(env!("CARGO_PKG_VERSION")));
    }
}
