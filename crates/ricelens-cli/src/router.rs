// Command routing and dispatch

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ricelens_common::logging::{self, LogLevel, LogOptions};
use ricelens_config::ConfigManager;
use ricelens_remotes::{LineRange, RemoteResource};

use crate::commands::{Command, LensWatchCommand, RemoteCommand};
use crate::error::CliResult;

/// RiceLens - git lenses and remote links
#[derive(Parser, Debug)]
#[command(name = "ricelens")]
#[command(bin_name = "ricelens")]
#[command(about = "Open git resources on their hosting service and drive the lens controller")]
#[command(version)]
#[command(author = "RiceLens Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimum log level (debug, info, warn, error); overrides --verbose
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// Level for the log subscriber; `settings_debug` is the watched
    /// settings file's `codeLens.debug` switch
    pub fn log_level(&self, settings_debug: bool) -> LogLevel {
        match self.log_level {
            Some(level) => level,
            None if self.verbose || settings_debug => LogLevel::Debug,
            None => LogLevel::Info,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve or open hosting-service URLs for a git remote
    #[command(about = "Resolve or open hosting-service URLs for a git remote")]
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },

    /// Run the lens controller against a console host
    #[command(about = "Run the lens controller against a settings file")]
    Lens {
        #[command(subcommand)]
        action: LensAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RemoteAction {
    /// Print the URL of a resource
    Url(RemoteArgs),
    /// Open a resource with the system URL handler
    Open(RemoteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Git remote URL, e.g. git@github.com:owner/repo.git
    #[arg(value_name = "REMOTE_URL")]
    pub remote_url: String,

    /// Settings file with custom remotes
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub resource: ResourceArg,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceArg {
    /// Repository home page
    Repo,
    /// Branch list
    Branches,
    /// History of one branch
    Branch {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// A single commit
    Commit {
        #[arg(value_name = "SHA")]
        sha: String,
    },
    /// A file, optionally on a branch
    File {
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(long)]
        branch: Option<String>,
        /// Line or line range, e.g. 10 or 10-20
        #[arg(long, value_name = "START[-END]")]
        lines: Option<LineRange>,
    },
    /// A file at a commit
    Revision {
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(long)]
        sha: String,
        #[arg(long)]
        branch: Option<String>,
        /// Line or line range, e.g. 10 or 10-20
        #[arg(long, value_name = "START[-END]")]
        lines: Option<LineRange>,
    },
}

impl From<ResourceArg> for RemoteResource {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::Repo => RemoteResource::Repo,
            ResourceArg::Branches => RemoteResource::Branches,
            ResourceArg::Branch { name } => RemoteResource::Branch { name },
            ResourceArg::Commit { sha } => RemoteResource::Commit { sha },
            ResourceArg::File {
                path,
                branch,
                lines,
            } => RemoteResource::File {
                file_name: path,
                branch,
                range: lines,
            },
            ResourceArg::Revision {
                path,
                sha,
                branch,
                lines,
            } => RemoteResource::Revision {
                file_name: path,
                branch,
                sha: Some(sha),
                commit: None,
                range: lines,
            },
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum LensAction {
    /// Watch a settings file and apply lens changes until Ctrl-C
    Watch {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Quiet period before a burst of file changes is applied, in milliseconds
        #[arg(long, default_value_t = 200)]
        debounce_ms: u64,

        /// Reset the lens provider when this repository's git data changes
        #[arg(long, value_name = "DIR")]
        git_dir: Option<PathBuf>,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Set up logging and run a parsed command line
    pub async fn route(cli: &Cli) -> CliResult<()> {
        let settings_debug = cli.log_level.is_none() && Self::settings_request_debug(cli).await;
        let level = cli.log_level(settings_debug);
        // A subscriber installed by an embedding process takes precedence.
        let _ = logging::init(LogOptions { level, ansi: true });

        Self::execute(cli).await
    }

    /// Execute a parsed command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        Self::build(cli).execute().await
    }

    /// Build the handler for a parsed command
    pub fn build(cli: &Cli) -> Box<dyn Command> {
        match &cli.command {
            Commands::Remote { action } => {
                let (args, open) = match action {
                    RemoteAction::Url(args) => (args, false),
                    RemoteAction::Open(args) => (args, true),
                };
                Box::new(
                    RemoteCommand::new(args.remote_url.clone(), args.resource.clone().into())
                        .with_config(args.config.clone())
                        .with_open(open),
                )
            }
            Commands::Lens {
                action:
                    LensAction::Watch {
                        config,
                        debounce_ms,
                        git_dir,
                    },
            } => Box::new(
                LensWatchCommand::new(config.clone())
                    .with_debounce_ms(*debounce_ms)
                    .with_git_dir(git_dir.clone()),
            ),
        }
    }

    // `codeLens.debug` in the watched settings also turns on debug logging.
    async fn settings_request_debug(cli: &Cli) -> bool {
        match &cli.command {
            Commands::Lens {
                action: LensAction::Watch { config, .. },
            } => ConfigManager::load_from_file(config)
                .await
                .map(|settings| settings.code_lens.debug)
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_file_with_lines() {
        let cli = Cli::try_parse_from([
            "ricelens",
            "remote",
            "url",
            "git@github.com:owner/repo.git",
            "file",
            "src/lib.rs",
            "--branch",
            "main",
            "--lines",
            "10-20",
        ])
        .unwrap();

        let Commands::Remote {
            action: RemoteAction::Url(args),
        } = cli.command
        else {
            panic!("expected remote url");
        };
        assert_eq!(
            RemoteResource::from(args.resource),
            RemoteResource::File {
                file_name: "src/lib.rs".to_string(),
                branch: Some("main".to_string()),
                range: Some(LineRange::new(10, 20)),
            }
        );
    }

    #[test]
    fn test_parse_revision_requires_sha() {
        let missing = Cli::try_parse_from([
            "ricelens",
            "remote",
            "open",
            "https://gitlab.com/team/app",
            "revision",
            "main.go",
        ]);
        assert!(missing.is_err());

        let cli = Cli::try_parse_from([
            "ricelens",
            "remote",
            "open",
            "https://gitlab.com/team/app",
            "--config",
            "remotes.yaml",
            "revision",
            "main.go",
            "--sha",
            "c0ffee",
        ])
        .unwrap();
        let Commands::Remote {
            action: RemoteAction::Open(args),
        } = cli.command
        else {
            panic!("expected remote open");
        };
        assert_eq!(args.config, Some(PathBuf::from("remotes.yaml")));
        assert!(matches!(
            RemoteResource::from(args.resource),
            RemoteResource::Revision { sha: Some(sha), .. } if sha == "c0ffee"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_line_range() {
        let result = Cli::try_parse_from([
            "ricelens",
            "remote",
            "url",
            "git@github.com:owner/repo.git",
            "file",
            "a.rs",
            "--lines",
            "ten",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_lens_watch_defaults() {
        let cli = Cli::try_parse_from(["ricelens", "-v", "lens", "watch", "settings.yaml"]).unwrap();

        assert!(cli.verbose);
        let Commands::Lens {
            action:
                LensAction::Watch {
                    config,
                    debounce_ms,
                    git_dir,
                },
        } = cli.command
        else {
            panic!("expected lens watch");
        };
        assert_eq!(config, PathBuf::from("settings.yaml"));
        assert_eq!(debounce_ms, 200);
        assert!(git_dir.is_none());
    }

    #[test]
    fn test_log_level_resolution() {
        let quiet = Cli::try_parse_from(["ricelens", "lens", "watch", "s.yaml"]).unwrap();
        assert_eq!(quiet.log_level(false), LogLevel::Info);
        assert_eq!(quiet.log_level(true), LogLevel::Debug);

        let verbose = Cli::try_parse_from(["ricelens", "-v", "lens", "watch", "s.yaml"]).unwrap();
        assert_eq!(verbose.log_level(false), LogLevel::Debug);

        let explicit = Cli::try_parse_from([
            "ricelens",
            "-v",
            "lens",
            "watch",
            "s.yaml",
            "--log-level",
            "WARN",
        ])
        .unwrap();
        assert_eq!(explicit.log_level(true), LogLevel::Warn);

        assert!(Cli::try_parse_from(["ricelens", "--log-level", "loud", "lens", "watch", "s.yaml"]).is_err());
    }
}
