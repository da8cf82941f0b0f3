use clap::{Parser, Subcommand};
use glob::Pattern;
use md_review_config::{Config, ConfigError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "md-review")]
#[command(version, about = "Review a markdown file or folder in the browser and collect line-referenced feedback", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Markdown file or folder to review (falls back to `default_path` in the config file)
    #[arg()]
    pub path: Option<PathBuf>,

    /// First port to try; the next free port within 100 is used
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open a browser window
    #[arg(long)]
    pub no_open: bool,

    /// Do not copy the finished feedback to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Install the md-review usage notes for coding assistants
    InstallSkill {
        /// Directory to install into (defaults to ~/.claude/skills)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("No path provided and no default_path in {}", config_path.display())]
    MissingPath { config_path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Command-line flags layered over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub path: PathBuf,
    /// Whether `path` came from the config file rather than the command line.
    pub path_from_config: bool,
    pub port: u16,
    pub open_browser: bool,
    pub copy_to_clipboard: bool,
    pub ignore: Vec<Pattern>,
}

impl Settings {
    pub fn resolve(args: Args, config: Option<Config>) -> Result<Self, SettingsError> {
        let config = config.unwrap_or_default();
        let ignore = config.ignore_patterns()?;
        let (path, path_from_config) = match (args.path, config.default_path) {
            (Some(path), _) => (path, false),
            (None, Some(path)) => (path, true),
            (None, None) => {
                return Err(SettingsError::MissingPath {
                    config_path: Config::config_path(),
                });
            }
        };
        Ok(Self {
            path,
            path_from_config,
            port: args.port.unwrap_or(config.port),
            open_browser: config.open_browser && !args.no_open,
            copy_to_clipboard: config.copy_to_clipboard && !args.no_clipboard,
            ignore,
        })
    }
}
