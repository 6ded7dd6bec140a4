use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slidedeck")]
#[command(author, version, about)]
#[command(long_about = "A slide deck viewer with push transitions.\n\n\
    Slides are described as a widget tree in presentation.kv, with optional\n\
    widget templates in templates.kv next to it.\n\n\
    Examples:\n  \
    slidedeck talk/                     Present talk/presentation.kv (fullscreen)\n  \
    slidedeck talk/presentation.kv -w   Present in a window\n  \
    slidedeck talk/ --slide 4           Start on the fourth slide")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Deck directory or description file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(short, long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.transition_duration)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the configuration file location
    Path,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Reason the command line could not run.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("no deck given")]
    MissingInput,
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("a deck path cannot be combined with a subcommand")]
    FileWithSubcommand,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        if self.command.is_some() && self.file.is_some() {
            return Err(UsageError::FileWithSubcommand.into());
        }
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("slidedeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                let file = self.file.ok_or(UsageError::MissingInput)?;
                if !file.exists() {
                    return Err(UsageError::NotFound(file).into());
                }
                crate::app::run(file, self.windowed, self.slide)
            }
        }
    }
}
