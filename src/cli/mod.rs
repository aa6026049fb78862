//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::codec::SubscriptionFormat;
use crate::config::Overrides;
use crate::resolver::BackendKind;

pub mod commands;
pub mod console;

/// Move FreeTube subscriptions and watch history in and out of other apps
#[derive(Parser, Debug)]
#[command(name = "tubeport", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// FreeTube user data directory (default: the platform config dir's FreeTube/)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Backend tried first for channel lookups
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Do not retry a failed lookup on the other backend
    #[arg(long, global = true)]
    pub no_fallback: bool,

    /// Invidious instance URL
    #[arg(long, global = true)]
    pub instance: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Configuration overrides carried by global flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            backend: self.backend.map(Into::into),
            no_fallback: self.no_fallback,
            instance: self.instance.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import subscriptions or history into FreeTube's data directory
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },

    /// Export subscriptions or history from FreeTube's data directory
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Show the data directory contents and resolver settings
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Import subscriptions
    Subscriptions {
        /// Format of the input file
        #[arg(long, short, value_enum, default_value_t = FormatArg::Freetube)]
        format: FormatArg,

        /// File to import
        file: PathBuf,
    },

    /// Import watch history from a FreeTube history.db
    History {
        /// File to import
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export subscriptions
    Subscriptions {
        /// Format of the output file
        #[arg(long, short, value_enum, default_value_t = FormatArg::Freetube)]
        format: FormatArg,

        /// Destination (default: dated file name in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Export watch history as a FreeTube history.db
    History {
        /// Destination (default: dated file name in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Subscription file formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// FreeTube profiles.db
    #[value(name = "freetube")]
    Freetube,
    /// YouTube OPML feed list
    #[value(name = "youtube")]
    Youtube,
    /// NewPipe JSON export
    #[value(name = "newpipe")]
    Newpipe,
}

impl From<FormatArg> for SubscriptionFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Freetube => Self::FreeTube,
            FormatArg::Youtube => Self::YouTube,
            FormatArg::Newpipe => Self::NewPipe,
        }
    }
}

/// Channel lookup backends.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendArg {
    /// Invidious REST API
    Invidious,
    /// Channel page scraping
    Local,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Invidious => Self::Invidious,
            BackendArg::Local => Self::Local,
        }
    }
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
