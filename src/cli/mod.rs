//! Command-line interface for droidscout
//!
//! The main CLI structure and command dispatch. Global flags override the
//! loaded configuration before any command runs.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::model::Category;

pub mod commands;
mod output;

pub use output::Output;

/// Output format for read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
}

/// droidscout - browse and extract data from an attached device
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Bridge executable name or path (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    pub bridge: Option<String>,

    /// Device serial to target
    #[arg(short, long, value_name = "SERIAL", global = true)]
    pub serial: Option<String>,

    /// Root directory for downloads and reports
    #[arg(long, value_name = "DIR", global = true)]
    pub output_root: Option<PathBuf>,

    /// Timeout for one bridge invocation, in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List connected devices
    Devices,
    /// List files on the device, categorized
    Ls {
        /// Remote directory to list
        #[arg(default_value = "/sdcard")]
        directory: String,
        /// Recurse into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Only show files of one category
        #[arg(long)]
        category: Option<Category>,
        /// Cap the number of entries shown
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Pull files from the device
    Pull {
        /// Remote paths to pull
        #[arg(required = true)]
        remotes: Vec<String>,
        /// Download directory (defaults to <output-root>/<category>)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Show device properties
    Props,
    /// Show battery and uptime information
    Sysinfo,
    /// Show the call log
    Calls,
    /// Show the SMS log
    Sms,
    /// Report generation and retrieval
    #[command(subcommand)]
    Report(ReportCommands),
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a filtered media report (timestamp-suffixed artifact)
    Media {
        /// Category of files to include
        #[arg(long)]
        category: Category,
        /// Remote directory to list
        #[arg(long, default_value = "/sdcard")]
        directory: String,
        /// Only include files whose path starts with this prefix
        #[arg(long, value_name = "PREFIX")]
        path_prefix: Option<String>,
        /// Only include files modified on or after this day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        after: Option<String>,
        /// Only include files modified on or before this day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        before: Option<String>,
        /// Maximum number of files in the report
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Generate the call-log report (fixed name, overwrites)
    Calls,
    /// Generate the SMS report (fixed name, overwrites)
    Sms,
    /// Generate the camera media report (fixed name, overwrites)
    Camera {
        /// Maximum number of photos
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the path of a previously generated report
    Show {
        /// Report kind: media, calls, sms, or camera
        kind: String,
        /// Category, required for `media`
        #[arg(long)]
        category: Option<Category>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);

        let mut config = Config::load(self.config.as_deref())?;
        if let Some(bridge) = self.bridge {
            config.bridge = bridge;
        }
        if let Some(serial) = self.serial {
            config.serial = Some(serial);
        }
        if let Some(root) = self.output_root {
            config.output_root = root;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }

        match self.command {
            Some(Commands::Devices) => {
                commands::devices::execute(&config, &output, self.format).await
            }
            Some(Commands::Ls {
                directory,
                recursive,
                category,
                limit,
            }) => {
                commands::ls::execute(&directory, recursive, category, limit, &config, &output, self.format)
                    .await
            }
            Some(Commands::Pull { remotes, out }) => {
                commands::pull::execute(&remotes, out.as_deref(), &config, &output).await
            }
            Some(Commands::Props) => commands::props::execute(&config, &output, self.format).await,
            Some(Commands::Sysinfo) => {
                commands::sysinfo::execute(&config, &output, self.format).await
            }
            Some(Commands::Calls) => commands::calls::execute(&config, &output, self.format).await,
            Some(Commands::Sms) => commands::sms::execute(&config, &output, self.format).await,
            Some(Commands::Report(cmd)) => {
                commands::report::execute(cmd, &config, &output, self.format).await
            }
            None => {
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
