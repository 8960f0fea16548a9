use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Wind fragility curves for transmission structures", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that builds a model.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    /// TOML file overriding the built-in model constants
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// CSV file replacing the built-in classification score table
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub scores: Option<PathBuf>,

    /// Reference year for asset ages (defaults to the current year)
    #[arg(long)]
    pub as_of_year: Option<i32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess every structure in a snapshot and write the fragility table
    Run {
        /// Asset snapshot CSV
        #[arg(value_hint = ValueHint::FilePath)]
        assets: PathBuf,

        /// Output CSV (wide table)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,

        /// Also write one JSON object per asset
        #[arg(long, value_hint = ValueHint::FilePath)]
        jsonl: Option<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        /// Worker threads (`auto` = one per CPU)
        #[arg(long, default_value = "auto")]
        threads: String,
    },
    /// Show the components and fragility curve of one structure
    Curve {
        /// Asset snapshot CSV
        #[arg(value_hint = ValueHint::FilePath)]
        assets: PathBuf,

        /// Asset id (SAP_EQUIP_ID)
        #[arg(long)]
        asset: String,

        #[command(flatten)]
        model: ModelArgs,

        /// Print every n-th mph of the curve
        #[arg(long, default_value_t = 10)]
        step: u32,
    },
    /// Resolve a classification label to its scores
    Score {
        /// Category label, e.g. "Prime Farmland"
        label: String,

        /// Only this dimension (agriculture, wetland, atmospheric_corrosion, ...)
        #[arg(long)]
        dimension: Option<String>,

        /// CSV file replacing the built-in classification score table
        #[arg(long, value_hint = ValueHint::FilePath)]
        scores: Option<PathBuf>,
    },
    /// Print the effective model constants as TOML
    Config {
        /// TOML file overriding the built-in model constants
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
