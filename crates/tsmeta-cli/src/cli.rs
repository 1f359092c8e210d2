use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tsmeta - A heuristic metadata extractor for CASP TS model files: parses loose TS headers, caches the results per model, and prints trimmed summaries.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a tsmeta.toml configuration file (defaults to ./tsmeta.toml
    /// when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one or more TS files and print their trimmed metadata.
    Parse(ParseArgs),
    /// Register a model from a structure file and attach its sibling TS metadata.
    Load(LoadArgs),
    /// Parse a TS file and attach its metadata to a model key.
    Attach(AttachArgs),
    /// Show cached or auto-discovered TS metadata for a model key.
    Show(ShowArgs),
    /// Start an interactive session that keeps models and cached metadata.
    Shell,
}

/// Arguments for the `parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Path to a TS file, or a wildcard pattern (e.g. '/data/*.txt').
    #[arg(required = true, value_name = "PATTERN")]
    pub pattern: String,

    /// Emit the full records as JSON instead of the trimmed summaries.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `load` subcommand.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Path to a structure file (.pdb/.ent), or the name of an
    /// already-registered model (a unique substring is enough).
    #[arg(required = true, value_name = "MODEL")]
    pub model: String,

    /// Explicit TS file; when omitted, a sibling TS next to the structure
    /// file is searched for.
    #[arg(value_name = "TS_PATH")]
    pub ts: Option<PathBuf>,
}

/// Arguments for the `attach` subcommand.
#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Path to the TS file to parse.
    #[arg(required = true, value_name = "TS_PATH")]
    pub ts: PathBuf,

    /// The model key to store the metadata under.
    #[arg(required = true, value_name = "MODEL")]
    pub target: String,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Model key or TS basename; omit to select among registered models.
    #[arg(value_name = "KEY")]
    pub key: Option<String>,

    /// Explicit TS file to parse and cache under the key.
    #[arg(long, value_name = "PATH")]
    pub ts: Option<PathBuf>,

    /// Emit the record as JSON instead of the trimmed summary.
    #[arg(long)]
    pub json: bool,
}
