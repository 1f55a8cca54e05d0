use clap::Parser;
use std::path::PathBuf;

/// Fetch an index archive from the data bucket repository, unpack it and
/// patch its mapping file.
#[derive(Parser, Debug)]
#[command(name = "index-import-rs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Elastic index to import from the archive with the same name
    pub index: String,

    /// Directory where files are extracted from index archives
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Organization from where index archives are retrieved
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Repository from where index archives are retrieved
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Path to a TOML config file (default: ./index-import.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}
