//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{demo, entry};
use crate::domain::TypeTag;
use crate::storage::Settings;

#[derive(Parser)]
#[command(name = "tagconf")]
#[command(author, version, about = "Inspect and edit typed tagconf files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the settings file, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the platform default
    #[arg(long, global = true, env = "TAGCONF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty config file with a header
    Init {
        /// File to create
        path: PathBuf,

        /// Header comment written on the first line
        #[arg(long, default_value = entry::DEFAULT_HEADER)]
        header: String,
    },

    /// List all entries
    Show {
        path: PathBuf,
    },

    /// Print one value
    Get {
        path: PathBuf,

        /// Entry identifier
        id: String,
    },

    /// Change an existing value (the stored type is kept)
    Set {
        path: PathBuf,

        /// Entry identifier
        id: String,

        /// New value, e.g. `42`, `true`, `1.5`, `10,20`
        value: String,
    },

    /// Add a new entry
    ///
    /// Examples:
    ///   tagconf add app.cfg int retries 3
    ///   tagconf add app.cfg rect window 0,0,800,600 --comment "Main window"
    Add {
        path: PathBuf,

        /// Value type: int, string, bool, float, point or rect
        #[arg(value_name = "TYPE")]
        kind: TypeTag,

        /// Entry identifier
        id: String,

        /// Value text
        value: String,

        /// Comment written above the entry
        #[arg(long, short, default_value = "")]
        comment: String,

        /// Overwrite an existing entry with the same id
        #[arg(long)]
        replace: bool,
    },

    /// Remove an entry
    Remove {
        path: PathBuf,

        /// Entry identifier
        id: String,
    },

    /// Report problems found while loading a file
    Check {
        path: PathBuf,
    },

    /// Create or update the sample config
    Demo {
        /// Sample file location
        #[arg(default_value = "./test.ini")]
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    let output = Output::new(cli.format.unwrap_or(settings.default_format));
    let options = settings.store;
    debug!(?options, "tagconf starting");

    match cli.command {
        Commands::Init { path, header } => entry::init(&output, &options, &path, &header),
        Commands::Show { path } => entry::show(&output, &options, &path),
        Commands::Get { path, id } => entry::get(&output, &options, &path, &id),
        Commands::Set { path, id, value } => entry::set(&output, &options, &path, &id, &value),
        Commands::Add {
            path,
            kind,
            id,
            value,
            comment,
            replace,
        } => entry::add(
            &output,
            &options,
            &path,
            entry::NewEntry {
                kind,
                id: &id,
                value: &value,
                comment: &comment,
                replace,
            },
        ),
        Commands::Remove { path, id } => entry::remove(&output, &options, &path, &id),
        Commands::Check { path } => entry::check(&output, &options, &path),
        Commands::Demo { path } => demo::run(&output, &options, &path),
    }
}
