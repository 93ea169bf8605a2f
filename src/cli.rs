use std::path::{Path, PathBuf};

mod config;
mod edit;
mod input;
mod list;
mod show;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use config::ConfigCommand;
use edit::{Add, Remove};
use list::{List, Rows};
use show::{Children, Parents, Show};
use tracing::{debug, instrument};
use tree_store::{Config, TreeStore};
use validate::Validate;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG: &str = "tree-store.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The record file (JSON, or YAML by `.yaml`/`.yml` extension)
    #[arg(short, long, default_value = "items.json", global = true)]
    input: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let paths = Paths {
            input: self.input,
            config: self.config,
        };
        self.command.run(&paths)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List every record in insertion order
    List(List),

    /// Show a single record with its ancestors and children
    Show(Show),

    /// List the children of a record
    Children(Children),

    /// List the ancestors of a record, nearest first
    Parents(Parents),

    /// List records decorated for grid display
    Rows(Rows),

    /// Add a record
    Add(Add),

    /// Remove a record and everything below it
    Remove(Remove),

    /// Check the record file for duplicates, orphans and cycles
    Validate(Validate),

    /// Show or initialise configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    fn run(self, paths: &Paths) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(paths)?,
            Self::Show(command) => command.run(paths)?,
            Self::Children(command) => command.run(paths)?,
            Self::Parents(command) => command.run(paths)?,
            Self::Rows(command) => command.run(paths)?,
            Self::Add(command) => command.run(paths)?,
            Self::Remove(command) => command.run(paths)?,
            Self::Validate(command) => command.run(paths)?,
            Self::Config(command) => command.run(paths)?,
        }
        Ok(())
    }
}

/// Locations given on the command line.
#[derive(Debug)]
pub struct Paths {
    input: PathBuf,
    config: Option<PathBuf>,
}

impl Paths {
    /// Loads the configuration.
    ///
    /// An explicit `--config` must exist. Otherwise [`DEFAULT_CONFIG`] is used
    /// if present, falling back to defaults.
    fn config(&self) -> anyhow::Result<Config> {
        if let Some(path) = &self.config {
            return Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()));
        }

        let fallback = Path::new(DEFAULT_CONFIG);
        if fallback.is_file() {
            debug!(path = %fallback.display(), "using config from working directory");
            return Config::load(fallback)
                .with_context(|| format!("failed to load config from {}", fallback.display()));
        }

        Ok(Config::default())
    }

    /// The config path `config init` writes to.
    fn config_target(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG))
    }
}

/// A loaded record file and the store built from it.
#[derive(Debug)]
struct Workspace {
    path: PathBuf,
    store: TreeStore,
}

impl Workspace {
    #[instrument(level = "debug")]
    fn open(paths: &Paths) -> anyhow::Result<Self> {
        let config = paths.config()?;
        let items = input::load_items(&paths.input)?;
        let store = TreeStore::build(items, config.duplicate_ids)
            .with_context(|| format!("failed to build tree from {}", paths.input.display()))?;

        // Walking a cyclic store never terminates.
        if !config.allow_cycles && store.has_cycles() {
            let cycles = store
                .cycles()
                .iter()
                .map(|cycle| {
                    let ids: Vec<String> = cycle.iter().map(ToString::to_string).collect();
                    format!("[{}]", ids.join(", "))
                })
                .collect::<Vec<_>>()
                .join(" ");
            anyhow::bail!(
                "{} contains parent cycles: {cycles} (run `validate` for details)",
                paths.input.display()
            );
        }

        Ok(Self {
            path: paths.input.clone(),
            store,
        })
    }

    /// Writes the current records back to the file they were read from.
    fn save(&self) -> anyhow::Result<()> {
        input::save_items(&self.path, &self.store.get_all())
    }
}

/// Output format for commands that print a list of records.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}
