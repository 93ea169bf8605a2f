use clap::Subcommand;
use tracing::instrument;
use tree_store::Config;

use super::{Paths, terminal::Colorize};

/// Command arguments for `tree-store config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        match self {
            Self::Show => {
                let config = paths.config()?;
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Self::Init { force } => {
                let target = paths.config_target();
                if target.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        target.display()
                    );
                }

                Config::default().save(target)?;
                println!("{} {}", "Created".success(), target.display());
            }
        }
        Ok(())
    }
}
