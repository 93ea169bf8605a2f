use std::process;

use clap::Parser;
use tracing::{info, instrument};
use tree_store::{ItemId, TreeItem};

use super::{Paths, Workspace, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Add a record")]
pub struct Add {
    /// The id of the new record
    #[arg(long)]
    id: ItemId,

    /// The id of the parent record (omit for a root)
    #[arg(long)]
    parent: Option<ItemId>,

    /// The label of the new record
    #[arg(long, default_value = "")]
    label: String,

    /// Write the result back to the record file
    #[arg(long, short)]
    write: bool,
}

impl Add {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(paths)?;

        if let Some(parent) = &self.parent {
            if !workspace.store.contains(parent) {
                eprintln!(
                    "{}",
                    format!("Parent {parent} does not exist; the record will be an orphan")
                        .warning()
                );
            }
        }

        let item = TreeItem::new(self.id.clone(), self.parent, self.label);
        if !workspace.store.add_item(item) {
            eprintln!("Record {} already exists", self.id);
            process::exit(1);
        }

        info!(id = %self.id, "added record");
        println!("{} {}", "Added".success(), self.id);

        if self.write {
            workspace.save()?;
        }

        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Remove a record and everything below it")]
pub struct Remove {
    /// The id of the record to remove
    id: ItemId,

    /// Write the result back to the record file
    #[arg(long, short)]
    write: bool,
}

impl Remove {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(paths)?;

        let Some(removed) = workspace.store.remove_subtree(&self.id) else {
            eprintln!("Record {} not found", self.id);
            process::exit(1);
        };

        info!(id = %self.id, count = removed.len(), "removed subtree");
        for item in &removed {
            println!("{} {} {}", "Removed".success(), item.id, item.label.dim());
        }

        if self.write {
            workspace.save()?;
        }

        Ok(())
    }
}
