use std::process;

use clap::Parser;
use serde_json::json;
use tracing::instrument;
use tree_store::{ItemId, TreeItem, TreeStore};

use super::{OutputFormat, Paths, Workspace, list::print_items, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display a record with its ancestors and children")]
pub struct Show {
    /// The id of the record to display
    id: ItemId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: ShowFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum ShowFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let workspace = Workspace::open(paths)?;
        let store = &workspace.store;

        let item = require(store, &self.id);

        match self.output {
            ShowFormat::Pretty => Self::output_pretty(store, item),
            ShowFormat::Json => Self::output_json(store, item)?,
        }

        Ok(())
    }

    fn output_pretty(store: &TreeStore, item: &TreeItem) {
        println!("# {} {}", item.id, item.label);

        let path = store
            .path(&item.id)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        println!("  Path:   {path}");

        match &item.parent {
            None => println!("  Parent: {}", "(root)".dim()),
            Some(parent) if !store.contains(parent) => {
                println!("  Parent: {} {}", parent, "(missing)".warning());
            }
            Some(parent) => println!("  Parent: {parent}"),
        }

        if !item.extra.is_empty() {
            println!("\n{}", "Fields".dim());
            for (key, value) in &item.extra {
                println!("  {key}: {value}");
            }
        }

        let ancestors = store.get_all_parents(&item.id);
        if !ancestors.is_empty() {
            println!("\n{}", "Ancestors".dim());
            for ancestor in ancestors {
                println!("  • {} {}", ancestor.id, ancestor.label);
            }
        }

        let children = store.get_children(&item.id);
        if !children.is_empty() {
            println!("\n{}", "Children".dim());
            for child in children {
                println!("  • {} {}", child.id, child.label);
            }
        }

        let descendants = store.get_all_children(&item.id).len();
        if descendants > 0 {
            println!("\n  {} descendants in total", descendants.to_string().info());
        }
    }

    fn output_json(store: &TreeStore, item: &TreeItem) -> anyhow::Result<()> {
        let ancestors: Vec<&ItemId> = store
            .get_all_parents(&item.id)
            .into_iter()
            .map(|ancestor| &ancestor.id)
            .collect();
        let children: Vec<&ItemId> = store.children(&item.id).map(|child| &child.id).collect();

        let output = json!({
            "item": item,
            "path": store.path(&item.id),
            "ancestors": ancestors,
            "children": children,
            "descendants": store.get_all_children(&item.id).len(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "List the children of a record")]
pub struct Children {
    /// The id of the parent record
    id: ItemId,

    /// Include every descendant, not only direct children
    #[arg(long, short)]
    all: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Children {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let workspace = Workspace::open(paths)?;
        let store = &workspace.store;

        let items = if self.all {
            store.get_all_children(&self.id)
        } else {
            store.get_children(&self.id)
        };

        print_items(&items, self.output)
    }
}

#[derive(Debug, Parser)]
#[command(about = "List the ancestors of a record, nearest first")]
pub struct Parents {
    /// The id of the record
    id: ItemId,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Parents {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let workspace = Workspace::open(paths)?;
        let store = &workspace.store;

        require(store, &self.id);
        print_items(&store.get_all_parents(&self.id), self.output)
    }
}

/// Looks up a record, exiting with status 1 if it does not exist.
fn require<'a>(store: &'a TreeStore, id: &ItemId) -> &'a TreeItem {
    store.get_item(id).unwrap_or_else(|| {
        eprintln!("Record {id} not found");
        process::exit(1);
    })
}
