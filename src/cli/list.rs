use clap::Parser;
use tracing::instrument;
use tree_store::{Category, Row, TreeItem};

use super::{
    OutputFormat, Paths, Workspace,
    terminal::{self, Colorize},
};

/// Label width used when the terminal width is unknown.
const DEFAULT_LABEL_WIDTH: usize = 60;

/// Command arguments for `tree-store list`.
#[derive(Debug, Parser)]
#[command(about = "List every record in insertion order")]
pub struct List {
    /// Show only records without a parent.
    #[arg(long, conflicts_with = "orphans")]
    roots: bool,

    /// Show only records whose parent is missing.
    #[arg(long)]
    orphans: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let workspace = Workspace::open(paths)?;
        let store = &workspace.store;

        let items: Vec<&TreeItem> = if self.roots {
            store.roots().collect()
        } else if self.orphans {
            store.orphans().collect()
        } else {
            store.get_all()
        };

        print_items(&items, self.output)
    }
}

/// Command arguments for `tree-store rows`.
#[derive(Debug, Parser)]
#[command(about = "List records with their category and path")]
pub struct Rows {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Rows {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let workspace = Workspace::open(paths)?;
        let rows = workspace.store.rows();

        match self.output {
            OutputFormat::Table => print_rows(&rows),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        }

        Ok(())
    }
}

/// Prints records in the requested format.
pub(super) fn print_items(items: &[&TreeItem], output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Table => print_table(items),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

fn print_table(items: &[&TreeItem]) {
    if items.is_empty() {
        println!("{}", "No records".dim());
        return;
    }

    let id_width = column_width("ID", items.iter().map(|item| item.id.to_string()));
    let parent_width = column_width(
        "PARENT",
        items.iter().map(|item| parent_cell(item)),
    );
    let label_width = label_width(id_width + parent_width + 4);

    println!(
        "{}",
        format!("{:<id_width$}  {:<parent_width$}  LABEL", "ID", "PARENT").dim()
    );
    for item in items {
        println!(
            "{:<id_width$}  {:<parent_width$}  {}",
            item.id.to_string(),
            parent_cell(item),
            terminal::truncate(&item.label, label_width)
        );
    }
}

fn print_rows(rows: &[Row<'_>]) {
    if rows.is_empty() {
        println!("{}", "No records".dim());
        return;
    }

    for row in rows {
        let path = row
            .path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        let marker = match row.category {
            Category::Group => "▸".info(),
            Category::Element => "·".dim(),
        };
        println!("{marker} {path}  {}", row.item.label);
    }
}

fn parent_cell(item: &TreeItem) -> String {
    item.parent
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string)
}

fn column_width(header: &str, cells: impl Iterator<Item = String>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

fn label_width(used: usize) -> usize {
    terminal::terminal_width()
        .map(|width| usize::from(width).saturating_sub(used).max(10))
        .unwrap_or(DEFAULT_LABEL_WIDTH)
}
