use std::collections::HashMap;

use clap::Parser;
use serde::Serialize;
use tracing::instrument;
use tree_store::{Config, ItemId, TreeItem, TreeStore};

use super::{Paths, input, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check the record file for duplicates, orphans and cycles")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: ValidateFormat,

    /// Suppress all output except errors
    #[arg(long, short, conflicts_with = "output")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum ValidateFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    duplicates: Vec<Duplicate>,
    orphans: Vec<Orphan>,
    cycles: Vec<Vec<ItemId>>,
}

#[derive(Debug, Serialize)]
struct Duplicate {
    id: ItemId,
    count: usize,
}

#[derive(Debug, Serialize)]
struct Orphan {
    id: ItemId,
    parent: ItemId,
}

impl Report {
    /// Checks raw records against the configured rules.
    ///
    /// The records are indexed leniently so that every problem is reported,
    /// not just the first duplicate.
    fn check(items: Vec<TreeItem>, config: &Config) -> Self {
        let duplicates = find_duplicates(&items);
        let store = TreeStore::new(items);

        let orphans = if config.allow_orphans {
            Vec::new()
        } else {
            store
                .orphans()
                .filter_map(|item| {
                    item.parent.clone().map(|parent| Orphan {
                        id: item.id.clone(),
                        parent,
                    })
                })
                .collect()
        };

        let cycles = if config.allow_cycles {
            Vec::new()
        } else {
            store.cycles()
        };

        Self {
            duplicates,
            orphans,
            cycles,
        }
    }

    fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.orphans.is_empty() && self.cycles.is_empty()
    }

    fn issue_count(&self) -> usize {
        self.duplicates.len() + self.orphans.len() + self.cycles.len()
    }
}

/// Ids that occur more than once, in order of first occurrence.
fn find_duplicates(items: &[TreeItem]) -> Vec<Duplicate> {
    let mut counts: HashMap<&ItemId, usize> = HashMap::new();
    let mut order = Vec::new();

    for item in items {
        let count = counts.entry(&item.id).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(&item.id);
        }
    }

    order
        .into_iter()
        .map(|id| Duplicate {
            id: id.clone(),
            count: counts[id],
        })
        .collect()
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let config = paths.config()?;
        let items = input::load_items(&paths.input)?;
        let count = items.len();

        let report = Report::check(items, &config);

        match self.output {
            ValidateFormat::Table => {
                if !self.quiet {
                    Self::output_table(&report, count);
                }
            }
            ValidateFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if !report.is_clean() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(report: &Report, count: usize) {
        if report.is_clean() {
            println!("{} {count} records, no issues", "✓".success());
            return;
        }

        for duplicate in &report.duplicates {
            println!(
                "{} duplicate id {} ({} occurrences)",
                "✗".warning(),
                duplicate.id,
                duplicate.count
            );
        }

        for orphan in &report.orphans {
            println!(
                "{} {} has missing parent {}",
                "✗".warning(),
                orphan.id,
                orphan.parent
            );
        }

        for cycle in &report.cycles {
            let ids = cycle
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("{} cycle through {ids}", "✗".warning());
        }

        println!(
            "\n{}",
            format!("{} issues in {count} records", report.issue_count()).dim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allow_orphans: bool, allow_cycles: bool) -> Config {
        Config {
            allow_orphans,
            allow_cycles,
            ..Config::default()
        }
    }

    #[test]
    fn clean_forest_has_no_issues() {
        let items = vec![
            TreeItem::root(1, "a"),
            TreeItem::child(2, 1, "b"),
            TreeItem::child(3, 2, "c"),
        ];

        let report = Report::check(items, &config(false, false));
        assert!(report.is_clean());
    }

    #[test]
    fn reports_duplicates_once_with_count() {
        let items = vec![
            TreeItem::root(1, "a"),
            TreeItem::root(2, "b"),
            TreeItem::root(1, "c"),
            TreeItem::root(1, "d"),
        ];

        let duplicates = find_duplicates(&items);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].id, ItemId::from(1));
        assert_eq!(duplicates[0].count, 3);
    }

    #[test]
    fn orphans_follow_config() {
        let items = || vec![TreeItem::root(1, "a"), TreeItem::child(2, 9, "b")];

        assert!(Report::check(items(), &config(true, false)).is_clean());

        let report = Report::check(items(), &config(false, false));
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].parent, ItemId::from(9));
    }

    #[test]
    fn cycles_follow_config() {
        let items = || vec![TreeItem::child(1, 2, "a"), TreeItem::child(2, 1, "b")];

        assert!(Report::check(items(), &config(true, true)).is_clean());

        let report = Report::check(items(), &config(true, false));
        assert_eq!(report.cycles, vec![vec![ItemId::from(1), ItemId::from(2)]]);
        assert_eq!(report.issue_count(), 1);
    }
}
