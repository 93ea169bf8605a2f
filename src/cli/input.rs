//! Reading and writing record files.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;
use tree_store::TreeItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Reads a top-level list of records.
pub fn load_items(path: &Path) -> anyhow::Result<Vec<TreeItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let items: Vec<TreeItem> = match Format::of(path) {
        Format::Json => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {} as JSON", path.display()))?,
        Format::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {} as YAML", path.display()))?,
    };

    debug!(count = items.len(), path = %path.display(), "loaded records");
    Ok(items)
}

/// Writes records as a top-level list, in the format the extension implies.
pub fn save_items<T: Serialize>(path: &Path, items: &[T]) -> anyhow::Result<()> {
    let content = match Format::of(path) {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(items)?;
            json.push('\n');
            json
        }
        Format::Yaml => serde_yaml::to_string(items)?,
    };

    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(count = items.len(), path = %path.display(), "saved records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tree_store::ItemId;

    use super::*;

    const JSON: &str = r#"[
        {"id": 1, "parent": null, "label": "Item 1"},
        {"id": "1234ew", "parent": 1, "label": "Item 2", "colour": "red"}
    ]"#;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::of(Path::new("items.json")), Format::Json);
        assert_eq!(Format::of(Path::new("items.YAML")), Format::Yaml);
        assert_eq!(Format::of(Path::new("items.yml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("items")), Format::Json);
    }

    #[test]
    fn loads_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        std::fs::write(&path, JSON).unwrap();

        let items = load_items(&path).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, ItemId::from("1234ew"));
        assert_eq!(items[1].parent, Some(ItemId::from(1)));
        assert!(items[1].extra.contains_key("colour"));
    }

    #[test]
    fn loads_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.yaml");
        std::fs::write(
            &path,
            "- id: 1\n  parent: null\n  label: Item 1\n- id: two\n  parent: 1\n  label: Item 2\n",
        )
        .unwrap();

        let items = load_items(&path).unwrap();

        assert_eq!(items, vec![
            TreeItem::root(1, "Item 1"),
            TreeItem::child("two", 1, "Item 2")
        ]);
    }

    #[test]
    fn save_then_load_preserves_records() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("items.json");
        std::fs::write(&source, JSON).unwrap();
        let items = load_items(&source).unwrap();

        for name in ["copy.json", "copy.yaml"] {
            let target = tmp.path().join(name);
            save_items(&target, &items).unwrap();
            assert_eq!(load_items(&target).unwrap(), items, "{name}");
        }
    }

    #[test]
    fn demo_file_builds_a_forest() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/items.json");
        let store = tree_store::TreeStore::try_new(load_items(&path).unwrap()).unwrap();

        assert_eq!(store.len(), 8);
        assert!(!store.has_cycles());
        assert_eq!(store.get_all_parents(&ItemId::from(6)).len(), 3);
    }

    #[test]
    fn invalid_content_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        std::fs::write(&path, "{not json").unwrap();

        let error = load_items(&path).unwrap_err();
        assert!(error.to_string().contains("failed to parse"));
    }
}
