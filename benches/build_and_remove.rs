//! Benchmarks bulk construction of a large store and excision of a large
//! subtree from it.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tree_store::{ItemId, TreeItem, TreeStore};

/// A complete tree with the given branching factor and depth, in
/// breadth-first order.
fn generate(branching: i64, depth: u32) -> Vec<TreeItem> {
    let mut items = vec![TreeItem::root(0, "root")];
    let mut level = vec![0_i64];
    let mut next_id = 1_i64;

    for _ in 0..depth {
        let mut next_level = Vec::new();
        for parent in level {
            for _ in 0..branching {
                items.push(TreeItem::child(next_id, parent, format!("item {next_id}")));
                next_level.push(next_id);
                next_id += 1;
            }
        }
        level = next_level;
    }

    items
}

fn build(c: &mut Criterion) {
    let items = generate(8, 5);

    c.bench_function("build 37k items", |b| {
        b.iter_batched(
            || items.clone(),
            |items| TreeStore::new(items),
            BatchSize::LargeInput,
        );
    });
}

fn remove(c: &mut Criterion) {
    let store = TreeStore::new(generate(8, 5));
    let first_child = ItemId::from(1);

    c.bench_function("remove subtree of 4.7k items", |b| {
        b.iter_batched(
            || store.clone(),
            |mut store| store.remove_item(&first_child),
            BatchSize::LargeInput,
        );
    });
}

fn descendants(c: &mut Criterion) {
    let store = TreeStore::new(generate(8, 5));
    let root = ItemId::from(0);

    c.bench_function("all descendants of root", |b| {
        b.iter(|| store.get_all_children(&root).len());
    });
}

criterion_group!(benches, build, remove, descendants);
criterion_main!(benches);
