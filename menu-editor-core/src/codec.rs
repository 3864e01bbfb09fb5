//! Conversion between the persisted nested `MenuItem` form and the editor tree

use std::collections::HashSet;

use crate::id_gen::IdGenerator;
use crate::models::{MenuItem, Submenu, TreeNode};

/// What the id backfill pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdBackfill {
    /// Items that had no id and received one
    pub assigned: usize,
    /// `(old, new)` for items whose id repeated an earlier item's id
    pub renamed: Vec<(String, String)>,
}

impl IdBackfill {
    pub fn is_empty(&self) -> bool {
        self.assigned == 0 && self.renamed.is_empty()
    }
}

/// Gives every item a unique id before the tree is built.
///
/// Items are visited depth-first in document order, so earlier items keep
/// (or claim) their natural id and later ones get the suffixed variants.
/// Every id already present anywhere in the input is reserved up front.
pub fn backfill_ids(items: &mut [MenuItem], gen: &IdGenerator) -> IdBackfill {
    let mut reserved = HashSet::new();
    collect_item_ids(items, &mut reserved);

    let mut seen = HashSet::new();
    let mut report = IdBackfill::default();
    backfill_level(items, gen, &mut reserved, &mut seen, &mut report);
    report
}

fn collect_item_ids(items: &[MenuItem], out: &mut HashSet<String>) {
    for item in items {
        if !item.menu_id.is_empty() {
            out.insert(item.menu_id.clone());
        }
        if let Some(submenu) = &item.submenu {
            collect_item_ids(&submenu.items, out);
        }
    }
}

fn backfill_level(
    items: &mut [MenuItem],
    gen: &IdGenerator,
    reserved: &mut HashSet<String>,
    seen: &mut HashSet<String>,
    report: &mut IdBackfill,
) {
    for item in items.iter_mut() {
        if item.menu_id.is_empty() {
            item.menu_id = gen.generate_into(&item.title, reserved);
            report.assigned += 1;
        } else if seen.contains(&item.menu_id) {
            let old = std::mem::take(&mut item.menu_id);
            item.menu_id = gen.generate_into(&item.title, reserved);
            report.renamed.push((old, item.menu_id.clone()));
        }
        seen.insert(item.menu_id.clone());

        if let Some(submenu) = item.submenu.as_mut() {
            backfill_level(&mut submenu.items, gen, reserved, seen, report);
        }
    }
}

/// Wraps persisted items into tree nodes with fresh keys and levels
pub fn build_tree(items: Vec<MenuItem>) -> Vec<TreeNode> {
    build_level(items, 0)
}

fn build_level(items: Vec<MenuItem>, level: usize) -> Vec<TreeNode> {
    items
        .into_iter()
        .map(|mut item| {
            // Children move out of the submenu metadata and into the node
            let children = item
                .submenu
                .as_mut()
                .map(|submenu| std::mem::take(&mut submenu.items))
                .unwrap_or_default();

            let mut node = TreeNode::new(item, level);
            node.children = build_level(children, level + 1);
            node
        })
        .collect()
}

/// Turns the editor tree back into persisted items. Keys and levels are
/// dropped; any node with children gets submenu metadata, defaulted from
/// its own title when it had none.
pub fn flatten(nodes: &[TreeNode]) -> Vec<MenuItem> {
    nodes
        .iter()
        .map(|node| {
            let mut item = node.item.clone();
            if item.submenu.is_none() && !node.children.is_empty() {
                item.submenu = Some(Submenu::new(item.title.clone()));
            }
            if let Some(submenu) = item.submenu.as_mut() {
                submenu.items = flatten(&node.children);
            }
            item
        })
        .collect()
}
