//! Structural edits on the editor tree
//!
//! All functions are total over stale keys: a key that is no longer in the
//! tree makes the call a no-op, reported through the return value.

use log::debug;

use crate::error::EditWarning;
use crate::id_gen::IdGenerator;
use crate::models::{DropPosition, NodeKey, Submenu, TreeNode};
use crate::query::{all_ids, find_by_key, find_by_key_mut, find_with_parent_mut};

/// Removes `key` from whichever list holds it and returns the detached
/// subtree. `None` if the key is not in the tree.
pub fn remove(tree: &mut Vec<TreeNode>, key: &NodeKey) -> Option<TreeNode> {
    let (siblings, index) = find_with_parent_mut(tree, key)?;
    Some(siblings.remove(index))
}

/// Rewrites `level` on `node` and all its descendants starting at `level`
pub fn renumber_levels(node: &mut TreeNode, level: usize) {
    node.level = level;
    for child in node.children.iter_mut() {
        renumber_levels(child, level + 1);
    }
}

/// Places a detached `node` relative to `target`.
///
/// `Inside` makes it the first child of the target, giving the target
/// default submenu metadata if it was a plain menu item. `Before` and
/// `After` splice it into the target's own sibling list. Levels of the
/// inserted subtree are rewritten to match the new depth.
///
/// Returns the node back untouched when nothing was inserted: the target
/// is missing, or the node is the target itself.
pub fn insert(
    tree: &mut Vec<TreeNode>,
    target: &NodeKey,
    position: DropPosition,
    mut node: TreeNode,
) -> Option<TreeNode> {
    if node.key == *target {
        return Some(node);
    }

    match position {
        DropPosition::Inside => {
            let Some(parent) = find_by_key_mut(tree, target) else {
                return Some(node);
            };
            if parent.item.submenu.is_none() {
                parent.item.submenu = Some(Submenu::new(parent.item.title.clone()));
            }
            renumber_levels(&mut node, parent.level + 1);
            parent.children.insert(0, node);
        }
        DropPosition::Before | DropPosition::After => {
            let Some((siblings, index)) = find_with_parent_mut(tree, target) else {
                return Some(node);
            };
            let level = siblings[index].level;
            renumber_levels(&mut node, level);
            let at = if position == DropPosition::Before {
                index
            } else {
                index + 1
            };
            siblings.insert(at, node);
        }
    }
    None
}

/// Appends a detached node as the last top-level node
pub fn append_root(tree: &mut Vec<TreeNode>, mut node: TreeNode) {
    renumber_levels(&mut node, 0);
    tree.push(node);
}

/// Moves `key` relative to `target`.
///
/// The dragged subtree is checked before it is detached: dropping onto
/// itself or into its own subtree is refused and leaves the tree as it was.
/// `Ok(false)` means one of the keys is stale.
pub fn move_node(
    tree: &mut Vec<TreeNode>,
    key: &NodeKey,
    target: &NodeKey,
    position: DropPosition,
) -> Result<bool, EditWarning> {
    if key == target {
        return Err(EditWarning::DropOnSelf);
    }
    let Some(dragged) = find_by_key(tree, key) else {
        return Ok(false);
    };
    if dragged.contains(target) {
        return Err(EditWarning::DropIntoDescendant {
            title: dragged.item.title.clone(),
        });
    }
    if find_by_key(tree, target).is_none() {
        return Ok(false);
    }

    let Some(node) = remove(tree, key) else {
        return Ok(false);
    };
    if let Some(orphan) = insert(tree, target, position, node) {
        // Unreachable after the checks above; keep the node rather than lose it
        append_root(tree, orphan);
    }
    debug!("Moved {} {} {}", key, position, target);
    Ok(true)
}

/// Detaches `key` and re-appends it at the end of the root list
pub fn move_to_root(tree: &mut Vec<TreeNode>, key: &NodeKey) -> bool {
    match remove(tree, key) {
        Some(node) => {
            append_root(tree, node);
            debug!("Moved {} to root", key);
            true
        }
        None => false,
    }
}

/// Clones `key` and its whole subtree right after the original.
///
/// The clone's root gets `copy_suffix` appended to its title; descendants
/// keep their titles. Every clone gets a fresh session key and a new id
/// minted against the ids in use, including those minted earlier in the
/// same call. Returns the clone's key.
pub fn duplicate_subtree(
    tree: &mut Vec<TreeNode>,
    key: &NodeKey,
    gen: &IdGenerator,
    copy_suffix: &str,
) -> Option<NodeKey> {
    let mut existing = all_ids(tree);
    let (siblings, index) = find_with_parent_mut(tree, key)?;

    let mut copy = siblings[index].clone();
    if !copy_suffix.is_empty() {
        copy.item.title = format!("{} {}", copy.item.title, copy_suffix);
    }
    refresh_identity(&mut copy, gen, &mut existing);

    let new_key = copy.key;
    siblings.insert(index + 1, copy);
    debug!("Duplicated {} as {}", key, new_key);
    Some(new_key)
}

fn refresh_identity(
    node: &mut TreeNode,
    gen: &IdGenerator,
    existing: &mut std::collections::HashSet<String>,
) {
    node.key = NodeKey::new();
    node.item.menu_id = gen.generate_into(&node.item.title, existing);
    for child in node.children.iter_mut() {
        refresh_identity(child, gen, existing);
    }
}
