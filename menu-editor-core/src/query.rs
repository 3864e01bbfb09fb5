//! Read-only lookups over the editor tree

use std::collections::HashSet;

use crate::models::{NodeKey, TreeNode};

/// A node together with the list that holds it
#[derive(Debug, Clone, Copy)]
pub struct NodeLocation<'a> {
    pub node: &'a TreeNode,
    /// The sibling list the node lives in (the root list for top-level nodes)
    pub siblings: &'a [TreeNode],
    pub index: usize,
    /// `None` for top-level nodes
    pub parent: Option<&'a TreeNode>,
}

/// Depth-first search by session key
pub fn find_by_key<'a>(nodes: &'a [TreeNode], key: &NodeKey) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.key == *key {
            return Some(node);
        }
        if let Some(found) = find_by_key(&node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_by_key`]
pub fn find_by_key_mut<'a>(nodes: &'a mut [TreeNode], key: &NodeKey) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.key == *key {
            return Some(node);
        }
        if let Some(found) = find_by_key_mut(&mut node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Depth-first search by persisted identifier
pub fn find_by_menu_id<'a>(nodes: &'a [TreeNode], menu_id: &str) -> Option<&'a TreeNode> {
    preorder(nodes)
        .into_iter()
        .find(|node| node.item.menu_id == menu_id)
}

/// Finds a node and the exact sibling list and index it occupies
pub fn find_with_parent<'a>(nodes: &'a [TreeNode], key: &NodeKey) -> Option<NodeLocation<'a>> {
    locate_in(nodes, key, None)
}

fn locate_in<'a>(
    siblings: &'a [TreeNode],
    key: &NodeKey,
    parent: Option<&'a TreeNode>,
) -> Option<NodeLocation<'a>> {
    for (index, node) in siblings.iter().enumerate() {
        if node.key == *key {
            return Some(NodeLocation {
                node,
                siblings,
                index,
                parent,
            });
        }
        if let Some(found) = locate_in(&node.children, key, Some(node)) {
            return Some(found);
        }
    }
    None
}

/// Child indices leading from the root list to `key`
pub fn path_to(nodes: &[TreeNode], key: &NodeKey) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.key == *key {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(&node.children, key) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Mutable access to the sibling list holding `key` and the node's index
/// in it, so callers can splice without searching twice.
pub fn find_with_parent_mut<'a>(
    tree: &'a mut Vec<TreeNode>,
    key: &NodeKey,
) -> Option<(&'a mut Vec<TreeNode>, usize)> {
    let path = path_to(tree, key)?;
    let (&index, parents) = path.split_last()?;

    let mut list = tree;
    for &step in parents {
        list = &mut list.get_mut(step)?.children;
    }
    Some((list, index))
}

/// Every non-empty `menu_id` in the tree
pub fn all_ids(nodes: &[TreeNode]) -> HashSet<String> {
    let mut ids = HashSet::new();
    collect_ids(nodes, &mut ids);
    ids
}

fn collect_ids(nodes: &[TreeNode], out: &mut HashSet<String>) {
    for node in nodes {
        if !node.item.menu_id.is_empty() {
            out.insert(node.item.menu_id.clone());
        }
        collect_ids(&node.children, out);
    }
}

/// All nodes, parents before children, siblings in order
pub fn preorder(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    push_preorder(nodes, &mut out, None);
    out
}

/// Rows a tree view shows: children are listed only under expanded nodes
pub fn visible_rows<'a>(nodes: &'a [TreeNode], expanded: &HashSet<NodeKey>) -> Vec<&'a TreeNode> {
    let mut out = Vec::new();
    push_preorder(nodes, &mut out, Some(expanded));
    out
}

fn push_preorder<'a>(
    nodes: &'a [TreeNode],
    out: &mut Vec<&'a TreeNode>,
    expanded: Option<&HashSet<NodeKey>>,
) {
    for node in nodes {
        out.push(node);
        let descend = expanded.map_or(true, |set| set.contains(&node.key));
        if descend {
            push_preorder(&node.children, out, expanded);
        }
    }
}

/// True if every node's level equals its number of ancestors
pub fn levels_consistent(nodes: &[TreeNode]) -> bool {
    fn check(nodes: &[TreeNode], depth: usize) -> bool {
        nodes
            .iter()
            .all(|node| node.level == depth && check(&node.children, depth + 1))
    }
    check(nodes, 0)
}
