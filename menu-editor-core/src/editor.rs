//! Editing session over one menu tree
//!
//! `MenuTreeEditor` owns the tree for the lifetime of an editing session.
//! It is rebuilt from configuration on `open`, mutated in place by the
//! commands below and by pointer gestures, and turned back into persisted
//! items by `commit`. Dropping the editor without committing discards
//! every change.

use log::{debug, info, warn};
use std::collections::HashSet;

use crate::codec::{backfill_ids, build_tree, flatten};
use crate::drag::{DragDropController, DragState, DropOutcome};
use crate::error::EditWarning;
use crate::export;
use crate::id_gen::IdGenerator;
use crate::models::{
    DisplayStyle, DropPosition, MenuItem, Navigation, NodeKey, NodeKind, Submenu, SubmenuLayout,
    TreeNode,
};
use crate::mutate;
use crate::query::{all_ids, find_by_key, find_by_key_mut, find_by_menu_id, preorder, visible_rows};
use crate::settings::EditorSettings;

/// Field changes for [`MenuTreeEditor::update_node`]; `None` leaves a
/// field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub title: Option<String>,
    /// `Some(None)` clears the icon
    pub icon: Option<Option<String>>,
    pub navigation: Option<Navigation>,
    /// Container-only fields, ignored for menu items
    pub submenu_title: Option<String>,
    pub display_style: Option<DisplayStyle>,
    pub layout: Option<SubmenuLayout>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == NodeUpdate::default()
    }
}

/// The in-memory menu tree plus the session state around it
#[derive(Debug, Clone)]
pub struct MenuTreeEditor {
    tree: Vec<TreeNode>,
    /// Display-only: which containers show their children
    expanded: HashSet<NodeKey>,
    drag: DragDropController,
    ids: IdGenerator,
    settings: EditorSettings,
    warnings: Vec<EditWarning>,
    dirty: bool,
}

impl Default for MenuTreeEditor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl MenuTreeEditor {
    /// Creates an editor over an empty menu
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            tree: Vec::new(),
            expanded: HashSet::new(),
            drag: DragDropController::new(settings.drop_zones),
            ids: IdGenerator::new(settings.id_prefix.clone()),
            settings,
            warnings: Vec::new(),
            dirty: false,
        }
    }

    /// Opens an editing session over persisted items
    pub fn open(items: Vec<MenuItem>, settings: EditorSettings) -> Self {
        let mut editor = Self::new(settings);
        editor.reload(items);
        editor
    }

    /// Replaces the tree with freshly loaded items. Keys, display state,
    /// any drag in progress and queued warnings are all discarded.
    pub fn reload(&mut self, mut items: Vec<MenuItem>) {
        let backfill = backfill_ids(&mut items, &self.ids);

        self.tree = build_tree(items);
        self.expanded.clear();
        self.drag.on_cancel();
        self.warnings.clear();
        self.dirty = !backfill.is_empty();

        if backfill.assigned > 0 {
            info!("Assigned ids to {} item(s) without one", backfill.assigned);
        }
        for (old, new) in backfill.renamed {
            self.advise(EditWarning::DuplicateId { old, new });
        }
        for warning in self.validate() {
            self.advise(warning);
        }
        debug!("Opened menu tree with {} node(s)", preorder(&self.tree).len());
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn node(&self, key: &NodeKey) -> Option<&TreeNode> {
        find_by_key(&self.tree, key)
    }

    /// Resolves a persisted id to the node's key in this session
    pub fn key_for_menu_id(&self, menu_id: &str) -> Option<NodeKey> {
        find_by_menu_id(&self.tree, menu_id).map(|node| node.key)
    }

    /// True when the tree differs from what was last opened or committed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Appends a new top-level node and returns its key
    pub fn add_root_node(&mut self, kind: NodeKind) -> NodeKey {
        let title = self.default_title(kind);
        self.add_root_node_titled(kind, &title)
    }

    /// Like [`add_root_node`](Self::add_root_node), with the id minted
    /// from `title` instead of the default title
    pub fn add_root_node_titled(&mut self, kind: NodeKind, title: &str) -> NodeKey {
        let node = self.new_node(kind, title, 0);
        let key = node.key;
        debug!("Added {} {} at root", kind, node.item.menu_id);
        self.tree.push(node);
        self.dirty = true;
        key
    }

    /// Appends a new node as the last child of `parent`.
    ///
    /// Only containers accept children; a menu item must be converted
    /// first. `Ok(None)` if `parent` is no longer in the tree.
    pub fn add_child_node(
        &mut self,
        parent: &NodeKey,
        kind: NodeKind,
    ) -> Result<Option<NodeKey>, EditWarning> {
        let title = self.default_title(kind);
        self.add_child_node_titled(parent, kind, &title)
    }

    pub fn add_child_node_titled(
        &mut self,
        parent: &NodeKey,
        kind: NodeKind,
        title: &str,
    ) -> Result<Option<NodeKey>, EditWarning> {
        let Some(parent_node) = find_by_key(&self.tree, parent) else {
            return Ok(None);
        };
        if !parent_node.is_container() {
            let warning = EditWarning::NotAContainer {
                title: parent_node.item.title.clone(),
            };
            self.advise(warning.clone());
            return Err(warning);
        }

        let node = self.new_node(kind, title, parent_node.level + 1);
        let key = node.key;
        debug!("Added {} {} under {}", kind, node.item.menu_id, parent);

        if let Some(parent_node) = find_by_key_mut(&mut self.tree, parent) {
            parent_node.children.push(node);
        }
        self.expanded.insert(*parent);
        self.dirty = true;
        Ok(Some(key))
    }

    /// Removes a node and its subtree. `false` if the key is stale.
    pub fn remove_node(&mut self, key: &NodeKey) -> bool {
        let Some(removed) = mutate::remove(&mut self.tree, key) else {
            return false;
        };
        for node in preorder(std::slice::from_ref(&removed)) {
            self.expanded.remove(&node.key);
        }
        debug!(
            "Removed {} ({} node(s))",
            removed.item.menu_id,
            removed.subtree_len()
        );
        self.dirty = true;
        true
    }

    /// Copies a node and its subtree right after the original
    pub fn duplicate_node(&mut self, key: &NodeKey) -> Option<NodeKey> {
        let copy = mutate::duplicate_subtree(
            &mut self.tree,
            key,
            &self.ids,
            &self.settings.copy_suffix,
        )?;
        self.dirty = true;
        Some(copy)
    }

    /// Applies field changes. `false` if the key is stale.
    ///
    /// Setting a navigation target on a container that has children is
    /// allowed but queues a [`EditWarning::MixedLeafAndContainer`].
    pub fn update_node(&mut self, key: &NodeKey, update: NodeUpdate) -> bool {
        let Some(node) = find_by_key_mut(&mut self.tree, key) else {
            return false;
        };

        if let Some(title) = update.title {
            node.item.title = title;
        }
        if let Some(icon) = update.icon {
            node.item.icon = icon.filter(|i| !i.trim().is_empty());
        }
        if let Some(navigation) = update.navigation {
            node.item.navigation = navigation;
        }
        if let Some(submenu) = node.item.submenu.as_mut() {
            if let Some(title) = update.submenu_title {
                submenu.title = title;
            }
            if let Some(style) = update.display_style {
                submenu.display_style = style;
            }
            if let Some(layout) = update.layout {
                submenu.layout = layout;
            }
        }

        let mixed = !node.item.navigation.is_none() && !node.children.is_empty();
        let menu_id = node.item.menu_id.clone();
        self.dirty = true;
        if mixed {
            self.advise(EditWarning::MixedLeafAndContainer { menu_id });
        }
        true
    }

    /// Moves a node relative to another, with the same rules as a drop
    pub fn move_node(
        &mut self,
        key: &NodeKey,
        target: &NodeKey,
        position: DropPosition,
    ) -> Result<bool, EditWarning> {
        match mutate::move_node(&mut self.tree, key, target, position) {
            Ok(moved) => {
                if moved {
                    self.after_move(target, position);
                }
                Ok(moved)
            }
            Err(warning) => {
                self.advise(warning.clone());
                Err(warning)
            }
        }
    }

    /// Makes a node the last top-level node
    pub fn move_to_root(&mut self, key: &NodeKey) -> bool {
        let moved = mutate::move_to_root(&mut self.tree, key);
        self.dirty |= moved;
        moved
    }

    /// Switches a node between menu item and submenu.
    ///
    /// A submenu with children cannot become a menu item. Converting to the
    /// current kind is a successful no-op.
    pub fn convert_node(&mut self, key: &NodeKey, kind: NodeKind) -> Result<bool, EditWarning> {
        let style = self.settings.new_container_style;
        let layout = self.settings.new_container_layout;

        let Some(node) = find_by_key_mut(&mut self.tree, key) else {
            return Ok(false);
        };
        if node.kind() == kind {
            return Ok(true);
        }

        match kind {
            NodeKind::Submenu => {
                node.item.submenu = Some(Submenu {
                    display_style: style,
                    layout,
                    ..Submenu::new(node.item.title.clone())
                });
            }
            NodeKind::Menu => {
                if !node.children.is_empty() {
                    let warning = EditWarning::HasChildren {
                        title: node.item.title.clone(),
                        count: node.children.len(),
                    };
                    self.advise(warning.clone());
                    return Err(warning);
                }
                node.item.submenu = None;
            }
        }
        debug!("Converted {} to {}", node.item.menu_id, kind);
        self.dirty = true;
        Ok(true)
    }

    // =========================================================================
    // Pointer gestures
    // =========================================================================

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Pointer pressed on a row and started dragging it
    pub fn press(&mut self, key: &NodeKey) -> bool {
        self.drag.on_press_start(key)
    }

    /// Pointer moved over a row during a drag
    pub fn hover(&mut self, key: &NodeKey, pointer_y: f32, row_height: f32) -> Option<DropPosition> {
        self.drag.on_hover(key, pointer_y, row_height)
    }

    /// Pointer moved off every row during a drag
    pub fn leave(&mut self) {
        self.drag.on_leave();
    }

    /// Pointer released over `over` (or over no row)
    pub fn release(&mut self, over: Option<&NodeKey>) -> DropOutcome {
        let outcome = self.drag.on_release(&mut self.tree, over);
        match &outcome {
            DropOutcome::Moved {
                target, position, ..
            } => {
                let (target, position) = (*target, *position);
                self.after_move(&target, position);
            }
            DropOutcome::MovedToRoot { .. } => self.dirty = true,
            DropOutcome::Rejected(warning) => self.warnings.push(warning.clone()),
            DropOutcome::Ignored => {}
        }
        outcome
    }

    /// Escape or focus loss: abandon the drag
    pub fn cancel(&mut self) {
        self.drag.on_cancel();
    }

    // =========================================================================
    // Display state
    // =========================================================================

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn set_expanded(&mut self, key: &NodeKey, expanded: bool) {
        if expanded {
            self.expanded.insert(*key);
        } else {
            self.expanded.remove(key);
        }
    }

    pub fn toggle_expanded(&mut self, key: &NodeKey) {
        let expanded = self.is_expanded(key);
        self.set_expanded(key, !expanded);
    }

    pub fn expand_all(&mut self) {
        self.expanded = preorder(&self.tree)
            .into_iter()
            .filter(|node| !node.children.is_empty())
            .map(|node| node.key)
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Rows in display order, skipping children of collapsed nodes
    pub fn visible_rows(&self) -> Vec<&TreeNode> {
        visible_rows(&self.tree, &self.expanded)
    }

    // =========================================================================
    // Warnings and output
    // =========================================================================

    /// Advisory messages queued since the last `take_warnings`
    pub fn warnings(&self) -> &[EditWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<EditWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Structural problems the app tolerates but the operator should see
    pub fn validate(&self) -> Vec<EditWarning> {
        preorder(&self.tree)
            .into_iter()
            .filter(|node| !node.item.navigation.is_none() && !node.children.is_empty())
            .map(|node| EditWarning::MixedLeafAndContainer {
                menu_id: node.item.menu_id.clone(),
            })
            .collect()
    }

    /// Every menu id currently in use
    pub fn menu_ids(&self) -> HashSet<String> {
        all_ids(&self.tree)
    }

    /// Indented text rendering of the tree
    pub fn outline(&self) -> String {
        export::to_outline(&self.tree)
    }

    /// The persisted form of the current tree, for the save collaborator
    pub fn commit(&mut self) -> Vec<MenuItem> {
        self.dirty = false;
        flatten(&self.tree)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn default_title(&self, kind: NodeKind) -> String {
        match kind {
            NodeKind::Menu => self.settings.new_item_title.clone(),
            NodeKind::Submenu => self.settings.new_container_title.clone(),
        }
    }

    fn new_node(&self, kind: NodeKind, title: &str, level: usize) -> TreeNode {
        let mut item = MenuItem::new(title);
        item.menu_id = self.ids.generate(title, &all_ids(&self.tree));
        if kind == NodeKind::Submenu {
            item.submenu = Some(Submenu {
                display_style: self.settings.new_container_style,
                layout: self.settings.new_container_layout,
                ..Submenu::new(title)
            });
        }
        TreeNode::new(item, level)
    }

    fn after_move(&mut self, target: &NodeKey, position: DropPosition) {
        if position == DropPosition::Inside {
            // Keep the dropped node visible
            self.expanded.insert(*target);
            let mixed = find_by_key(&self.tree, target)
                .filter(|node| !node.item.navigation.is_none())
                .map(|node| node.item.menu_id.clone());
            if let Some(menu_id) = mixed {
                self.advise(EditWarning::MixedLeafAndContainer { menu_id });
            }
        }
        self.dirty = true;
    }

    fn advise(&mut self, warning: EditWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}
