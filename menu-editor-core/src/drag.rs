//! Pointer-driven drag and drop over the menu tree
//!
//! A drag is a well-formed sequence: one press on a row, any number of
//! hovers, then exactly one release or cancel. Release and cancel always
//! return the controller to idle, whatever happened to the drop, so an
//! interrupted gesture can never leave it stuck mid-drag.
//!
//! Vertical pointer position within the hovered row decides the intent:
//!
//! | fraction of row height | position |
//! |------------------------|----------|
//! | `< before` (0.25)      | `Before` |
//! | `> after` (0.75)       | `After`  |
//! | otherwise              | `Inside` |

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::EditWarning;
use crate::models::{DropPosition, NodeKey, TreeNode};
use crate::mutate::{move_node, move_to_root};

/// Row fractions separating the before / inside / after bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropZones {
    pub before: f32,
    pub after: f32,
}

impl Default for DropZones {
    fn default() -> Self {
        Self {
            before: 0.25,
            after: 0.75,
        }
    }
}

impl DropZones {
    /// Checks `0 <= before <= after <= 1`
    pub fn validate(&self) -> Result<(), String> {
        let ok = (0.0..=1.0).contains(&self.before)
            && (0.0..=1.0).contains(&self.after)
            && self.before <= self.after;
        if ok {
            Ok(())
        } else {
            Err(format!(
                "drop zones must satisfy 0 <= before <= after <= 1 (got before={}, after={})",
                self.before, self.after
            ))
        }
    }

    /// Maps a vertical fraction of the row height to a drop position
    pub fn position_for(&self, fraction: f32) -> DropPosition {
        if fraction < self.before {
            DropPosition::Before
        } else if fraction > self.after {
            DropPosition::After
        } else {
            DropPosition::Inside
        }
    }
}

/// Snapshot of the gesture in progress
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub dragged_key: Option<NodeKey>,
    pub drag_over_key: Option<NodeKey>,
    pub drag_over_position: Option<DropPosition>,
}

/// What a release did to the tree
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The dragged node now sits relative to `target`
    Moved {
        key: NodeKey,
        target: NodeKey,
        position: DropPosition,
    },
    /// Released outside any row or over the dragged row itself
    MovedToRoot { key: NodeKey },
    /// The drop was refused; the tree is unchanged
    Rejected(EditWarning),
    /// No drag was active, no target was resolved, or a key went stale
    Ignored,
}

/// Turns press / hover / release events into one tree move
#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    state: DragState,
    zones: DropZones,
}

impl DragDropController {
    pub fn new(zones: DropZones) -> Self {
        Self {
            state: DragState::default(),
            zones,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn zones(&self) -> DropZones {
        self.zones
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// Starts dragging `key`. Ignored while another drag is active.
    pub fn on_press_start(&mut self, key: &NodeKey) -> bool {
        if self.state.dragging {
            return false;
        }
        self.state = DragState {
            dragging: true,
            dragged_key: Some(*key),
            drag_over_key: None,
            drag_over_position: None,
        };
        debug!("Drag started on {}", key);
        true
    }

    /// Pointer is over row `key`, `pointer_y` below the row's top edge.
    ///
    /// Ignored when no drag is active or when the row height is not
    /// positive. Hovering the dragged row clears the current target.
    pub fn on_hover(&mut self, key: &NodeKey, pointer_y: f32, row_height: f32) -> Option<DropPosition> {
        if !self.state.dragging {
            return None;
        }
        if self.state.dragged_key == Some(*key) {
            self.on_leave();
            return None;
        }
        if row_height.is_nan() || row_height <= 0.0 {
            return None;
        }

        let fraction = (pointer_y / row_height).clamp(0.0, 1.0);
        let position = self.zones.position_for(fraction);
        self.state.drag_over_key = Some(*key);
        self.state.drag_over_position = Some(position);
        Some(position)
    }

    /// Pointer left every row; a release now means "drop at root"
    pub fn on_leave(&mut self) {
        self.state.drag_over_key = None;
        self.state.drag_over_position = None;
    }

    /// Ends the gesture over row `over`, or over no row at all.
    ///
    /// Over the last hovered row, the dragged node is moved there; any other
    /// row is ignored. Over its own row or outside the rows it is appended
    /// as a top-level node. State is reset in every case.
    pub fn on_release(&mut self, tree: &mut Vec<TreeNode>, over: Option<&NodeKey>) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        if !state.dragging {
            return DropOutcome::Ignored;
        }
        let Some(dragged) = state.dragged_key else {
            return DropOutcome::Ignored;
        };

        match over {
            Some(target) if *target != dragged => {
                if state.drag_over_key != Some(*target) {
                    return DropOutcome::Ignored;
                }
                let Some(position) = state.drag_over_position else {
                    return DropOutcome::Ignored;
                };
                match move_node(tree, &dragged, target, position) {
                    Ok(true) => DropOutcome::Moved {
                        key: dragged,
                        target: *target,
                        position,
                    },
                    Ok(false) => DropOutcome::Ignored,
                    Err(warning) => {
                        warn!("{}", warning);
                        DropOutcome::Rejected(warning)
                    }
                }
            }
            _ => {
                if move_to_root(tree, &dragged) {
                    DropOutcome::MovedToRoot { key: dragged }
                } else {
                    DropOutcome::Ignored
                }
            }
        }
    }

    /// Abandons the gesture without touching the tree
    pub fn on_cancel(&mut self) {
        if self.state.dragging {
            debug!("Drag cancelled");
        }
        self.state = DragState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::build_tree;
    use crate::models::MenuItem;
    use crate::query::find_by_menu_id;

    fn tree() -> Vec<TreeNode> {
        build_tree(vec![
            MenuItem::new("A").with_id("menu_a"),
            MenuItem::new("B")
                .with_id("menu_b")
                .with_submenu(vec![MenuItem::new("B1").with_id("menu_b1")]),
            MenuItem::new("C").with_id("menu_c"),
        ])
    }

    fn key(tree: &[TreeNode], menu_id: &str) -> NodeKey {
        find_by_menu_id(tree, menu_id).unwrap().key
    }

    fn titles(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title()).collect()
    }

    #[test]
    fn test_zones_mapping() {
        let zones = DropZones::default();
        assert_eq!(zones.position_for(0.0), DropPosition::Before);
        assert_eq!(zones.position_for(0.24), DropPosition::Before);
        assert_eq!(zones.position_for(0.25), DropPosition::Inside);
        assert_eq!(zones.position_for(0.5), DropPosition::Inside);
        assert_eq!(zones.position_for(0.75), DropPosition::Inside);
        assert_eq!(zones.position_for(0.76), DropPosition::After);
        assert_eq!(zones.position_for(1.0), DropPosition::After);
    }

    #[test]
    fn test_zones_validate() {
        assert!(DropZones::default().validate().is_ok());
        assert!(DropZones { before: 0.5, after: 0.5 }.validate().is_ok());
        assert!(DropZones { before: 0.8, after: 0.2 }.validate().is_err());
        assert!(DropZones { before: -0.1, after: 0.5 }.validate().is_err());
        assert!(DropZones { before: 0.1, after: 1.5 }.validate().is_err());
    }

    #[test]
    fn test_press_while_dragging_is_ignored() {
        let tree = tree();
        let mut ctl = DragDropController::default();

        assert!(ctl.on_press_start(&tree[0].key));
        assert!(!ctl.on_press_start(&tree[2].key));
        assert_eq!(ctl.state().dragged_key, Some(tree[0].key));
    }

    #[test]
    fn test_hover_ignored_when_idle_or_on_self() {
        let tree = tree();
        let mut ctl = DragDropController::default();

        assert_eq!(ctl.on_hover(&tree[1].key, 5.0, 20.0), None);

        ctl.on_press_start(&tree[0].key);
        assert_eq!(ctl.on_hover(&tree[0].key, 5.0, 20.0), None);
        assert_eq!(ctl.state().drag_over_key, None);

        assert_eq!(ctl.on_hover(&tree[1].key, 0.0, 0.0), None);
    }

    #[test]
    fn test_hover_records_position() {
        let tree = tree();
        let mut ctl = DragDropController::default();
        ctl.on_press_start(&tree[0].key);

        assert_eq!(ctl.on_hover(&tree[2].key, 2.0, 20.0), Some(DropPosition::Before));
        assert_eq!(ctl.on_hover(&tree[2].key, 10.0, 20.0), Some(DropPosition::Inside));
        assert_eq!(ctl.on_hover(&tree[2].key, 19.0, 20.0), Some(DropPosition::After));
        // Overshoot below the row is clamped
        assert_eq!(ctl.on_hover(&tree[2].key, 40.0, 20.0), Some(DropPosition::After));

        assert_eq!(ctl.state().drag_over_key, Some(tree[2].key));
        assert_eq!(ctl.state().drag_over_position, Some(DropPosition::After));
    }

    #[test]
    fn test_release_moves_and_resets() {
        let mut tree = tree();
        let a = key(&tree, "menu_a");
        let c = key(&tree, "menu_c");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&c);
        ctl.on_hover(&a, 1.0, 20.0);
        let outcome = ctl.on_release(&mut tree, Some(&a));

        assert_eq!(
            outcome,
            DropOutcome::Moved {
                key: c,
                target: a,
                position: DropPosition::Before
            }
        );
        assert_eq!(titles(&tree), vec!["C", "A", "B"]);
        assert_eq!(*ctl.state(), DragState::default());
    }

    #[test]
    fn test_release_outside_rows_appends_at_root() {
        let mut tree = tree();
        let b1 = key(&tree, "menu_b1");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&b1);
        let outcome = ctl.on_release(&mut tree, None);

        assert_eq!(outcome, DropOutcome::MovedToRoot { key: b1 });
        assert_eq!(titles(&tree), vec!["A", "B", "C", "B1"]);
        assert_eq!(tree[3].level, 0);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_release_over_self_appends_at_root() {
        let mut tree = tree();
        let a = key(&tree, "menu_a");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&a);
        let outcome = ctl.on_release(&mut tree, Some(&a));

        assert_eq!(outcome, DropOutcome::MovedToRoot { key: a });
        assert_eq!(titles(&tree), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_release_without_hover_position_is_ignored() {
        let mut tree = tree();
        let before = tree.clone();
        let a = key(&tree, "menu_a");
        let c = key(&tree, "menu_c");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&a);
        assert_eq!(ctl.on_release(&mut tree, Some(&c)), DropOutcome::Ignored);
        assert_eq!(tree, before);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_release_over_row_other_than_hovered_is_ignored() {
        let mut tree = tree();
        let before = tree.clone();
        let a = key(&tree, "menu_a");
        let b = key(&tree, "menu_b");
        let c = key(&tree, "menu_c");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&c);
        ctl.on_hover(&b, 10.0, 20.0);
        assert_eq!(ctl.on_release(&mut tree, Some(&a)), DropOutcome::Ignored);
        assert_eq!(tree, before);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_hover_back_onto_dragged_row_clears_target() {
        let mut tree = tree();
        let a = key(&tree, "menu_a");
        let c = key(&tree, "menu_c");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&a);
        assert_eq!(ctl.on_hover(&c, 10.0, 20.0), Some(DropPosition::Inside));
        assert_eq!(ctl.on_hover(&a, 10.0, 20.0), None);
        assert_eq!(ctl.state().drag_over_key, None);
        assert_eq!(ctl.state().drag_over_position, None);
        assert!(ctl.is_dragging());

        // Released where it started: goes to the end of the root list
        assert_eq!(ctl.on_release(&mut tree, Some(&a)), DropOutcome::MovedToRoot { key: a });
        assert_eq!(titles(&tree), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_release_into_own_descendant_is_rejected() {
        let mut tree = tree();
        let before = tree.clone();
        let b = key(&tree, "menu_b");
        let b1 = key(&tree, "menu_b1");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&b);
        ctl.on_hover(&b1, 10.0, 20.0);
        let outcome = ctl.on_release(&mut tree, Some(&b1));

        assert_eq!(
            outcome,
            DropOutcome::Rejected(EditWarning::DropIntoDescendant { title: "B".into() })
        );
        assert_eq!(tree, before);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_release_with_stale_target_is_ignored() {
        let mut tree = tree();
        let a = key(&tree, "menu_a");
        let c = key(&tree, "menu_c");
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&a);
        ctl.on_hover(&c, 10.0, 20.0);
        crate::mutate::remove(&mut tree, &c);

        assert_eq!(ctl.on_release(&mut tree, Some(&c)), DropOutcome::Ignored);
        assert_eq!(titles(&tree), vec!["A", "B"]);
    }

    #[test]
    fn test_release_when_idle_is_ignored() {
        let mut tree = tree();
        let mut ctl = DragDropController::default();
        assert_eq!(ctl.on_release(&mut tree, None), DropOutcome::Ignored);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_cancel_resets() {
        let mut tree = tree();
        let before = tree.clone();
        let mut ctl = DragDropController::default();

        ctl.on_press_start(&tree[0].key);
        ctl.on_hover(&tree[2].key, 10.0, 20.0);
        ctl.on_cancel();

        assert_eq!(*ctl.state(), DragState::default());
        assert_eq!(ctl.on_release(&mut tree, None), DropOutcome::Ignored);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_leave_clears_hover_target() {
        let tree = tree();
        let mut ctl = DragDropController::default();
        ctl.on_press_start(&tree[0].key);
        ctl.on_hover(&tree[2].key, 10.0, 20.0);
        ctl.on_leave();

        assert!(ctl.is_dragging());
        assert_eq!(ctl.state().drag_over_key, None);
        assert_eq!(ctl.state().drag_over_position, None);
    }
}
