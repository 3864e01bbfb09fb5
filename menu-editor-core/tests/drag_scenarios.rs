//! End-to-end drag gestures driven through the editor's pointer API

use menu_editor_core::{
    DropOutcome, DropPosition, EditWarning, EditorSettings, MenuItem, MenuTreeEditor, Navigation,
    NodeKey, NodeKind,
};

const ROW_HEIGHT: f32 = 24.0;

fn open(items: Vec<MenuItem>) -> MenuTreeEditor {
    MenuTreeEditor::open(items, EditorSettings::default())
}

fn key(editor: &MenuTreeEditor, menu_id: &str) -> NodeKey {
    editor
        .key_for_menu_id(menu_id)
        .unwrap_or_else(|| panic!("no node {}", menu_id))
}

fn root_ids(editor: &MenuTreeEditor) -> Vec<&str> {
    editor.tree().iter().map(|n| n.menu_id()).collect()
}

/// Press on `from`, hover `over` at `fraction` of the row, release there
fn drag(editor: &mut MenuTreeEditor, from: &NodeKey, over: &NodeKey, fraction: f32) -> DropOutcome {
    assert!(editor.press(from));
    editor.hover(over, fraction * ROW_HEIGHT, ROW_HEIGHT);
    editor.release(Some(over))
}

#[test]
fn test_reorder_to_front() {
    let mut editor = open(vec![
        MenuItem::new("A").with_id("menu_a"),
        MenuItem::new("B").with_id("menu_b"),
        MenuItem::new("C").with_id("menu_c"),
    ]);
    let a = key(&editor, "menu_a");
    let c = key(&editor, "menu_c");

    let outcome = drag(&mut editor, &c, &a, 0.1);

    assert_eq!(
        outcome,
        DropOutcome::Moved {
            key: c,
            target: a,
            position: DropPosition::Before
        }
    );
    assert_eq!(root_ids(&editor), vec!["menu_c", "menu_a", "menu_b"]);
    assert!(!editor.drag_state().dragging);
}

#[test]
fn test_nest_into_empty_container() {
    let mut editor = open(vec![
        MenuItem::new("A").with_id("menu_a"),
        MenuItem::new("B").with_id("menu_b").with_submenu(vec![]),
    ]);
    let a = key(&editor, "menu_a");
    let b = key(&editor, "menu_b");

    drag(&mut editor, &a, &b, 0.5);

    assert_eq!(root_ids(&editor), vec!["menu_b"]);
    let b_node = editor.node(&b).unwrap();
    assert_eq!(b_node.children.len(), 1);
    assert_eq!(b_node.children[0].key, a);
    assert_eq!(b_node.children[0].level, b_node.level + 1);
    assert!(editor.is_expanded(&b));
}

#[test]
fn test_duplicate_subtree_ids() {
    let mut editor = open(vec![MenuItem::new("X")
        .with_id("menu_x")
        .with_submenu(vec![MenuItem::new("Y").with_id("menu_y")])]);
    let x = key(&editor, "menu_x");

    let copy = editor.duplicate_node(&x).unwrap();

    assert_eq!(root_ids(&editor), vec!["menu_x", "menu_x_copy"]);
    let copy = editor.node(&copy).unwrap();
    assert_eq!(copy.children.len(), 1);
    assert_ne!(copy.children[0].menu_id(), "menu_y");
    assert_eq!(copy.children[0].menu_id(), "menu_y_1");
    assert_eq!(copy.children[0].title(), "Y");
}

#[test]
fn test_drop_inside_leaf_makes_it_a_container() {
    let mut editor = open(vec![
        MenuItem::new("A").with_id("menu_a"),
        MenuItem::new("B").with_id("menu_b"),
    ]);
    let a = key(&editor, "menu_a");
    let b = key(&editor, "menu_b");

    drag(&mut editor, &b, &a, 0.5);

    let a_node = editor.node(&a).unwrap();
    assert_eq!(a_node.kind(), NodeKind::Submenu);
    assert_eq!(a_node.children[0].key, b);

    let committed = editor.commit();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].submenu.as_ref().unwrap().items[0].menu_id, "menu_b");
}

#[test]
fn test_drop_inside_routed_leaf_warns_about_mixed_node() {
    let mut editor = open(vec![
        MenuItem::new("A")
            .with_id("menu_a")
            .with_navigation(Navigation::route("/a")),
        MenuItem::new("B").with_id("menu_b"),
    ]);
    let a = key(&editor, "menu_a");
    let b = key(&editor, "menu_b");

    drag(&mut editor, &b, &a, 0.5);

    let a_node = editor.node(&a).unwrap();
    assert_eq!(a_node.children[0].key, b);
    assert_eq!(a_node.item.navigation, Navigation::route("/a"));
    assert_eq!(
        editor.warnings(),
        &[EditWarning::MixedLeafAndContainer {
            menu_id: "menu_a".into()
        }]
    );
    assert_eq!(editor.validate(), editor.warnings().to_vec());
}

#[test]
fn test_release_outside_rows_moves_to_root() {
    let mut editor = open(vec![MenuItem::new("More")
        .with_id("menu_more")
        .with_submenu(vec![
            MenuItem::new("About").with_id("menu_about"),
            MenuItem::new("Help").with_id("menu_help"),
        ])]);
    let more = key(&editor, "menu_more");
    let about = key(&editor, "menu_about");

    assert!(editor.press(&about));
    editor.hover(&more, 12.0, ROW_HEIGHT);
    editor.leave();
    let outcome = editor.release(None);

    assert_eq!(outcome, DropOutcome::MovedToRoot { key: about });
    assert_eq!(root_ids(&editor), vec!["menu_more", "menu_about"]);
    assert_eq!(editor.node(&about).unwrap().level, 0);
}

#[test]
fn test_release_over_self_moves_to_root() {
    let mut editor = open(vec![MenuItem::new("More")
        .with_id("menu_more")
        .with_submenu(vec![MenuItem::new("About").with_id("menu_about")])]);
    let about = key(&editor, "menu_about");

    assert!(editor.press(&about));
    assert_eq!(editor.hover(&about, 12.0, ROW_HEIGHT), None);
    let outcome = editor.release(Some(&about));

    assert_eq!(outcome, DropOutcome::MovedToRoot { key: about });
    assert_eq!(root_ids(&editor), vec!["menu_more", "menu_about"]);
}

#[test]
fn test_ancestor_into_descendant_is_rejected() {
    let items = vec![MenuItem::new("More")
        .with_id("menu_more")
        .with_submenu(vec![MenuItem::new("Deep")
            .with_id("menu_deep")
            .with_submenu(vec![MenuItem::new("Leaf").with_id("menu_leaf")])])];
    let mut editor = open(items.clone());
    let more = key(&editor, "menu_more");
    let leaf = key(&editor, "menu_leaf");

    let outcome = drag(&mut editor, &more, &leaf, 0.9);

    assert_eq!(
        outcome,
        DropOutcome::Rejected(EditWarning::DropIntoDescendant {
            title: "More".into()
        })
    );
    assert_eq!(editor.commit(), items);
    assert_eq!(editor.take_warnings().len(), 1);
    assert!(!editor.drag_state().dragging);
}

#[test]
fn test_target_removed_mid_drag() {
    let mut editor = open(vec![
        MenuItem::new("A").with_id("menu_a"),
        MenuItem::new("B").with_id("menu_b"),
    ]);
    let a = key(&editor, "menu_a");
    let b = key(&editor, "menu_b");

    assert!(editor.press(&a));
    editor.hover(&b, 2.0, ROW_HEIGHT);
    assert!(editor.remove_node(&b));
    let outcome = editor.release(Some(&b));

    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(root_ids(&editor), vec!["menu_a"]);
    assert!(!editor.drag_state().dragging);
}

#[test]
fn test_second_press_during_drag_is_ignored() {
    let mut editor = open(vec![
        MenuItem::new("A").with_id("menu_a"),
        MenuItem::new("B").with_id("menu_b"),
    ]);
    let a = key(&editor, "menu_a");
    let b = key(&editor, "menu_b");

    assert!(editor.press(&a));
    assert!(!editor.press(&b));
    assert_eq!(editor.drag_state().dragged_key, Some(a));

    editor.cancel();
    assert!(editor.press(&b));
}
