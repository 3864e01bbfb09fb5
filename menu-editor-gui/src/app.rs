use eframe::egui;
use log::{error, info};
use std::path::PathBuf;

use menu_editor_core::{
    DisplayStyle, DropOutcome, DropPosition, EditWarning, EditorSettings, MenuDocument,
    MenuStorage, MenuTreeEditor, Navigation, NodeKey, NodeKind, NodeUpdate, RouteArguments,
    SubmenuLayout, TreeNode,
};

const ROW_HEIGHT: f32 = 24.0;
const INDENT: f32 = 20.0;
/// Most recent warnings kept for the status bar
const MAX_WARNINGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavKind {
    None,
    Route,
    Url,
}

/// Editing buffer for the selected node's fields
#[derive(Debug, Clone, PartialEq)]
struct ItemForm {
    key: NodeKey,
    title: String,
    icon: String,
    nav_kind: NavKind,
    route: String,
    screen_id: String,
    url: String,
    open_in_browser: bool,
    /// Container fields, `None` for menu items
    submenu: Option<(String, DisplayStyle, SubmenuLayout)>,
}

impl ItemForm {
    fn from_node(node: &TreeNode) -> Self {
        let item = &node.item;
        let mut form = Self {
            key: node.key,
            title: item.title.clone(),
            icon: item.icon.clone().unwrap_or_default(),
            nav_kind: NavKind::None,
            route: String::new(),
            screen_id: String::new(),
            url: String::new(),
            open_in_browser: false,
            submenu: item
                .submenu
                .as_ref()
                .map(|s| (s.title.clone(), s.display_style, s.layout)),
        };
        match &item.navigation {
            Navigation::Route { route, arguments } => {
                form.nav_kind = NavKind::Route;
                form.route = route.clone();
                form.screen_id = arguments.screen_id.clone().unwrap_or_default();
            }
            Navigation::Url {
                url,
                open_in_browser,
            } => {
                form.nav_kind = NavKind::Url;
                form.url = url.clone();
                form.open_in_browser = *open_in_browser;
            }
            Navigation::None => {}
        }
        form
    }

    fn navigation(&self, current: &Navigation) -> Navigation {
        match self.nav_kind {
            NavKind::None => Navigation::None,
            NavKind::Route => {
                // Keep route params the form does not edit
                let mut arguments = match current {
                    Navigation::Route { arguments, .. } => arguments.clone(),
                    _ => RouteArguments::default(),
                };
                arguments.screen_id = Some(self.screen_id.trim().to_string()).filter(|s| !s.is_empty());
                Navigation::Route {
                    route: self.route.trim().to_string(),
                    arguments,
                }
            }
            NavKind::Url => Navigation::Url {
                url: self.url.trim().to_string(),
                open_in_browser: self.open_in_browser,
            },
        }
    }

    /// Only the fields that differ from `node`
    fn to_update(&self, node: &TreeNode) -> NodeUpdate {
        let item = &node.item;
        let mut update = NodeUpdate::default();

        if self.title != item.title {
            update.title = Some(self.title.clone());
        }
        if self.icon != item.icon.clone().unwrap_or_default() {
            update.icon = Some(Some(self.icon.clone()));
        }
        let navigation = self.navigation(&item.navigation);
        if navigation != item.navigation {
            update.navigation = Some(navigation);
        }
        if let (Some((title, style, layout)), Some(submenu)) = (&self.submenu, &item.submenu) {
            if *title != submenu.title {
                update.submenu_title = Some(title.clone());
            }
            if *style != submenu.display_style {
                update.display_style = Some(*style);
            }
            if *layout != submenu.layout {
                update.layout = Some(*layout);
            }
        }
        update
    }
}

/// Row data copied out of the tree so rows can be drawn while the editor
/// is mutated
struct RowInfo {
    key: NodeKey,
    level: usize,
    label: String,
    kind: NodeKind,
    has_children: bool,
    expanded: bool,
}

pub struct MenuEditorApp {
    storage: MenuStorage,
    /// Screen-level keys of the loaded file, written back on save
    document: MenuDocument,
    editor: MenuTreeEditor,
    selected: Option<NodeKey>,
    form: Option<ItemForm>,
    /// Row under the pointer this frame, if any
    hover_row: Option<NodeKey>,
    warnings: Vec<EditWarning>,
    message: Option<(String, bool)>,
}

impl MenuEditorApp {
    pub fn new(menu_path: PathBuf) -> Self {
        let mut message = None;
        let settings = EditorSettings::load_user().unwrap_or_else(|e| {
            error!("Failed to load settings: {:#}", e);
            message = Some((format!("Settings not loaded: {}", e), true));
            EditorSettings::default()
        });

        let mut app = Self {
            storage: MenuStorage::new(menu_path),
            document: MenuDocument::default(),
            editor: MenuTreeEditor::new(settings),
            selected: None,
            form: None,
            hover_row: None,
            warnings: Vec::new(),
            message,
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        match self.storage.load() {
            Ok(mut document) => {
                let items = std::mem::take(&mut document.items);
                self.document = document;
                self.editor.reload(items);
                self.editor.expand_all();
                self.selected = None;
                self.form = None;
                self.warnings.clear();
                self.collect_warnings();
                info!("Loaded {:?}", self.storage.path());
                self.message = Some((format!("Loaded {}", self.storage.path().display()), false));
            }
            Err(e) => {
                error!("Failed to load {:?}: {:#}", self.storage.path(), e);
                self.message = Some((format!("Load failed: {:#}", e), true));
            }
        }
    }

    fn save(&mut self) {
        let mut document = self.document.clone();
        document.items = self.editor.commit();
        match self.storage.save(&document) {
            Ok(()) => {
                self.message = Some((format!("Saved {}", self.storage.path().display()), false));
            }
            Err(e) => {
                error!("Failed to save {:?}: {:#}", self.storage.path(), e);
                self.message = Some((format!("Save failed: {:#}", e), true));
            }
        }
    }

    fn collect_warnings(&mut self) {
        self.warnings.extend(self.editor.take_warnings());
        let overflow = self.warnings.len().saturating_sub(MAX_WARNINGS);
        self.warnings.drain(..overflow);
    }

    fn select(&mut self, key: Option<NodeKey>) {
        self.selected = key;
        self.form = key
            .and_then(|k| self.editor.node(&k))
            .map(ItemForm::from_node);
    }

    /// New items go under the selected submenu, otherwise at the top level
    fn add_item(&mut self, kind: NodeKind) {
        let parent = self
            .selected
            .filter(|k| self.editor.node(k).is_some_and(TreeNode::is_container));

        let key = match parent {
            Some(parent) => self.editor.add_child_node(&parent, kind).ok().flatten(),
            None => Some(self.editor.add_root_node(kind)),
        };
        if key.is_some() {
            self.select(key);
        }
        self.collect_warnings();
    }

    fn report_drop(&mut self, outcome: DropOutcome) {
        match outcome {
            DropOutcome::Moved { key, .. } | DropOutcome::MovedToRoot { key } => {
                // Levels changed; refresh the form from the moved node
                if self.selected == Some(key) {
                    self.select(Some(key));
                }
            }
            DropOutcome::Rejected(_) | DropOutcome::Ignored => {}
        }
        self.collect_warnings();
    }

    // =========================================================================
    // Panels
    // =========================================================================

    fn show_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if ui.button("🔄 Reload").clicked() {
                    self.reload();
                }
                let save_label = if self.editor.is_dirty() {
                    "💾 Save*"
                } else {
                    "💾 Save"
                };
                if ui.button(save_label).clicked() {
                    self.save();
                }

                ui.separator();
                if ui.button("➕ Menu item").clicked() {
                    self.add_item(NodeKind::Menu);
                }
                if ui.button("➕ Submenu").clicked() {
                    self.add_item(NodeKind::Submenu);
                }

                ui.separator();
                if ui.button("Expand all").clicked() {
                    self.editor.expand_all();
                }
                if ui.button("Collapse all").clicked() {
                    self.editor.collapse_all();
                }

                ui.separator();
                ui.label(format!("Items: {}", self.editor.menu_ids().len()));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.storage.path().display().to_string());
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some((msg, is_error)) = &self.message {
                let color = if *is_error {
                    egui::Color32::RED
                } else {
                    egui::Color32::GREEN
                };
                ui.colored_label(color, msg);
            }
            for warning in &self.warnings {
                ui.colored_label(egui::Color32::YELLOW, format!("⚠ {}", warning));
            }
            if !self.warnings.is_empty() && ui.small_button("Clear warnings").clicked() {
                self.warnings.clear();
            }
        });
    }

    fn show_detail_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("detail_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                ui.heading("Details");
                ui.separator();

                let Some(key) = self.selected else {
                    ui.label("Select an item to edit it.");
                    return;
                };
                let Some(node) = self.editor.node(&key) else {
                    ui.label("The selected item no longer exists.");
                    return;
                };
                let menu_id = node.item.menu_id.clone();
                let kind = node.kind();
                let child_count = node.children.len();
                let Some(form) = self.form.as_mut() else {
                    return;
                };

                egui::Grid::new("item_form").num_columns(2).show(ui, |ui| {
                    ui.label("ID:");
                    ui.monospace(&menu_id);
                    ui.end_row();

                    ui.label("Kind:");
                    ui.label(kind.to_string());
                    ui.end_row();

                    ui.label("Title:");
                    ui.text_edit_singleline(&mut form.title);
                    ui.end_row();

                    ui.label("Icon:");
                    ui.text_edit_singleline(&mut form.icon);
                    ui.end_row();
                });

                ui.separator();
                ui.label("Navigation");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut form.nav_kind, NavKind::None, "None");
                    ui.radio_value(&mut form.nav_kind, NavKind::Route, "Route");
                    ui.radio_value(&mut form.nav_kind, NavKind::Url, "Url");
                });
                match form.nav_kind {
                    NavKind::None => {}
                    NavKind::Route => {
                        ui.horizontal(|ui| {
                            ui.label("Route:");
                            ui.text_edit_singleline(&mut form.route);
                        });
                        ui.horizontal(|ui| {
                            ui.label("Screen id:");
                            ui.text_edit_singleline(&mut form.screen_id);
                        });
                    }
                    NavKind::Url => {
                        ui.horizontal(|ui| {
                            ui.label("Url:");
                            ui.text_edit_singleline(&mut form.url);
                        });
                        ui.checkbox(&mut form.open_in_browser, "Open in system browser");
                    }
                }

                if let Some((title, style, layout)) = form.submenu.as_mut() {
                    ui.separator();
                    ui.label(format!("Submenu ({} item(s))", child_count));
                    ui.horizontal(|ui| {
                        ui.label("Title:");
                        ui.text_edit_singleline(title);
                    });
                    egui::ComboBox::from_label("Display style")
                        .selected_text(style.to_string())
                        .show_ui(ui, |ui| {
                            for s in DisplayStyle::all() {
                                ui.selectable_value(style, *s, s.to_string());
                            }
                        });
                    egui::ComboBox::from_label("Layout")
                        .selected_text(layout.to_string())
                        .show_ui(ui, |ui| {
                            for l in SubmenuLayout::all() {
                                ui.selectable_value(layout, *l, l.to_string());
                            }
                        });
                }

                ui.separator();
                let apply = ui.button("✔ Apply").clicked();
                ui.horizontal(|ui| {
                    if ui.button("Duplicate").clicked() {
                        let copy = self.editor.duplicate_node(&key);
                        self.select(copy);
                    }
                    let convert_to = match kind {
                        NodeKind::Menu => NodeKind::Submenu,
                        NodeKind::Submenu => NodeKind::Menu,
                    };
                    if ui.button(format!("Make {}", convert_to)).clicked()
                        && self.editor.convert_node(&key, convert_to).is_ok()
                    {
                        self.select(Some(key));
                    }
                    if ui.button("To top level").clicked() {
                        self.editor.move_to_root(&key);
                    }
                    if ui.button("🗑 Remove").clicked() {
                        self.editor.remove_node(&key);
                        self.select(None);
                    }
                });

                if apply {
                    self.apply_form();
                }
                self.collect_warnings();
            });
    }

    fn apply_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let Some(node) = self.editor.node(&form.key) else {
            return;
        };
        let update = form.to_update(node);
        if !update.is_empty() {
            self.editor.update_node(&form.key, update);
        }
        self.select(Some(form.key));
    }

    fn show_tree(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let rows: Vec<RowInfo> = self
                .editor
                .visible_rows()
                .into_iter()
                .map(|node| RowInfo {
                    key: node.key,
                    level: node.level,
                    label: format!("{}  ({})", node.item.title, node.item.menu_id),
                    kind: node.kind(),
                    has_children: !node.children.is_empty(),
                    expanded: self.editor.is_expanded(&node.key),
                })
                .collect();

            self.hover_row = None;
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if rows.is_empty() {
                        ui.label("No menu items. Use ➕ to add one.");
                    }
                    for row in &rows {
                        self.show_draggable_row(ui, row);
                    }
                    self.show_root_drop_zone(ui);
                });

            if self.editor.drag_state().dragging && self.hover_row.is_none() {
                self.editor.leave();
            }
        });
    }

    fn show_draggable_row(&mut self, ui: &mut egui::Ui, row: &RowInfo) {
        let state = *self.editor.drag_state();
        let selected = self.selected == Some(row.key);
        let is_drag_source = state.dragged_key == Some(row.key);
        let drop_position = if state.drag_over_key == Some(row.key) {
            state.drag_over_position
        } else {
            None
        };

        ui.horizontal(|ui| {
            ui.add_space(row.level as f32 * INDENT);

            if row.has_children {
                let arrow = if row.expanded { "▼" } else { "▶" };
                if ui.small_button(arrow).clicked() {
                    self.editor.toggle_expanded(&row.key);
                }
            } else {
                ui.add_space(INDENT);
            }

            let size = egui::vec2(ui.available_width(), ROW_HEIGHT);
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

            let bg_color = if is_drag_source {
                egui::Color32::from_rgba_unmultiplied(100, 100, 200, 60)
            } else if selected {
                ui.visuals().selection.bg_fill
            } else {
                egui::Color32::TRANSPARENT
            };
            if bg_color != egui::Color32::TRANSPARENT {
                ui.painter().rect_filled(rect, 2.0, bg_color);
            }

            let icon = match row.kind {
                NodeKind::Menu => "📄",
                NodeKind::Submenu => "📁",
            };
            let text_color = if selected {
                ui.visuals().selection.stroke.color
            } else {
                ui.visuals().text_color()
            };
            ui.painter().text(
                rect.left_center() + egui::vec2(4.0, 0.0),
                egui::Align2::LEFT_CENTER,
                format!("{} {}", icon, row.label),
                egui::TextStyle::Body.resolve(ui.style()),
                text_color,
            );

            // Drop indicator for the hovered row
            let stroke = egui::Stroke::new(2.0, egui::Color32::GREEN);
            match drop_position {
                Some(DropPosition::Before) => {
                    ui.painter()
                        .line_segment([rect.left_top(), rect.right_top()], stroke);
                }
                Some(DropPosition::After) => {
                    ui.painter()
                        .line_segment([rect.left_bottom(), rect.right_bottom()], stroke);
                }
                Some(DropPosition::Inside) => {
                    ui.painter().rect_stroke(rect, 2.0, stroke);
                }
                None => {}
            }

            if response.clicked() {
                self.select(Some(row.key));
            }
            if response.drag_started() {
                self.editor.press(&row.key);
            }

            // Pointer position is more reliable than hovered() while dragging
            if state.dragging {
                if let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) {
                    if rect.contains(pointer) {
                        self.hover_row = Some(row.key);
                        self.editor
                            .hover(&row.key, pointer.y - rect.top(), rect.height());
                    }
                }
            }
        });
    }

    /// Space below the rows; releasing here moves the item to the top level
    fn show_root_drop_zone(&mut self, ui: &mut egui::Ui) {
        let height = ui.available_height().max(ROW_HEIGHT * 2.0);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::hover(),
        );
        if self.editor.drag_state().dragging {
            ui.painter().text(
                rect.center_top() + egui::vec2(0.0, ROW_HEIGHT),
                egui::Align2::CENTER_CENTER,
                "Drop here to move to the top level",
                egui::TextStyle::Small.resolve(ui.style()),
                ui.visuals().weak_text_color(),
            );
        }
    }

    fn show_drag_indicator(&self, ctx: &egui::Context) {
        let Some(key) = self.editor.drag_state().dragged_key else {
            return;
        };
        let Some(node) = self.editor.node(&key) else {
            return;
        };
        if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
            egui::Area::new(egui::Id::new("drag_indicator"))
                .fixed_pos(pos + egui::vec2(10.0, 10.0))
                .order(egui::Order::Tooltip)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(format!("📎 {}", node.item.title));
                    });
                });
        }
    }
}

impl eframe::App for MenuEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let title = if self.editor.is_dirty() {
            format!("Menu Editor - {}*", self.storage.path().display())
        } else {
            format!("Menu Editor - {}", self.storage.path().display())
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.cancel();
        }

        self.show_top_panel(ctx);
        self.show_status_bar(ctx);
        self.show_detail_panel(ctx);
        self.show_tree(ctx);

        if self.editor.drag_state().dragging {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            self.show_drag_indicator(ctx);
        }

        // Handle drag release globally, over this frame's hovered row
        let (released, any_down) = ctx.input(|i| (i.pointer.primary_released(), i.pointer.any_down()));
        if self.editor.drag_state().dragging {
            if released {
                let over = self.hover_row;
                let outcome = self.editor.release(over.as_ref());
                self.report_drop(outcome);
            } else if !any_down {
                // Release happened outside the window
                self.editor.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_editor_core::MenuItem;

    fn editor() -> MenuTreeEditor {
        MenuTreeEditor::open(
            vec![
                MenuItem::new("Home")
                    .with_id("menu_home")
                    .with_navigation(Navigation::Route {
                        route: "/home".into(),
                        arguments: RouteArguments {
                            screen_id: Some("main".into()),
                            params: [("tab".to_string(), "1".to_string())].into_iter().collect(),
                        },
                    }),
                MenuItem::new("More").with_id("menu_more").with_submenu(vec![]),
            ],
            EditorSettings::default(),
        )
    }

    fn node<'a>(editor: &'a MenuTreeEditor, id: &str) -> &'a TreeNode {
        let key = editor.key_for_menu_id(id).unwrap();
        editor.node(&key).unwrap()
    }

    #[test]
    fn test_unchanged_form_gives_empty_update() {
        let editor = editor();
        for id in ["menu_home", "menu_more"] {
            let node = node(&editor, id);
            assert!(ItemForm::from_node(node).to_update(node).is_empty());
        }
    }

    #[test]
    fn test_form_keeps_route_params() {
        let editor = editor();
        let home = node(&editor, "menu_home");
        let mut form = ItemForm::from_node(home);
        assert_eq!(form.nav_kind, NavKind::Route);
        assert_eq!(form.screen_id, "main");

        form.route = "/start".into();
        let update = form.to_update(home);
        match update.navigation {
            Some(Navigation::Route { route, arguments }) => {
                assert_eq!(route, "/start");
                assert_eq!(arguments.params.get("tab").map(String::as_str), Some("1"));
            }
            other => panic!("unexpected navigation {:?}", other),
        }
        assert!(update.title.is_none());
    }

    #[test]
    fn test_form_submenu_changes() {
        let editor = editor();
        let more = node(&editor, "menu_more");
        let mut form = ItemForm::from_node(more);

        if let Some((_, style, _)) = form.submenu.as_mut() {
            *style = DisplayStyle::Dialog;
        }
        form.nav_kind = NavKind::Url;
        form.url = " https://example.com ".into();

        let update = form.to_update(more);
        assert_eq!(update.display_style, Some(DisplayStyle::Dialog));
        assert_eq!(update.navigation, Some(Navigation::url("https://example.com")));
        assert!(update.layout.is_none());
    }
}
