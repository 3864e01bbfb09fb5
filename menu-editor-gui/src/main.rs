use std::path::PathBuf;

use menu_editor_core::determine_menu_path;

mod app;

use app::MenuEditorApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional first argument: the menu file to edit
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let menu_path = determine_menu_path(explicit.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("Menu Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Menu Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(MenuEditorApp::new(menu_path)))),
    )
}
