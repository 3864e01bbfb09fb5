use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::debug;
use std::fs;
use std::path::Path;

use menu_editor_core::export;
use menu_editor_core::{
    determine_menu_path, get_settings_path, DisplayStyle, DropPosition, EditorSettings, FileFormat,
    MenuDocument, MenuStorage, MenuTreeEditor, Navigation, NodeKey, NodeKind, NodeUpdate,
    RouteArguments, SubmenuLayout,
};

use crate::cli::{Cli, Command, ConfigCommand};

mod cli;
mod prompts;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Command::Config(config_cmd) = &cli.command {
        return handle_config_command(config_cmd);
    }

    let settings = EditorSettings::load_user()?;

    // Determine which menu file to use
    let menu_path = determine_menu_path(cli.file.as_deref());
    let storage = match &cli.format {
        Some(format) => MenuStorage::with_format(&menu_path, parse_format(format)?),
        None => MenuStorage::new(&menu_path),
    };
    debug!("Editing {:?} as {}", storage.path(), storage.format());

    match &cli.command {
        Command::Show => show_menu(&storage, settings)?,
        Command::Add {
            title,
            kind,
            parent,
            interactive,
        } => {
            let kind = parse_kind(kind)?;
            let (title, kind) = if *interactive || title.is_none() {
                prompts::prompt_new_item(&settings, kind)?
            } else {
                (title.clone().unwrap_or_default(), kind)
            };
            add_item(&storage, settings, &title, kind, parent.as_deref())?;
        }
        Command::Rm { id, yes } => remove_item(&storage, settings, id, *yes)?,
        Command::Dup { id } => duplicate_item(&storage, settings, id)?,
        Command::Mv {
            id,
            target,
            position,
            root,
        } => {
            if *root {
                move_item_to_root(&storage, settings, id)?;
            } else {
                let target = target
                    .as_deref()
                    .context("Either --target or --root is required")?;
                move_item(&storage, settings, id, target, parse_position(position)?)?;
            }
        }
        Command::Edit {
            id,
            title,
            icon,
            route,
            screen,
            url,
            browser,
            no_nav,
            style,
            layout,
            interactive,
        } => {
            let mut update = NodeUpdate {
                title: title.clone(),
                icon: icon.clone().map(Some),
                display_style: style.as_deref().map(parse_style).transpose()?,
                layout: layout.as_deref().map(parse_layout).transpose()?,
                ..Default::default()
            };
            if let Some(route) = route {
                update.navigation = Some(Navigation::Route {
                    route: route.clone(),
                    arguments: RouteArguments {
                        screen_id: screen.clone(),
                        ..Default::default()
                    },
                });
            } else if let Some(url) = url {
                update.navigation = Some(Navigation::Url {
                    url: url.clone(),
                    open_in_browser: *browser,
                });
            } else if *no_nav {
                update.navigation = Some(Navigation::None);
            }

            edit_item(&storage, settings, id, update, *interactive)?;
        }
        Command::Convert { id, kind } => {
            convert_item(&storage, settings, id, parse_kind(kind)?)?;
        }
        Command::Check => check_menu(&storage, settings)?,
        Command::Export { to, output } => {
            handle_export_command(&storage, settings, to, output.as_deref())?;
        }
        Command::Config(_) => {}
    }

    Ok(())
}

// =============================================================================
// Session plumbing
// =============================================================================

/// Loads the file and opens an editing session over its items. Screen-level
/// keys stay in the returned document until the session is saved.
fn open_session(
    storage: &MenuStorage,
    settings: EditorSettings,
) -> Result<(MenuDocument, MenuTreeEditor)> {
    let mut document = storage.load()?;
    let items = std::mem::take(&mut document.items);
    let editor = MenuTreeEditor::open(items, settings);
    Ok((document, editor))
}

fn save_session(
    storage: &MenuStorage,
    mut document: MenuDocument,
    editor: &mut MenuTreeEditor,
) -> Result<()> {
    document.items = editor.commit();
    storage.save(&document)
}

fn resolve(editor: &MenuTreeEditor, menu_id: &str) -> Result<NodeKey> {
    editor
        .key_for_menu_id(menu_id)
        .with_context(|| format!("No menu item with id '{}'", menu_id))
}

fn print_warnings(editor: &mut MenuTreeEditor) -> usize {
    let warnings = editor.take_warnings();
    for warning in &warnings {
        println!("{} {}", "Warning:".yellow().bold(), warning);
    }
    warnings.len()
}

// =============================================================================
// Commands
// =============================================================================

fn show_menu(storage: &MenuStorage, settings: EditorSettings) -> Result<()> {
    let (_, mut editor) = open_session(storage, settings)?;

    if editor.tree().is_empty() {
        println!("{}", "No menu items.".yellow());
        return Ok(());
    }

    println!("{}", format!("Menu: {}", storage.path().display()).blue().bold());
    print!("{}", editor.outline());
    println!(
        "\n{} item(s) ({} top level)",
        editor.menu_ids().len(),
        editor.tree().len()
    );
    print_warnings(&mut editor);
    Ok(())
}

fn add_item(
    storage: &MenuStorage,
    settings: EditorSettings,
    title: &str,
    kind: NodeKind,
    parent: Option<&str>,
) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;

    let key = match parent {
        Some(parent_id) => {
            let parent = resolve(&editor, parent_id)?;
            editor
                .add_child_node_titled(&parent, kind, title)?
                .with_context(|| format!("No menu item with id '{}'", parent_id))?
        }
        None => editor.add_root_node_titled(kind, title),
    };
    let menu_id = editor
        .node(&key)
        .map(|n| n.item.menu_id.clone())
        .unwrap_or_default();

    save_session(storage, document, &mut editor)?;

    println!("{}", format!("Added {} '{}'", kind, title).green());
    println!("ID: {}", menu_id.green());
    Ok(())
}

fn remove_item(storage: &MenuStorage, settings: EditorSettings, id: &str, yes: bool) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;

    if let Some(node) = editor.node(&key) {
        println!("{}", "Item to remove:".yellow());
        println!("  ID: {}", node.item.menu_id);
        println!("  Title: {}", node.item.title);
        if !node.children.is_empty() {
            println!("  Contains: {} item(s)", node.subtree_len() - 1);
        }
    }

    if !yes && !prompts::confirm("Are you sure you want to remove this item?")? {
        println!("{}", "Removal cancelled.".yellow());
        return Ok(());
    }

    editor.remove_node(&key);
    save_session(storage, document, &mut editor)?;

    println!("{}", format!("Removed '{}'", id).green());
    Ok(())
}

fn duplicate_item(storage: &MenuStorage, settings: EditorSettings, id: &str) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;

    let copy = editor
        .duplicate_node(&key)
        .with_context(|| format!("No menu item with id '{}'", id))?;
    let new_id = editor
        .node(&copy)
        .map(|n| n.item.menu_id.clone())
        .unwrap_or_default();

    save_session(storage, document, &mut editor)?;

    println!("{}", format!("Duplicated '{}'", id).green());
    println!("ID: {}", new_id.green());
    Ok(())
}

fn move_item(
    storage: &MenuStorage,
    settings: EditorSettings,
    id: &str,
    target_id: &str,
    position: DropPosition,
) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;
    let target = resolve(&editor, target_id)?;

    if !editor.move_node(&key, &target, position)? {
        anyhow::bail!("Nothing was moved");
    }
    save_session(storage, document, &mut editor)?;

    println!(
        "{}",
        format!("Moved '{}' {} '{}'", id, position, target_id).green()
    );
    Ok(())
}

fn move_item_to_root(storage: &MenuStorage, settings: EditorSettings, id: &str) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;

    editor.move_to_root(&key);
    save_session(storage, document, &mut editor)?;

    println!("{}", format!("Moved '{}' to the top level", id).green());
    Ok(())
}

fn edit_item(
    storage: &MenuStorage,
    settings: EditorSettings,
    id: &str,
    update: NodeUpdate,
    interactive: bool,
) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;

    let update = if interactive || update.is_empty() {
        let node = editor
            .node(&key)
            .with_context(|| format!("No menu item with id '{}'", id))?;
        prompts::prompt_edit_item(node)?
    } else {
        update
    };

    if update.is_empty() {
        println!("{}", "No changes.".yellow());
        return Ok(());
    }

    editor.update_node(&key, update);
    print_warnings(&mut editor);
    save_session(storage, document, &mut editor)?;

    println!("{}", format!("Updated '{}'", id).green());
    Ok(())
}

fn convert_item(
    storage: &MenuStorage,
    settings: EditorSettings,
    id: &str,
    kind: NodeKind,
) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;
    let key = resolve(&editor, id)?;

    editor.convert_node(&key, kind)?;
    save_session(storage, document, &mut editor)?;

    println!("{}", format!("'{}' is now a {}", id, kind).green());
    Ok(())
}

fn check_menu(storage: &MenuStorage, settings: EditorSettings) -> Result<()> {
    let (document, mut editor) = open_session(storage, settings)?;

    let count = print_warnings(&mut editor);
    if editor.is_dirty() {
        save_session(storage, document, &mut editor)?;
        println!("{}", "Assigned missing or duplicate ids and saved.".green());
    }

    if count == 0 {
        println!("{}", "No problems found.".green());
    } else {
        println!("{}", format!("{} warning(s)", count).yellow());
    }
    Ok(())
}

fn handle_export_command(
    storage: &MenuStorage,
    settings: EditorSettings,
    to: &str,
    output: Option<&Path>,
) -> Result<()> {
    let (_, mut editor) = open_session(storage, settings)?;

    let text = match to {
        "outline" => editor.outline(),
        "json" => export::to_json(&editor.commit())?,
        _ => {
            anyhow::bail!("Unknown export format: {}. Supported formats: outline, json", to);
        }
    };

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
            println!("{}", format!("Exported to {}", path.display()).green());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    let path = get_settings_path()?;

    match cmd {
        ConfigCommand::Show => {
            let settings = EditorSettings::load_or_default(&path)?;
            println!("{}", "Editor Settings:".blue().bold());
            println!("{}: {}", "File".cyan(), path.display());
            println!();
            print!("{}", serde_yaml::to_string(&settings)?);
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Init => {
            if EditorSettings::create_default(&path)? {
                println!("{}", format!("Wrote default settings to {}", path.display()).green());
            } else {
                println!("{}", format!("{} already exists", path.display()).yellow());
            }
        }
    }
    Ok(())
}

// =============================================================================
// Argument parsing
// =============================================================================

fn parse_kind(value: &str) -> Result<NodeKind> {
    value.parse::<NodeKind>().map_err(anyhow::Error::msg)
}

fn parse_position(value: &str) -> Result<DropPosition> {
    value.parse::<DropPosition>().map_err(anyhow::Error::msg)
}

fn parse_format(value: &str) -> Result<FileFormat> {
    match value.to_lowercase().as_str() {
        "json" => Ok(FileFormat::Json),
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        _ => anyhow::bail!("Invalid format '{}'. Use 'json' or 'yaml'.", value),
    }
}

fn parse_style(value: &str) -> Result<DisplayStyle> {
    DisplayStyle::all()
        .iter()
        .copied()
        .find(|s| s.to_string().eq_ignore_ascii_case(value))
        .with_context(|| {
            format!(
                "Invalid display style '{}'. Use fullScreen, bottomSheet or dialog.",
                value
            )
        })
}

fn parse_layout(value: &str) -> Result<SubmenuLayout> {
    SubmenuLayout::all()
        .iter()
        .copied()
        .find(|l| l.to_string().eq_ignore_ascii_case(value))
        .with_context(|| format!("Invalid layout '{}'. Use grid or list.", value))
}
