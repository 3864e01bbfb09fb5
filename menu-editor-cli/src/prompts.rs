use anyhow::Result;
use inquire::{Confirm, Select, Text};
use std::fmt;

use menu_editor_core::{
    DisplayStyle, EditorSettings, Navigation, NodeKind, NodeUpdate, RouteArguments, SubmenuLayout,
    TreeNode,
};

/// Prompts for the title and kind of a new item
pub fn prompt_new_item(settings: &EditorSettings, kind: NodeKind) -> Result<(String, NodeKind)> {
    let kinds = vec![NodeKind::Menu, NodeKind::Submenu];
    let cursor = kinds.iter().position(|k| *k == kind).unwrap_or(0);
    let kind = Select::new("Kind:", kinds)
        .with_starting_cursor(cursor)
        .prompt()?;

    let default_title = match kind {
        NodeKind::Menu => settings.new_item_title.as_str(),
        NodeKind::Submenu => settings.new_container_title.as_str(),
    };
    let title = Text::new("Title:").with_default(default_title).prompt()?;

    Ok((title, kind))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NavigationChoice {
    Keep,
    Route,
    Url,
    Clear,
}

impl fmt::Display for NavigationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationChoice::Keep => write!(f, "Keep current"),
            NavigationChoice::Route => write!(f, "Internal route"),
            NavigationChoice::Url => write!(f, "External url"),
            NavigationChoice::Clear => write!(f, "No navigation"),
        }
    }
}

/// Walks through the editable fields of `node`, pre-filled with its values
pub fn prompt_edit_item(node: &TreeNode) -> Result<NodeUpdate> {
    let item = &node.item;
    let mut update = NodeUpdate::default();

    let title = Text::new("Title:").with_initial_value(&item.title).prompt()?;
    if title != item.title {
        update.title = Some(title);
    }

    let current_icon = item.icon.clone().unwrap_or_default();
    let icon = Text::new("Icon (empty for none):")
        .with_initial_value(&current_icon)
        .prompt()?;
    if icon != current_icon {
        update.icon = Some(Some(icon));
    }

    println!("Navigation: {}", item.navigation);
    let choices = vec![
        NavigationChoice::Keep,
        NavigationChoice::Route,
        NavigationChoice::Url,
        NavigationChoice::Clear,
    ];
    match Select::new("Change navigation?", choices).prompt()? {
        NavigationChoice::Keep => {}
        NavigationChoice::Route => {
            let route = Text::new("Route:").prompt()?;
            let screen = Text::new("Screen id (optional):").prompt()?;
            update.navigation = Some(Navigation::Route {
                route,
                arguments: RouteArguments {
                    screen_id: Some(screen).filter(|s| !s.trim().is_empty()),
                    ..Default::default()
                },
            });
        }
        NavigationChoice::Url => {
            let url = Text::new("Url:").prompt()?;
            let open_in_browser = Confirm::new("Open in the system browser?")
                .with_default(false)
                .prompt()?;
            update.navigation = Some(Navigation::Url {
                url,
                open_in_browser,
            });
        }
        NavigationChoice::Clear => update.navigation = Some(Navigation::None),
    }

    if let Some(submenu) = &item.submenu {
        let styles = DisplayStyle::all().to_vec();
        let cursor = styles
            .iter()
            .position(|s| *s == submenu.display_style)
            .unwrap_or(0);
        let style = Select::new("Display style:", styles)
            .with_starting_cursor(cursor)
            .prompt()?;
        if style != submenu.display_style {
            update.display_style = Some(style);
        }

        let layouts = SubmenuLayout::all().to_vec();
        let cursor = layouts.iter().position(|l| *l == submenu.layout).unwrap_or(0);
        let layout = Select::new("Layout:", layouts)
            .with_starting_cursor(cursor)
            .prompt()?;
        if layout != submenu.layout {
            update.layout = Some(layout);
        }
    }

    Ok(update)
}

/// Asks before a destructive change
pub fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::new(message).with_default(false).prompt()?)
}
