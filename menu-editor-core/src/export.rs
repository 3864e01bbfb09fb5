//! Text renderings of a menu tree for terminals and status areas

use anyhow::Result;

use crate::models::{MenuItem, Navigation, TreeNode};

/// One line per node, indented two spaces per level:
///
/// ```text
/// [+] menu_more  More (fullScreen, grid)
///     menu_about  About -> route /about
/// ```
pub fn to_outline(tree: &[TreeNode]) -> String {
    let mut out = String::new();
    for node in tree {
        push_outline(node, &mut out);
    }
    out
}

fn push_outline(node: &TreeNode, out: &mut String) {
    let indent = "  ".repeat(node.level);
    let marker = if node.is_container() { "[+] " } else { "    " };
    out.push_str(&format!(
        "{}{}{}  {}",
        indent, marker, node.item.menu_id, node.item.title
    ));

    if let Some(submenu) = &node.item.submenu {
        out.push_str(&format!(" ({}, {})", submenu.display_style, submenu.layout));
    }
    if let Some(summary) = navigation_summary(&node.item.navigation) {
        out.push_str(" -> ");
        out.push_str(&summary);
    }
    out.push('\n');

    for child in &node.children {
        push_outline(child, out);
    }
}

/// Short description of where an item navigates, `None` if nowhere
pub fn navigation_summary(navigation: &Navigation) -> Option<String> {
    match navigation {
        Navigation::None => None,
        Navigation::Route { route, arguments } => match &arguments.screen_id {
            Some(screen) => Some(format!("route {} [screen {}]", route, screen)),
            None => Some(format!("route {}", route)),
        },
        Navigation::Url {
            url,
            open_in_browser,
        } => {
            if *open_in_browser {
                Some(format!("url {} (browser)", url))
            } else {
                Some(format!("url {}", url))
            }
        }
    }
}

/// Pretty JSON of a committed item list
pub fn to_json(items: &[MenuItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::build_tree;
    use crate::models::RouteArguments;

    #[test]
    fn test_outline_indents_by_level() {
        let tree = build_tree(vec![
            MenuItem::new("Home")
                .with_id("menu_home")
                .with_navigation(Navigation::route("/home")),
            MenuItem::new("More").with_id("menu_more").with_submenu(vec![
                MenuItem::new("About").with_id("menu_about"),
            ]),
        ]);

        let outline = to_outline(&tree);
        let lines: Vec<&str> = outline.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "    menu_home  Home -> route /home");
        assert_eq!(lines[1], "[+] menu_more  More (fullScreen, grid)");
        assert_eq!(lines[2], "      menu_about  About");
    }

    #[test]
    fn test_empty_tree_has_empty_outline() {
        assert_eq!(to_outline(&[]), "");
    }

    #[test]
    fn test_navigation_summary() {
        assert_eq!(navigation_summary(&Navigation::None), None);

        let routed = Navigation::Route {
            route: "/screen".into(),
            arguments: RouteArguments {
                screen_id: Some("promo".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            navigation_summary(&routed).as_deref(),
            Some("route /screen [screen promo]")
        );

        let external = Navigation::Url {
            url: "https://example.com".into(),
            open_in_browser: true,
        };
        assert_eq!(
            navigation_summary(&external).as_deref(),
            Some("url https://example.com (browser)")
        );
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&[MenuItem::new("Home").with_id("menu_home")]).unwrap();
        assert!(json.contains("\"menu_id\": \"menu_home\""));
        assert!(!json.contains("navigation"));
    }
}
