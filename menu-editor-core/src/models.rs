use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Keys a persisted item may carry that the tree editor does not interpret
/// (colors, badges, analytics tags, ...). They are copied through verbatim.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// How a submenu is presented when the user opens it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStyle {
    #[default]
    FullScreen,
    BottomSheet,
    Dialog,
}

impl DisplayStyle {
    /// Get all display styles for UI selection
    pub fn all() -> &'static [DisplayStyle] {
        &[
            DisplayStyle::FullScreen,
            DisplayStyle::BottomSheet,
            DisplayStyle::Dialog,
        ]
    }
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStyle::FullScreen => write!(f, "fullScreen"),
            DisplayStyle::BottomSheet => write!(f, "bottomSheet"),
            DisplayStyle::Dialog => write!(f, "dialog"),
        }
    }
}

/// How the children of a submenu are laid out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SubmenuLayout {
    #[default]
    Grid,
    List,
}

impl SubmenuLayout {
    /// Get all layouts for UI selection
    pub fn all() -> &'static [SubmenuLayout] {
        &[SubmenuLayout::Grid, SubmenuLayout::List]
    }
}

impl fmt::Display for SubmenuLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmenuLayout::Grid => write!(f, "grid"),
            SubmenuLayout::List => write!(f, "list"),
        }
    }
}

/// Typed arguments passed along with an internal route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RouteArguments {
    /// Remote screen to open, for routes that render a configured screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_id: Option<String>,

    /// Free-form string parameters appended to the route
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl RouteArguments {
    pub fn is_empty(&self) -> bool {
        self.screen_id.is_none() && self.params.is_empty()
    }
}

/// Where a leaf item navigates to. Produced and validated by the
/// navigation configuration forms; the tree only copies it around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Navigation {
    /// Internal application route
    Route {
        route: String,
        #[serde(default, skip_serializing_if = "RouteArguments::is_empty")]
        arguments: RouteArguments,
    },
    /// External web address
    Url {
        url: String,
        #[serde(default)]
        open_in_browser: bool,
    },
    /// Tapping the item does nothing (or only opens its submenu)
    #[default]
    None,
}

impl Navigation {
    /// Shorthand for a route without arguments
    pub fn route(route: impl Into<String>) -> Self {
        Navigation::Route {
            route: route.into(),
            arguments: RouteArguments::default(),
        }
    }

    /// Shorthand for an in-app web view url
    pub fn url(url: impl Into<String>) -> Self {
        Navigation::Url {
            url: url.into(),
            open_in_browser: false,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Navigation::None)
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Route { route, .. } => write!(f, "route {}", route),
            Navigation::Url { url, .. } => write!(f, "url {}", url),
            Navigation::None => write!(f, "no navigation"),
        }
    }
}

/// Container metadata for an item that opens a nested menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submenu {
    pub title: String,

    #[serde(default)]
    pub display_style: DisplayStyle,

    #[serde(default)]
    pub layout: SubmenuLayout,

    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Submenu {
    /// Creates empty container metadata with the default presentation
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            display_style: DisplayStyle::default(),
            layout: SubmenuLayout::default(),
            items: Vec::new(),
        }
    }
}

/// A single persisted menu entry, either a navigable leaf or a container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    /// Human-derived identifier, unique across the whole menu.
    /// Empty when loaded from configuration written before ids existed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub menu_id: String,

    /// Label shown to the user
    pub title: String,

    /// Icon reference (asset path or icon font name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Navigation::is_none")]
    pub navigation: Navigation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<Submenu>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl MenuItem {
    /// Creates a leaf item without an identifier or navigation target
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            menu_id: String::new(),
            title: title.into(),
            icon: None,
            navigation: Navigation::None,
            submenu: None,
            extra: ExtraFields::new(),
        }
    }

    /// Builder: set the identifier
    pub fn with_id(mut self, menu_id: impl Into<String>) -> Self {
        self.menu_id = menu_id.into();
        self
    }

    /// Builder: set the navigation target
    pub fn with_navigation(mut self, navigation: Navigation) -> Self {
        self.navigation = navigation;
        self
    }

    /// Builder: turn the item into a container holding `items`
    pub fn with_submenu(mut self, items: Vec<MenuItem>) -> Self {
        let mut submenu = Submenu::new(self.title.clone());
        submenu.items = items;
        self.submenu = Some(submenu);
        self
    }

    /// Both a navigation target and nested items: tolerated, but flagged
    pub fn mixes_leaf_and_container(&self) -> bool {
        !self.navigation.is_none()
            && self
                .submenu
                .as_ref()
                .map(|s| !s.items.is_empty())
                .unwrap_or(false)
    }
}

/// Persisted configuration file: the menu plus any screen-level keys the
/// tree editor passes through untouched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MenuDocument {
    #[serde(default)]
    pub items: Vec<MenuItem>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Editor-session key addressing a node. Never persisted; regenerated
/// every time the tree is rebuilt from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(Uuid);

impl NodeKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leaf or container
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Menu,
    Submenu,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Menu => write!(f, "menu"),
            NodeKind::Submenu => write!(f, "submenu"),
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "menu" | "item" | "leaf" => Ok(NodeKind::Menu),
            "submenu" | "container" | "folder" => Ok(NodeKind::Submenu),
            other => Err(format!("Unknown node kind: {}", other)),
        }
    }
}

/// Where a dropped node lands relative to its target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    /// Sibling immediately before the target
    Before,
    /// Sibling immediately after the target
    After,
    /// First child of the target
    Inside,
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropPosition::Before => write!(f, "before"),
            DropPosition::After => write!(f, "after"),
            DropPosition::Inside => write!(f, "inside"),
        }
    }
}

impl std::str::FromStr for DropPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(DropPosition::Before),
            "after" => Ok(DropPosition::After),
            "inside" | "into" => Ok(DropPosition::Inside),
            other => Err(format!("Unknown drop position: {}", other)),
        }
    }
}

/// In-memory node of the editing tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub key: NodeKey,

    /// The wrapped item. While the node is in the tree its
    /// `submenu.items` is kept empty; the children live in `children`.
    pub item: MenuItem,

    pub children: Vec<TreeNode>,

    /// Number of ancestors between this node and the root list
    pub level: usize,
}

impl TreeNode {
    /// Wraps an item as a childless node with a fresh key
    pub fn new(item: MenuItem, level: usize) -> Self {
        Self {
            key: NodeKey::new(),
            item,
            children: Vec::new(),
            level,
        }
    }

    /// Leaf or container, derived from the presence of submenu metadata
    pub fn kind(&self) -> NodeKind {
        if self.item.submenu.is_some() {
            NodeKind::Submenu
        } else {
            NodeKind::Menu
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind() == NodeKind::Submenu
    }

    pub fn menu_id(&self) -> &str {
        &self.item.menu_id
    }

    pub fn title(&self) -> &str {
        &self.item.title
    }

    /// True if `key` is this node or any of its descendants
    pub fn contains(&self, key: &NodeKey) -> bool {
        if self.key == *key {
            return true;
        }
        self.children.iter().any(|child| child.contains(key))
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_json_shape() {
        let item = MenuItem::new("Home")
            .with_id("menu_home")
            .with_navigation(Navigation::route("/home"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["menu_id"], "menu_home");
        assert_eq!(json["navigation"]["type"], "route");
        assert_eq!(json["navigation"]["route"], "/home");
        assert!(json.get("icon").is_none());
        assert!(json.get("submenu").is_none());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let raw = r##"{"title":"Promo","badge_color":"#ff0000","analytics":{"tag":"promo"}}"##;
        let item: MenuItem = serde_json::from_str(raw).unwrap();

        assert!(item.menu_id.is_empty());
        assert_eq!(item.extra.len(), 2);

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["badge_color"], "#ff0000");
        assert_eq!(back["analytics"]["tag"], "promo");
    }

    #[test]
    fn test_submenu_defaults_when_absent() {
        let raw = r#"{"title":"More","submenu":{"title":"More"}}"#;
        let item: MenuItem = serde_json::from_str(raw).unwrap();
        let submenu = item.submenu.unwrap();

        assert_eq!(submenu.display_style, DisplayStyle::FullScreen);
        assert_eq!(submenu.layout, SubmenuLayout::Grid);
        assert!(submenu.items.is_empty());
    }

    #[test]
    fn test_display_style_serialized_camel_case() {
        let json = serde_json::to_string(&DisplayStyle::BottomSheet).unwrap();
        assert_eq!(json, "\"bottomSheet\"");
    }

    #[test]
    fn test_mixed_leaf_and_container_detection() {
        let plain = MenuItem::new("A").with_submenu(vec![MenuItem::new("B")]);
        assert!(!plain.mixes_leaf_and_container());

        let mixed = MenuItem::new("A")
            .with_navigation(Navigation::url("https://example.com"))
            .with_submenu(vec![MenuItem::new("B")]);
        assert!(mixed.mixes_leaf_and_container());

        // An empty container with a target is still a leaf for practical purposes
        let empty = MenuItem::new("A")
            .with_navigation(Navigation::route("/a"))
            .with_submenu(Vec::new());
        assert!(!empty.mixes_leaf_and_container());
    }

    #[test]
    fn test_node_kind_follows_submenu_presence() {
        let mut node = TreeNode::new(MenuItem::new("A"), 0);
        assert_eq!(node.kind(), NodeKind::Menu);

        node.item.submenu = Some(Submenu::new("A"));
        assert_eq!(node.kind(), NodeKind::Submenu);
    }

    #[test]
    fn test_parse_kind_and_position() {
        assert_eq!("submenu".parse::<NodeKind>().unwrap(), NodeKind::Submenu);
        assert_eq!("Menu".parse::<NodeKind>().unwrap(), NodeKind::Menu);
        assert!("widget".parse::<NodeKind>().is_err());

        assert_eq!("inside".parse::<DropPosition>().unwrap(), DropPosition::Inside);
        assert!("below".parse::<DropPosition>().is_err());
    }
}
