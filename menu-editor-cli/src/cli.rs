use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Edit the hierarchical menu of a mobile app")]
pub struct Cli {
    /// Path to the menu configuration file (defaults to MENU_EDITOR_FILE or menu.json)
    #[clap(long, short = 'f', global = true)]
    pub file: Option<PathBuf>,

    /// File format (json, yaml); inferred from the extension when omitted
    #[clap(long, global = true)]
    pub format: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the editor settings in effect
    Show,

    /// Print the path to the settings file
    Path,

    /// Write default settings if no settings file exists
    Init,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the menu tree
    Show,

    /// Add a new menu item or submenu
    Add {
        /// Title of the new item
        #[clap(long)]
        title: Option<String>,

        /// Kind of item (menu, submenu)
        #[clap(long, default_value = "menu")]
        kind: String,

        /// Id of the submenu to add the item to (top level when omitted)
        #[clap(long)]
        parent: Option<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Remove an item and everything under it
    Rm {
        /// Id of the item to remove
        id: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Duplicate an item and everything under it
    Dup {
        /// Id of the item to duplicate
        id: String,
    },

    /// Move an item relative to another, or to the top level
    Mv {
        /// Id of the item to move
        id: String,

        /// Id of the item to move next to or into
        #[clap(long, required_unless_present = "root", conflicts_with = "root")]
        target: Option<String>,

        /// Where to place the item relative to the target (before, after, inside)
        #[clap(long, default_value = "after")]
        position: String,

        /// Append the item to the end of the top level
        #[clap(long)]
        root: bool,
    },

    /// Edit an item's title, icon, navigation or submenu presentation
    Edit {
        /// Id of the item to edit
        id: String,

        /// New title (the id does not change)
        #[clap(long)]
        title: Option<String>,

        /// Icon reference; pass an empty string to clear it
        #[clap(long)]
        icon: Option<String>,

        /// Navigate to an internal route
        #[clap(long, conflicts_with_all = ["url", "no_nav"])]
        route: Option<String>,

        /// Remote screen id passed along with --route
        #[clap(long, requires = "route")]
        screen: Option<String>,

        /// Navigate to an external url
        #[clap(long, conflicts_with = "no_nav")]
        url: Option<String>,

        /// Open --url in the system browser instead of in-app
        #[clap(long, requires = "url")]
        browser: bool,

        /// Remove the navigation target
        #[clap(long)]
        no_nav: bool,

        /// Submenu display style (fullScreen, bottomSheet, dialog)
        #[clap(long)]
        style: Option<String>,

        /// Submenu layout (grid, list)
        #[clap(long)]
        layout: Option<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Convert an item between menu item and submenu
    Convert {
        /// Id of the item to convert
        id: String,

        /// Target kind (menu, submenu)
        #[clap(long)]
        kind: String,
    },

    /// Report structural warnings and assign missing ids
    Check,

    /// Export the menu tree
    Export {
        /// Output format (outline, json)
        #[clap(long, default_value = "outline")]
        to: String,

        /// Output file path (stdout when omitted)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Editor settings
    #[clap(subcommand)]
    Config(ConfigCommand),
}
