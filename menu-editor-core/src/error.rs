//! Advisory messages for structural requests the editor declines

use thiserror::Error;

/// A rejected or questionable edit. Never fatal: the tree is left usable
/// and the operator is shown the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditWarning {
    #[error("\"{title}\" is a menu item; convert it to a submenu before adding items to it")]
    NotAContainer { title: String },

    #[error("An item cannot be dropped onto itself")]
    DropOnSelf,

    #[error("\"{title}\" cannot be moved into one of its own sub-items")]
    DropIntoDescendant { title: String },

    #[error("\"{title}\" still contains {count} item(s); move or remove them before converting it to a menu item")]
    HasChildren { title: String, count: usize },

    #[error("\"{menu_id}\" has both a navigation target and sub-items; the app opens the sub-items")]
    MixedLeafAndContainer { menu_id: String },

    #[error("Duplicate id \"{old}\" was renamed to \"{new}\"")]
    DuplicateId { old: String, new: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_item() {
        let warning = EditWarning::NotAContainer {
            title: "Home".to_string(),
        };
        assert!(warning.to_string().contains("\"Home\""));

        let warning = EditWarning::HasChildren {
            title: "More".to_string(),
            count: 3,
        };
        assert!(warning.to_string().contains("3 item(s)"));
    }
}
