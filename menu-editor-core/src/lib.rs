pub mod codec;
pub mod drag;
pub mod editor;
pub mod error;
pub mod export;
pub mod id_gen;
pub mod models;
pub mod mutate;
pub mod project;
pub mod query;
pub mod settings;
pub mod storage;

// Re-export commonly used types
pub use drag::{DragDropController, DragState, DropOutcome, DropZones};
pub use editor::{MenuTreeEditor, NodeUpdate};
pub use error::EditWarning;
pub use id_gen::IdGenerator;
pub use models::{
    DisplayStyle, DropPosition, MenuDocument, MenuItem, Navigation, NodeKey, NodeKind,
    RouteArguments, Submenu, SubmenuLayout, TreeNode,
};
pub use project::determine_menu_path;
pub use settings::{get_settings_path, EditorSettings};
pub use storage::{FileFormat, MenuStorage, StorageError};
