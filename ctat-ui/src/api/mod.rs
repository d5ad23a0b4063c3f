//! HTTP API handlers for ctat-ui

pub mod conversation;
pub mod health;
pub mod settings;
pub mod ui;
pub mod workbook;

pub use conversation::{conversation_routes, ConversationView};
pub use health::health_routes;
pub use settings::settings_routes;
pub use ui::ui_routes;
pub use workbook::workbook_routes;
