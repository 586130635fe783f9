pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod handler;
pub mod logging;
pub mod transcript;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use api::{ApiError, HttpBackend, LogBackend};
pub use config::Config;
pub use controller::{Controller, Operation};
pub use transcript::{ConversationEntry, Role, Transcript};
