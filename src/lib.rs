pub mod app;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod handler;
pub mod logging;
pub mod passage;
pub mod services;
pub mod storage;
pub mod theme;
pub mod tui;
pub mod ui;
pub mod verse;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use app::{Action, AppState, Effect, Tab};
pub use catalog::Book;
pub use config::Config;
pub use controller::Controller;
pub use error::FetchError;
pub use passage::PassageClient;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Preferences, ReadingSelection};
pub use verse::{Verse, VerseClient};
