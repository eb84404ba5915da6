pub mod config;
pub mod error;

// Site content and list queries
pub mod content;
pub mod query;

// GitHub integration
pub mod github;

// Contact form
pub mod contact;

// HTTP surface
pub mod api;
pub mod web;

pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
