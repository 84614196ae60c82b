pub mod config;
pub mod error;

// Search engine
pub mod catalog;
pub mod resolver;

// HTTP service
pub mod api;

// Command-line interface
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use catalog::CatalogIndex;
pub use config::Settings;
pub use error::{Error, Result};
pub use resolver::{QueryResolver, ResolveMode, Resolution};
