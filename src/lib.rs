pub mod error;
pub mod config;
pub mod mcp;
pub mod catalog;
pub mod i18n;
pub mod filter;
pub mod prefs;

// Convenience re-exports at crate root
pub use config::ClientConfig;
pub use error::ClientError;
pub use mcp::{McpClient, ToolCaller, MockToolCaller};
pub use catalog::{Overview, Sight, Resort, Product, ProductKind, SearchResults};
pub use i18n::{Language, t, t_with, has_key};
pub use filter::{Listing, ListingFilter, SortBy};
pub use prefs::PreferenceStore;
