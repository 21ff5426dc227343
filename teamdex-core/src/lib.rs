//! teamdex library exports

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod share;
pub mod store;

pub use catalog::{CatalogItem, CatalogLoader};
pub use config::TeamdexConfig;
pub use error::{ConfigError, ExportError, FetchError, RenderError};
pub use filter::{apply_filters, FilterState};
pub use store::{AddOutcome, SelectionStore, MAX_TEAM_SIZE};
