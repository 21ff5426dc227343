//! teamdex Catalog - remote creature catalog access
//!
//! # Architecture
//!
//! ```text
//! Catalog API (pokeapi.co)
//!     │
//!     ├── /pokemon?limit=N      ← list envelope
//!     ├── /pokemon/{id}         ← detail, one per entry
//!     └── /pokemon-species/{id} ← localized names
//!            │
//!            ▼
//!     CatalogTransport (reqwest)
//!            │
//!            ▼
//!     CatalogCache              ← memoized by URL, process lifetime
//!            │
//!            ▼
//!     CatalogLoader             ← batches of 50, id-sorted result
//! ```
//!
//! Name/type/generation filtering over the loaded list lives in
//! [`crate::filter`] and is re-exported here.

mod api;
mod cache;
mod item;
mod labels;
mod loader;
mod transport;

pub use api::{
    LocalizedName, NamedResource, OtherSprites, PokemonListResponse, PokemonResponse,
    PokemonSpeciesResponse, SpriteSet, Sprites, TypeSlot,
};
pub use cache::{CacheStats, CatalogCache};
pub use item::{
    best_image_url, generation_for_id, CatalogItem, MAX_GENERATION, PLACEHOLDER_IMAGE,
};
pub use labels::{region_name, type_label};
pub use loader::{CatalogLoader, ResolutionGap};
pub use transport::{CatalogTransport, HttpTransport};

pub use crate::filter::{filter_by_generation, filter_by_type, search_by_name};

#[cfg(test)]
mod tests;
