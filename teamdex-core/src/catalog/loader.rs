//! Batched catalog retrieval
//!
//! Fetches the list envelope once, then resolves every entry through the
//! cache in fixed-size concurrent batches with a pause in between. Entries
//! that fail to resolve are recorded as gaps and left out; the final list
//! is sorted by id regardless of completion order.

use futures::future::join_all;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::api::{PokemonListResponse, PokemonResponse, PokemonSpeciesResponse};
use super::cache::CatalogCache;
use super::item::CatalogItem;
use super::transport::HttpTransport;
use crate::config::CatalogConfig;
use crate::error::FetchError;
use crate::filter::generation_distribution;

/// Fallback language when the configured one has no entry
const FALLBACK_LANGUAGE: &str = "ja";

/// An entry that could not be resolved during a bulk load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionGap {
    pub id: u32,
    pub cause: FetchError,
}

struct LoadedCatalog {
    items: Arc<Vec<CatalogItem>>,
    gaps: Vec<ResolutionGap>,
}

pub struct CatalogLoader {
    cache: Arc<CatalogCache>,
    config: CatalogConfig,
    // Also gates re-entry: concurrent callers share one in-flight load.
    all: OnceCell<LoadedCatalog>,
}

impl CatalogLoader {
    pub fn new(cache: Arc<CatalogCache>, config: CatalogConfig) -> Self {
        Self {
            cache,
            config,
            all: OnceCell::new(),
        }
    }

    /// Loader backed by the HTTP transport described in `config`
    pub fn from_config(config: CatalogConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.timeout())?);
        let cache = Arc::new(CatalogCache::new(transport));
        Ok(Self::new(cache, config))
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn list_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.config.api_root(), self.config.limit)
    }

    fn pokemon_url(&self, key: impl std::fmt::Display) -> String {
        format!("{}/pokemon/{}", self.config.api_root(), key)
    }

    fn species_url(&self, id: u32) -> String {
        format!("{}/pokemon-species/{}", self.config.api_root(), id)
    }

    /// The full catalog, sorted by id.
    ///
    /// Never fails: if the load cannot complete, the error is logged and an
    /// empty list is returned. Use [`try_load_all`](Self::try_load_all) to
    /// observe the error.
    pub async fn load_all(&self) -> Arc<Vec<CatalogItem>> {
        match self.try_load_all().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to load catalog: {}", e);
                Arc::new(Vec::new())
            }
        }
    }

    /// The full catalog, or the error that stopped the load.
    ///
    /// A successful load is kept and shared by every later call. A failed
    /// one is not, so calling again retries.
    pub async fn try_load_all(&self) -> Result<Arc<Vec<CatalogItem>>, FetchError> {
        let loaded = self.all.get_or_try_init(|| self.fetch_catalog()).await?;
        Ok(Arc::clone(&loaded.items))
    }

    pub fn is_loaded(&self) -> bool {
        self.all.initialized()
    }

    /// Entries skipped by the completed load (empty before the first load)
    pub fn gaps(&self) -> &[ResolutionGap] {
        self.all.get().map(|l| l.gaps.as_slice()).unwrap_or(&[])
    }

    async fn fetch_catalog(&self) -> Result<LoadedCatalog, FetchError> {
        info!("Loading catalog from {}", self.config.api_root());

        let list: PokemonListResponse = self.cache.fetch_cached(&self.list_url()).await?;
        let total = list.results.len();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = total.div_ceil(batch_size);
        let delay = self.config.batch_delay();

        let mut items = Vec::with_capacity(total);
        let mut gaps = Vec::new();

        for (batch_index, start) in (0..total).step_by(batch_size).enumerate() {
            let end = (start + batch_size).min(total);
            debug!("Loading batch {}/{}", batch_index + 1, batch_count);

            // Entries are addressed by position: index i is id i + 1
            let resolved = join_all((start..end).map(|index| self.resolve(index as u32 + 1))).await;

            for result in resolved {
                match result {
                    Ok(item) => items.push(item),
                    Err(gap) => {
                        debug!("Skipping id {}: {}", gap.id, gap.cause);
                        gaps.push(gap);
                    }
                }
            }

            debug!("Progress: {}/{} loaded", items.len(), total);

            if end < total && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        items.sort_by_key(CatalogItem::id);

        info!("Loaded {} catalog entries", items.len());
        debug!("Distribution by generation: {:?}", generation_distribution(&items));
        if !gaps.is_empty() {
            warn!("{} entries could not be resolved and were skipped", gaps.len());
        }

        Ok(LoadedCatalog {
            items: Arc::new(items),
            gaps,
        })
    }

    async fn resolve(&self, id: u32) -> Result<CatalogItem, ResolutionGap> {
        self.get_by_id(id)
            .await
            .map_err(|cause| ResolutionGap { id, cause })
    }

    /// Resolve one entry by id
    pub async fn get_by_id(&self, id: u32) -> Result<CatalogItem, FetchError> {
        let response: PokemonResponse = self.cache.fetch_cached(&self.pokemon_url(id)).await?;
        Ok(self.finish(CatalogItem::from_response(&response)).await)
    }

    /// Resolve one entry by its canonical name
    pub async fn find_by_name(&self, name: &str) -> Result<CatalogItem, FetchError> {
        let key = name.trim().to_lowercase();
        let response: PokemonResponse = self.cache.fetch_cached(&self.pokemon_url(key)).await?;
        Ok(self.finish(CatalogItem::from_response(&response)).await)
    }

    async fn finish(&self, item: CatalogItem) -> CatalogItem {
        if self.config.localized_names {
            self.with_localized_name(item).await
        } else {
            item
        }
    }

    /// Localized name from the species endpoint, trying the configured
    /// language first and then plain `ja`
    pub async fn localized_name(&self, id: u32, language: &str) -> Result<Option<String>, FetchError> {
        let species: PokemonSpeciesResponse = self.cache.fetch_cached(&self.species_url(id)).await?;
        Ok(species
            .name_for(language)
            .or_else(|| species.name_for(FALLBACK_LANGUAGE))
            .map(str::to_string))
    }

    /// Copy of `item` with its localized name filled in. Lookup failures
    /// leave the item unchanged.
    pub async fn with_localized_name(&self, item: CatalogItem) -> CatalogItem {
        match self.localized_name(item.id(), &self.config.language).await {
            Ok(Some(name)) => item.with_japanese_name(name),
            Ok(None) => item,
            Err(e) => {
                debug!("No localized name for {}: {}", item.id(), e);
                item
            }
        }
    }

    /// Up to `count` random entries.
    ///
    /// Ids are drawn uniformly from `1..=limit` and resolved one by one;
    /// repeated ids and failed lookups are dropped, so fewer than `count`
    /// items may come back.
    pub async fn get_random(&self, count: usize) -> Vec<CatalogItem> {
        if count == 0 || self.config.limit == 0 {
            return Vec::new();
        }

        let ids: Vec<u32> = {
            let mut rng = rand::thread_rng();
            (0..count)
                .map(|_| rng.gen_range(1..=self.config.limit))
                .collect()
        };

        let mut seen = HashSet::new();
        join_all(ids.into_iter().map(|id| self.get_by_id(id)))
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(item) => Some(item),
                Err(e) => {
                    debug!("Random pick dropped: {}", e);
                    None
                }
            })
            .filter(|item| seen.insert(item.id()))
            .collect()
    }
}
