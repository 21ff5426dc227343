//! Shared helpers for integration tests
//!
//! Used from several test files through the tests/common/ pattern, so not
//! every helper is used by every file.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use teamdex_core::catalog::{CatalogCache, CatalogLoader, CatalogTransport};
use teamdex_core::config::CatalogConfig;
use teamdex_core::FetchError;

pub const BASE: &str = "https://catalog.test/api/v2";

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// (id, name, types, localized name)
pub const FIXTURES: [(u32, &str, &[&str], &str); 8] = [
    (1, "bulbasaur", &["grass", "poison"], "フシギダネ"),
    (4, "charmander", &["fire"], "ヒトカゲ"),
    (7, "squirtle", &["water"], "ゼニガメ"),
    (25, "pikachu", &["electric"], "ピカチュウ"),
    (133, "eevee", &["normal"], "イーブイ"),
    (152, "chikorita", &["grass"], "チコリータ"),
    (387, "turtwig", &["grass"], "ナエトル"),
    (906, "sprigatito", &["grass"], "ニャオハ"),
];

/// In-memory catalog API serving [`FIXTURES`].
///
/// The list endpoint returns `limit` entries; an id without a fixture
/// answers 404, like an unknown entry upstream.
pub struct FixtureApi {
    pub requests: AtomicUsize,
}

impl FixtureApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: AtomicUsize::new(0),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn fixture(key: &str) -> Option<(u32, &'static str, &'static [&'static str], &'static str)> {
        FIXTURES
            .iter()
            .find(|(id, name, _, _)| key == id.to_string() || key == *name)
            .copied()
    }
}

#[async_trait]
impl CatalogTransport for FixtureApi {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let path = url.strip_prefix(BASE).unwrap_or(url);

        if let Some(limit) = path.strip_prefix("/pokemon?limit=") {
            let limit: usize = limit.parse().map_err(|e| FetchError::decode(url, e))?;
            let results: Vec<_> = (1..=limit)
                .map(|id| serde_json::json!({"name": format!("entry-{id}"), "url": ""}))
                .collect();
            return Ok(serde_json::json!({"count": limit, "results": results}));
        }

        if let Some(key) = path.strip_prefix("/pokemon-species/") {
            return match Self::fixture(key) {
                Some((id, _, _, localized)) => Ok(serde_json::json!({
                    "id": id,
                    "names": [
                        {"name": localized, "language": {"name": "ja-Hrkt"}},
                        {"name": "ignored", "language": {"name": "en"}}
                    ]
                })),
                None => Err(FetchError::status(url, 404)),
            };
        }

        if let Some(key) = path.strip_prefix("/pokemon/") {
            return match Self::fixture(key) {
                Some((id, name, types, _)) => {
                    let types: Vec<_> = types
                        .iter()
                        .enumerate()
                        .map(|(i, t)| serde_json::json!({"slot": i + 1, "type": {"name": t}}))
                        .collect();
                    Ok(serde_json::json!({
                        "id": id,
                        "name": name,
                        "types": types,
                        "sprites": {
                            "front_default": format!("https://sprites.test/{id}.png"),
                            "other": {
                                "official-artwork": {
                                    "front_default": format!("https://artwork.test/{id}.png")
                                }
                            }
                        }
                    }))
                }
                None => Err(FetchError::status(url, 404)),
            };
        }

        Err(FetchError::status(url, 404))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::status(url, 404))
    }

    fn name(&self) -> &'static str {
        "fixtures"
    }
}

/// Loader over the fixture API covering ids `1..=limit`
pub fn fixture_loader(api: &Arc<FixtureApi>, limit: u32, localized_names: bool) -> CatalogLoader {
    let cache = Arc::new(CatalogCache::new(api.clone()));
    CatalogLoader::new(
        cache,
        CatalogConfig {
            base_url: BASE.to_string(),
            limit,
            batch_size: 50,
            localized_names,
            ..Default::default()
        },
    )
}
