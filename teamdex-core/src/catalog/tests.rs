//! Loader tests against an in-memory transport

use crate::catalog::{CatalogCache, CatalogLoader, CatalogTransport};
use crate::config::CatalogConfig;
use crate::error::{FetchCause, FetchError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BASE: &str = "https://api.test/v2";

/// Serves `total` synthetic entries; ids in `failing` answer 404
struct FakeApi {
    total: u32,
    failing: HashSet<u32>,
    fail_list: AtomicBool,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeApi {
    fn new(total: u32, failing: &[u32]) -> Arc<Self> {
        Arc::new(Self {
            total,
            failing: failing.iter().copied().collect(),
            fail_list: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn detail(&self, id: u32) -> serde_json::Value {
        let kind = if id % 2 == 0 { "water" } else { "fire" };
        serde_json::json!({
            "id": id,
            "name": format!("Mon{id}"),
            "types": [{"slot": 1, "type": {"name": kind}}],
            "sprites": {"front_default": format!("https://img.test/{id}.png")}
        })
    }

    fn respond(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let path = url.strip_prefix(BASE).unwrap_or(url);

        if let Some(query) = path.strip_prefix("/pokemon?limit=") {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(FetchError::status(url, 503));
            }
            let limit: u32 = query.parse().unwrap();
            let results: Vec<_> = (1..=self.total.min(limit))
                .map(|id| serde_json::json!({"name": format!("mon{id}"), "url": ""}))
                .collect();
            return Ok(serde_json::json!({"count": self.total, "results": results}));
        }

        if let Some(id) = path.strip_prefix("/pokemon-species/") {
            let id: u32 = id.parse().unwrap();
            return Ok(serde_json::json!({
                "id": id,
                "names": [{"name": format!("モン{id}"), "language": {"name": "ja"}}]
            }));
        }

        if let Some(key) = path.strip_prefix("/pokemon/") {
            let id = key
                .strip_prefix("mon")
                .unwrap_or(key)
                .parse::<u32>()
                .map_err(|_| FetchError::status(url, 404))?;
            if id == 0 || id > self.total || self.failing.contains(&id) {
                return Err(FetchError::status(url, 404));
            }
            return Ok(self.detail(id));
        }

        Err(FetchError::status(url, 404))
    }
}

#[async_trait]
impl CatalogTransport for FakeApi {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(1)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.respond(url)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::status(url, 404))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn loader(api: &Arc<FakeApi>, config: CatalogConfig) -> CatalogLoader {
    let cache = Arc::new(CatalogCache::new(api.clone()));
    CatalogLoader::new(cache, config)
}

fn config(limit: u32, batch_size: usize) -> CatalogConfig {
    CatalogConfig {
        base_url: BASE.to_string(),
        limit,
        batch_size,
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_load_all_sorted_with_gaps() {
    let api = FakeApi::new(120, &[7, 99]);
    let loader = loader(&api, config(120, 50));

    let items = loader.load_all().await;

    assert_eq!(items.len(), 118);
    let ids: Vec<u32> = items.iter().map(|i| i.id()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert!(!ids.contains(&7));
    assert!(!ids.contains(&99));

    let gap_ids: Vec<u32> = loader.gaps().iter().map(|g| g.id).collect();
    assert_eq!(gap_ids, vec![7, 99]);
    assert_eq!(loader.gaps()[0].cause.cause, FetchCause::Status(404));
}

#[tokio::test(start_paused = true)]
async fn test_load_all_is_memoized() {
    let api = FakeApi::new(10, &[]);
    let loader = loader(&api, config(10, 4));

    let first = loader.load_all().await;
    let requests_after_first = api.request_count();
    let second = loader.load_all().await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(api.request_count(), requests_after_first);
    assert!(loader.is_loaded());
}

#[tokio::test(start_paused = true)]
async fn test_list_failure_yields_empty_and_retries() {
    let api = FakeApi::new(5, &[]);
    api.fail_list.store(true, Ordering::SeqCst);
    let loader = loader(&api, config(5, 50));

    assert!(loader.load_all().await.is_empty());
    assert!(loader.try_load_all().await.is_err());
    assert!(!loader.is_loaded());

    api.fail_list.store(false, Ordering::SeqCst);
    assert_eq!(loader.load_all().await.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_bounded_by_batch_size() {
    let api = FakeApi::new(130, &[]);
    let loader = loader(&api, config(130, 50));

    loader.load_all().await;

    assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 50);
}

#[tokio::test(start_paused = true)]
async fn test_delay_between_batches() {
    let api = FakeApi::new(150, &[]);
    let loader = loader(&api, config(150, 50));

    let started = tokio::time::Instant::now();
    loader.load_all().await;

    // Three batches, two pauses of 100ms
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(started.elapsed() < Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_load() {
    let api = FakeApi::new(20, &[]);
    let loader = loader(&api, config(20, 10));

    let (a, b) = tokio::join!(loader.load_all(), loader.load_all());

    assert!(Arc::ptr_eq(&a, &b));
    // One list request plus one detail request per entry
    assert_eq!(api.request_count(), 21);
}

#[tokio::test(start_paused = true)]
async fn test_get_random_unique_and_in_range() {
    let api = FakeApi::new(3, &[]);
    let loader = loader(&api, config(3, 50));

    let picks = loader.get_random(6).await;

    assert!(picks.len() <= 3);
    assert!(!picks.is_empty());
    let ids: HashSet<u32> = picks.iter().map(|p| p.id()).collect();
    assert_eq!(ids.len(), picks.len());
    assert!(ids.iter().all(|id| (1..=3).contains(id)));
}

#[tokio::test(start_paused = true)]
async fn test_get_random_drops_failures() {
    let api = FakeApi::new(2, &[1, 2]);
    let loader = loader(&api, config(2, 50));

    assert!(loader.get_random(4).await.is_empty());
    assert!(loader.get_random(0).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_find_by_name_lowercases() {
    let api = FakeApi::new(10, &[]);
    let loader = loader(&api, config(10, 50));

    let item = loader.find_by_name(" MON3 ").await.unwrap();
    assert_eq!(item.id(), 3);
    assert_eq!(item.name(), "mon3");
    assert!(api
        .requests
        .lock()
        .unwrap()
        .contains(&format!("{BASE}/pokemon/mon3")));
}

#[tokio::test(start_paused = true)]
async fn test_localized_names_when_enabled() {
    let api = FakeApi::new(3, &[]);
    let loader = loader(
        &api,
        CatalogConfig {
            localized_names: true,
            ..config(3, 50)
        },
    );

    let items = loader.load_all().await;
    assert_eq!(items[0].japanese_name(), Some("モン1"));
    assert_eq!(items[2].display_name(), "モン3");
}

#[tokio::test(start_paused = true)]
async fn test_get_by_id_uses_cache() {
    let api = FakeApi::new(3, &[]);
    let loader = loader(&api, config(3, 50));

    let a = loader.get_by_id(2).await.unwrap();
    let b = loader.get_by_id(2).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(api.request_count(), 1);
    assert_eq!(a.types(), ["water"]);
}
