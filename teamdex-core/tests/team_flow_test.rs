//! End-to-end flow: load the catalog, filter it, build a team and export it

mod common;

use common::{fixture_loader, init_test_logging, FixtureApi};
use pretty_assertions::assert_eq;
use teamdex_core::config::ShareConfig;
use teamdex_core::share::{
    compose_share_text, Composition, DisplayOptions, ExportPipeline, ExportStatus, IntentOutcome,
    Layout, RenderChain, SocialPlatform,
};
use teamdex_core::store::PersistedSelection;
use teamdex_core::{apply_filters, AddOutcome, FilterState, SelectionStore};

#[tokio::test(start_paused = true)]
async fn test_load_filter_select_export() {
    init_test_logging();
    let api = FixtureApi::new();
    let loader = fixture_loader(&api, 30, true);

    let catalog = loader.load_all().await;
    let ids: Vec<u32> = catalog.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![1, 4, 7, 25]);
    assert_eq!(loader.gaps().len(), 26);
    assert_eq!(catalog[0].japanese_name(), Some("フシギダネ"));

    let mut store = SelectionStore::new();
    store.set_selected_type(Some("grass".to_string()));
    let grass = apply_filters(&catalog, store.filters());
    assert_eq!(grass.len(), 1);

    for item in grass {
        assert_eq!(store.add(item.clone()), AddOutcome::Added);
    }
    store.clear_filters();
    for item in apply_filters(&catalog, store.filters()) {
        store.add(item.clone());
    }
    let ids: Vec<u32> = store.selection().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![1, 4, 7, 25]);

    let text = compose_share_text(&store.selected_names());
    assert!(text.contains("1. フシギダネ"));
    assert!(text.contains("4. ピカチュウ"));

    let composition = Composition::from_selection(
        store.selection(),
        store.theme(),
        DisplayOptions {
            layout: Layout::Horizontal,
            ..Default::default()
        },
    );
    assert_eq!(composition.card_count(), 4);

    // Sprites are not served by the fixture API, so the flat renderer wins
    let chain = RenderChain::standard(loader.cache().transport(), 2);
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("team.png");
    let mut pipeline = ExportPipeline::new(chain, ShareConfig::default());

    pipeline.download(&composition, Some(&path)).await.unwrap();
    let (width, height) = composition.measure();
    let image = pipeline.last_image().unwrap();
    assert_eq!((image.width(), image.height()), (width * 2, height * 2));
    assert_eq!(std::fs::read(&path).unwrap(), image.bytes());
    assert!(matches!(pipeline.status(), ExportStatus::Succeeded(_)));

    match pipeline.open_social_intent(SocialPlatform::X, &text).unwrap() {
        IntentOutcome::Prepared(url) => {
            assert!(url.starts_with("https://x.com/intent/post?text="));
            assert!(url.ends_with("&hashtags=%E3%83%9D%E3%82%B1%E3%83%A2%E3%83%B3%2C%E5%A5%BD%E3%81%8D%E3%81%AA%E3%83%9D%E3%82%B1%E3%83%A2%E3%83%B3%2CPokemon"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_generation_filter_across_bands() {
    init_test_logging();
    let api = FixtureApi::new();
    let loader = fixture_loader(&api, 0, false);

    let mut items = Vec::new();
    for id in [1, 152, 387, 906] {
        items.push(loader.get_by_id(id).await.unwrap());
    }
    let generations: Vec<u8> = items.iter().map(|i| i.generation()).collect();
    assert_eq!(generations, vec![1, 2, 4, 9]);

    let filters = FilterState {
        selected_generation: Some(4),
        ..Default::default()
    };
    let filtered = apply_filters(&items, &filters);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name(), "turtwig");
    assert_eq!(filtered[0].image_url(), "https://artwork.test/387.png");
}

#[tokio::test(start_paused = true)]
async fn test_session_snapshot_round_trip() {
    init_test_logging();
    let api = FixtureApi::new();
    let loader = fixture_loader(&api, 0, false);

    let mut store = SelectionStore::new();
    for name in ["pikachu", "eevee", "Charmander"] {
        store.add(loader.find_by_name(name).await.unwrap());
    }
    store.reorder(2, 0);

    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    std::fs::write(&path, store.snapshot().to_json().unwrap()).unwrap();

    let restored = SelectionStore::from_snapshot(
        PersistedSelection::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap(),
    );
    assert_eq!(restored.selection(), store.selection());
    assert_eq!(restored.selected_names(), vec!["Charmander", "Pikachu", "Eevee"]);
}

#[tokio::test(start_paused = true)]
async fn test_random_team_is_valid() {
    init_test_logging();
    let api = FixtureApi::new();
    let loader = fixture_loader(&api, 30, false);

    let mut store = SelectionStore::new();
    store.set_random(loader.get_random(6).await);

    assert!(store.count() <= 6);
    let mut ids: Vec<u32> = store.selection().iter().map(|s| s.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.count());
    assert!(ids.iter().all(|id| [1, 4, 7, 25].contains(id)));
}
