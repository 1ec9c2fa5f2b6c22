//! Screen state-transition integration tests.
//!
//! These tests drive the browse screen through query, filter and page
//! changes against the mock catalog, including responses that arrive out
//! of order, and walk the routes a user navigates through.

use std::sync::Arc;

use tokio_test::{assert_pending, assert_ready_ok, task};

use bloxwave_core::{
    catalog::{DiscoverQuery, ImageUrls, SortKey},
    config::PlaybackConfig,
    storage::MemoryStorage,
    testing::{fixtures, MockCatalog, RecordedCatalogQuery},
    views::{
        load_detail, toggle_watchlist, BrowseScreen, DetailOutcome, FilterState, GenreScreen,
        GenresOverview, HomeFeed, LoadStatus, ProfileScreen, ResultsQuery, Route,
    },
    watch::WatchStore,
};

async fn catalog_with_pages(total_pages: u32) -> MockCatalog {
    let catalog = MockCatalog::new();
    catalog
        .set_discover_page(fixtures::page(1, total_pages, fixtures::movies(1, 20)))
        .await;
    catalog
        .set_search_page(fixtures::page(1, 3, fixtures::movies(500, 20)))
        .await;
    catalog
}

#[tokio::test]
async fn test_year_filter_resets_cursor_and_keeps_default_sort() {
    let catalog = catalog_with_pages(40).await;
    let mut screen = BrowseScreen::new();

    screen.refresh(&catalog).await;
    screen.set_page(6);
    screen.refresh(&catalog).await;
    assert_eq!(screen.page(), 6);

    let filters = FilterState::from_form_values("", "1999", "all", "");
    screen.set_filters(filters);
    assert_eq!(screen.page(), 1);
    screen.refresh(&catalog).await;

    let queries = catalog.recorded_queries().await;
    let RecordedCatalogQuery::Discover(last) = queries.last().cloned().unwrap() else {
        panic!("expected a discover call");
    };
    assert_eq!(last.page, 1);
    assert_eq!(last.year, Some(1999));
    assert_eq!(last.effective_sort(), SortKey::PopularityDesc);
}

#[tokio::test]
async fn test_page_change_clamped_to_known_pages() {
    let catalog = catalog_with_pages(38_000).await;
    let mut screen = BrowseScreen::new();
    screen.refresh(&catalog).await;

    screen.set_page(501);
    assert_eq!(screen.page(), 500);
    screen.set_page(0);
    assert_eq!(screen.page(), 1);

    let small = catalog_with_pages(4).await;
    screen.refresh(&small).await;
    screen.set_page(9);
    assert_eq!(screen.page(), 4);
}

#[tokio::test]
async fn test_cursor_clamped_once_page_count_known() {
    let catalog = catalog_with_pages(3).await;
    let mut screen = BrowseScreen::new();

    screen.set_year(Some(1999));
    screen.set_page(7);
    assert_eq!(screen.page(), 7);
    assert!(screen.refresh(&catalog).await);

    assert_eq!(screen.page_count(), Some(3));
    assert_eq!(screen.page(), 3);
    assert_eq!(screen.status(), LoadStatus::Ready);

    let pages: Vec<u32> = catalog
        .recorded_queries()
        .await
        .into_iter()
        .filter_map(|q| match q {
            RecordedCatalogQuery::Discover(query) => Some(query.page),
            _ => None,
        })
        .collect();
    assert_eq!(pages, vec![7, 3]);
}

#[tokio::test]
async fn test_search_then_filter_returns_to_discover() {
    let catalog = catalog_with_pages(10).await;
    let mut screen = BrowseScreen::with_query("matrix");

    screen.refresh(&catalog).await;
    assert_eq!(screen.results()[0].id, 500);
    screen.next_page();
    assert_eq!(screen.page(), 2);

    screen.set_genre(Some(878));
    assert_eq!(screen.query(), "");
    screen.refresh(&catalog).await;

    assert_eq!(
        catalog.recorded_queries().await,
        vec![
            RecordedCatalogQuery::Search {
                query: "matrix".to_string(),
                page: 1
            },
            RecordedCatalogQuery::Discover(DiscoverQuery::new().with_genre(878)),
        ]
    );
}

#[tokio::test]
async fn test_held_response_arrives_after_newer_one() {
    let catalog = Arc::new(catalog_with_pages(10).await);
    let mut screen = BrowseScreen::new();

    // Page 1 is issued and stalls in flight.
    let gate = catalog.hold_next().await;
    let slow_ticket = screen.begin_load();
    let slow_query = slow_ticket.key().clone();
    let slow = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { slow_query.run(catalog.as_ref()).await })
    };
    while catalog.query_count().await == 0 {
        tokio::task::yield_now().await;
    }

    // The user pages forward and that request completes first.
    screen.set_page(2);
    let fast_ticket = screen.begin_load();
    let fast = fast_ticket.key().run(catalog.as_ref()).await;
    assert!(screen.complete_load(fast_ticket, fast));

    gate.release();
    let stale = slow.await.unwrap();
    assert!(!screen.complete_load(slow_ticket, stale));

    assert_eq!(screen.page(), 2);
    assert_eq!(screen.status(), LoadStatus::Ready);
}

#[test]
fn test_held_request_stays_pending_until_released() {
    let catalog = MockCatalog::new();
    let query = ResultsQuery::Discover(DiscoverQuery::new().with_year(1982));

    let gate = tokio_test::block_on(catalog.hold_next());
    let mut request = task::spawn(query.run(&catalog));

    assert_pending!(request.poll());
    gate.release();
    assert!(request.is_woken());
    let page = assert_ready_ok!(request.poll());
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn test_genre_screen_route() {
    let catalog = catalog_with_pages(3).await;
    catalog.set_genres(fixtures::genres()).await;

    let Route::Genre(genre_id) = Route::parse("/genre/878") else {
        panic!("expected genre route");
    };
    let mut screen = GenreScreen::new(genre_id);
    screen.load_name(&catalog).await;
    screen.refresh(&catalog).await;

    assert_eq!(screen.title(), "Science Fiction Movies");
    assert_eq!(screen.results().len(), 20);
}

#[tokio::test]
async fn test_genres_overview_links_to_genre_screen() {
    let catalog = catalog_with_pages(5).await;
    catalog.set_genres(fixtures::genres()).await;
    catalog.fail_genre(53).await;

    assert_eq!(Route::parse("/genres"), Route::Genres);
    let overview = GenresOverview::load(&catalog, &ImageUrls::default()).await;
    assert_eq!(overview.status, LoadStatus::Ready);
    assert_eq!(overview.cards.len(), 19);

    let thriller = overview.cards.iter().find(|c| c.genre_id == 53).unwrap();
    assert!(thriller.backdrop_url.is_none());
    assert!(overview
        .cards
        .iter()
        .filter(|c| c.genre_id != 53)
        .all(|c| c.total_results == Some(100)));

    let Route::Genre(genre_id) = Route::parse(&thriller.path) else {
        panic!("expected genre route");
    };
    let mut screen = GenreScreen::new(genre_id);
    screen.refresh(&catalog).await;
    assert_eq!(screen.status(), LoadStatus::Failed);
}

#[tokio::test]
async fn test_detail_watchlist_and_profile_round_trip() {
    let catalog = MockCatalog::new();
    catalog
        .add_details(fixtures::movie_details(603, "The Matrix"))
        .await;
    let store = WatchStore::new(Arc::new(MemoryStorage::new()));
    let images = ImageUrls::default();

    let Route::Movie(movie_id) = Route::parse("/movie/603") else {
        panic!("expected movie route");
    };
    let DetailOutcome::Found(mut view) = load_detail(&catalog, &store, movie_id).await else {
        panic!("expected details");
    };
    assert!(toggle_watchlist(&store, &mut view).unwrap());

    let config = PlaybackConfig {
        tick_interval_ms: 5,
        fallback_runtime_minutes: 120,
    };
    let session = view.play(&store, &config);
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
    session.stop().await;

    let profile = ProfileScreen::new(store.clone(), images.clone());
    assert_eq!(profile.watchlist().len(), 1);
    assert_eq!(profile.continue_watching().len(), 1);
    assert_eq!(profile.continue_watching()[0].path, "/movie/603");

    let feed = HomeFeed::load(&catalog, &store, &images).await;
    assert_eq!(feed.continue_watching.len(), 1);
    assert!(feed.trending.is_empty());
}

#[tokio::test]
async fn test_unknown_movie_route_is_not_found() {
    let catalog = MockCatalog::new();
    let store = WatchStore::new(Arc::new(MemoryStorage::new()));

    assert_eq!(Route::parse("/movie/the-matrix"), Route::NotFound);
    assert_eq!(load_detail(&catalog, &store, 9999).await, DetailOutcome::NotFound);
    assert_eq!(
        catalog.recorded_queries().await.len(),
        2,
        "details and similar are both requested"
    );
}
