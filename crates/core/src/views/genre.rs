//! Single-genre discovery screen.

use tracing::warn;

use super::tracker::{RequestTicket, RequestTracker};
use super::{clamp_page, LoadStatus};
use crate::catalog::{
    CatalogError, DiscoverQuery, Genre, Movie, MovieCatalog, MoviesPage, SortKey, MAX_PAGES,
};

/// Movies of one genre, most popular first.
#[derive(Debug)]
pub struct GenreScreen {
    genre_id: u32,
    genre_name: Option<String>,
    page: u32,
    total_pages: Option<u32>,
    total_results: u32,
    results: Vec<Movie>,
    status: LoadStatus,
    tracker: RequestTracker,
}

impl GenreScreen {
    pub fn new(genre_id: u32) -> Self {
        Self {
            genre_id,
            genre_name: None,
            page: 1,
            total_pages: None,
            total_results: 0,
            results: Vec::new(),
            status: LoadStatus::Idle,
            tracker: RequestTracker::new("genre"),
        }
    }

    pub fn genre_id(&self) -> u32 {
        self.genre_id
    }

    /// Genre name once resolved against the genre list.
    pub fn genre_name(&self) -> Option<&str> {
        self.genre_name.as_deref()
    }

    /// Heading for the screen, e.g. "Horror Movies".
    pub fn title(&self) -> String {
        format!("{} Movies", self.genre_name().unwrap_or("Genre"))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.total_pages.map(|t| t.min(MAX_PAGES))
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = clamp_page(page, self.total_pages);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Pick this screen's genre name out of a genre list.
    pub fn resolve_name(&mut self, genres: &[Genre]) {
        self.genre_name = genres
            .iter()
            .find(|g| g.id == self.genre_id)
            .map(|g| g.name.clone());
    }

    /// Fetch the genre list and resolve the name. A failure leaves it unset.
    pub async fn load_name(&mut self, catalog: &dyn MovieCatalog) {
        match catalog.genres().await {
            Ok(genres) => self.resolve_name(&genres),
            Err(e) => warn!("Failed to load genres for genre {}: {}", self.genre_id, e),
        }
    }

    pub fn discover_query(&self) -> DiscoverQuery {
        DiscoverQuery::new()
            .with_page(self.page)
            .with_sort(SortKey::PopularityDesc)
            .with_genre(self.genre_id)
    }

    pub fn begin_load(&mut self) -> RequestTicket<DiscoverQuery> {
        self.status = LoadStatus::Loading;
        self.tracker.issue(self.discover_query())
    }

    /// Apply a response. Returns false when it was superseded and dropped.
    pub fn complete_load(
        &mut self,
        ticket: RequestTicket<DiscoverQuery>,
        result: Result<MoviesPage, CatalogError>,
    ) -> bool {
        if !self.tracker.accept(&ticket, &self.discover_query()) {
            return false;
        }

        match result {
            Ok(page) => {
                self.total_pages = Some(page.total_pages);
                self.page = clamp_page(self.page, self.total_pages);
                self.total_results = page.total_results;
                self.results = page.results;
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                warn!("Genre {} page {} failed: {}", self.genre_id, self.page, e);
                self.total_results = 0;
                self.results.clear();
                self.status = LoadStatus::Failed;
            }
        }
        true
    }

    /// Load the current page, falling back to the last page when the cursor
    /// turns out to be past it. Genre id 0 issues no request.
    pub async fn refresh(&mut self, catalog: &dyn MovieCatalog) -> bool {
        if self.genre_id == 0 {
            return false;
        }
        let requested = self.page;
        let ticket = self.begin_load();
        let result = catalog.discover(ticket.key()).await;
        let applied = self.complete_load(ticket, result);
        if !applied || self.page == requested {
            return applied;
        }

        let ticket = self.begin_load();
        let result = catalog.discover(ticket.key()).await;
        self.complete_load(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockCatalog, RecordedCatalogQuery};

    #[tokio::test]
    async fn test_refresh_discovers_by_genre() {
        let catalog = MockCatalog::new();
        catalog
            .set_discover_page(fixtures::page(1, 640, fixtures::movies(1, 20)))
            .await;

        let mut screen = GenreScreen::new(27);
        assert!(screen.refresh(&catalog).await);
        assert_eq!(screen.page_count(), Some(MAX_PAGES));

        screen.set_page(3);
        screen.refresh(&catalog).await;

        let queries = catalog.recorded_queries().await;
        assert_eq!(
            queries[1],
            RecordedCatalogQuery::Discover(DiscoverQuery {
                page: 3,
                sort_by: Some(SortKey::PopularityDesc),
                year: None,
                min_rating: None,
                genres: vec![27],
            })
        );
    }

    #[tokio::test]
    async fn test_title_from_genre_list() {
        let catalog = MockCatalog::new();
        catalog.set_genres(fixtures::genres()).await;

        let mut screen = GenreScreen::new(27);
        assert_eq!(screen.title(), "Genre Movies");
        screen.load_name(&catalog).await;
        assert_eq!(screen.title(), "Horror Movies");

        let mut unknown = GenreScreen::new(1);
        unknown.load_name(&catalog).await;
        assert_eq!(unknown.genre_name(), None);
    }

    #[tokio::test]
    async fn test_zero_genre_issues_nothing() {
        let catalog = MockCatalog::new();
        let mut screen = GenreScreen::new(0);

        assert!(!screen.refresh(&catalog).await);
        assert_eq!(catalog.query_count().await, 0);
        assert_eq!(screen.status(), LoadStatus::Idle);
    }

    #[tokio::test]
    async fn test_cursor_pulled_back_to_last_page() {
        let catalog = MockCatalog::new();
        catalog
            .set_discover_page(fixtures::page(1, 2, fixtures::movies(1, 20)))
            .await;

        let mut screen = GenreScreen::new(99);
        screen.set_page(9);
        assert!(screen.refresh(&catalog).await);

        assert_eq!(screen.page(), 2);
        assert_eq!(catalog.query_count().await, 2);
        let queries = catalog.recorded_queries().await;
        let RecordedCatalogQuery::Discover(last) = &queries[1] else {
            panic!("expected a discover call");
        };
        assert_eq!(last.page, 2);
    }

    #[test]
    fn test_stale_page_dropped() {
        let mut screen = GenreScreen::new(35);
        let first = screen.begin_load();
        screen.next_page();
        let second = screen.begin_load();

        assert!(screen.complete_load(second, Ok(fixtures::page(2, 4, fixtures::movies(21, 20)))));
        assert!(!screen.complete_load(first, Err(CatalogError::RateLimitExceeded)));
        assert_eq!(screen.status(), LoadStatus::Ready);
    }
}
