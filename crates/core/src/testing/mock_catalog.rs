//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use crate::catalog::{
    CatalogError, DiscoverQuery, Genre, MovieCatalog, MovieCategory, MovieDetails, MoviesPage,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    ListByCategory { category: MovieCategory, page: u32 },
    Discover(DiscoverQuery),
    Search { query: String, page: u32 },
    Genres,
    MovieDetails { movie_id: u32 },
    Similar { movie_id: u32 },
}

/// Releases a request held by [`MockCatalog::hold_next`].
#[derive(Debug, Clone)]
pub struct RequestGate {
    notify: Arc<Notify>,
}

impl RequestGate {
    /// Let the held request complete. Releasing before the request
    /// reaches the gate is fine; it then passes straight through.
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable pages, genres and details
/// - Track queries for assertions
/// - Return or fail a discover page per genre
/// - Simulate failures, once or per category
/// - Hold a request until the test releases it
///
/// Pages are returned with `page` set to the requested page. Anything not
/// configured comes back as an empty page, and unknown details are
/// `NotFound`.
///
/// # Example
///
/// ```rust,ignore
/// use bloxwave_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.add_details(fixtures::movie_details(603, "The Matrix")).await;
///
/// let details = catalog.movie_details(603).await?;
/// assert_eq!(details.movie.title, "The Matrix");
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    /// Pages by category.
    categories: Arc<RwLock<HashMap<MovieCategory, MoviesPage>>>,
    /// Categories that always fail.
    failing_categories: Arc<RwLock<HashSet<MovieCategory>>>,
    /// Discover pages by genre, used when the query's first genre matches.
    genre_pages: Arc<RwLock<HashMap<u32, MoviesPage>>>,
    /// Genres whose discover requests always fail.
    failing_genres: Arc<RwLock<HashSet<u32>>>,
    /// Page returned by discover.
    discover_page: Arc<RwLock<MoviesPage>>,
    /// Page returned by search.
    search_page: Arc<RwLock<MoviesPage>>,
    /// Genre list.
    genres: Arc<RwLock<Vec<Genre>>>,
    /// Details by movie ID.
    details: Arc<RwLock<HashMap<u32, MovieDetails>>>,
    /// Similar pages by movie ID.
    similar: Arc<RwLock<HashMap<u32, MoviesPage>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, the next operation waits on this gate.
    held: Arc<RwLock<Option<Arc<Notify>>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
            failing_categories: Arc::new(RwLock::new(HashSet::new())),
            genre_pages: Arc::new(RwLock::new(HashMap::new())),
            failing_genres: Arc::new(RwLock::new(HashSet::new())),
            discover_page: Arc::new(RwLock::new(MoviesPage::default())),
            search_page: Arc::new(RwLock::new(MoviesPage::default())),
            genres: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            similar: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            held: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the page returned for a category.
    pub async fn set_category(&self, category: MovieCategory, page: MoviesPage) {
        self.categories.write().await.insert(category, page);
    }

    /// Make every request for a category fail.
    pub async fn fail_category(&self, category: MovieCategory) {
        self.failing_categories.write().await.insert(category);
    }

    /// Set the page returned by discover.
    pub async fn set_discover_page(&self, page: MoviesPage) {
        *self.discover_page.write().await = page;
    }

    /// Set the discover page returned for a genre filter.
    pub async fn set_genre_page(&self, genre_id: u32, page: MoviesPage) {
        self.genre_pages.write().await.insert(genre_id, page);
    }

    /// Make every discover request filtered by this genre fail.
    pub async fn fail_genre(&self, genre_id: u32) {
        self.failing_genres.write().await.insert(genre_id);
    }

    /// Set the page returned by search.
    pub async fn set_search_page(&self, page: MoviesPage) {
        *self.search_page.write().await = page;
    }

    /// Set the genre list.
    pub async fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.write().await = genres;
    }

    /// Add movie details.
    pub async fn add_details(&self, details: MovieDetails) {
        self.details.write().await.insert(details.movie.id, details);
    }

    /// Set the similar page for a movie.
    pub async fn set_similar(&self, movie_id: u32, page: MoviesPage) {
        self.similar.write().await.insert(movie_id, page);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection and Holding
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Make the next operation wait until the returned gate is released.
    ///
    /// The query is recorded before the operation starts waiting.
    pub async fn hold_next(&self) -> RequestGate {
        let notify = Arc::new(Notify::new());
        *self.held.write().await = Some(Arc::clone(&notify));
        RequestGate { notify }
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query, then wait on the gate if one is armed.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
        let gate = self.held.write().await.take();
        if let Some(notify) = gate {
            notify.notified().await;
        }
    }

    fn for_page(mut page: MoviesPage, requested: u32) -> MoviesPage {
        page.page = requested;
        page
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn list_by_category(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> Result<MoviesPage, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::ListByCategory { category, page })
            .await;

        if self.failing_categories.read().await.contains(&category) {
            return Err(CatalogError::Api {
                status: 500,
                message: format!("{} unavailable", category.as_str()),
            });
        }

        let configured = self
            .categories
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_default();
        Ok(Self::for_page(configured, page))
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviesPage, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Discover(query.clone()))
            .await;

        let failing = self.failing_genres.read().await;
        if let Some(genre_id) = query.genres.iter().find(|id| failing.contains(*id)) {
            return Err(CatalogError::Api {
                status: 500,
                message: format!("genre {} unavailable", genre_id),
            });
        }
        drop(failing);

        let by_genre = match query.genres.first() {
            Some(genre_id) => self.genre_pages.read().await.get(genre_id).cloned(),
            None => None,
        };
        let configured = match by_genre {
            Some(page) => page,
            None => self.discover_page.read().await.clone(),
        };
        Ok(Self::for_page(configured, query.page))
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
            page,
        })
        .await;

        let configured = self.search_page.read().await.clone();
        Ok(Self::for_page(configured, page))
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Genres).await;

        Ok(self.genres.read().await.clone())
    }

    async fn movie_details(&self, movie_id: u32) -> Result<MovieDetails, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::MovieDetails { movie_id })
            .await;

        self.details
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Movie {} not found", movie_id)))
    }

    async fn similar(&self, movie_id: u32) -> Result<MoviesPage, CatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Similar { movie_id }).await;

        Ok(self
            .similar
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }
}
