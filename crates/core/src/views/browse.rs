//! Movies and search screens: free-text query, discovery filters and paging.

use tracing::{debug, warn};

use super::tracker::{RequestTicket, RequestTracker};
use super::{clamp_page, LoadStatus};
use crate::catalog::{
    CatalogError, DiscoverQuery, Movie, MovieCatalog, MoviesPage, SortKey, MAX_PAGES,
};

/// Discovery filters. Every field is independently resettable to unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub sort_by: Option<SortKey>,
    pub year: Option<u32>,
    pub genre: Option<u32>,
    /// Minimum average vote in whole stars.
    pub min_rating: Option<u8>,
}

impl FilterState {
    /// Build filters from raw form values.
    ///
    /// `""` and `"all"` mean unset, and so does anything that fails to parse.
    pub fn from_form_values(sort_by: &str, year: &str, genre: &str, min_rating: &str) -> Self {
        Self {
            sort_by: form_value(sort_by).and_then(|v| v.parse().ok()),
            year: form_value(year).and_then(|v| v.parse().ok()),
            genre: form_value(genre).and_then(|v| v.parse().ok()),
            min_rating: form_value(min_rating).and_then(|v| v.parse().ok()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Discover parameters for the given page.
    pub fn to_query(&self, page: u32) -> DiscoverQuery {
        DiscoverQuery {
            page,
            sort_by: self.sort_by,
            year: self.year,
            min_rating: self.min_rating,
            genres: self.genre.into_iter().collect(),
        }
    }
}

fn form_value(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value)
    }
}

/// The catalog call that produces a browse screen's results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultsQuery {
    Search { query: String, page: u32 },
    Discover(DiscoverQuery),
}

impl ResultsQuery {
    pub fn page(&self) -> u32 {
        match self {
            ResultsQuery::Search { page, .. } => *page,
            ResultsQuery::Discover(query) => query.page,
        }
    }

    /// Run the call against a catalog.
    pub async fn run(&self, catalog: &dyn MovieCatalog) -> Result<MoviesPage, CatalogError> {
        match self {
            ResultsQuery::Search { query, page } => catalog.search(query, *page).await,
            ResultsQuery::Discover(query) => catalog.discover(query).await,
        }
    }
}

/// State of the movies screen (and the search screen, which is the same
/// screen entered with an initial query).
///
/// A non-empty query always wins over filters for the results call. Filters
/// stay settable while a query is active, but changing one clears the query.
/// Any query or filter change puts the cursor back on page 1.
#[derive(Debug)]
pub struct BrowseScreen {
    query: String,
    filters: FilterState,
    page: u32,
    total_pages: Option<u32>,
    total_results: u32,
    results: Vec<Movie>,
    status: LoadStatus,
    tracker: RequestTracker,
}

impl Default for BrowseScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseScreen {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            filters: FilterState::default(),
            page: 1,
            total_pages: None,
            total_results: 0,
            results: Vec::new(),
            status: LoadStatus::Idle,
            tracker: RequestTracker::new("browse"),
        }
    }

    /// Screen opened with a query, as from `/search?q=`.
    pub fn with_query(query: impl Into<String>) -> Self {
        let mut screen = Self::new();
        screen.query = query.into();
        screen
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Pages the pager may offer, once known.
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

    /// Whether results currently come from search rather than discovery.
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Replace the free-text query. A change resets the cursor.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.reset_cursor();
    }

    /// Replace all filters. A change clears the query and resets the cursor.
    pub fn set_filters(&mut self, filters: FilterState) {
        if filters == self.filters {
            return;
        }
        debug!("Browse filters changed to {:?}", filters);
        self.filters = filters;
        self.query.clear();
        self.reset_cursor();
    }

    pub fn set_sort(&mut self, sort_by: Option<SortKey>) {
        self.set_filters(FilterState {
            sort_by,
            ..self.filters.clone()
        });
    }

    pub fn set_year(&mut self, year: Option<u32>) {
        self.set_filters(FilterState {
            year,
            ..self.filters.clone()
        });
    }

    pub fn set_genre(&mut self, genre: Option<u32>) {
        self.set_filters(FilterState {
            genre,
            ..self.filters.clone()
        });
    }

    pub fn set_min_rating(&mut self, min_rating: Option<u8>) {
        self.set_filters(FilterState {
            min_rating,
            ..self.filters.clone()
        });
    }

    /// Reset every filter to unset.
    pub fn clear_filters(&mut self) {
        self.set_filters(FilterState::default());
    }

    /// Move the cursor. Query and filters are left alone.
    pub fn set_page(&mut self, page: u32) {
        self.page = clamp_page(page, self.total_pages);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    fn reset_cursor(&mut self) {
        self.page = 1;
        self.total_pages = None;
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// The call that the current state maps to.
    pub fn results_query(&self) -> ResultsQuery {
        let query = self.query.trim();
        if query.is_empty() {
            ResultsQuery::Discover(self.filters.to_query(self.page))
        } else {
            ResultsQuery::Search {
                query: query.to_string(),
                page: self.page,
            }
        }
    }

    /// Issue a request for the current state.
    pub fn begin_load(&mut self) -> RequestTicket<ResultsQuery> {
        self.status = LoadStatus::Loading;
        self.tracker.issue(self.results_query())
    }

    /// Apply a response. Returns false when it was superseded and dropped.
    pub fn complete_load(
        &mut self,
        ticket: RequestTicket<ResultsQuery>,
        result: Result<MoviesPage, CatalogError>,
    ) -> bool {
        if !self.tracker.accept(&ticket, &self.results_query()) {
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
                warn!("Browse request {:?} failed: {}", ticket.key(), e);
                self.total_pages = None;
                self.total_results = 0;
                self.results.clear();
                self.status = LoadStatus::Failed;
            }
        }
        true
    }

    /// Load results for the current state.
    ///
    /// When the response shows the cursor was past the last page, the
    /// cursor is clamped and the last page is loaded instead.
    pub async fn refresh(&mut self, catalog: &dyn MovieCatalog) -> bool {
        let requested = self.page;
        let ticket = self.begin_load();
        let result = ticket.key().run(catalog).await;
        let applied = self.complete_load(ticket, result);
        if !applied || self.page == requested {
            return applied;
        }

        debug!("Browse page {} out of range, loading page {}", requested, self.page);
        let ticket = self.begin_load();
        let result = ticket.key().run(catalog).await;
        self.complete_load(ticket, result)
    }
}
