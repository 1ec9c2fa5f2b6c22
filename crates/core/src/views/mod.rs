//! Per-screen composition of catalog calls and local watch state.
//!
//! Screens own their pagination, filter and query state. Catalog failures
//! never escape a screen: they become empty sections or a not-found outcome.

mod browse;
mod detail;
mod format;
mod genre;
mod genre_hints;
mod genre_overview;
mod home;
mod profile;
mod route;
mod tracker;

pub use browse::{BrowseScreen, FilterState, ResultsQuery};
pub use detail::{load_detail, toggle_watchlist, DetailOutcome, DetailView};
pub use format::{format_playback_position, format_watch_time, playback_status, watch_summary};
pub use genre::GenreScreen;
pub use genre_hints::{genre_links, GenreIcon, GenreLink, GenreTint, GENRE_LINK_LIMIT};
pub use genre_overview::{GenreCard, GenresOverview};
pub use home::HomeFeed;
pub use profile::{ProfileScreen, ProgressCard, WatchlistCard};
pub use route::Route;
pub use tracker::{RequestTicket, RequestTracker};

use crate::catalog::MAX_PAGES;

/// Loading state of a results slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last request failed; the slot renders as empty.
    Failed,
}

/// Clamp a requested page into `[1, min(total_pages, MAX_PAGES)]`.
///
/// Before the first response the page count is unknown and only the API
/// ceiling applies.
pub fn clamp_page(requested: u32, total_pages: Option<u32>) -> u32 {
    let last = total_pages.map_or(MAX_PAGES, |t| t.min(MAX_PAGES)).max(1);
    requested.clamp(1, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, Some(10)), 1);
        assert_eq!(clamp_page(7, Some(10)), 7);
        assert_eq!(clamp_page(11, Some(10)), 10);
        assert_eq!(clamp_page(900, Some(38_000)), MAX_PAGES);
        assert_eq!(clamp_page(900, None), MAX_PAGES);
        assert_eq!(clamp_page(3, Some(0)), 1);
    }
}
