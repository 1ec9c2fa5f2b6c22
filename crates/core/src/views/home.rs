//! Home feed: curated rows, genre quick links and continue-watching.

use tracing::warn;

use super::genre_hints::{genre_links, GenreLink};
use super::profile::ProgressCard;
use crate::catalog::{CatalogError, ImageUrls, Movie, MovieCatalog, MovieCategory, MoviesPage};
use crate::watch::WatchStore;

/// Everything the home screen renders.
///
/// Each section fails soft on its own: a failed call leaves that section
/// empty and the rest intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    /// Hero rotation, the head of the weekly trending list.
    pub hero: Vec<Movie>,
    pub trending: Vec<Movie>,
    pub now_playing: Vec<Movie>,
    pub popular: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub upcoming: Vec<Movie>,
    pub genre_links: Vec<GenreLink>,
    pub continue_watching: Vec<ProgressCard>,
}

impl HomeFeed {
    /// Items in the hero rotation.
    pub const HERO_SIZE: usize = 5;

    /// Issue every catalog call concurrently and assemble the feed.
    pub async fn load(catalog: &dyn MovieCatalog, store: &WatchStore, images: &ImageUrls) -> Self {
        let (trending, now_playing, popular, top_rated, upcoming, genres) = futures::join!(
            catalog.list_by_category(MovieCategory::TrendingWeek, 1),
            catalog.list_by_category(MovieCategory::NowPlaying, 1),
            catalog.list_by_category(MovieCategory::Popular, 1),
            catalog.list_by_category(MovieCategory::TopRated, 1),
            catalog.list_by_category(MovieCategory::Upcoming, 1),
            catalog.genres(),
        );

        let trending = section(MovieCategory::TrendingWeek, trending);
        let genres = genres.unwrap_or_else(|e| {
            warn!("Home feed genres failed: {}", e);
            Vec::new()
        });

        Self {
            hero: trending.iter().take(Self::HERO_SIZE).cloned().collect(),
            trending,
            now_playing: section(MovieCategory::NowPlaying, now_playing),
            popular: section(MovieCategory::Popular, popular),
            top_rated: section(MovieCategory::TopRated, top_rated),
            upcoming: section(MovieCategory::Upcoming, upcoming),
            genre_links: genre_links(&genres),
            continue_watching: store
                .continue_watching()
                .iter()
                .map(|r| ProgressCard::new(r, images))
                .collect(),
        }
    }
}

fn section(category: MovieCategory, result: Result<MoviesPage, CatalogError>) -> Vec<Movie> {
    match result {
        Ok(page) => page.results,
        Err(e) => {
            warn!("Home feed section {} failed: {}", category.as_str(), e);
            Vec::new()
        }
    }
}
