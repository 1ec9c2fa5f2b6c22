//! Genres screen: one card per genre with a preview of its top movie.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use super::genre_hints::{GenreIcon, GenreTint};
use super::LoadStatus;
use crate::catalog::{DiscoverQuery, Genre, ImageSize, ImageUrls, MovieCatalog, SortKey};

/// A genre card.
///
/// `backdrop_url` and `total_results` stay unset when the genre's preview
/// request failed; the card still links to the genre screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCard {
    pub genre_id: u32,
    pub name: String,
    pub icon: GenreIcon,
    pub tint: GenreTint,
    pub path: String,
    /// Backdrop of the most popular movie in the genre, at w780.
    pub backdrop_url: Option<String>,
    pub total_results: Option<u32>,
}

impl GenreCard {
    fn new(genre: &Genre) -> Self {
        Self {
            genre_id: genre.id,
            name: genre.name.clone(),
            icon: GenreIcon::for_genre(genre.id),
            tint: GenreTint::for_genre(genre.id),
            path: format!("/genre/{}", genre.id),
            backdrop_url: None,
            total_results: None,
        }
    }
}

/// Every genre in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenresOverview {
    pub cards: Vec<GenreCard>,
    pub status: LoadStatus,
}

impl GenresOverview {
    /// Fetch the genre list, then the first popular page of every genre
    /// concurrently.
    ///
    /// A failed genre list leaves the screen empty and `Failed`. A failed
    /// preview only leaves its own card without a backdrop or count.
    pub async fn load(catalog: &dyn MovieCatalog, images: &ImageUrls) -> Self {
        let genres = match catalog.genres().await {
            Ok(genres) => genres,
            Err(e) => {
                warn!("Genres overview failed to load genres: {}", e);
                return Self {
                    cards: Vec::new(),
                    status: LoadStatus::Failed,
                };
            }
        };

        let previews = genres.iter().map(|genre| {
            let query = DiscoverQuery::new()
                .with_sort(SortKey::PopularityDesc)
                .with_genre(genre.id);
            async move { catalog.discover(&query).await }
        });
        let results = join_all(previews).await;
        debug!("Loaded {} genre previews", results.len());

        let cards = genres
            .iter()
            .zip(results)
            .map(|(genre, result)| {
                let mut card = GenreCard::new(genre);
                match result {
                    Ok(page) => {
                        card.backdrop_url = page
                            .results
                            .first()
                            .and_then(|m| m.backdrop_path.as_deref())
                            .map(|path| images.url(Some(path), ImageSize::W780));
                        card.total_results = Some(page.total_results);
                    }
                    Err(e) => warn!("Preview for genre {} failed: {}", genre.id, e),
                }
                card
            })
            .collect();

        Self {
            cards,
            status: LoadStatus::Ready,
        }
    }
}
