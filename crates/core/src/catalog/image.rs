//! Image URL construction for catalog posters, backdrops and profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::default_image_base_url;

/// Size tokens served by the TMDB image host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    W200,
    W300,
    #[default]
    W500,
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds fully qualified image URLs against one image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base_url: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(default_image_base_url())
    }
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL for `path` at `size`.
    ///
    /// Returns an empty string when the path is absent or empty; callers
    /// treat that as "no image available".
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path {
            Some(path) if !path.is_empty() => {
                format!("{}/{}{}", self.base_url, size.as_str(), path)
            }
            _ => String::new(),
        }
    }
}

/// [`ImageUrls::url`] against the default TMDB image host.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    ImageUrls::default().url(path, size)
}
