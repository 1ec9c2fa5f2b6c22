//! Wiring of configuration into the catalog client and watch store.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::catalog::{CatalogError, ImageUrls, MovieCatalog, TmdbClient};
use crate::config::{validate_config, Config, ConfigError, PlaybackConfig, SanitizedConfig};
use crate::storage::{create_storage, KeyValueStore, StorageError};
use crate::watch::WatchStore;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Shared application state handed to every screen.
#[derive(Clone)]
pub struct AppContext {
    config: Config,
    catalog: Arc<dyn MovieCatalog>,
    store: WatchStore,
    images: ImageUrls,
}

impl AppContext {
    /// Validate the config, then build the TMDB client and the configured
    /// storage backend.
    pub fn from_config(config: Config) -> Result<Self, ContextError> {
        validate_config(&config)?;
        let images = ImageUrls::new(config.catalog.image_base_url.clone());
        let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::new(config.catalog.clone())?);
        let storage = create_storage(&config.storage)?;

        info!("Initialized with {:?} storage", config.storage.backend);

        Ok(Self::new(config, catalog, storage, images))
    }

    /// Assemble from parts, e.g. a mock catalog in tests.
    pub fn new(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        storage: Arc<dyn KeyValueStore>,
        images: ImageUrls,
    ) -> Self {
        Self {
            config,
            catalog,
            store: WatchStore::new(storage),
            images,
        }
    }

    pub fn catalog(&self) -> &dyn MovieCatalog {
        self.catalog.as_ref()
    }

    pub fn store(&self) -> &WatchStore {
        &self.store
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    pub fn playback(&self) -> &PlaybackConfig {
        &self.config.playback
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
