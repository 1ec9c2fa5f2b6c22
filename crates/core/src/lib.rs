pub mod catalog;
pub mod config;
pub mod context;
pub mod metrics;
pub mod storage;
pub mod testing;
pub mod views;
pub mod watch;

pub use catalog::{
    image_url, CatalogError, DiscoverQuery, Genre, ImageSize, ImageUrls, Movie, MovieCatalog,
    MovieCategory, MovieDetails, MoviesPage, SortKey, TmdbClient,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    StorageBackend,
};
pub use context::{AppContext, ContextError};
pub use storage::{create_storage, KeyValueStore, MemoryStorage, SqliteStorage, StorageError};
pub use views::{
    BrowseScreen, DetailOutcome, FilterState, GenreScreen, GenresOverview, HomeFeed, LoadStatus,
    ProfileScreen, Route,
};
pub use watch::{
    NewWatchlistEntry, PlaybackSession, ProgressRecord, WatchStore, WatchStoreError,
    WatchlistEntry,
};
