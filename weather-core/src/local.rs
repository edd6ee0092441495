use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::CityWeatherRecord;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileLocalDataSource;
pub use memory::InMemoryLocalDataSource;

/// Number of lookups returned as search history.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum LocalDataSourceError {
    #[error("Failed to access history file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode or decode history file '{0}'")]
    Serialization(PathBuf, #[source] serde_json::Error),
}

/// Local store of recent lookups.
///
/// Implementations serialize their own concurrent access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalDataSource: Send + Sync {
    async fn add_city_weather(&self, record: CityWeatherRecord) -> Result<(), LocalDataSourceError>;

    /// Up to [`HISTORY_LIMIT`] records, most recent first.
    async fn last_five_cities_searched(&self) -> Result<Vec<CityWeatherRecord>, LocalDataSourceError>;
}
