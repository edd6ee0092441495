use async_trait::async_trait;
use thiserror::Error;

use crate::model::RemoteCityWeather;

pub mod auth;
pub mod openweather;

pub use auth::{AuthInterceptor, RequestInterceptor};
pub use openweather::OpenWeatherRemoteDataSource;

/// Raw failure classification at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteDataSourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("The weather service rejected the API key")]
    Unauthorized,

    #[error("Could not reach the weather service")]
    NetworkError,

    #[error("Weather service responded with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode weather payload: {0}")]
    Decode(String),

    #[error("Failed to build weather request: {0}")]
    InvalidRequest(String),
}

pub type RemoteDataSourceResult = Result<RemoteCityWeather, RemoteDataSourceError>;

/// Source of current weather observations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    async fn find_weather_by_city(&self, city_name: &str) -> RemoteDataSourceResult;
}

/// Stand-in used when no API key is configured, so local history stays
/// reachable. Every lookup is rejected as [`RemoteDataSourceError::Unauthorized`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRemoteDataSource;

#[async_trait]
impl RemoteDataSource for UnconfiguredRemoteDataSource {
    async fn find_weather_by_city(&self, city_name: &str) -> RemoteDataSourceResult {
        tracing::warn!(city = city_name, "no API key configured, skipping remote lookup");
        Err(RemoteDataSourceError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_source_rejects_lookups() {
        let err = UnconfiguredRemoteDataSource.find_weather_by_city("Paris").await.unwrap_err();
        assert_eq!(err, RemoteDataSourceError::Unauthorized);
    }
}
