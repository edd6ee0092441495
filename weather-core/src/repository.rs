//! Orchestrates remote lookups, local history and unit conversion, and
//! reports progress as a stream of [`DataState`] values.

use anyhow::Context;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    converter::TemperatureConverter,
    local::{JsonFileLocalDataSource, LocalDataSource},
    model::{CityWeather, CityWeatherRecord},
    remote::{
        OpenWeatherRemoteDataSource, RemoteDataSource, RemoteDataSourceError,
        UnconfiguredRemoteDataSource,
    },
    state::{DataState, FailureReason, StateStream, state_channel},
};

/// What the presentation layer depends on.
pub trait WeatherRepository: Send + Sync {
    /// Current weather for `city_name`. The name is passed through unvalidated.
    fn fetch_weather_by_city(&self, city_name: &str) -> StateStream<CityWeather>;

    /// The most recent lookups, newest first.
    fn fetch_weather_history(&self) -> StateStream<Vec<CityWeather>>;
}

/// [`WeatherRepository`] over injected remote, local and converter collaborators.
///
/// Every operation runs on its own Tokio task, so the stream-returning methods
/// must be called from within a runtime.
#[derive(Clone)]
pub struct CityWeatherRepository {
    remote: Arc<dyn RemoteDataSource>,
    local: Arc<dyn LocalDataSource>,
    converter: Arc<dyn TemperatureConverter>,
}

impl CityWeatherRepository {
    pub fn new(
        remote: Arc<dyn RemoteDataSource>,
        local: Arc<dyn LocalDataSource>,
        converter: Arc<dyn TemperatureConverter>,
    ) -> Self {
        Self { remote, local, converter }
    }

    async fn load_city(&self, city_name: &str) -> DataState<CityWeather> {
        match self.remote.find_weather_by_city(city_name).await {
            Ok(raw) => {
                let record = CityWeatherRecord::from(&raw);
                // Best-effort cache write: the lookup itself already succeeded.
                match self.local.add_city_weather(record).await {
                    Ok(()) => info!(city = %raw.name, "stored lookup in history"),
                    Err(e) => warn!(city = %raw.name, error = %e, "could not store lookup in history"),
                }
                DataState::Success(self.convert_temperature(CityWeather::from(raw)))
            }
            Err(err) => {
                debug!(city = city_name, error = %err, "weather lookup failed");
                DataState::Failure(FailureReason::from(&err))
            }
        }
    }

    async fn load_history(&self) -> DataState<Vec<CityWeather>> {
        match self.local.last_five_cities_searched().await {
            Ok(records) => DataState::Success(
                records
                    .into_iter()
                    .map(|record| self.convert_temperature(CityWeather::from(record)))
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, "could not read lookup history");
                DataState::Failure(FailureReason::GenericError)
            }
        }
    }

    fn convert_temperature(&self, mut weather: CityWeather) -> CityWeather {
        weather.temperature = self.converter.convert(weather.temperature);
        weather.feels_like = self.converter.convert(weather.feels_like);
        weather
    }
}

impl std::fmt::Debug for CityWeatherRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityWeatherRepository")
            .field("unit", &self.converter.unit())
            .finish_non_exhaustive()
    }
}

impl WeatherRepository for CityWeatherRepository {
    fn fetch_weather_by_city(&self, city_name: &str) -> StateStream<CityWeather> {
        let (emitter, stream) = state_channel();
        let this = self.clone();
        let city_name = city_name.to_owned();

        tokio::spawn(async move {
            if !emitter.emit(DataState::Loading).await {
                return;
            }
            let state = this.load_city(&city_name).await;
            emitter.emit(state).await;
        });

        stream
    }

    fn fetch_weather_history(&self) -> StateStream<Vec<CityWeather>> {
        let (emitter, stream) = state_channel();
        let this = self.clone();

        tokio::spawn(async move {
            if !emitter.emit(DataState::Loading).await {
                return;
            }
            let state = this.load_history().await;
            emitter.emit(state).await;
        });

        stream
    }
}

impl From<&RemoteDataSourceError> for FailureReason {
    fn from(err: &RemoteDataSourceError) -> Self {
        match err {
            RemoteDataSourceError::NotFound(message) => FailureReason::ServerError(message.clone()),
            RemoteDataSourceError::Unauthorized | RemoteDataSourceError::NetworkError => {
                FailureReason::NetworkIssue
            }
            RemoteDataSourceError::Http { .. }
            | RemoteDataSourceError::Decode(_)
            | RemoteDataSourceError::InvalidRequest(_) => FailureReason::GenericError,
        }
    }
}

impl CityWeatherRepository {
    /// Wire the OpenWeather source, the history file and the configured unit.
    ///
    /// Without an API key the remote side is left unconfigured: history still
    /// works, and lookups fail with [`FailureReason::NetworkIssue`]. Callers
    /// that need lookups should check [`Config::api_key`] first for a
    /// friendlier error.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::from_config_with_key(config, config.api_key().ok())
    }

    pub(crate) fn from_config_with_key(
        config: &Config,
        api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let remote: Arc<dyn RemoteDataSource> = match api_key {
            Some(api_key) => {
                let endpoint = Url::parse(&config.endpoint)
                    .with_context(|| format!("Invalid weather endpoint URL: {}", config.endpoint))?;
                let source =
                    OpenWeatherRemoteDataSource::authenticated(api_key, endpoint, config.timeout())
                        .context("Failed to build HTTP client")?;
                Arc::new(source)
            }
            None => Arc::new(UnconfiguredRemoteDataSource),
        };
        let local = JsonFileLocalDataSource::new(config.history_file_path()?);

        Ok(Self::new(remote, Arc::new(local), config.unit.converter()))
    }
}
