use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::{HISTORY_LIMIT, LocalDataSource, LocalDataSourceError};
use crate::model::CityWeatherRecord;

/// Process-local history, newest record at the front.
#[derive(Debug)]
pub struct InMemoryLocalDataSource {
    records: Mutex<VecDeque<CityWeatherRecord>>,
    capacity: usize,
}

impl InMemoryLocalDataSource {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_LIMIT)
    }

    /// Keep at most `capacity` records; never fewer than [`HISTORY_LIMIT`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(HISTORY_LIMIT);
        Self { records: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }
}

impl Default for InMemoryLocalDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalDataSource for InMemoryLocalDataSource {
    async fn add_city_weather(&self, record: CityWeatherRecord) -> Result<(), LocalDataSourceError> {
        let mut records = self.records.lock().await;
        records.push_front(record);
        records.truncate(self.capacity);
        Ok(())
    }

    async fn last_five_cities_searched(
        &self,
    ) -> Result<Vec<CityWeatherRecord>, LocalDataSourceError> {
        let records = self.records.lock().await;
        Ok(records.iter().take(HISTORY_LIMIT).cloned().collect())
    }
}
