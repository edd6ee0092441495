use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::{HISTORY_LIMIT, LocalDataSource, LocalDataSourceError};
use crate::model::CityWeatherRecord;

/// Records kept on disk; older lookups are dropped on write.
pub const HISTORY_CAPACITY: usize = 50;

/// History persisted as a JSON array, oldest record first.
#[derive(Debug)]
pub struct JsonFileLocalDataSource {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileLocalDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<CityWeatherRecord>, LocalDataSourceError> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LocalDataSourceError::Io(self.path.clone(), e)),
        };

        serde_json::from_slice(&contents)
            .map_err(|e| LocalDataSourceError::Serialization(self.path.clone(), e))
    }

    async fn write_all(&self, records: &[CityWeatherRecord]) -> Result<(), LocalDataSourceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LocalDataSourceError::Io(parent.to_path_buf(), e))?;
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| LocalDataSourceError::Serialization(self.path.clone(), e))?;

        fs::write(&self.path, json).await.map_err(|e| LocalDataSourceError::Io(self.path.clone(), e))
    }
}

#[async_trait]
impl LocalDataSource for JsonFileLocalDataSource {
    async fn add_city_weather(&self, record: CityWeatherRecord) -> Result<(), LocalDataSourceError> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        records.push(record);
        if records.len() > HISTORY_CAPACITY {
            records.drain(..records.len() - HISTORY_CAPACITY);
        }

        self.write_all(&records).await?;
        debug!(path = %self.path.display(), count = records.len(), "history file updated");
        Ok(())
    }

    async fn last_five_cities_searched(
        &self,
    ) -> Result<Vec<CityWeatherRecord>, LocalDataSourceError> {
        let _guard = self.lock.lock().await;

        let records = self.read_all().await?;
        Ok(records.into_iter().rev().take(HISTORY_LIMIT).collect())
    }
}
