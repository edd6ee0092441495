use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather snapshot for one city, as handed to the presentation layer.
///
/// Temperatures hold whatever unit the repository's converter produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub city_name: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observation_time: DateTime<Utc>,
}

/// Raw current-weather payload as returned by OpenWeather.
///
/// Temperatures are in Kelvin because no `units` parameter is sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCityWeather {
    pub name: String,
    pub dt: i64,
    pub main: RemoteMain,
    #[serde(default)]
    pub weather: Vec<RemoteCondition>,
    #[serde(default)]
    pub wind: RemoteWind,
    #[serde(default)]
    pub sys: RemoteSys,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCondition {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RemoteWind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RemoteSys {
    pub country: Option<String>,
}

impl RemoteCityWeather {
    fn condition(&self) -> String {
        self.weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn country(&self) -> String {
        self.sys.country.clone().unwrap_or_default()
    }

    fn observation_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.dt, 0).unwrap_or_else(Utc::now)
    }
}

/// A previously fetched lookup as kept by a local data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeatherRecord {
    pub city_name: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observation_time: DateTime<Utc>,
    pub searched_at: DateTime<Utc>,
}

impl From<&RemoteCityWeather> for CityWeatherRecord {
    fn from(raw: &RemoteCityWeather) -> Self {
        Self {
            city_name: raw.name.clone(),
            country: raw.country(),
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            condition: raw.condition(),
            humidity_pct: raw.main.humidity,
            wind_speed_mps: raw.wind.speed,
            observation_time: raw.observation_time(),
            searched_at: Utc::now(),
        }
    }
}

impl From<RemoteCityWeather> for CityWeather {
    fn from(raw: RemoteCityWeather) -> Self {
        let condition = raw.condition();
        let country = raw.country();
        let observation_time = raw.observation_time();

        Self {
            city_name: raw.name,
            country,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            condition,
            humidity_pct: raw.main.humidity,
            wind_speed_mps: raw.wind.speed,
            observation_time,
        }
    }
}

impl From<CityWeatherRecord> for CityWeather {
    fn from(record: CityWeatherRecord) -> Self {
        Self {
            city_name: record.city_name,
            country: record.country,
            temperature: record.temperature,
            feels_like: record.feels_like,
            condition: record.condition,
            humidity_pct: record.humidity_pct,
            wind_speed_mps: record.wind_speed_mps,
            observation_time: record.observation_time,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_remote(name: &str, kelvin: f64) -> RemoteCityWeather {
    RemoteCityWeather {
        name: name.to_string(),
        dt: 1_700_000_000,
        main: RemoteMain { temp: kelvin, feels_like: kelvin - 2.0, humidity: 81 },
        weather: vec![RemoteCondition { description: "light rain".to_string() }],
        wind: RemoteWind { speed: 4.1 },
        sys: RemoteSys { country: Some("GB".to_string()) },
    }
}

#[cfg(test)]
pub(crate) fn sample_record(name: &str, kelvin: f64) -> CityWeatherRecord {
    CityWeatherRecord::from(&sample_remote(name, kelvin))
}
