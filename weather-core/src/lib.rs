//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The weather repository, which sequences remote lookups, local history
//!   and unit conversion, and reports progress as a stream of [`DataState`]s
//! - The OpenWeather remote data source and its API-key request interceptor
//! - Local history stores (in-memory and JSON file)
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod converter;
pub mod local;
pub mod model;
pub mod remote;
pub mod repository;
pub mod state;

pub use config::Config;
pub use converter::{TemperatureConverter, TemperatureUnit};
pub use model::{CityWeather, CityWeatherRecord, RemoteCityWeather};
pub use repository::{CityWeatherRepository, WeatherRepository};
pub use state::{DataState, FailureReason, StateStream};
