use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Fixed unit policy applied to every temperature before it is emitted.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait TemperatureConverter: Send + Sync + Debug {
    fn convert(&self, value: f64) -> f64;

    /// Unit of the values `convert` returns.
    fn unit(&self) -> TemperatureUnit;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KelvinToCelsius;

impl TemperatureConverter for KelvinToCelsius {
    fn convert(&self, value: f64) -> f64 {
        value - KELVIN_OFFSET
    }

    fn unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KelvinToFahrenheit;

impl TemperatureConverter for KelvinToFahrenheit {
    fn convert(&self, value: f64) -> f64 {
        (value - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0
    }

    fn unit(&self) -> TemperatureUnit {
        TemperatureUnit::Fahrenheit
    }
}

/// Display unit chosen in the configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Converter from the Kelvin values the remote API reports into this unit.
    pub fn converter(&self) -> Arc<dyn TemperatureConverter> {
        match self {
            TemperatureUnit::Celsius => Arc::new(KelvinToCelsius),
            TemperatureUnit::Fahrenheit => Arc::new(KelvinToFahrenheit),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("celsius"),
            TemperatureUnit::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[rstest]
    #[case::absolute_zero(0.0, -273.15)]
    #[case::freezing(273.15, 0.0)]
    #[case::warm_day(300.0, 26.85)]
    fn kelvin_to_celsius(#[case] kelvin: f64, #[case] celsius: f64) {
        assert_close(KelvinToCelsius.convert(kelvin), celsius);
    }

    #[rstest]
    #[case::freezing(273.15, 32.0)]
    #[case::boiling(373.15, 212.0)]
    fn kelvin_to_fahrenheit(#[case] kelvin: f64, #[case] fahrenheit: f64) {
        assert_close(KelvinToFahrenheit.convert(kelvin), fahrenheit);
    }

    #[test]
    fn convert_is_deterministic() {
        let converter = TemperatureUnit::Celsius.converter();
        assert_eq!(converter.convert(288.4), converter.convert(288.4));
    }

    #[test]
    fn unit_selects_matching_converter() {
        for unit in TemperatureUnit::all() {
            assert_eq!(unit.converter().unit(), *unit);
        }
    }
}
