use weather_core::{CityWeather, TemperatureUnit};

pub fn weather(weather: &CityWeather, unit: TemperatureUnit) -> String {
    let symbol = unit.symbol();
    format!(
        "{}\n  Condition:   {}\n  Temperature: {:.1}{symbol} (feels like {:.1}{symbol})\n  Humidity:    {}%\n  Wind:        {:.1} m/s\n  Observed:    {}",
        location(weather),
        weather.condition,
        weather.temperature,
        weather.feels_like,
        weather.humidity_pct,
        weather.wind_speed_mps,
        weather.observation_time.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub fn history(entries: &[CityWeather], unit: TemperatureUnit) -> String {
    if entries.is_empty() {
        return "No lookups yet. Try `weather show <city>`.".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                "{}. {:<24} {:>6.1}{}  {}",
                i + 1,
                location(w),
                w.temperature,
                unit.symbol(),
                w.condition
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn location(weather: &CityWeather) -> String {
    if weather.country.is_empty() {
        weather.city_name.clone()
    } else {
        format!("{}, {}", weather.city_name, weather.country)
    }
}
