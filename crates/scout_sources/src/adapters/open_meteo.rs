//! Open-Meteo current conditions (weather, PRIMARY). No key required.
//!
//! Two calls: geocode the place name, then read current weather at the
//! first match.

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::subject_of;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "open_meteo";
const GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Words dropped from a weather question to leave the place name
const WEATHER_WORDS: &[&str] = &[
    "weather", "temperature", "forecast", "rain", "raining", "in", "at", "for", "the", "today",
    "now", "current", "currently", "like", "how", "hot", "cold", "is", "it",
];

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<Place>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    weathercode: Option<u32>,
    #[serde(default)]
    time: Option<String>,
}

pub struct OpenMeteoAdapter {
    http: HttpClient,
}

impl OpenMeteoAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let Some(name) = place_name(query) else {
            return Ok(EvidenceResult::not_found(NAME));
        };
        let body: serde_json::Value = self
            .http
            .get_json(GEOCODE_URL, &[("name", name.as_str()), ("count", "1")])?;
        let Some(place) = parse_place(body)? else {
            return Ok(EvidenceResult::not_found(NAME));
        };

        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let body: serde_json::Value = self.http.get_json(
            FORECAST_URL,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("temperature_unit", "fahrenheit"),
                ("windspeed_unit", "mph"),
            ],
        )?;
        parse_forecast(&place, body)
    }
}

impl Adapter for OpenMeteoAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Weather
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// "weather in Lisbon today" -> "Lisbon"
pub fn place_name(query: &str) -> Option<String> {
    let subject = subject_of(query);
    let words: Vec<&str> = subject
        .split(|c: char| c.is_whitespace() || c == '?' || c == '\'')
        .filter(|w| !w.is_empty() && !WEATHER_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

pub fn parse_place(body: serde_json::Value) -> FetchResult<Option<Place>> {
    let response: GeocodeResponse = serde_json::from_value(body)?;
    Ok(response.results.and_then(|r| r.into_iter().next()))
}

pub fn parse_forecast(place: &Place, body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let response: ForecastResponse = serde_json::from_value(body)?;
    let Some(current) = response.current_weather else {
        return Ok(EvidenceResult::not_found(NAME));
    };

    let label = match (&place.admin1, &place.country) {
        (Some(region), Some(country)) if region != &place.name => {
            format!("{}, {}, {}", place.name, region, country)
        }
        (_, Some(country)) => format!("{}, {}", place.name, country),
        _ => place.name.clone(),
    };
    let mut summary = format!(
        "{}: {:.1}°F, wind {:.1} mph",
        label, current.temperature, current.windspeed
    );
    if let Some(sky) = current.weathercode.and_then(describe_code) {
        summary.push_str(&format!(", {}", sky));
    }

    let mut ev = EvidenceResult::found(NAME, summary, 0.9)
        .with_url(format!(
            "https://open-meteo.com/en/docs#latitude={}&longitude={}",
            place.latitude, place.longitude
        ))
        .with_meta("temperature_f", current.temperature)
        .with_meta("windspeed_mph", current.windspeed);
    if let Some(time) = current.time {
        ev = ev.with_meta("observed_at", time);
    }
    Ok(ev)
}

/// WMO weather interpretation codes
fn describe_code(code: u32) -> Option<&'static str> {
    Some(match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95..=99 => "thunderstorm",
        _ => return None,
    })
}
