use super::domain::{LocationId, WeatherContext, WeatherOrigin};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather source disabled")]
    Disabled,
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather service answered with status {0}")]
    Status(u16),
}

/// Where weather context comes from; resolved once at start-up.
#[derive(Debug, Clone)]
pub enum WeatherSource {
    Live(OpenWeatherClient),
    Seasonal(SeasonalWeather),
    Disabled,
}

impl WeatherSource {
    pub async fn fetch(
        &self,
        location: &LocationId,
        today: NaiveDate,
    ) -> Result<WeatherContext, WeatherError> {
        match self {
            WeatherSource::Live(client) => client.fetch(location).await,
            WeatherSource::Seasonal(profile) => Ok(profile.context_for(today)),
            WeatherSource::Disabled => Err(WeatherError::Disabled),
        }
    }

    /// Weather for the location, or `None` when the upstream is unavailable.
    pub async fn current(&self, location: &LocationId, today: NaiveDate) -> Option<WeatherContext> {
        match self.fetch(location, today).await {
            Ok(context) => Some(context),
            Err(WeatherError::Disabled) => None,
            Err(err) => {
                warn!(%location, error = %err, "weather unavailable, scoring without it");
                None
            }
        }
    }
}

/// Deterministic climatology for India used when no weather API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalWeather;

impl SeasonalWeather {
    pub fn context_for(&self, date: NaiveDate) -> WeatherContext {
        let (temperature_c, humidity_pct, rain_days) = match date.month() {
            12 | 1 | 2 => (20.0, 55.0, 1),
            3..=5 => (37.5, 40.0, 0),
            6..=9 => (29.0, 80.0, 4),
            _ => (26.0, 65.0, 2),
        };

        WeatherContext {
            temperature_c: Some(temperature_c),
            humidity_pct: Some(humidity_pct),
            rain_days_forecast: Some(rain_days),
            origin: WeatherOrigin::Seasonal,
        }
    }
}

/// OpenWeatherMap current-conditions and 5-day forecast client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub async fn fetch(&self, location: &LocationId) -> Result<WeatherContext, WeatherError> {
        let query = format!("{},IN", location.as_str());
        let current: CurrentResponse = self.get("weather", &query).await?;
        let forecast: ForecastResponse = self.get("forecast", &query).await?;
        Ok(summarize(&current, &forecast))
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[
                ("q", query),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: MainReading,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReading,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

fn summarize(current: &CurrentResponse, forecast: &ForecastResponse) -> WeatherContext {
    let temperature_c = if forecast.list.is_empty() {
        current.main.temp
    } else {
        forecast.list.iter().map(|entry| entry.main.temp).sum::<f64>() / forecast.list.len() as f64
    };

    // Forecast entries are 3-hourly; count calendar days with any rain.
    let rain_days: BTreeSet<NaiveDate> = forecast
        .list
        .iter()
        .filter(|entry| entry.weather.iter().any(|c| c.main.contains("Rain")))
        .filter_map(|entry| DateTime::from_timestamp(entry.dt, 0))
        .map(|dt| dt.date_naive())
        .collect();

    WeatherContext {
        temperature_c: Some(temperature_c),
        humidity_pct: Some(current.main.humidity),
        rain_days_forecast: Some(rain_days.len().min(u8::MAX as usize) as u8),
        origin: WeatherOrigin::Live,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_profile_tracks_indian_seasons() {
        let profile = SeasonalWeather;
        let may = profile.context_for(NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid"));
        let august = profile.context_for(NaiveDate::from_ymd_opt(2025, 8, 10).expect("valid"));

        assert_eq!(may.rain_days_forecast, Some(0));
        assert!(may.temperature_c > august.temperature_c);
        assert_eq!(august.rain_days_forecast, Some(4));
        assert_eq!(may.origin, WeatherOrigin::Seasonal);
    }

    #[test]
    fn forecast_summary_counts_distinct_rain_days() {
        let payload = r#"{
            "list": [
                {"dt": 1727676000, "main": {"temp": 30.0, "humidity": 70}, "weather": [{"main": "Rain"}]},
                {"dt": 1727686800, "main": {"temp": 32.0, "humidity": 70}, "weather": [{"main": "Rain"}]},
                {"dt": 1727773200, "main": {"temp": 34.0, "humidity": 60}, "weather": [{"main": "Clear"}]}
            ]
        }"#;
        let forecast: ForecastResponse = serde_json::from_str(payload).expect("forecast parses");
        let current: CurrentResponse =
            serde_json::from_str(r#"{"main": {"temp": 31.0, "humidity": 65}}"#)
                .expect("current parses");

        let context = summarize(&current, &forecast);
        assert_eq!(context.rain_days_forecast, Some(1));
        assert_eq!(context.temperature_c, Some(32.0));
        assert_eq!(context.humidity_pct, Some(65.0));
        assert_eq!(context.origin, WeatherOrigin::Live);
    }

    #[tokio::test]
    async fn disabled_source_reports_no_weather() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid");
        let context = WeatherSource::Disabled
            .current(&LocationId::new("Pune"), today)
            .await;
        assert!(context.is_none());
    }
}
