use chrono::{NaiveDate, Utc};
use groundwater_ai::config::{AppConfig, WeatherMode};
use groundwater_ai::crisis::{
    CrisisEngine, CrisisService, NearestNeighbourModel, ScoringConfig, SeededJitter,
};
use groundwater_ai::error::AppError;
use groundwater_ai::indicators::{
    LayeredProvider, OpenWeatherClient, ReferenceCatalog, SeasonalWeather, SnapshotTable,
    WeatherSource,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type GroundwaterService = CrisisService<LayeredProvider>;

/// Wires the provider layers, weather source and engine described by `config`.
pub(crate) fn build_service(config: &AppConfig) -> Result<Arc<GroundwaterService>, AppError> {
    let mut provider = LayeredProvider::new().with_layer(Arc::new(ReferenceCatalog::standard()));

    let scoring = ScoringConfig {
        level_threshold_m: config.scoring.level_threshold_m,
        ..ScoringConfig::default()
    };
    let mut engine = CrisisEngine::new(scoring.clone());

    if let Some(path) = &config.data.snapshot_csv {
        let snapshot = SnapshotTable::from_path(path, config.data.snapshot_level)?;
        match NearestNeighbourModel::train_from_indicators(
            &snapshot.indicator_sets(),
            config.scoring.model_neighbours,
            &scoring.ratio_breakpoints,
        ) {
            Some(model) => engine = engine.with_model(Arc::new(model)),
            None => warn!(
                rows = snapshot.len(),
                "snapshot too small for the trained model; trained_model falls back to ratios"
            ),
        }
        provider = provider.with_layer(Arc::new(snapshot));
    }

    if config.scoring.jitter {
        let seed = config.scoring.jitter_seed.unwrap_or_else(clock_seed);
        engine = engine.with_jitter(Arc::new(SeededJitter::new(seed)));
        info!(seed, "days-to-crisis jitter enabled");
    }

    let weather = weather_source(config)?;
    let service = CrisisService::new(Arc::new(provider), engine, weather)
        .with_default_strategy(config.scoring.default_strategy);
    Ok(Arc::new(service))
}

fn weather_source(config: &AppConfig) -> Result<WeatherSource, AppError> {
    let source = match (config.weather.mode, config.weather.api_key.as_deref()) {
        (WeatherMode::Live, Some(key)) => {
            WeatherSource::Live(OpenWeatherClient::new(config.weather.base_url.clone(), key)?)
        }
        (WeatherMode::Live, None) | (WeatherMode::Disabled, _) => WeatherSource::Disabled,
        (WeatherMode::Seasonal, _) => WeatherSource::Seasonal(SeasonalWeather),
    };
    info!(mode = ?config.weather.mode, "weather source configured");
    Ok(source)
}

fn clock_seed() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .map(|nanos| nanos as u64)
        .unwrap_or_default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundwater_ai::config::{
        AppEnvironment, DataConfig, ScoringSettings, ServerConfig, TelemetryConfig, WeatherConfig,
    };
    use groundwater_ai::crisis::Strategy;
    use groundwater_ai::indicators::LevelType;
    use groundwater_ai::telemetry::LogFormat;
    use std::path::PathBuf;

    fn bundled_snapshot() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/groundwater-ai/data/state_groundwater.csv")
    }

    fn test_config(snapshot_csv: Option<PathBuf>) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
                log_format: LogFormat::Compact,
            },
            data: DataConfig {
                snapshot_csv,
                snapshot_level: LevelType::State,
            },
            weather: WeatherConfig {
                mode: WeatherMode::Seasonal,
                api_key: None,
                base_url: "http://127.0.0.1:9".to_string(),
            },
            scoring: ScoringSettings {
                level_threshold_m: 15.0,
                default_strategy: Strategy::RatioThreshold,
                jitter: false,
                jitter_seed: None,
                model_neighbours: 3,
            },
        }
    }

    #[test]
    fn catalog_only_service_has_no_model() {
        let service = build_service(&test_config(None)).expect("service builds");

        assert_eq!(service.locations(LevelType::District).len(), 5);
        assert!(service.locations(LevelType::State).is_empty());
        assert!(service.engine().model_name().is_none());
        assert_eq!(service.default_strategy(), Strategy::RatioThreshold);
    }

    #[test]
    fn snapshot_layer_trains_the_model() {
        let service =
            build_service(&test_config(Some(bundled_snapshot()))).expect("service builds");

        assert_eq!(service.locations(LevelType::State).len(), 18);
        assert_eq!(service.engine().model_name(), Some("nearest-neighbour"));
    }

    #[test]
    fn missing_snapshot_is_a_startup_error() {
        let result = build_service(&test_config(Some(PathBuf::from("missing.csv"))));
        assert!(matches!(result, Err(AppError::Snapshot(_))));
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date(" 2024-05-01 "),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"))
        );
        assert!(parse_date("01/05/2024").is_err());
    }
}
