use std::io::Cursor;
use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::crisis::{crisis_router, CrisisEngine, CrisisService, ScoringConfig};
use crate::indicators::{
    GroundwaterTrend, IndicatorProvider, IndicatorSet, LayeredProvider, LevelType, LocationId,
    LookupError, ReferenceCatalog, SnapshotTable, WaterQuality, WeatherContext, WeatherOrigin,
    WeatherSource,
};

pub(super) const STATE_SNAPSHOT: &str = "\
State,Rainfall (mm),Annual Extractable Ground Water Resources (ham),Ground Water Extraction (ham)
Punjab,609,1893000,2810000
Haryana,560,961000,1305000
Delhi,610,30000,29100
Tamil Nadu,920,1969000,1478000
Uttar Pradesh,920,6695000,4643000
Karnataka,1080,1542000,1046000
Gujarat,790,2162000,1195000
Kerala,2890,546000,272000
TOTAL,9389,15818000,14798100
";

pub(super) fn state_snapshot() -> SnapshotTable {
    SnapshotTable::from_reader(Cursor::new(STATE_SNAPSHOT), LevelType::State)
        .expect("state snapshot parses")
}

pub(super) fn layered_provider() -> LayeredProvider {
    LayeredProvider::new()
        .with_layer(Arc::new(ReferenceCatalog::standard()))
        .with_layer(Arc::new(state_snapshot()))
}

pub(super) fn engine() -> CrisisEngine {
    CrisisEngine::new(ScoringConfig::default())
}

pub(super) fn service(weather: WeatherSource) -> CrisisService<LayeredProvider> {
    CrisisService::new(Arc::new(layered_provider()), engine(), weather)
}

pub(super) fn router(weather: WeatherSource) -> Router {
    crisis_router(Arc::new(service(weather)))
}

pub(super) fn observed(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn district(name: &str) -> IndicatorSet {
    let mut set = IndicatorSet::new(LocationId::new(name), LevelType::District);
    set.observed_on = observed(2024, 10, 15);
    set
}

/// Shallow, poor-quality, declining aquifer with no weather context.
pub(super) fn stressed_aquifer() -> IndicatorSet {
    let mut set = district("Bangalore");
    set.water_level_m = Some(8.5);
    set.quality = WaterQuality::Poor;
    set.trend = GroundwaterTrend::Declining;
    set
}

pub(super) fn ratio_indicators(rainfall: f64, resource: f64, extraction: f64) -> IndicatorSet {
    let mut set = district("Anantapur");
    set.rainfall_mm = Some(rainfall);
    set.resource_ham = Some(resource);
    set.extraction_ham = Some(extraction);
    set
}

pub(super) fn weather(temperature_c: f64, rain_days: u8) -> WeatherContext {
    WeatherContext {
        temperature_c: Some(temperature_c),
        humidity_pct: Some(50.0),
        rain_days_forecast: Some(rain_days),
        origin: WeatherOrigin::Live,
    }
}

pub(super) struct OfflineProvider;

impl IndicatorProvider for OfflineProvider {
    fn lookup(&self, _: &LocationId, _: LevelType) -> Result<IndicatorSet, LookupError> {
        Err(LookupError::Unavailable("station feed offline".to_string()))
    }

    fn locations(&self, _: LevelType) -> Vec<LocationId> {
        vec![LocationId::new("Chennai")]
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
