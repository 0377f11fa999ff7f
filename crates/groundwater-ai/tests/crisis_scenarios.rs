use std::sync::Arc;

use chrono::NaiveDate;
use groundwater_ai::crisis::{
    AssessmentError, AssessmentRequest, CrisisEngine, CrisisService, DecisionPath, ScoringConfig,
    Severity, Strategy,
};
use groundwater_ai::indicators::{
    GroundwaterTrend, IndicatorSet, LevelType, LocationId, ReferenceCatalog, WaterQuality,
    WeatherSource,
};

fn district(name: &str) -> IndicatorSet {
    let mut set = IndicatorSet::new(LocationId::new(name), LevelType::District);
    set.observed_on = NaiveDate::from_ymd_opt(2024, 10, 15).expect("valid observation date");
    set
}

fn with_volumes(name: &str, rainfall: f64, resource: f64, extraction: f64) -> IndicatorSet {
    let mut set = district(name);
    set.rainfall_mm = Some(rainfall);
    set.resource_ham = Some(resource);
    set.extraction_ham = Some(extraction);
    set
}

#[test]
fn shallow_declining_aquifer_without_weather_is_urgent() {
    let engine = CrisisEngine::new(ScoringConfig::default());
    let mut set = district("Bangalore");
    set.water_level_m = Some(8.5);
    set.quality = WaterQuality::Poor;
    set.trend = GroundwaterTrend::Declining;

    let assessment = engine.classify(&set, Strategy::WeatherWeighted);

    assert!(assessment.severity >= Severity::High);
    assert!((10..=40).contains(&assessment.days_to_crisis));
    assert_eq!(assessment.decided_by, DecisionPath::SeasonalFallback);
    assert!(assessment
        .data_sources
        .contains("fallback-weather-unavailable"));
}

#[test]
fn over_extraction_is_critical() {
    let engine = CrisisEngine::new(ScoringConfig::default());
    let set = with_volumes("Anantapur", 600.0, 10_000.0, 10_500.0);

    for strategy in [Strategy::WeatherWeighted, Strategy::RatioThreshold] {
        let assessment = engine.classify(&set, strategy);
        assert_eq!(assessment.severity, Severity::Critical, "{strategy}");
        assert_eq!(assessment.days_to_crisis, 15);
        assert_eq!(assessment.decided_by, DecisionPath::RatioThreshold);
    }
}

#[test]
fn half_extracted_resource_is_low() {
    let engine = CrisisEngine::new(ScoringConfig::default());
    let assessment = engine.classify(
        &with_volumes("Kolar", 600.0, 10_000.0, 5_000.0),
        Strategy::RatioThreshold,
    );

    assert_eq!(assessment.severity, Severity::Low);
    assert_eq!(assessment.days_to_crisis, 60);
    assert!((assessment.probability - 0.30).abs() < 1e-9);
}

#[tokio::test]
async fn unknown_location_produces_no_assessment() {
    let service = CrisisService::new(
        Arc::new(ReferenceCatalog::standard()),
        CrisisEngine::default(),
        WeatherSource::Disabled,
    );

    let result = service
        .assess(AssessmentRequest::new(
            LocationId::new("Atlantis"),
            LevelType::District,
        ))
        .await;

    match result {
        Err(AssessmentError::NotFound { location, level }) => {
            assert_eq!(location, LocationId::new("Atlantis"));
            assert_eq!(level, LevelType::District);
        }
        other => panic!("expected not found, got {other:?}"),
    }
}
