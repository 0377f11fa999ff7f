use super::common::*;
use std::sync::Arc;

use crate::crisis::classifier::policy::{decide_hydrological, decide_weather_weighted};
use crate::crisis::classifier::{baseline_days, SeededJitter};
use crate::crisis::model::ModelFeatures;
use crate::crisis::risk::{RiskFactorKind, RiskFactors};
use crate::crisis::{
    DecisionPath, NearestNeighbourModel, ScoringConfig, Severity, Strategy, TrainingSample,
    FALLBACK_CONFIDENCE,
};

fn factors(values: [f64; 6]) -> RiskFactors {
    RiskFactors {
        temperature: values[0],
        rainfall: values[1],
        level: values[2],
        extraction: values[3],
        quality: values[4],
        trend: values[5],
        defaulted: Vec::new(),
    }
}

#[test]
fn ratio_breakpoints_partition_severity() {
    let engine = engine();
    let cases = [
        (10500.0, Severity::Critical),
        (10001.0, Severity::Critical),
        (10000.0, Severity::High),
        (9000.0, Severity::High),
        (8001.0, Severity::High),
        (8000.0, Severity::Moderate),
        (7000.0, Severity::Moderate),
        (6000.0, Severity::Low),
        (5000.0, Severity::Low),
        (0.0, Severity::Low),
    ];

    for (extraction, expected) in cases {
        let assessment = engine.classify(
            &ratio_indicators(600.0, 10000.0, extraction),
            Strategy::RatioThreshold,
        );
        assert_eq!(assessment.severity, expected, "extraction {extraction}");
        assert_eq!(assessment.decided_by, DecisionPath::RatioThreshold);
        assert_eq!(assessment.confidence, FALLBACK_CONFIDENCE);
    }
}

#[test]
fn ratio_sweep_matches_breakpoints() {
    let engine = engine();
    for step in 0..=300 {
        let ratio = f64::from(step) * 0.005;
        let assessment = engine.classify(
            &ratio_indicators(700.0, 1000.0, ratio * 1000.0),
            Strategy::RatioThreshold,
        );
        let observed = 1000.0 * ratio / 1000.0;
        let expected = if observed > 1.0 {
            Severity::Critical
        } else if observed > 0.8 {
            Severity::High
        } else if observed > 0.6 {
            Severity::Moderate
        } else {
            Severity::Low
        };
        assert_eq!(assessment.severity, expected, "ratio {ratio}");
    }
}

#[test]
fn severity_is_monotonic_in_every_risk_factor() {
    let config = ScoringConfig::default();
    let grid = [0.0, 0.2, 0.45, 0.7, 1.0];

    for base in grid {
        for bump in grid {
            if bump < base {
                continue;
            }
            for axis in 0..6 {
                let lower = factors([base; 6]);
                let mut raised = [base; 6];
                raised[axis] = bump;
                let higher = factors(raised);

                assert!(
                    decide_weather_weighted(&higher, &config).severity
                        >= decide_weather_weighted(&lower, &config).severity
                );
                assert!(
                    decide_hydrological(&higher, &config).severity
                        >= decide_hydrological(&lower, &config).severity
                );
            }
        }
    }
}

#[test]
fn days_strictly_decrease_as_severity_rises() {
    let engine = engine();
    let days: Vec<u32> = [5000.0, 7000.0, 9000.0, 10500.0]
        .iter()
        .map(|extraction| {
            engine
                .classify(
                    &ratio_indicators(600.0, 10000.0, *extraction),
                    Strategy::RatioThreshold,
                )
                .days_to_crisis
        })
        .collect();

    assert_eq!(days, vec![60, 45, 30, 15]);
    for pair in Severity::ALL.windows(2) {
        assert!(baseline_days(pair[0]) > baseline_days(pair[1]));
    }
}

#[test]
fn zero_resource_never_fails_under_any_strategy() {
    let engine = engine();
    let set = ratio_indicators(600.0, 0.0, 4200.0);

    for strategy in [
        Strategy::WeatherWeighted,
        Strategy::Hydrological,
        Strategy::RatioThreshold,
        Strategy::TrainedModel,
    ] {
        let assessment = engine.classify(&set, strategy);
        assert_eq!(assessment.risk_factors.extraction, 0.0);
        assert!(assessment.days_to_crisis > 0);
        assert!((0.0..=1.0).contains(&assessment.probability));
        assert!((0.0..=1.0).contains(&assessment.confidence));
    }
}

#[test]
fn stressed_aquifer_without_weather_is_urgent() {
    let assessment = engine().classify(&stressed_aquifer(), Strategy::WeatherWeighted);

    assert!(assessment.severity >= Severity::High);
    assert!((10..=40).contains(&assessment.days_to_crisis));
    assert_eq!(assessment.decided_by, DecisionPath::SeasonalFallback);
    assert_eq!(assessment.requested_strategy, Strategy::WeatherWeighted);
    assert!(assessment
        .data_sources
        .contains("fallback-weather-unavailable"));
    assert!(assessment
        .data_sources
        .contains("strategy:seasonal-fallback"));
    assert_eq!(assessment.confidence, FALLBACK_CONFIDENCE);
}

#[test]
fn extraction_over_recharge_is_critical() {
    let assessment = engine().classify(
        &ratio_indicators(600.0, 10000.0, 10500.0),
        Strategy::RatioThreshold,
    );
    assert_eq!(assessment.severity, Severity::Critical);
    assert_eq!(assessment.days_to_crisis, 15);
    assert_eq!(assessment.probability, 0.85);
}

#[test]
fn half_extraction_is_low() {
    let assessment = engine().classify(
        &ratio_indicators(600.0, 10000.0, 5000.0),
        Strategy::RatioThreshold,
    );
    assert_eq!(assessment.severity, Severity::Low);
    assert_eq!(assessment.days_to_crisis, 60);
    assert_eq!(assessment.probability, 0.30);
}

#[test]
fn missing_weather_with_resource_routes_to_ratio() {
    let assessment = engine().classify(
        &ratio_indicators(600.0, 10000.0, 10500.0),
        Strategy::WeatherWeighted,
    );
    assert_eq!(assessment.decided_by, DecisionPath::RatioThreshold);
    assert_eq!(assessment.severity, Severity::Critical);
    assert!(assessment
        .data_sources
        .contains("fallback-weather-unavailable"));
}

#[test]
fn weather_weighted_blends_temperature_rain_and_level() {
    let mut set = stressed_aquifer();
    set.weather = Some(weather(45.0, 0));

    let assessment = engine().classify(&set, Strategy::WeatherWeighted);
    // 0.3 * 1.0 + 0.4 * 1.0 + 0.3 * (6.5 / 15)
    let expected = 0.3 + 0.4 + 0.3 * (6.5 / 15.0);
    assert!((assessment.combined_risk - expected).abs() < 1e-9);
    assert_eq!(assessment.severity, Severity::Critical);
    assert_eq!(assessment.decided_by, DecisionPath::WeatherWeighted);
    assert!((assessment.confidence - 0.95_f64.min(0.5 + expected * 0.4)).abs() < 1e-9);
    assert!(assessment.data_sources.contains("weather-live"));
    assert!(assessment.data_sources.contains("strategy:weather-weighted"));
}

#[test]
fn hydrological_strategy_scores_level_quality_and_trend() {
    let assessment = engine().classify(&stressed_aquifer(), Strategy::Hydrological);
    let expected = 0.5 * (6.5 / 15.0) + 0.3 * 0.6 + 0.2 * 0.7;
    assert!((assessment.combined_risk - expected).abs() < 1e-9);
    assert_eq!(assessment.severity, Severity::Moderate);
    assert_eq!(assessment.days_to_crisis, 45);
    assert_eq!(assessment.decided_by, DecisionPath::Hydrological);
}

#[test]
fn defaulted_factors_lower_blended_confidence() {
    let engine = engine();
    let mut complete = stressed_aquifer();
    complete.weather = Some(weather(36.0, 2));
    let mut sparse = complete.clone();
    sparse.water_level_m = None;

    let full = engine.classify(&complete, Strategy::WeatherWeighted);
    let partial = engine.classify(&sparse, Strategy::WeatherWeighted);

    assert!(partial
        .risk_factors
        .defaulted
        .contains(&RiskFactorKind::Level));
    let undiscounted = (0.5 + partial.combined_risk * 0.4).min(0.95);
    assert!((partial.confidence - (undiscounted - 0.05)).abs() < 1e-9);
    assert_eq!(full.risk_factors.defaulted_among(&[RiskFactorKind::Level]), 0);
}

#[test]
fn trained_model_without_model_falls_back_to_ratio() {
    let assessment = engine().classify(
        &ratio_indicators(600.0, 10000.0, 9000.0),
        Strategy::TrainedModel,
    );
    assert_eq!(assessment.decided_by, DecisionPath::RatioThreshold);
    assert_eq!(assessment.severity, Severity::High);
    assert!(assessment
        .data_sources
        .contains("fallback-model-unavailable"));
}

#[test]
fn trained_model_decides_label_and_baselines_follow() {
    let samples: Vec<TrainingSample> = [
        (600.0, 10000.0, 10500.0, Severity::Critical),
        (620.0, 10200.0, 10900.0, Severity::Critical),
        (590.0, 9800.0, 10400.0, Severity::Critical),
        (2500.0, 50000.0, 9000.0, Severity::Low),
        (2600.0, 52000.0, 9500.0, Severity::Low),
    ]
    .iter()
    .map(|(rainfall, resource, extraction, label)| TrainingSample {
        features: ModelFeatures {
            rainfall_mm: *rainfall,
            resource_ham: *resource,
            extraction_ham: *extraction,
        },
        label: *label,
    })
    .collect();
    let model = NearestNeighbourModel::train(&samples, 3).expect("enough samples");
    let engine = engine().with_model(Arc::new(model));

    let assessment = engine.classify(
        &ratio_indicators(605.0, 10100.0, 10600.0),
        Strategy::TrainedModel,
    );
    assert_eq!(assessment.decided_by, DecisionPath::TrainedModel);
    assert_eq!(assessment.severity, Severity::Critical);
    assert_eq!(assessment.days_to_crisis, 15);
    assert_eq!(assessment.probability, 0.85);
    assert!((assessment.confidence - 0.9).abs() < 1e-9);
    assert_eq!(engine.model_name(), Some("nearest-neighbour"));

    let sparse = engine.classify(&stressed_aquifer(), Strategy::TrainedModel);
    assert_eq!(sparse.decided_by, DecisionPath::RatioThreshold);
}

#[test]
fn jitter_is_opt_in_and_bounded() {
    let set = ratio_indicators(600.0, 10000.0, 7000.0);
    assert_eq!(
        engine().classify(&set, Strategy::RatioThreshold).days_to_crisis,
        45
    );

    let jittered = engine().with_jitter(Arc::new(SeededJitter::new(11)));
    for _ in 0..200 {
        let assessment = jittered.classify(&set, Strategy::RatioThreshold);
        assert_eq!(assessment.severity, Severity::Moderate);
        assert!((31..=59).contains(&assessment.days_to_crisis));
    }
}

#[test]
fn provenance_keeps_provider_tags() {
    let mut set = ratio_indicators(600.0, 10000.0, 5000.0);
    set.tag_source("tabular-snapshot");
    let assessment = engine().classify(&set, Strategy::RatioThreshold);
    assert!(assessment.data_sources.contains("tabular-snapshot"));
    assert!(assessment.data_sources.contains("strategy:ratio-threshold"));
}
