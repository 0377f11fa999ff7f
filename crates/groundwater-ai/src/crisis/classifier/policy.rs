use super::super::domain::{DecisionPath, Severity};
use super::super::risk::{RiskFactorKind, RiskFactors};
use super::baseline::{blended_confidence, FALLBACK_CONFIDENCE};
use super::config::ScoringConfig;
use crate::indicators::IndicatorSet;
use chrono::Datelike;

const WEATHER_FACTORS: [RiskFactorKind; 3] = [
    RiskFactorKind::Temperature,
    RiskFactorKind::Rainfall,
    RiskFactorKind::Level,
];

const HYDROLOGICAL_FACTORS: [RiskFactorKind; 3] = [
    RiskFactorKind::Level,
    RiskFactorKind::Quality,
    RiskFactorKind::Trend,
];

/// Severity label plus the scores that justified it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Decision {
    pub severity: Severity,
    pub combined_risk: f64,
    pub confidence: f64,
    pub path: DecisionPath,
    pub notes: Vec<&'static str>,
}

impl Decision {
    fn new(severity: Severity, combined_risk: f64, confidence: f64, path: DecisionPath) -> Self {
        Self {
            severity,
            combined_risk: combined_risk.clamp(0.0, 1.0),
            confidence,
            path,
            notes: Vec::new(),
        }
    }

    fn noted(mut self, note: &'static str) -> Self {
        self.notes.push(note);
        self
    }
}

pub(crate) fn weather_weighted_risk(factors: &RiskFactors, config: &ScoringConfig) -> f64 {
    let weights = &config.weather_weights;
    (weights.temperature * factors.temperature
        + weights.rainfall * factors.rainfall
        + weights.level * factors.level)
        .clamp(0.0, 1.0)
}

pub(crate) fn hydrological_risk(factors: &RiskFactors, config: &ScoringConfig) -> f64 {
    let weights = &config.hydrological_weights;
    (weights.level * factors.level + weights.quality * factors.quality + weights.trend * factors.trend)
        .clamp(0.0, 1.0)
}

pub(crate) fn decide_weather_weighted(factors: &RiskFactors, config: &ScoringConfig) -> Decision {
    let combined = weather_weighted_risk(factors, config);
    Decision::new(
        config.risk_breakpoints.classify(combined),
        combined,
        blended_confidence(combined, factors.defaulted_among(&WEATHER_FACTORS)),
        DecisionPath::WeatherWeighted,
    )
}

pub(crate) fn decide_hydrological(factors: &RiskFactors, config: &ScoringConfig) -> Decision {
    let combined = hydrological_risk(factors, config);
    Decision::new(
        config.risk_breakpoints.classify(combined),
        combined,
        blended_confidence(combined, factors.defaulted_among(&HYDROLOGICAL_FACTORS)),
        DecisionPath::Hydrological,
    )
}

/// Keys severity directly off `extraction / resource`; an unknown ratio reads as zero pressure.
pub(crate) fn decide_ratio_threshold(
    indicators: &IndicatorSet,
    factors: &RiskFactors,
    config: &ScoringConfig,
) -> Decision {
    match indicators.extraction_ratio() {
        Some(ratio) => Decision::new(
            config.ratio_breakpoints.classify(ratio),
            factors.extraction,
            FALLBACK_CONFIDENCE,
            DecisionPath::RatioThreshold,
        ),
        None => Decision::new(
            Severity::Low,
            0.0,
            FALLBACK_CONFIDENCE,
            DecisionPath::RatioThreshold,
        )
        .noted("extraction-ratio-defaulted"),
    }
}

/// Calendar-driven base severity, escalated when the water table is already shallow.
pub(crate) fn decide_seasonal(
    indicators: &IndicatorSet,
    factors: &RiskFactors,
    config: &ScoringConfig,
) -> Decision {
    let base = seasonal_base(indicators.observed_on.month());
    let escalated = indicators
        .water_level_m
        .map(|depth| depth < config.seasonal_escalation_level_m)
        .unwrap_or(false);

    let decision = Decision::new(
        if escalated { Severity::Critical } else { base },
        factors.level,
        FALLBACK_CONFIDENCE,
        DecisionPath::SeasonalFallback,
    );
    if escalated {
        decision.noted("shallow-water-table")
    } else {
        decision
    }
}

pub(crate) fn decide_from_model(severity: Severity, factors: &RiskFactors) -> Decision {
    let confidence = (0.5 + factors.extraction * 0.4).min(0.95);
    Decision::new(
        severity,
        factors.extraction,
        confidence,
        DecisionPath::TrainedModel,
    )
}

fn seasonal_base(month: u32) -> Severity {
    match month {
        4..=6 => Severity::High,
        12 | 1 | 2 => Severity::Low,
        _ => Severity::Moderate,
    }
}
