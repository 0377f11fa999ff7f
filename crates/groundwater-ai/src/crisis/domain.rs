use super::risk::RiskFactors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Severity tiers in ascending order of urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Critical,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" | "medium" => Some(Self::Moderate),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Severity::Low => 0,
            Severity::Moderate => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification strategy requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    WeatherWeighted,
    Hydrological,
    RatioThreshold,
    TrainedModel,
}

impl Strategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weather_weighted" | "weather" => Some(Self::WeatherWeighted),
            "hydrological" | "hydro" => Some(Self::Hydrological),
            "ratio_threshold" | "ratio" => Some(Self::RatioThreshold),
            "trained_model" | "model" => Some(Self::TrainedModel),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::WeatherWeighted => "weather_weighted",
            Strategy::Hydrological => "hydrological",
            Strategy::RatioThreshold => "ratio_threshold",
            Strategy::TrainedModel => "trained_model",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision function that actually produced the severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    WeatherWeighted,
    Hydrological,
    RatioThreshold,
    TrainedModel,
    SeasonalFallback,
}

impl DecisionPath {
    pub fn source_tag(&self) -> &'static str {
        match self {
            DecisionPath::WeatherWeighted => "strategy:weather-weighted",
            DecisionPath::Hydrological => "strategy:hydrological",
            DecisionPath::RatioThreshold => "strategy:ratio-threshold",
            DecisionPath::TrainedModel => "strategy:trained-model",
            DecisionPath::SeasonalFallback => "strategy:seasonal-fallback",
        }
    }
}

/// Classifier output for one indicator set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisAssessment {
    pub severity: Severity,
    pub days_to_crisis: u32,
    pub probability: f64,
    pub confidence: f64,
    pub combined_risk: f64,
    pub requested_strategy: Strategy,
    pub decided_by: DecisionPath,
    pub risk_factors: RiskFactors,
    pub data_sources: BTreeSet<String>,
}
