use super::super::domain::Severity;
use serde::{Deserialize, Serialize};

/// Exclusive lower bounds for the Critical, High and Moderate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub critical: f64,
    pub high: f64,
    pub moderate: f64,
}

impl Breakpoints {
    pub fn classify(&self, value: f64) -> Severity {
        if value > self.critical {
            Severity::Critical
        } else if value > self.high {
            Severity::High
        } else if value > self.moderate {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherWeights {
    pub temperature: f64,
    pub rainfall: f64,
    pub level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrologicalWeights {
    pub level: f64,
    pub quality: f64,
    pub trend: f64,
}

/// Tunable constants for every decision path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub level_threshold_m: f64,
    pub weather_weights: WeatherWeights,
    pub hydrological_weights: HydrologicalWeights,
    pub risk_breakpoints: Breakpoints,
    pub ratio_breakpoints: Breakpoints,
    pub seasonal_escalation_level_m: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            level_threshold_m: 15.0,
            weather_weights: WeatherWeights {
                temperature: 0.3,
                rainfall: 0.4,
                level: 0.3,
            },
            hydrological_weights: HydrologicalWeights {
                level: 0.5,
                quality: 0.3,
                trend: 0.2,
            },
            risk_breakpoints: Breakpoints {
                critical: 0.8,
                high: 0.6,
                moderate: 0.4,
            },
            ratio_breakpoints: Breakpoints {
                critical: 1.0,
                high: 0.8,
                moderate: 0.6,
            },
            seasonal_escalation_level_m: 10.0,
        }
    }
}
