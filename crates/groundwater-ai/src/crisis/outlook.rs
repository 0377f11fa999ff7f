//! Multi-horizon crisis probability forecast.
//!
//! Unlike the classifier this is a smooth score: hydrological pressure
//! compounds over time, so longer horizons carry higher probability and
//! lower confidence.

use super::report::round3;
use super::risk::RiskFactors;
use crate::indicators::{IndicatorSet, LevelType, LocationId};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

pub const HORIZON_MONTHS: [u32; 4] = [1, 3, 6, 12];

const PROBABILITY_CAP: f64 = 0.95;

/// Serialised by its display label, e.g. `"Very Low"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlookLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl OutlookLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            OutlookLevel::High
        } else if probability > 0.4 {
            OutlookLevel::Medium
        } else if probability > 0.2 {
            OutlookLevel::Low
        } else {
            OutlookLevel::VeryLow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutlookLevel::VeryLow => "Very Low",
            OutlookLevel::Low => "Low",
            OutlookLevel::Medium => "Medium",
            OutlookLevel::High => "High",
        }
    }
}

impl fmt::Display for OutlookLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OutlookLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonForecast {
    pub months: u32,
    pub probability: f64,
    pub outlook: OutlookLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFactors {
    pub water_level_risk: f64,
    pub quality_risk: f64,
    pub trend_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityOutlook {
    pub location: LocationId,
    pub level_type: LevelType,
    pub overall_probability: f64,
    pub forecasts: Vec<HorizonForecast>,
    pub key_factors: KeyFactors,
    pub recommendations: Vec<String>,
    pub indicators: IndicatorSet,
    pub generated_at: DateTime<Utc>,
}

pub fn forecast_probability(
    indicators: &IndicatorSet,
    factors: &RiskFactors,
    generated_at: DateTime<Utc>,
) -> ProbabilityOutlook {
    let overall = overall_probability(factors);
    let forecasts = HORIZON_MONTHS
        .iter()
        .map(|months| horizon(overall, *months))
        .collect();

    ProbabilityOutlook {
        location: indicators.location.clone(),
        level_type: indicators.level,
        overall_probability: round3(overall),
        forecasts,
        key_factors: KeyFactors {
            water_level_risk: round3(factors.level),
            quality_risk: round3(factors.quality),
            trend_risk: round3(factors.trend),
        },
        recommendations: prevention_recommendations(overall),
        indicators: indicators.clone(),
        generated_at,
    }
}

pub(crate) fn overall_probability(factors: &RiskFactors) -> f64 {
    (0.5 * factors.level + 0.3 * factors.quality + 0.2 * factors.trend).clamp(0.0, 1.0)
}

pub(crate) fn horizon(overall: f64, months: u32) -> HorizonForecast {
    let growth = 1.0 + f64::from(months) * 0.1 * overall;
    let probability = round3((overall * growth).min(PROBABILITY_CAP));
    HorizonForecast {
        months,
        probability,
        outlook: OutlookLevel::from_probability(probability),
        confidence: round3((0.9 - 0.05 * f64::from(months)).max(0.6)),
    }
}

fn prevention_recommendations(probability: f64) -> Vec<String> {
    let lines: &[&str] = if probability > 0.7 {
        &[
            "Immediate intervention required",
            "Restrict groundwater extraction",
            "Activate emergency water supply",
            "Implement strict conservation measures",
        ]
    } else if probability > 0.4 {
        &[
            "Increase monitoring frequency",
            "Prepare contingency plans",
            "Promote water conservation",
            "Consider alternative water sources",
        ]
    } else {
        &[
            "Continue regular monitoring",
            "Maintain current conservation efforts",
            "Plan for seasonal variations",
        ]
    };
    lines.iter().map(|line| line.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crisis::risk::RiskCalculator;
    use crate::indicators::{GroundwaterTrend, WaterQuality};

    fn outlook_for(level: f64, quality: WaterQuality, trend: GroundwaterTrend) -> ProbabilityOutlook {
        let mut set = IndicatorSet::new(LocationId::new("Chennai"), LevelType::District);
        set.water_level_m = Some(level);
        set.quality = quality;
        set.trend = trend;
        let factors = RiskCalculator::new(15.0).factors(&set);
        forecast_probability(&set, &factors, Utc::now())
    }

    #[test]
    fn probability_grows_with_horizon_and_confidence_decays() {
        let outlook = outlook_for(6.2, WaterQuality::Critical, GroundwaterTrend::Declining);

        let probabilities: Vec<f64> = outlook.forecasts.iter().map(|f| f.probability).collect();
        assert!(probabilities.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(probabilities.iter().all(|p| *p <= PROBABILITY_CAP));

        let confidences: Vec<f64> = outlook.forecasts.iter().map(|f| f.confidence).collect();
        assert_eq!(confidences, vec![0.85, 0.75, 0.6, 0.6]);
    }

    #[test]
    fn chennai_outlook_matches_reference_arithmetic() {
        let outlook = outlook_for(6.2, WaterQuality::Critical, GroundwaterTrend::Declining);
        // 0.5 * 0.5867 + 0.3 * 0.9 + 0.2 * 0.7
        assert!((outlook.overall_probability - 0.703).abs() < 1e-9);
        assert_eq!(outlook.forecasts[0].probability, 0.753);
        assert_eq!(outlook.forecasts[0].outlook, OutlookLevel::High);
        assert_eq!(outlook.recommendations[0], "Immediate intervention required");
    }

    #[test]
    fn healthy_aquifer_reads_very_low() {
        let outlook = outlook_for(18.7, WaterQuality::Good, GroundwaterTrend::Improving);
        assert_eq!(outlook.forecasts[0].outlook, OutlookLevel::VeryLow);
        assert_eq!(outlook.recommendations.len(), 3);
        assert_eq!(outlook.key_factors.water_level_risk, 0.0);
    }

    #[test]
    fn outlook_levels_serialise_as_labels() {
        let outlook = outlook_for(18.7, WaterQuality::Good, GroundwaterTrend::Improving);
        let json = serde_json::to_value(&outlook.forecasts[0]).expect("serialises");
        assert_eq!(json["outlook"], "Very Low");
        assert_eq!(
            serde_json::to_value(OutlookLevel::Medium).expect("serialises"),
            "Medium"
        );
        assert_eq!(OutlookLevel::High.to_string(), "High");
    }
}
