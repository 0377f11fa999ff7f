use super::outlook::{horizon, overall_probability};
use super::projection::{project_water_levels, round2, ProjectionHorizon};
use super::report::round3;
use super::risk::RiskFactors;
use crate::indicators::{IndicatorSet, LevelType, LocationId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Depth at which the level component of the ranking reaches zero.
const RANKING_DEPTH_M: f64 = 20.0;
const LEVEL_WEIGHT: f64 = 0.4;
const FALLING_WEIGHT: f64 = 0.3;
const OUTLOOK_WEIGHT: f64 = 0.3;
const CHANGE_DAY: u32 = 30;
const OUTLOOK_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLocation {
    pub location: LocationId,
    pub current_level_m: f64,
    pub predicted_change_30d_m: f64,
    pub crisis_probability_3m: f64,
    pub risk_score: f64,
}

/// Measured locations ordered from highest to lowest risk score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationComparison {
    pub level_type: LevelType,
    pub locations: Vec<RankedLocation>,
    pub highest_risk: Option<LocationId>,
    pub lowest_risk: Option<LocationId>,
    /// Locations skipped because no water level is known for them.
    pub unmeasured: Vec<LocationId>,
    pub generated_at: DateTime<Utc>,
}

/// Ranks one location; `None` when it has no water level to project from.
pub fn rank_location(indicators: &IndicatorSet, factors: &RiskFactors) -> Option<RankedLocation> {
    let current = indicators.water_level_m?;

    let projection = project_water_levels(indicators, ProjectionHorizon::ShortTerm, Utc::now());
    let predicted = projection
        .point(CHANGE_DAY)
        .map(|point| point.water_level_m)
        .unwrap_or(current);
    let crisis_probability = horizon(overall_probability(factors), OUTLOOK_MONTHS).probability;

    let level_score = ((RANKING_DEPTH_M - current) / RANKING_DEPTH_M).max(0.0);
    let falling_score = if predicted < current { 1.0 } else { 0.0 };
    let risk_score = LEVEL_WEIGHT * level_score
        + FALLING_WEIGHT * falling_score
        + OUTLOOK_WEIGHT * crisis_probability;

    Some(RankedLocation {
        location: indicators.location.clone(),
        current_level_m: current,
        predicted_change_30d_m: round2(predicted - current),
        crisis_probability_3m: crisis_probability,
        risk_score: round3(risk_score),
    })
}

pub fn build_comparison(
    level: LevelType,
    mut ranked: Vec<RankedLocation>,
    unmeasured: Vec<LocationId>,
    generated_at: DateTime<Utc>,
) -> LocationComparison {
    ranked.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.location.cmp(&b.location))
    });

    LocationComparison {
        level_type: level,
        highest_risk: ranked.first().map(|entry| entry.location.clone()),
        lowest_risk: ranked.last().map(|entry| entry.location.clone()),
        locations: ranked,
        unmeasured,
        generated_at,
    }
}
