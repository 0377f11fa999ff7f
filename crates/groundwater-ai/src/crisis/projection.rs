//! Day-by-day water level projection.
//!
//! The curve is a seasonal swing of ±30% over a year, a slow 0.1%/day
//! drawdown and a small oscillation, starting from the current depth on
//! the indicator set's observation date.

use super::report::round3;
use crate::indicators::{IndicatorSet, LevelType, LocationId};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Depth assumed when neither the provider nor the caller knows the water level.
pub const DEFAULT_WATER_LEVEL_M: f64 = 10.0;

const SEASONAL_AMPLITUDE: f64 = 0.3;
const DAILY_DRAWDOWN: f64 = 0.001;
const OSCILLATION_M: f64 = 0.1;
const CONFIDENCE_START: f64 = 0.95;
const CONFIDENCE_DECAY: f64 = 0.005;
const CONFIDENCE_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionHorizon {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl ProjectionHorizon {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "short_term" | "short" => Some(Self::ShortTerm),
            "medium_term" | "medium" => Some(Self::MediumTerm),
            "long_term" | "long" => Some(Self::LongTerm),
            _ => None,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            ProjectionHorizon::ShortTerm => 30,
            ProjectionHorizon::MediumTerm => 90,
            ProjectionHorizon::LongTerm => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectionHorizon::ShortTerm => "short_term",
            ProjectionHorizon::MediumTerm => "medium_term",
            ProjectionHorizon::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for ProjectionHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedLevel {
    pub day: u32,
    pub date: NaiveDate,
    pub water_level_m: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProjection {
    pub location: LocationId,
    pub level_type: LevelType,
    pub current_level_m: f64,
    /// True when `current_level_m` is [`DEFAULT_WATER_LEVEL_M`] rather than a measurement.
    pub level_defaulted: bool,
    pub horizon: ProjectionHorizon,
    pub days: u32,
    pub points: Vec<ProjectedLevel>,
    pub generated_at: DateTime<Utc>,
}

impl LevelProjection {
    pub fn point(&self, day: u32) -> Option<&ProjectedLevel> {
        day.checked_sub(1)
            .and_then(|index| self.points.get(index as usize))
    }
}

pub fn project_water_levels(
    indicators: &IndicatorSet,
    horizon: ProjectionHorizon,
    generated_at: DateTime<Utc>,
) -> LevelProjection {
    let current = indicators.water_level_m;
    let current_level_m = current.unwrap_or(DEFAULT_WATER_LEVEL_M);
    let start = indicators.observed_on;

    let points = (1..=horizon.days())
        .map(|day| ProjectedLevel {
            day,
            date: start
                .checked_add_days(Days::new(u64::from(day)))
                .unwrap_or(NaiveDate::MAX),
            water_level_m: round2(projected_level(current_level_m, day)),
            confidence: round3(projection_confidence(day)),
        })
        .collect();

    LevelProjection {
        location: indicators.location.clone(),
        level_type: indicators.level,
        current_level_m,
        level_defaulted: current.is_none(),
        horizon,
        days: horizon.days(),
        points,
        generated_at,
    }
}

pub fn projected_level(current_level_m: f64, day: u32) -> f64 {
    let day = f64::from(day);
    let seasonal = 1.0 + SEASONAL_AMPLITUDE * (TAU * day / 365.0).sin();
    let drawdown = 1.0 - DAILY_DRAWDOWN * day;
    let oscillation = OSCILLATION_M * (0.1 * day).sin();
    (current_level_m * seasonal * drawdown + oscillation).max(0.0)
}

pub fn projection_confidence(day: u32) -> f64 {
    (CONFIDENCE_START - CONFIDENCE_DECAY * f64::from(day)).max(CONFIDENCE_FLOOR)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(level: Option<f64>) -> IndicatorSet {
        let mut set = IndicatorSet::new(LocationId::new("Pune"), LevelType::District);
        set.water_level_m = level;
        set.observed_on = NaiveDate::from_ymd_opt(2024, 10, 15).expect("valid date");
        set
    }

    #[test]
    fn horizons_cover_a_month_a_quarter_and_a_year() {
        for (horizon, days) in [
            (ProjectionHorizon::ShortTerm, 30),
            (ProjectionHorizon::MediumTerm, 90),
            (ProjectionHorizon::LongTerm, 365),
        ] {
            let projection = project_water_levels(&indicators(Some(10.0)), horizon, Utc::now());
            assert_eq!(projection.days, days);
            assert_eq!(projection.points.len(), days as usize);
        }
        assert_eq!(ProjectionHorizon::default(), ProjectionHorizon::MediumTerm);
        assert_eq!(ProjectionHorizon::parse("Long-Term"), Some(ProjectionHorizon::LongTerm));
        assert_eq!(ProjectionHorizon::parse("decade"), None);
    }

    #[test]
    fn curve_follows_season_drawdown_and_oscillation() {
        let projection = project_water_levels(
            &indicators(Some(10.0)),
            ProjectionHorizon::LongTerm,
            Utc::now(),
        );

        let first = projection.point(1).expect("day one");
        assert_eq!(first.water_level_m, 10.05);
        assert_eq!(first.confidence, 0.945);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 10, 16).expect("valid date"));

        assert_eq!(projection.point(30).map(|p| p.water_level_m), Some(11.15));
        assert_eq!(projection.point(30).map(|p| p.confidence), Some(0.8));
        assert_eq!(projection.point(180).map(|p| p.water_level_m), Some(8.23));
        assert_eq!(projection.point(365).map(|p| p.water_level_m), Some(6.26));
        assert!(projection.points[89..].iter().all(|p| p.confidence == 0.5));
        assert!(projection.point(0).is_none());
    }

    #[test]
    fn dry_wells_never_project_negative_depths() {
        let projection = project_water_levels(
            &indicators(Some(0.0)),
            ProjectionHorizon::MediumTerm,
            Utc::now(),
        );
        assert!(projection.points.iter().all(|p| p.water_level_m >= 0.0));
        assert_eq!(projection.point(40).map(|p| p.water_level_m), Some(0.0));
    }

    #[test]
    fn unknown_level_falls_back_to_default_depth() {
        let projection = project_water_levels(
            &indicators(None),
            ProjectionHorizon::ShortTerm,
            Utc::now(),
        );
        assert!(projection.level_defaulted);
        assert_eq!(projection.current_level_m, DEFAULT_WATER_LEVEL_M);
    }
}
