//! Rule-based water condition alerts, independent of crisis scoring.

use crate::indicators::{GroundwaterTrend, IndicatorSet, LevelType, LocationId, WaterQuality};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

const EXTREME_LEVEL_M: f64 = 5.0;
const LOW_LEVEL_M: f64 = 10.0;

/// Alert tiers, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterAlertLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl WaterAlertLevel {
    pub fn label(&self) -> &'static str {
        match self {
            WaterAlertLevel::Critical => "critical",
            WaterAlertLevel::High => "high",
            WaterAlertLevel::Medium => "medium",
            WaterAlertLevel::Low => "low",
        }
    }
}

impl fmt::Display for WaterAlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterAlert {
    pub location: LocationId,
    pub level_type: LevelType,
    pub alert_level: WaterAlertLevel,
    pub message: String,
    pub water_level_m: Option<f64>,
    pub quality: WaterQuality,
    pub trend: GroundwaterTrend,
    pub last_updated: NaiveDate,
    pub citation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterAlertDigest {
    pub level_type: LevelType,
    pub alerts: Vec<WaterAlert>,
    pub total_alerts: usize,
    pub critical_count: usize,
    pub checked: usize,
    pub generated_at: DateTime<Utc>,
}

/// First matching rule wins: very shallow, shallow, poor quality, declining.
pub fn water_alert_for(indicators: &IndicatorSet) -> Option<WaterAlert> {
    let (alert_level, message) = match indicators.water_level_m {
        Some(level) if level < EXTREME_LEVEL_M => (
            WaterAlertLevel::Critical,
            format!("Extremely low groundwater level: {level}m"),
        ),
        Some(level) if level < LOW_LEVEL_M => (
            WaterAlertLevel::High,
            format!("Low groundwater level: {level}m"),
        ),
        _ if matches!(indicators.quality, WaterQuality::Poor | WaterQuality::Critical) => (
            WaterAlertLevel::Medium,
            format!("Water quality concern: {}", indicators.quality.label()),
        ),
        _ if indicators.trend == GroundwaterTrend::Declining => (
            WaterAlertLevel::Low,
            "Declining groundwater trend".to_string(),
        ),
        _ => return None,
    };

    Some(WaterAlert {
        location: indicators.location.clone(),
        level_type: indicators.level,
        alert_level,
        message,
        water_level_m: indicators.water_level_m,
        quality: indicators.quality,
        trend: indicators.trend,
        last_updated: indicators.observed_on,
        citation: indicators.citation.clone(),
    })
}

pub fn build_water_digest<'a, I>(
    level: LevelType,
    indicators: I,
    generated_at: DateTime<Utc>,
) -> WaterAlertDigest
where
    I: IntoIterator<Item = &'a IndicatorSet>,
{
    let mut checked = 0;
    let mut alerts: Vec<WaterAlert> = indicators
        .into_iter()
        .inspect(|_| checked += 1)
        .filter_map(water_alert_for)
        .collect();

    alerts.sort_by(|a, b| {
        a.alert_level
            .cmp(&b.alert_level)
            .then_with(|| a.location.cmp(&b.location))
    });

    let critical_count = alerts
        .iter()
        .filter(|alert| alert.alert_level == WaterAlertLevel::Critical)
        .count();

    WaterAlertDigest {
        level_type: level,
        total_alerts: alerts.len(),
        critical_count,
        alerts,
        checked,
        generated_at,
    }
}
