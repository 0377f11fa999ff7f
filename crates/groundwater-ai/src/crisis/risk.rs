//! Normalizes raw indicators into risk factors in `[0, 1]`.
//!
//! Every function here is total: a missing measurement resolves to
//! [`NEUTRAL_RISK`] and is recorded in [`RiskFactors::defaulted`] so the
//! classifier can lower its confidence instead of failing.

use crate::indicators::{GroundwaterTrend, IndicatorSet, WaterQuality};
use serde::Serialize;

pub const NEUTRAL_RISK: f64 = 0.5;

/// Extraction ratios above this are treated as saturated before the final cap.
const RATIO_CEILING: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    Temperature,
    Rainfall,
    Level,
    Extraction,
    Quality,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactors {
    pub temperature: f64,
    pub rainfall: f64,
    pub level: f64,
    pub extraction: f64,
    pub quality: f64,
    pub trend: f64,
    pub defaulted: Vec<RiskFactorKind>,
}

impl RiskFactors {
    pub fn get(&self, kind: RiskFactorKind) -> f64 {
        match kind {
            RiskFactorKind::Temperature => self.temperature,
            RiskFactorKind::Rainfall => self.rainfall,
            RiskFactorKind::Level => self.level,
            RiskFactorKind::Extraction => self.extraction,
            RiskFactorKind::Quality => self.quality,
            RiskFactorKind::Trend => self.trend,
        }
    }

    /// How many of `kinds` fell back to a default value.
    pub fn defaulted_among(&self, kinds: &[RiskFactorKind]) -> usize {
        kinds
            .iter()
            .filter(|kind| self.defaulted.contains(kind))
            .count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RiskCalculator {
    level_threshold_m: f64,
}

impl RiskCalculator {
    pub fn new(level_threshold_m: f64) -> Self {
        Self { level_threshold_m }
    }

    pub fn level_threshold_m(&self) -> f64 {
        self.level_threshold_m
    }

    pub fn factors(&self, indicators: &IndicatorSet) -> RiskFactors {
        let mut defaulted = Vec::new();
        let weather = indicators.weather.as_ref();

        let temperature = match weather.and_then(|w| w.temperature_c) {
            Some(celsius) => temperature_risk(celsius),
            None => {
                defaulted.push(RiskFactorKind::Temperature);
                NEUTRAL_RISK
            }
        };

        let rainfall = match weather.and_then(|w| w.rain_days_forecast) {
            Some(days) => rainfall_risk(days),
            None => {
                defaulted.push(RiskFactorKind::Rainfall);
                NEUTRAL_RISK
            }
        };

        let level = match indicators.water_level_m {
            Some(depth) => level_risk(depth, self.level_threshold_m),
            None => {
                defaulted.push(RiskFactorKind::Level);
                NEUTRAL_RISK
            }
        };

        // No resource figure means no extraction pressure data, not neutral pressure.
        let ratio = indicators.extraction_ratio();
        if ratio.is_none() {
            defaulted.push(RiskFactorKind::Extraction);
        }
        let extraction = extraction_risk(ratio.unwrap_or(0.0));

        if indicators.quality == WaterQuality::Unknown {
            defaulted.push(RiskFactorKind::Quality);
        }
        if indicators.trend == GroundwaterTrend::Unknown {
            defaulted.push(RiskFactorKind::Trend);
        }

        RiskFactors {
            temperature,
            rainfall,
            level,
            extraction,
            quality: quality_risk(indicators.quality),
            trend: trend_risk(indicators.trend),
            defaulted,
        }
    }
}

pub fn level_risk(water_level_m: f64, threshold_m: f64) -> f64 {
    if threshold_m <= 0.0 || !water_level_m.is_finite() {
        return NEUTRAL_RISK;
    }
    ((threshold_m - water_level_m) / threshold_m).clamp(0.0, 1.0)
}

pub fn quality_risk(quality: WaterQuality) -> f64 {
    match quality {
        WaterQuality::Excellent => 0.05,
        WaterQuality::Good => 0.1,
        WaterQuality::Moderate => 0.3,
        WaterQuality::Poor => 0.6,
        WaterQuality::Critical => 0.9,
        WaterQuality::Unknown => NEUTRAL_RISK,
    }
}

pub fn trend_risk(trend: GroundwaterTrend) -> f64 {
    match trend {
        GroundwaterTrend::Improving => 0.1,
        GroundwaterTrend::Stable => 0.3,
        GroundwaterTrend::Declining => 0.7,
        GroundwaterTrend::Unknown => NEUTRAL_RISK,
    }
}

pub fn extraction_risk(ratio: f64) -> f64 {
    if !ratio.is_finite() {
        return 0.0;
    }
    ratio.clamp(0.0, RATIO_CEILING).min(1.0)
}

/// Risk climbs linearly from 30 °C and saturates at 45 °C.
pub fn temperature_risk(celsius: f64) -> f64 {
    ((celsius - 30.0) / 15.0).clamp(0.0, 1.0)
}

/// Five or more forecast rain days carry no rainfall risk.
pub fn rainfall_risk(rain_days: u8) -> f64 {
    ((5.0 - f64::from(rain_days)) / 5.0).clamp(0.0, 1.0)
}
