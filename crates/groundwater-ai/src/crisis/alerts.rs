use super::domain::Severity;
use super::report::CrisisReport;
use crate::indicators::{LevelType, LocationId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;

const ALERT_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisAlert {
    pub location: LocationId,
    pub level_type: LevelType,
    pub severity: Severity,
    pub days_to_crisis: u32,
    pub probability: f64,
    pub water_level_m: Option<f64>,
    pub recommendations: Vec<String>,
}

impl CrisisAlert {
    fn from_report(report: CrisisReport) -> Self {
        let mut recommendations = report.recommendations;
        recommendations.truncate(ALERT_RECOMMENDATIONS);
        Self {
            location: report.location,
            level_type: report.level_type,
            severity: report.severity,
            days_to_crisis: report.days_to_crisis,
            probability: report.probability,
            water_level_m: report.indicators.water_level_m,
            recommendations,
        }
    }
}

/// High and Critical locations, most urgent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDigest {
    pub alerts: Vec<CrisisAlert>,
    pub total_alerts: usize,
    pub critical_count: usize,
    pub assessed: usize,
    pub generated_at: DateTime<Utc>,
}

pub fn build_digest<I>(reports: I, generated_at: DateTime<Utc>) -> AlertDigest
where
    I: IntoIterator<Item = CrisisReport>,
{
    let mut assessed = 0;
    let mut alerts: Vec<CrisisAlert> = reports
        .into_iter()
        .inspect(|_| assessed += 1)
        .filter(|report| report.severity >= Severity::High)
        .map(CrisisAlert::from_report)
        .collect();

    alerts.sort_by_key(|alert| (Reverse(alert.severity), alert.days_to_crisis));

    let critical_count = alerts
        .iter()
        .filter(|alert| alert.severity == Severity::Critical)
        .count();

    AlertDigest {
        total_alerts: alerts.len(),
        critical_count,
        alerts,
        assessed,
        generated_at,
    }
}
