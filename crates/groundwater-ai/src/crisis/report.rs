use super::domain::{CrisisAssessment, DecisionPath, Severity, Strategy};
use super::risk::RiskFactors;
use crate::indicators::{IndicatorSet, LevelType, LocationId};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Externally visible crisis assessment for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisReport {
    pub location: LocationId,
    pub level_type: LevelType,
    pub severity: Severity,
    pub days_to_crisis: u32,
    pub crisis_date: NaiveDate,
    pub probability: f64,
    pub confidence: f64,
    pub combined_risk: f64,
    pub strategy: Strategy,
    pub decided_by: DecisionPath,
    pub recommendations: Vec<String>,
    pub indicators: IndicatorSet,
    pub risk_factors: RiskFactors,
    pub data_sources: BTreeSet<String>,
    pub last_updated: DateTime<Utc>,
}

/// Packages an assessment with its inputs; consumes nothing the caller still needs.
pub fn assemble(
    indicators: &IndicatorSet,
    assessment: &CrisisAssessment,
    recommendations: Vec<String>,
    generated_at: DateTime<Utc>,
) -> CrisisReport {
    let crisis_date = indicators
        .observed_on
        .checked_add_days(Days::new(u64::from(assessment.days_to_crisis)))
        .unwrap_or(NaiveDate::MAX);

    CrisisReport {
        location: indicators.location.clone(),
        level_type: indicators.level,
        severity: assessment.severity,
        days_to_crisis: assessment.days_to_crisis,
        crisis_date,
        probability: assessment.probability,
        confidence: round3(assessment.confidence),
        combined_risk: round3(assessment.combined_risk),
        strategy: assessment.requested_strategy,
        decided_by: assessment.decided_by,
        recommendations,
        indicators: indicators.clone(),
        risk_factors: assessment.risk_factors.clone(),
        data_sources: assessment.data_sources.clone(),
        last_updated: generated_at,
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
