//! Crisis scoring: risk factors, severity classification, recommendations, and reports.
//!
//! The [`CrisisEngine`] is a pure function of an [`IndicatorSet`](crate::indicators::IndicatorSet)
//! and a [`Strategy`]. All I/O (indicator lookups and weather fetches) happens in the
//! [`CrisisService`] before the engine runs, so every assessment is request-local and
//! the engine itself holds nothing mutable.

pub mod alerts;
pub mod classifier;
pub mod domain;
pub mod model;
pub mod outlook;
pub mod projection;
pub mod ranking;
pub mod recommendations;
pub mod report;
pub mod risk;
pub mod router;
pub mod service;
pub mod water_alerts;

#[cfg(test)]
mod tests;

pub use alerts::{AlertDigest, CrisisAlert};
pub use classifier::{
    Breakpoints, CrisisEngine, JitterSource, ScoringConfig, SeededJitter, FALLBACK_CONFIDENCE,
};
pub use domain::{CrisisAssessment, DecisionPath, Severity, Strategy};
pub use model::{
    ModelFeatures, NearestNeighbourModel, SeverityModel, TrainingSample, DEFAULT_NEIGHBOURS,
};
pub use outlook::{HorizonForecast, OutlookLevel, ProbabilityOutlook};
pub use projection::{LevelProjection, ProjectedLevel, ProjectionHorizon, DEFAULT_WATER_LEVEL_M};
pub use ranking::{LocationComparison, RankedLocation};
pub use recommendations::recommendations_for;
pub use report::CrisisReport;
pub use risk::{RiskCalculator, RiskFactorKind, RiskFactors};
pub use router::crisis_router;
pub use service::{AssessmentError, AssessmentRequest, CrisisService};
pub use water_alerts::{WaterAlert, WaterAlertDigest, WaterAlertLevel};
