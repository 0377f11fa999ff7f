use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::alerts::{build_digest, AlertDigest};
use super::classifier::CrisisEngine;
use super::domain::Strategy;
use super::outlook::{forecast_probability, ProbabilityOutlook};
use super::projection::{project_water_levels, LevelProjection, ProjectionHorizon};
use super::ranking::{build_comparison, rank_location, LocationComparison};
use super::recommendations::recommendations_for;
use super::report::{assemble, CrisisReport};
use super::water_alerts::{build_water_digest, WaterAlertDigest};
use crate::indicators::{
    IndicatorOverrides, IndicatorProvider, IndicatorSet, LevelType, LocationId, LookupError,
    WeatherSource,
};

/// One assessment call: which location, how to score it, and any what-if values.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub location: LocationId,
    pub level: LevelType,
    pub strategy: Option<Strategy>,
    pub overrides: IndicatorOverrides,
    pub as_of: Option<NaiveDate>,
}

impl AssessmentRequest {
    pub fn new(location: LocationId, level: LevelType) -> Self {
        Self {
            location,
            level,
            strategy: None,
            overrides: IndicatorOverrides::default(),
            as_of: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_overrides(mut self, overrides: IndicatorOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

/// Service composing the indicator provider, weather source, and scoring engine.
pub struct CrisisService<P> {
    provider: Arc<P>,
    engine: Arc<CrisisEngine>,
    weather: Arc<WeatherSource>,
    default_strategy: Strategy,
}

impl<P> CrisisService<P>
where
    P: IndicatorProvider + 'static,
{
    pub fn new(provider: Arc<P>, engine: CrisisEngine, weather: WeatherSource) -> Self {
        Self {
            provider,
            engine: Arc::new(engine),
            weather: Arc::new(weather),
            default_strategy: Strategy::default(),
        }
    }

    pub fn with_default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn default_strategy(&self) -> Strategy {
        self.default_strategy
    }

    pub fn engine(&self) -> &CrisisEngine {
        &self.engine
    }

    pub fn locations(&self, level: LevelType) -> Vec<LocationId> {
        self.provider.locations(level)
    }

    /// Raw indicators as the provider knows them, without weather.
    pub fn indicators(
        &self,
        location: &LocationId,
        level: LevelType,
    ) -> Result<IndicatorSet, AssessmentError> {
        Ok(self.provider.lookup(location, level)?)
    }

    /// Look up, optionally override, score and package one location.
    pub async fn assess(
        &self,
        request: AssessmentRequest,
    ) -> Result<CrisisReport, AssessmentError> {
        request
            .overrides
            .validate()
            .map_err(AssessmentError::InvalidOverrides)?;

        let strategy = request.strategy.unwrap_or(self.default_strategy);
        let mut indicators = self.provider.lookup(&request.location, request.level)?;
        indicators.apply(&request.overrides);
        if let Some(date) = request.as_of {
            indicators.observed_on = date;
        }

        let report = self.score(indicators, strategy).await;
        info!(
            location = %report.location,
            level = %report.level_type,
            severity = %report.severity,
            days_to_crisis = report.days_to_crisis,
            strategy = %strategy,
            "crisis assessment completed"
        );
        Ok(report)
    }

    /// Scores every known location and keeps the High and Critical ones.
    pub async fn alerts(
        &self,
        level: LevelType,
        strategy: Option<Strategy>,
    ) -> Result<AlertDigest, AssessmentError> {
        let strategy = strategy.unwrap_or(self.default_strategy);
        let mut reports = Vec::new();
        for indicators in self.sweep(level)? {
            reports.push(self.score(indicators, strategy).await);
        }

        let digest = build_digest(reports, Utc::now());
        info!(
            level = %level,
            assessed = digest.assessed,
            alerts = digest.total_alerts,
            critical = digest.critical_count,
            "crisis alert sweep completed"
        );
        Ok(digest)
    }

    /// Multi-horizon probability forecast from the hydrological indicators.
    pub fn outlook(
        &self,
        location: &LocationId,
        level: LevelType,
        overrides: &IndicatorOverrides,
    ) -> Result<ProbabilityOutlook, AssessmentError> {
        overrides
            .validate()
            .map_err(AssessmentError::InvalidOverrides)?;

        let mut indicators = self.provider.lookup(location, level)?;
        indicators.apply(overrides);
        let factors = self.engine.risk_factors(&indicators);
        Ok(forecast_probability(&indicators, &factors, Utc::now()))
    }

    /// Projects the water level day by day from the observation date.
    pub fn projection(
        &self,
        location: &LocationId,
        level: LevelType,
        horizon: ProjectionHorizon,
        water_level_m: Option<f64>,
        as_of: Option<NaiveDate>,
    ) -> Result<LevelProjection, AssessmentError> {
        let overrides = IndicatorOverrides {
            water_level_m,
            ..IndicatorOverrides::default()
        };
        overrides
            .validate()
            .map_err(AssessmentError::InvalidOverrides)?;

        let mut indicators = self.provider.lookup(location, level)?;
        indicators.apply(&overrides);
        if let Some(date) = as_of {
            indicators.observed_on = date;
        }
        Ok(project_water_levels(&indicators, horizon, Utc::now()))
    }

    /// Ranks every measured location by projected and forecast pressure.
    pub fn compare(&self, level: LevelType) -> Result<LocationComparison, AssessmentError> {
        let mut ranked = Vec::new();
        let mut unmeasured = Vec::new();

        for indicators in self.sweep(level)? {
            let factors = self.engine.risk_factors(&indicators);
            match rank_location(&indicators, &factors) {
                Some(entry) => ranked.push(entry),
                None => unmeasured.push(indicators.location),
            }
        }

        let comparison = build_comparison(level, ranked, unmeasured, Utc::now());
        info!(
            level = %level,
            ranked = comparison.locations.len(),
            unmeasured = comparison.unmeasured.len(),
            "location comparison completed"
        );
        Ok(comparison)
    }

    /// Rule-based depth, quality and trend alerts for every known location.
    pub fn water_alerts(&self, level: LevelType) -> Result<WaterAlertDigest, AssessmentError> {
        let indicators = self.sweep(level)?;
        let digest = build_water_digest(level, &indicators, Utc::now());
        info!(
            level = %level,
            checked = digest.checked,
            alerts = digest.total_alerts,
            critical = digest.critical_count,
            "water alert sweep completed"
        );
        Ok(digest)
    }

    /// Every location the provider answers for; unavailable lookups are skipped
    /// unless none succeed.
    fn sweep(&self, level: LevelType) -> Result<Vec<IndicatorSet>, AssessmentError> {
        let mut found = Vec::new();
        let mut unavailable = None;

        for location in self.provider.locations(level) {
            match self.provider.lookup(&location, level) {
                Ok(indicators) => found.push(indicators),
                Err(LookupError::NotFound { .. }) => {}
                Err(LookupError::Unavailable(reason)) => {
                    warn!(%location, %reason, "skipping location with unavailable indicators");
                    unavailable = Some(reason);
                }
            }
        }

        match unavailable {
            Some(reason) if found.is_empty() => Err(AssessmentError::Unavailable(reason)),
            _ => Ok(found),
        }
    }

    async fn score(&self, mut indicators: IndicatorSet, strategy: Strategy) -> CrisisReport {
        if strategy == Strategy::WeatherWeighted && indicators.weather.is_none() {
            indicators.weather = self
                .weather
                .current(&indicators.location, indicators.observed_on)
                .await;
        }

        let assessment = self.engine.classify(&indicators, strategy);
        let recommendations = recommendations_for(assessment.severity, assessment.days_to_crisis);
        assemble(&indicators, &assessment, recommendations, Utc::now())
    }
}

/// Error raised by the crisis service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("{level} '{location}' not found")]
    NotFound {
        location: LocationId,
        level: LevelType,
    },
    #[error("invalid indicator override: {0}")]
    InvalidOverrides(String),
    #[error("indicator data unavailable: {0}")]
    Unavailable(String),
}

impl From<LookupError> for AssessmentError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::NotFound { location, level } => {
                AssessmentError::NotFound { location, level }
            }
            LookupError::Unavailable(reason) => AssessmentError::Unavailable(reason),
        }
    }
}
