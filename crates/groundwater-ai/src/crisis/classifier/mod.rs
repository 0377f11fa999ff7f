mod baseline;
mod config;
pub(crate) mod policy;

pub use baseline::{
    baseline_days, baseline_probability, blended_confidence, jittered_days, JitterSource,
    SeededJitter, FALLBACK_CONFIDENCE,
};
pub use config::{Breakpoints, HydrologicalWeights, ScoringConfig, WeatherWeights};

use super::domain::{CrisisAssessment, Strategy};
use super::model::{ModelFeatures, SeverityModel};
use super::risk::{RiskCalculator, RiskFactors};
use crate::indicators::IndicatorSet;
use policy::Decision;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const FALLBACK_WEATHER_TAG: &str = "fallback-weather-unavailable";
const FALLBACK_MODEL_TAG: &str = "fallback-model-unavailable";

/// Stateless scorer applying one strategy to one indicator set.
///
/// The engine never fails: sparse inputs lower confidence and missing
/// upstreams route to a fallback decision that is recorded in the
/// assessment's provenance.
#[derive(Clone)]
pub struct CrisisEngine {
    config: ScoringConfig,
    calculator: RiskCalculator,
    model: Option<Arc<dyn SeverityModel>>,
    jitter: Option<Arc<dyn JitterSource>>,
}

impl CrisisEngine {
    pub fn new(config: ScoringConfig) -> Self {
        let calculator = RiskCalculator::new(config.level_threshold_m);
        Self {
            config,
            calculator,
            model: None,
            jitter: None,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn SeverityModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Enables presentation jitter on `days_to_crisis`.
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|model| model.name())
    }

    pub fn risk_factors(&self, indicators: &IndicatorSet) -> RiskFactors {
        self.calculator.factors(indicators)
    }

    pub fn classify(&self, indicators: &IndicatorSet, strategy: Strategy) -> CrisisAssessment {
        let factors = self.calculator.factors(indicators);
        let mut fallbacks = Vec::new();
        let decision = self.decide(indicators, &factors, strategy, &mut fallbacks);

        let base_days = baseline_days(decision.severity);
        let days_to_crisis = match &self.jitter {
            Some(source) => jittered_days(base_days, source.as_ref()),
            None => base_days,
        };

        let mut data_sources: BTreeSet<String> = indicators.sources.clone();
        if let Some(weather) = &indicators.weather {
            data_sources.insert(weather.origin.source_tag().to_string());
        }
        data_sources.insert(decision.path.source_tag().to_string());
        data_sources.extend(fallbacks.iter().map(|tag| tag.to_string()));
        data_sources.extend(decision.notes.iter().map(|note| note.to_string()));

        debug!(
            location = %indicators.location,
            requested = %strategy,
            decided_by = decision.path.source_tag(),
            severity = %decision.severity,
            combined_risk = decision.combined_risk,
            "classified indicator set"
        );

        CrisisAssessment {
            severity: decision.severity,
            days_to_crisis,
            probability: baseline_probability(decision.severity),
            confidence: decision.confidence,
            combined_risk: decision.combined_risk,
            requested_strategy: strategy,
            decided_by: decision.path,
            risk_factors: factors,
            data_sources,
        }
    }

    fn decide(
        &self,
        indicators: &IndicatorSet,
        factors: &RiskFactors,
        strategy: Strategy,
        fallbacks: &mut Vec<&'static str>,
    ) -> Decision {
        match strategy {
            Strategy::WeatherWeighted if indicators.weather.is_some() => {
                policy::decide_weather_weighted(factors, &self.config)
            }
            Strategy::WeatherWeighted => {
                fallbacks.push(FALLBACK_WEATHER_TAG);
                if indicators.resource_ham.map(|r| r > 0.0).unwrap_or(false) {
                    policy::decide_ratio_threshold(indicators, factors, &self.config)
                } else {
                    policy::decide_seasonal(indicators, factors, &self.config)
                }
            }
            Strategy::Hydrological => policy::decide_hydrological(factors, &self.config),
            Strategy::RatioThreshold => {
                policy::decide_ratio_threshold(indicators, factors, &self.config)
            }
            Strategy::TrainedModel => {
                let predicted = self.model.as_ref().and_then(|model| {
                    ModelFeatures::from_indicators(indicators)
                        .and_then(|features| model.predict(&features))
                });
                match predicted {
                    Some(severity) => policy::decide_from_model(severity, factors),
                    None => {
                        fallbacks.push(FALLBACK_MODEL_TAG);
                        policy::decide_ratio_threshold(indicators, factors, &self.config)
                    }
                }
            }
        }
    }
}

impl Default for CrisisEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
