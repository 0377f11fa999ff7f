//! Learned severity classifiers.
//!
//! A model only ever decides the severity label; days, probability and
//! confidence are derived from that label by the engine exactly as for the
//! rule-based paths.

use super::classifier::Breakpoints;
use super::domain::Severity;
use crate::indicators::IndicatorSet;
use tracing::info;

pub const DEFAULT_NEIGHBOURS: usize = 3;

const FEATURE_COUNT: usize = 3;

/// Raw `[rainfall, resource, extraction]` inputs for a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFeatures {
    pub rainfall_mm: f64,
    pub resource_ham: f64,
    pub extraction_ham: f64,
}

impl ModelFeatures {
    /// `None` unless all three figures are present, finite and non-negative.
    pub fn from_indicators(indicators: &IndicatorSet) -> Option<Self> {
        let features = Self {
            rainfall_mm: indicators.rainfall_mm?,
            resource_ham: indicators.resource_ham?,
            extraction_ham: indicators.extraction_ham?,
        };
        features.is_valid().then_some(features)
    }

    fn is_valid(&self) -> bool {
        [self.rainfall_mm, self.resource_ham, self.extraction_ham]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }

    // Volumes span several orders of magnitude across states.
    fn vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.rainfall_mm,
            self.resource_ham.ln_1p(),
            self.extraction_ham.ln_1p(),
        ]
    }
}

/// Pluggable severity decision, shared read-only across requests.
pub trait SeverityModel: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, features: &ModelFeatures) -> Option<Severity>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub features: ModelFeatures,
    pub label: Severity,
}

/// k-nearest-neighbour vote over min-max scaled features.
#[derive(Debug, Clone)]
pub struct NearestNeighbourModel {
    k: usize,
    points: Vec<([f64; FEATURE_COUNT], Severity)>,
    minimum: [f64; FEATURE_COUNT],
    span: [f64; FEATURE_COUNT],
}

impl NearestNeighbourModel {
    /// Returns `None` when there are fewer valid samples than neighbours to consult.
    pub fn train(samples: &[TrainingSample], k: usize) -> Option<Self> {
        let raw: Vec<([f64; FEATURE_COUNT], Severity)> = samples
            .iter()
            .filter(|sample| sample.features.is_valid())
            .map(|sample| (sample.features.vector(), sample.label))
            .collect();

        if k == 0 || raw.len() < k {
            return None;
        }

        let mut minimum = [f64::INFINITY; FEATURE_COUNT];
        let mut maximum = [f64::NEG_INFINITY; FEATURE_COUNT];
        for (vector, _) in &raw {
            for axis in 0..FEATURE_COUNT {
                minimum[axis] = minimum[axis].min(vector[axis]);
                maximum[axis] = maximum[axis].max(vector[axis]);
            }
        }

        let mut span = [1.0; FEATURE_COUNT];
        for axis in 0..FEATURE_COUNT {
            let width = maximum[axis] - minimum[axis];
            if width > f64::EPSILON {
                span[axis] = width;
            }
        }

        let points = raw
            .into_iter()
            .map(|(vector, label)| (scale(&vector, &minimum, &span), label))
            .collect();

        Some(Self {
            k,
            points,
            minimum,
            span,
        })
    }

    /// Labels each row with the ratio breakpoints; rows without a positive resource are skipped.
    pub fn train_from_indicators(
        sets: &[IndicatorSet],
        k: usize,
        breakpoints: &Breakpoints,
    ) -> Option<Self> {
        let samples: Vec<TrainingSample> = sets
            .iter()
            .filter_map(|set| {
                let ratio = set.extraction_ratio()?;
                let features = ModelFeatures::from_indicators(set)?;
                Some(TrainingSample {
                    features,
                    label: breakpoints.classify(ratio),
                })
            })
            .collect();

        let model = Self::train(&samples, k);
        match &model {
            Some(trained) => info!(
                samples = trained.len(),
                neighbours = k,
                "trained nearest-neighbour severity model"
            ),
            None => info!(
                samples = samples.len(),
                neighbours = k,
                "not enough samples to train severity model"
            ),
        }
        model
    }

    pub fn neighbours(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl SeverityModel for NearestNeighbourModel {
    fn name(&self) -> &str {
        "nearest-neighbour"
    }

    fn predict(&self, features: &ModelFeatures) -> Option<Severity> {
        if !features.is_valid() {
            return None;
        }

        let query = scale(&features.vector(), &self.minimum, &self.span);
        let mut ranked: Vec<(f64, Severity)> = self
            .points
            .iter()
            .map(|(point, label)| (squared_distance(point, &query), *label))
            .collect();
        ranked.sort_by(|left, right| left.0.total_cmp(&right.0));

        let mut votes = [0usize; 4];
        for (_, label) in ranked.iter().take(self.k) {
            votes[label.index()] += 1;
        }

        // Ties resolve toward the more severe label.
        Severity::ALL
            .iter()
            .copied()
            .max_by_key(|severity| (votes[severity.index()], severity.index()))
            .filter(|severity| votes[severity.index()] > 0)
    }
}

fn scale(
    vector: &[f64; FEATURE_COUNT],
    minimum: &[f64; FEATURE_COUNT],
    span: &[f64; FEATURE_COUNT],
) -> [f64; FEATURE_COUNT] {
    let mut scaled = [0.0; FEATURE_COUNT];
    for axis in 0..FEATURE_COUNT {
        scaled[axis] = (vector[axis] - minimum[axis]) / span[axis];
    }
    scaled
}

fn squared_distance(left: &[f64; FEATURE_COUNT], right: &[f64; FEATURE_COUNT]) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum()
}
