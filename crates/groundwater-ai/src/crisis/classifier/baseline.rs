use super::super::domain::Severity;
use std::sync::atomic::{AtomicU64, Ordering};

/// Confidence reported when neither weather nor a trained model informed the decision.
pub const FALLBACK_CONFIDENCE: f64 = 0.60;

const MAX_CONFIDENCE: f64 = 0.95;
const MIN_CONFIDENCE: f64 = 0.30;
const DEFAULTED_FACTOR_PENALTY: f64 = 0.05;
const JITTER_FRACTION: f64 = 0.3;

pub fn baseline_days(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 15,
        Severity::High => 30,
        Severity::Moderate => 45,
        Severity::Low => 60,
    }
}

pub fn baseline_probability(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 0.85,
        Severity::High => 0.70,
        Severity::Moderate => 0.55,
        Severity::Low => 0.30,
    }
}

/// `min(0.95, 0.5 + 0.4·risk)`, less a penalty per factor that fell back to a default.
pub fn blended_confidence(combined_risk: f64, defaulted_factors: usize) -> f64 {
    let base = (0.5 + combined_risk.clamp(0.0, 1.0) * 0.4).min(MAX_CONFIDENCE);
    let penalty = DEFAULTED_FACTOR_PENALTY * defaulted_factors as f64;
    if defaulted_factors == 0 {
        base
    } else {
        (base - penalty).max(MIN_CONFIDENCE)
    }
}

/// Random source for presentation jitter, kept out of the scoring path.
pub trait JitterSource: Send + Sync {
    /// Uniform sample in `[-1, 1]`.
    fn next_unit(&self) -> f64;
}

/// Lock-free splitmix64 sequence; reproducible for a given seed.
#[derive(Debug)]
pub struct SeededJitter {
    state: AtomicU64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_unit(&self) -> f64 {
        let mut z = self
            .state
            .fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::Relaxed)
            .wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;

        let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
        unit * 2.0 - 1.0
    }
}

/// Shifts `base` by at most 30 % in either direction, never below one day.
pub fn jittered_days(base: u32, source: &dyn JitterSource) -> u32 {
    let unit = source.next_unit().clamp(-1.0, 1.0);
    let offset = (f64::from(base) * JITTER_FRACTION * unit).round();
    (f64::from(base) + offset).max(1.0) as u32
}
