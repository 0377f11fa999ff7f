use super::normalizer::normalize_location;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Case-normalized location key shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(raw: &str) -> Self {
        Self(normalize_location(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative granularity of an assessed location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    State,
    City,
    #[default]
    District,
}

impl LevelType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "state" => Some(Self::State),
            "city" => Some(Self::City),
            "district" => Some(Self::District),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LevelType::State => "state",
            LevelType::City => "city",
            LevelType::District => "district",
        }
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterQuality {
    Excellent,
    Good,
    Moderate,
    Poor,
    Critical,
    #[default]
    Unknown,
}

impl WaterQuality {
    /// Lenient label parsing; anything unrecognised reads as `Unknown`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "moderate" => Self::Moderate,
            "poor" => Self::Poor,
            "critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaterQuality::Excellent => "Excellent",
            WaterQuality::Good => "Good",
            WaterQuality::Moderate => "Moderate",
            WaterQuality::Poor => "Poor",
            WaterQuality::Critical => "Critical",
            WaterQuality::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundwaterTrend {
    Improving,
    Stable,
    Declining,
    #[default]
    Unknown,
}

impl GroundwaterTrend {
    /// Monitoring feeds label steep declines "Critical"; those read as `Declining`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "improving" | "rising" => Self::Improving,
            "stable" => Self::Stable,
            "declining" | "falling" | "critical" => Self::Declining,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroundwaterTrend::Improving => "Improving",
            GroundwaterTrend::Stable => "Stable",
            GroundwaterTrend::Declining => "Declining",
            GroundwaterTrend::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherOrigin {
    Live,
    Seasonal,
}

impl WeatherOrigin {
    pub fn source_tag(&self) -> &'static str {
        match self {
            WeatherOrigin::Live => "weather-live",
            WeatherOrigin::Seasonal => "weather-seasonal",
        }
    }
}

/// Weather context attached when a weather source answered for the location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherContext {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub rain_days_forecast: Option<u8>,
    pub origin: WeatherOrigin,
}

/// Raw indicators for one assessed location. Any measurement may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub location: LocationId,
    pub level: LevelType,
    pub water_level_m: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub resource_ham: Option<f64>,
    pub extraction_ham: Option<f64>,
    pub quality: WaterQuality,
    pub trend: GroundwaterTrend,
    pub weather: Option<WeatherContext>,
    /// Monitoring wells behind the level, quality and trend figures.
    pub wells_monitored: Option<u32>,
    /// Reference of the published assessment the figures come from.
    pub citation: Option<String>,
    pub observed_on: NaiveDate,
    pub sources: BTreeSet<String>,
}

impl IndicatorSet {
    pub fn new(location: LocationId, level: LevelType) -> Self {
        Self {
            location,
            level,
            water_level_m: None,
            rainfall_mm: None,
            resource_ham: None,
            extraction_ham: None,
            quality: WaterQuality::Unknown,
            trend: GroundwaterTrend::Unknown,
            weather: None,
            wells_monitored: None,
            citation: None,
            observed_on: Utc::now().date_naive(),
            sources: BTreeSet::new(),
        }
    }

    /// `extraction / resource`, defined only for a positive resource figure.
    pub fn extraction_ratio(&self) -> Option<f64> {
        match (self.extraction_ham, self.resource_ham) {
            (Some(extraction), Some(resource)) if resource > 0.0 => Some(extraction / resource),
            _ => None,
        }
    }

    pub fn tag_source(&mut self, tag: impl Into<String>) {
        self.sources.insert(tag.into());
    }

    /// Fills gaps from another provider's view of the same location.
    pub fn fill_missing_from(&mut self, other: IndicatorSet) {
        self.water_level_m = self.water_level_m.or(other.water_level_m);
        self.rainfall_mm = self.rainfall_mm.or(other.rainfall_mm);
        self.resource_ham = self.resource_ham.or(other.resource_ham);
        self.extraction_ham = self.extraction_ham.or(other.extraction_ham);
        if self.quality == WaterQuality::Unknown {
            self.quality = other.quality;
        }
        if self.trend == GroundwaterTrend::Unknown {
            self.trend = other.trend;
        }
        if self.weather.is_none() {
            self.weather = other.weather;
        }
        self.wells_monitored = self.wells_monitored.or(other.wells_monitored);
        if self.citation.is_none() {
            self.citation = other.citation;
        }
        self.sources.extend(other.sources);
    }

    pub fn apply(&mut self, overrides: &IndicatorOverrides) {
        if overrides.is_empty() {
            return;
        }

        if let Some(level) = overrides.water_level_m {
            self.water_level_m = Some(level);
        }
        if let Some(rainfall) = overrides.rainfall_mm {
            self.rainfall_mm = Some(rainfall);
        }
        if let Some(resource) = overrides.resource_ham {
            self.resource_ham = Some(resource);
        }
        if let Some(extraction) = overrides.extraction_ham {
            self.extraction_ham = Some(extraction);
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(trend) = overrides.trend {
            self.trend = trend;
        }
        self.tag_source("what-if-override");
    }
}

/// Caller-supplied indicator values for what-if assessments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorOverrides {
    pub water_level_m: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub resource_ham: Option<f64>,
    pub extraction_ham: Option<f64>,
    pub quality: Option<WaterQuality>,
    pub trend: Option<GroundwaterTrend>,
}

impl IndicatorOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Rejects negative or non-finite measurements.
    pub fn validate(&self) -> Result<(), String> {
        let measurements = [
            ("water_level", self.water_level_m),
            ("rainfall", self.rainfall_mm),
            ("resource", self.resource_ham),
            ("extraction", self.extraction_ham),
        ];

        for (name, value) in measurements {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{name} must be a non-negative number, got {value}"));
                }
            }
        }

        Ok(())
    }
}
