//! Indicator providers: where the raw groundwater and weather figures come from.
//!
//! Providers are read-only after construction and shared across requests. A
//! lookup either yields a (possibly sparse) [`IndicatorSet`] or a typed
//! [`LookupError`]; providers never substitute another location's data.

pub mod catalog;
pub mod domain;
pub(crate) mod normalizer;
pub mod snapshot;
pub mod weather;

pub use catalog::{CatalogEntry, ReferenceCatalog};
pub use domain::{
    GroundwaterTrend, IndicatorOverrides, IndicatorSet, LevelType, LocationId, WaterQuality,
    WeatherContext, WeatherOrigin,
};
pub use snapshot::{SnapshotError, SnapshotTable};
pub use weather::{OpenWeatherClient, SeasonalWeather, WeatherError, WeatherSource};

use std::collections::BTreeSet;
use std::sync::Arc;

/// Source of indicator sets keyed by location and level type.
pub trait IndicatorProvider: Send + Sync {
    fn lookup(&self, location: &LocationId, level: LevelType) -> Result<IndicatorSet, LookupError>;
    fn locations(&self, level: LevelType) -> Vec<LocationId>;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{level} '{location}' not found")]
    NotFound {
        location: LocationId,
        level: LevelType,
    },
    #[error("indicator provider unavailable: {0}")]
    Unavailable(String),
}

/// Queries several providers and blends their answers, earlier layers winning.
#[derive(Clone, Default)]
pub struct LayeredProvider {
    layers: Vec<Arc<dyn IndicatorProvider>>,
}

impl LayeredProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Arc<dyn IndicatorProvider>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl IndicatorProvider for LayeredProvider {
    fn lookup(&self, location: &LocationId, level: LevelType) -> Result<IndicatorSet, LookupError> {
        let mut merged: Option<IndicatorSet> = None;
        let mut unavailable = None;

        for layer in &self.layers {
            match layer.lookup(location, level) {
                Ok(found) => match merged.as_mut() {
                    Some(existing) => existing.fill_missing_from(found),
                    None => merged = Some(found),
                },
                Err(LookupError::NotFound { .. }) => {}
                Err(LookupError::Unavailable(reason)) => unavailable = Some(reason),
            }
        }

        match (merged, unavailable) {
            (Some(indicators), _) => Ok(indicators),
            (None, Some(reason)) => Err(LookupError::Unavailable(reason)),
            (None, None) => Err(LookupError::NotFound {
                location: location.clone(),
                level,
            }),
        }
    }

    fn locations(&self, level: LevelType) -> Vec<LocationId> {
        let unique: BTreeSet<LocationId> = self
            .layers
            .iter()
            .flat_map(|layer| layer.locations(level))
            .collect();
        unique.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct OfflineProvider;

    impl IndicatorProvider for OfflineProvider {
        fn lookup(&self, _: &LocationId, _: LevelType) -> Result<IndicatorSet, LookupError> {
            Err(LookupError::Unavailable("station feed offline".to_string()))
        }

        fn locations(&self, _: LevelType) -> Vec<LocationId> {
            Vec::new()
        }
    }

    fn district_snapshot() -> SnapshotTable {
        SnapshotTable::from_reader(
            Cursor::new(
                "District,Rainfall (mm),Annual Extractable Ground Water Resources (ham),Ground Water Extraction (ham)\nPune,720,10000,8500\nNashik,650,9000,4000\n",
            ),
            LevelType::District,
        )
        .expect("snapshot parses")
    }

    #[test]
    fn layers_blend_catalog_and_snapshot_fields() {
        let provider = LayeredProvider::new()
            .with_layer(Arc::new(ReferenceCatalog::standard()))
            .with_layer(Arc::new(district_snapshot()));

        let set = provider
            .lookup(&LocationId::new("pune"), LevelType::District)
            .expect("pune present in both layers");

        assert_eq!(set.water_level_m, Some(12.8));
        assert_eq!(set.resource_ham, Some(10000.0));
        assert_eq!(set.extraction_ham, Some(8500.0));
        assert!(set.sources.contains(catalog::CATALOG_SOURCE_TAG));
        assert!(set.sources.contains(snapshot::SNAPSHOT_SOURCE_TAG));
    }

    #[test]
    fn locations_are_deduplicated_across_layers() {
        let provider = LayeredProvider::new()
            .with_layer(Arc::new(ReferenceCatalog::standard()))
            .with_layer(Arc::new(district_snapshot()));

        let locations = provider.locations(LevelType::District);
        assert_eq!(locations.len(), 6);
        assert!(locations.contains(&LocationId::new("Nashik")));
    }

    #[test]
    fn unavailable_layer_surfaces_only_without_a_hit() {
        let provider = LayeredProvider::new()
            .with_layer(Arc::new(OfflineProvider))
            .with_layer(Arc::new(ReferenceCatalog::standard()));

        assert!(provider
            .lookup(&LocationId::new("Delhi"), LevelType::District)
            .is_ok());
        assert!(matches!(
            provider.lookup(&LocationId::new("Atlantis"), LevelType::District),
            Err(LookupError::Unavailable(_))
        ));
    }

    #[test]
    fn empty_provider_reports_not_found() {
        let provider = LayeredProvider::new();
        assert!(matches!(
            provider.lookup(&LocationId::new("Delhi"), LevelType::District),
            Err(LookupError::NotFound { .. })
        ));
    }
}
