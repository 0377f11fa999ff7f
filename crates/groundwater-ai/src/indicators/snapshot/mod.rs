mod parser;

use super::domain::{IndicatorSet, LevelType, LocationId};
use super::{IndicatorProvider, LookupError};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const SNAPSHOT_SOURCE_TAG: &str = "tabular-snapshot";

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read groundwater snapshot: {}", err),
            SnapshotError::Csv(err) => write!(f, "invalid groundwater snapshot CSV: {}", err),
            SnapshotError::InvalidNumber {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: column '{}' holds '{}', expected a non-negative number",
                line, column, value
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Csv(err) => Some(err),
            SnapshotError::InvalidNumber { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SnapshotRow {
    rainfall_mm: Option<f64>,
    resource_ham: Option<f64>,
    extraction_ham: Option<f64>,
}

/// Periodically scraped rainfall/resource/extraction table for one level type.
#[derive(Debug, Clone)]
pub struct SnapshotTable {
    level: LevelType,
    rows: BTreeMap<LocationId, SnapshotRow>,
}

impl SnapshotTable {
    pub fn from_path<P: AsRef<Path>>(path: P, level: LevelType) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path.as_ref())?;
        let table = Self::from_reader(file, level)?;
        info!(
            path = %path.as_ref().display(),
            rows = table.len(),
            %level,
            "groundwater snapshot loaded"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, level: LevelType) -> Result<Self, SnapshotError> {
        let mut rows = BTreeMap::new();

        for record in parser::parse_records(reader)? {
            let location = LocationId::new(&record.normalized_name);
            if rows.contains_key(&location) {
                debug!(%location, "duplicate snapshot row ignored");
                continue;
            }

            rows.insert(
                location,
                SnapshotRow {
                    rainfall_mm: record.rainfall_mm,
                    resource_ham: record.resource_ham,
                    extraction_ham: record.extraction_ham,
                },
            );
        }

        Ok(Self { level, rows })
    }

    pub fn level(&self) -> LevelType {
        self.level
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row as an indicator set, in location order.
    pub fn indicator_sets(&self) -> Vec<IndicatorSet> {
        self.rows
            .iter()
            .map(|(location, row)| self.to_indicators(location, row))
            .collect()
    }

    fn to_indicators(&self, location: &LocationId, row: &SnapshotRow) -> IndicatorSet {
        let mut indicators = IndicatorSet::new(location.clone(), self.level);
        indicators.rainfall_mm = row.rainfall_mm;
        indicators.resource_ham = row.resource_ham;
        indicators.extraction_ham = row.extraction_ham;
        indicators.tag_source(SNAPSHOT_SOURCE_TAG);
        indicators
    }
}

impl IndicatorProvider for SnapshotTable {
    fn lookup(&self, location: &LocationId, level: LevelType) -> Result<IndicatorSet, LookupError> {
        let row = self
            .rows
            .get(location)
            .filter(|_| level == self.level)
            .ok_or_else(|| LookupError::NotFound {
                location: location.clone(),
                level,
            })?;

        Ok(self.to_indicators(location, row))
    }

    fn locations(&self, level: LevelType) -> Vec<LocationId> {
        if level == self.level {
            self.rows.keys().cloned().collect()
        } else {
            Vec::new()
        }
    }
}
