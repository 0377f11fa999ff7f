use super::super::normalizer::{normalize_location, parse_quantity};
use super::SnapshotError;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct SnapshotRecord {
    pub(crate) normalized_name: String,
    pub(crate) rainfall_mm: Option<f64>,
    pub(crate) resource_ham: Option<f64>,
    pub(crate) extraction_ham: Option<f64>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<SnapshotRecord>, SnapshotError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<SnapshotRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = index + 2;
        let normalized_name = normalize_location(&row.name);
        if normalized_name.is_empty() || normalized_name == "TOTAL" {
            continue;
        }

        records.push(SnapshotRecord {
            normalized_name,
            rainfall_mm: quantity(line, "Rainfall (mm)", &row.rainfall)?,
            resource_ham: quantity(
                line,
                "Annual Extractable Ground Water Resources (ham)",
                &row.resource,
            )?,
            extraction_ham: quantity(line, "Ground Water Extraction (ham)", &row.extraction)?,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "State", alias = "District", alias = "City", alias = "Location")]
    name: String,
    #[serde(rename = "Rainfall (mm)", default)]
    rainfall: String,
    #[serde(rename = "Annual Extractable Ground Water Resources (ham)", default)]
    resource: String,
    #[serde(rename = "Ground Water Extraction (ham)", default)]
    extraction: String,
}

fn quantity(line: usize, column: &'static str, raw: &str) -> Result<Option<f64>, SnapshotError> {
    let value = parse_quantity(raw).map_err(|_| SnapshotError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    })?;

    match value {
        Some(number) if !number.is_finite() || number < 0.0 => Err(SnapshotError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        }),
        other => Ok(other),
    }
}
