use groundwater_ai::crisis::{
    ModelFeatures, NearestNeighbourModel, ScoringConfig, Severity, SeverityModel,
};
use groundwater_ai::indicators::{
    IndicatorProvider, LevelType, LocationId, SnapshotError, SnapshotTable,
};

fn bundled_snapshot() -> SnapshotTable {
    let data = include_bytes!("../data/state_groundwater.csv");
    SnapshotTable::from_reader(&data[..], LevelType::State).expect("bundled snapshot imports")
}

#[test]
fn bundled_snapshot_imports_every_state_but_the_total() {
    let table = bundled_snapshot();

    assert_eq!(table.len(), 18);
    assert!(table
        .lookup(&LocationId::new("Total"), LevelType::State)
        .is_err());
    assert!(table
        .locations(LevelType::State)
        .contains(&LocationId::new("West Bengal")));
}

#[test]
fn indian_digit_grouping_is_parsed() {
    let punjab = bundled_snapshot()
        .lookup(&LocationId::new("punjab"), LevelType::State)
        .expect("punjab present");

    assert_eq!(punjab.rainfall_mm, Some(609.0));
    assert_eq!(punjab.resource_ham, Some(189_340.0));
    assert_eq!(punjab.extraction_ham, Some(281_000.0));
    assert!(punjab.extraction_ratio().is_some_and(|ratio| ratio > 1.0));
}

#[test]
fn negative_quantities_are_rejected() {
    let csv = "District,Rainfall (mm),Annual Extractable Ground Water Resources (ham),Ground Water Extraction (ham)\n\
Pune,720,10000,8500\n\
Nashik,650,-9000,4000\n";

    match SnapshotTable::from_reader(csv.as_bytes(), LevelType::District) {
        Err(SnapshotError::InvalidNumber {
            line,
            column,
            value,
        }) => {
            assert_eq!(line, 3);
            assert_eq!(column, "Annual Extractable Ground Water Resources (ham)");
            assert_eq!(value, "-9000");
        }
        other => panic!("expected invalid number, got {other:?}"),
    }
}

#[test]
fn model_trained_on_bundled_snapshot_separates_overdraft_from_surplus() {
    let table = bundled_snapshot();
    let breakpoints = ScoringConfig::default().ratio_breakpoints;
    let model =
        NearestNeighbourModel::train_from_indicators(&table.indicator_sets(), 3, &breakpoints)
            .expect("eighteen rows train a model");

    assert_eq!(model.len(), 18);

    let arid_overdraft = ModelFeatures {
        rainfall_mm: 580.0,
        resource_ham: 120_000.0,
        extraction_ham: 170_000.0,
    };
    assert_eq!(model.predict(&arid_overdraft), Some(Severity::Critical));

    let wet_surplus = ModelFeatures {
        rainfall_mm: 2_700.0,
        resource_ham: 240_000.0,
        extraction_ham: 30_000.0,
    };
    assert_eq!(model.predict(&wet_surplus), Some(Severity::Low));
}
