use std::fs;

use quake_core::{CatalogColumns, CellId, FeatureSchema, RegularGrid, Sample};
use quake_io::{event_table, load_catalog, samples_to_dataframe, write_dataset};
use tempfile::tempdir;

#[test]
fn comma_catalog_with_custom_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    fs::write(
        &path,
        "date,latitude,longitude,mag,cls\n\
         \"2010-01-01 10:00:00\",0.6,1.4,5.2,5.2\n\
         \"2009-06-01 00:00:00\",0.1,0.1,3.6,3.6\n",
    )
    .unwrap();
    let columns = CatalogColumns {
        delimiter: ",".into(),
        time: "date".into(),
        lat: "latitude".into(),
        lon: "longitude".into(),
        magnitude: "mag".into(),
        class: "cls".into(),
    };
    let records = load_catalog(&path, &columns).unwrap();
    assert_eq!(records.len(), 2);

    let grid = RegularGrid::default();
    let features = event_table(&records, &grid, 3.5);
    let labels = event_table(&records, &grid, 5.0);
    assert_eq!(features.len(), 2);
    assert_eq!(labels.len(), 1);
    // sorted by time regardless of file order
    assert_eq!(features.events()[0].magnitude, 3.6);
    assert_eq!(labels.events()[0].cell, CellId::new(2, 1));
}

#[test]
fn empty_dataset_still_has_header() {
    let schema = FeatureSchema::new(vec![60], vec![0, 3]);
    let samples: Vec<Sample> = Vec::new();
    let mut df = samples_to_dataframe(&samples, &schema).unwrap();
    assert_eq!(df.height(), 0);
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_dataset(&mut df, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("dt;lon_cell;"));
    assert!(header.ends_with("std_magn_60_rad3"));
}
