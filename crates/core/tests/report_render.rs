use std::path::{Path, PathBuf};

use motif_core::analysis::{
    analyze_file, render_report, AnalysisError, GeoError, ReportOptions, ReportOutcome,
};
use motif_core::model::{write_json_pretty, AnnotatedRecord, Christian, Record};
use serde_json::json;
use shapefile::dbase::{FieldValue, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};

fn record(motifs: &str, groups: &str, christian: Christian, from: &str, to: &str) -> AnnotatedRecord {
    AnnotatedRecord {
        record: Record::default()
            .with("not_before", from)
            .with("not_after", to)
            .with("country", "Italy"),
        motifs: motifs.into(),
        motif_group: groups.into(),
        christian,
    }
}

fn in_country(mut record: AnnotatedRecord, country: &str) -> AnnotatedRecord {
    record.record = record.record.with("country", country);
    record
}

/// Write one square per country with its name in the `ADMIN` column.
fn write_countries(dir: &Path, names: &[&str]) -> PathBuf {
    let path = dir.join("mapdata").join("countries.shp");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let table = TableWriterBuilder::new().add_character_field("ADMIN".try_into().unwrap(), 50);
    let mut writer = shapefile::Writer::from_path(&path, table).unwrap();
    for (idx, name) in names.iter().enumerate() {
        let x = idx as f64 * 20.0;
        // Outer rings are closed and clockwise.
        let ring = vec![
            Point::new(x, 0.0),
            Point::new(x, 10.0),
            Point::new(x + 10.0, 10.0),
            Point::new(x + 10.0, 0.0),
            Point::new(x, 0.0),
        ];
        let mut attributes = shapefile::dbase::Record::default();
        attributes.insert("ADMIN".to_string(), FieldValue::Character(Some(name.to_string())));
        writer.write_shape_and_record(&Polygon::new(PolygonRing::Outer(ring)), &attributes).unwrap();
    }
    drop(writer);
    path
}

const MAP_FIGURES: [&str; 6] = [
    "common_motif_map.svg",
    "common_motif_map_before_350.svg",
    "common_motif_map_after_350.svg",
    "finds_map.svg",
    "finds_map_before_350.svg",
    "finds_map_after_350.svg",
];

fn figure(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join("figures").join(name)).unwrap_or_else(|e| panic!("{name}: {e}"))
}

fn options(dir: &std::path::Path) -> ReportOptions {
    ReportOptions {
        figures_dir: dir.join("figures"),
        shapefile: None,
        name_field: "ADMIN".into(),
        year_threshold: 350,
    }
}

#[test]
fn chart_battery_renders_without_maps() {
    let temp = tempfile::tempdir().unwrap();
    let records = vec![
        record("Delphine, Kreuz", "Christliche Symbole, Tiere", Christian::Yes, "0301", "0400"),
        record("Delphine", "Tiere", Christian::No, "0201", "0250"),
        record("Taube", "Tiere", Christian::No, "0401", "0500"),
    ];

    let outcome = render_report(&records, &options(temp.path())).unwrap();

    assert_eq!(outcome.records, 3);
    assert!(outcome.skipped.is_empty(), "skipped: {:?}", outcome.skipped);
    for name in [
        "top_motifs.svg",
        "top_motif_groups.svg",
        "christian_motifs.svg",
        "motif_trends.svg",
        "motif_group_trends.svg",
        "motif_heatmap.svg",
        "motif_group_heatmap.svg",
    ] {
        let path = temp.path().join("figures").join(name);
        let body = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(body.contains("<svg"), "{name} is not an SVG");
    }
    assert_eq!(outcome.figures.len(), 7);
    assert_eq!(outcome.top_motifs[0].name, "Delphine");
}

#[test]
fn empty_subsets_are_skipped_not_fatal() {
    let temp = tempfile::tempdir().unwrap();
    // Undated and no Christian records: trend, heatmap and Christian charts have no data.
    let records = vec![AnnotatedRecord {
        record: Record::default(),
        motifs: "Anker".into(),
        motif_group: String::new(),
        christian: Christian::No,
    }];

    let outcome = render_report(&records, &options(temp.path())).unwrap();
    assert!(outcome.figures.iter().any(|p| p.ends_with("top_motifs.svg")));
    assert!(outcome.skipped.contains(&"top_motif_groups.svg".to_string()));
    assert!(outcome.skipped.contains(&"christian_motifs.svg".to_string()));
    assert!(outcome.skipped.contains(&"motif_heatmap.svg".to_string()));
}

#[test]
fn missing_shapefile_is_a_geo_error() {
    let temp = tempfile::tempdir().unwrap();
    let records = vec![record("Kreuz", "", Christian::Yes, "0301", "0400")];
    let mut opts = options(temp.path());
    opts.shapefile = Some(temp.path().join("mapdata").join("missing.shp"));

    let err = render_report(&records, &opts).unwrap_err();
    assert!(matches!(err, AnalysisError::Geo(_)));
}

#[test]
fn analyze_file_reads_items_wrapper() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("filtered_data.json");
    let rows = vec![record("Delphine", "Tiere", Christian::No, "0301", "0400")];
    write_json_pretty(&input, &json!({ "items": rows })).unwrap();

    let outcome = analyze_file(&input, &options(temp.path())).unwrap();
    assert_eq!(outcome.records, 1);
}

#[test]
fn maps_join_counts_onto_country_names() {
    let temp = tempfile::tempdir().unwrap();
    let records = vec![
        record("Delphine", "Tiere", Christian::No, "0201", "0250"),
        record("Kreuz", "Christliche Symbole", Christian::Yes, "0301", "0400"),
        record("Kreuz", "Christliche Symbole", Christian::Yes, "0401", "0450"),
        in_country(record("Taube", "Tiere", Christian::No, "0401", "0500"), "France"),
    ];
    let mut opts = options(temp.path());
    opts.shapefile = Some(write_countries(temp.path(), &["Italy", "France", "Egypt"]));

    let outcome: ReportOutcome = render_report(&records, &opts).unwrap();

    for name in MAP_FIGURES {
        assert!(outcome.figures.iter().any(|p| p.ends_with(name)), "{name} not rendered");
        assert!(!outcome.skipped.contains(&name.to_string()), "{name} skipped");
    }
    assert_eq!(outcome.figures.len(), 13);

    let finds = figure(temp.path(), "finds_map.svg");
    assert!(finds.contains("<polygon"));
    assert!(finds.contains("No finds"), "Egypt has no records");

    let common = figure(temp.path(), "common_motif_map.svg");
    assert!(common.contains("Kreuz"));
    assert!(common.contains("Taube"));
    assert!(common.contains("Not in Dataset"));

    // Only the Italian record from 225 falls before the threshold.
    let before = figure(temp.path(), "common_motif_map_before_350.svg");
    assert!(before.contains("Delphine"));
    assert!(!before.contains("Taube"));
}

#[test]
fn map_window_without_finds_is_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let records = vec![
        record("Kreuz", "Christliche Symbole", Christian::Yes, "0401", "0450"),
        in_country(record("Taube", "Tiere", Christian::No, "0401", "0500"), "France"),
    ];
    let mut opts = options(temp.path());
    opts.shapefile = Some(write_countries(temp.path(), &["Italy", "France"]));

    let outcome = render_report(&records, &opts).unwrap();

    assert!(outcome.skipped.contains(&"common_motif_map_before_350.svg".to_string()));
    assert!(!temp.path().join("figures").join("common_motif_map_before_350.svg").exists());
    // Finds maps always render; every country falls back to the grey class.
    let before = figure(temp.path(), "finds_map_before_350.svg");
    assert!(before.contains("No finds"));
    assert!(outcome.figures.iter().any(|p| p.ends_with("common_motif_map_after_350.svg")));
}

#[test]
fn unknown_name_field_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let records = vec![record("Kreuz", "", Christian::Yes, "0301", "0400")];
    let mut opts = options(temp.path());
    opts.shapefile = Some(write_countries(temp.path(), &["Italy"]));
    opts.name_field = "NAME".into();

    let err = render_report(&records, &opts).unwrap_err();
    assert!(matches!(err, AnalysisError::Geo(GeoError::MissingField { ref field, .. }) if field == "NAME"));
}
