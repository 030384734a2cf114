//! End-to-end tests: file on disk → dataset → filters → derived views.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

use world_happiness::data::aggregate::{TrendPoint, YearlyAverage};
use world_happiness::data::error::LoadError;
use world_happiness::data::filter::{FilterState, Selection};
use world_happiness::data::loader::load_file;
use world_happiness::data::model::Indicator;
use world_happiness::data::query::HappinessQuery;
use world_happiness::data::reconcile::AliasTable;

const CSV: &str = "\
Ranking,Country,Regional indicator,Happiness score,GDP per capita,Social support,Healthy life expectancy,Freedom to make life choices,Generosity,Perceptions of corruption,Year
1,Finland,Western Europe,7.0,1.9,1.2,0.8,0.7,0.1,0.5,2020
40,South Korea,East Asia,5.0,1.4,0.9,0.9,0.4,,0.2,2020
2,Finland,Western Europe,6.0,1.9,1.2,0.8,0.7,0.1,0.5,2021
60,South Korea,East Asia,6.0,1.5,0.9,0.9,0.4,n/a,0.2,2021
90,Myanmar,Southeast Asia,4.4,0.8,0.7,0.5,0.6,0.5,0.3,2021
";

/// Helper to create a temporary file with given content and extension.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

#[test]
fn test_csv_to_views() {
    let file = create_test_file(CSV, ".csv");
    let ds = load_file(file.path()).expect("load failed");
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.source.as_deref(), Some(file.path()));
    assert_eq!(ds.records[1].generosity, 0.0);
    assert_eq!(ds.records[3].generosity, 0.0);

    let aliases = AliasTable::builtin();
    let q = HappinessQuery::new(&ds, &aliases);
    let all = FilterState::new(2015, 2024);

    assert_eq!(
        q.yearly_averages(&all),
        vec![
            YearlyAverage { year: 2020, avg: 6.0 },
            YearlyAverage { year: 2021, avg: 5.47 },
        ]
    );

    let top = q.top_by_field(Indicator::Generosity).unwrap();
    assert_eq!(top.country, "Myanmar");
    assert_eq!(top.value, 0.5);

    let korea = q.country_snapshot("Korea, South", &all).unwrap();
    assert_eq!(korea.happiness, 6.0);
    assert_eq!(korea.ranking, 60);
    assert!(q.country_snapshot("Wakanda", &all).is_none());
}

#[test]
fn test_trend_line_over_filtered_set() {
    let file = create_test_file(CSV, ".csv");
    let ds = load_file(file.path()).unwrap();
    let aliases = AliasTable::default();
    let q = HappinessQuery::new(&ds, &aliases);

    let finland_only = FilterState::new(2015, 2024)
        .with_country(Selection::Only("Finland".into()));
    // Same GDP in both years: flat line through the mean ranking.
    let line = q.trend_line(Indicator::GdpPerCapita, Indicator::Ranking, &finland_only);
    assert_eq!(
        line,
        vec![TrendPoint { x: 1.9, y: 1.5 }, TrendPoint { x: 1.9, y: 1.5 }]
    );

    let one_row = FilterState::new(2015, 2024).with_region(Selection::Only("Southeast Asia".into()));
    assert!(q
        .trend_line(Indicator::GdpPerCapita, Indicator::Ranking, &one_row)
        .is_empty());
}

#[test]
fn test_empty_filter_result_degrades_gracefully() {
    let file = create_test_file(CSV, ".csv");
    let ds = load_file(file.path()).unwrap();
    let aliases = AliasTable::builtin();
    let q = HappinessQuery::new(&ds, &aliases);
    let none = FilterState::new(1990, 1995);

    assert!(q.filtered_records(&none).is_empty());
    assert!(q.yearly_averages(&none).is_empty());
    assert!(q
        .trend_line(Indicator::GdpPerCapita, Indicator::Ranking, &none)
        .is_empty());
    assert!(q.snapshots(&none).is_empty());
    assert_eq!(q.kpis(&none).count, 0);
    assert_eq!(q.kpis(&none).happiness, 0.0);
}

#[test]
fn test_missing_required_column() {
    let file = create_test_file("Country,Happiness score\nFinland,7.8\n", ".csv");
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn("Year")));
}

#[test]
fn test_unreadable_file() {
    let err = load_file(std::path::Path::new("/no/such/dir/happiness.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_json_source() {
    let json = r#"[
        {"Country": "Chile", "Regional indicator": "Latin America", "Year": 2022, "Happiness score": 6.2},
        {"Country": "Peru", "Regional indicator": "Latin America", "Year": 2022, "Happiness score": "bad"}
    ]"#;
    let file = create_test_file(json, ".json");
    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.countries, vec!["Chile", "Peru"]);
    assert_eq!(ds.records[1].happiness_score, 0.0);
}

#[test]
fn test_parquet_source() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Happiness score", DataType::Float64, true),
        Field::new("Ranking", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["Finland", "Chile"])),
        Arc::new(Int64Array::from(vec![2023, 2023])),
        Arc::new(Float64Array::from(vec![Some(7.7), None])),
        Arc::new(Int64Array::from(vec![1, 30])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path()).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records[0].country, "Finland");
    assert_eq!(ds.records[0].happiness_score, 7.7);
    assert_eq!(ds.records[1].happiness_score, 0.0);
    assert!(ds.records[1].coerced);
    assert_eq!(ds.records[1].ranking, 30);
    assert_eq!(ds.records[1].region, "");
}

#[test]
fn test_export_is_verbatim() {
    let file = create_test_file(CSV, ".csv");
    let ds = load_file(file.path()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("export.csv");

    let src = ds.source.as_deref().unwrap();
    let bytes = world_happiness::data::loader::export_source(src, &dst).unwrap();
    assert_eq!(bytes as usize, CSV.len());
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), CSV);
}
