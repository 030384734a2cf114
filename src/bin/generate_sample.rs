//! Writes a deterministic synthetic happiness table as CSV and Parquet,
//! using the exact header names the dashboard loads.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use world_happiness::data::model::{
    COL_CORRUPTION, COL_COUNTRY, COL_FREEDOM, COL_GDP, COL_GENEROSITY, COL_HAPPINESS, COL_LIFE,
    COL_RANKING, COL_REGION, COL_SOCIAL, COL_YEAR, HEADERS,
};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (country, region, baseline happiness)
const COUNTRIES: &[(&str, &str, f64)] = &[
    ("Finland", "Western Europe", 7.8),
    ("Denmark", "Western Europe", 7.6),
    ("Switzerland", "Western Europe", 7.5),
    ("Netherlands", "Western Europe", 7.4),
    ("Spain", "Western Europe", 6.4),
    ("Turkey", "Middle East and North Africa", 4.9),
    ("Israel", "Middle East and North Africa", 7.2),
    ("Morocco", "Middle East and North Africa", 5.1),
    ("United States", "North America and ANZ", 6.9),
    ("Canada", "North America and ANZ", 7.0),
    ("Australia", "North America and ANZ", 7.1),
    ("Costa Rica", "Latin America and Caribbean", 7.0),
    ("Chile", "Latin America and Caribbean", 6.2),
    ("Peru", "Latin America and Caribbean", 5.8),
    ("Venezuela", "Latin America and Caribbean", 5.1),
    ("Russia", "Commonwealth of Independent States", 5.5),
    ("Kazakhstan", "Commonwealth of Independent States", 6.1),
    ("Czech Republic", "Central and Eastern Europe", 6.8),
    ("North Macedonia", "Central and Eastern Europe", 5.2),
    ("South Korea", "East Asia", 5.9),
    ("Japan", "East Asia", 6.1),
    ("Taiwan Province of China", "East Asia", 6.5),
    ("Myanmar", "Southeast Asia", 4.4),
    ("Vietnam", "Southeast Asia", 5.7),
    ("India", "South Asia", 4.0),
    ("Nepal", "South Asia", 5.3),
    ("Ivory Coast", "Sub-Saharan Africa", 5.1),
    ("Congo (Brazzaville)", "Sub-Saharan Africa", 5.0),
    ("Congo (Kinshasa)", "Sub-Saharan Africa", 4.3),
    ("Tanzania", "Sub-Saharan Africa", 3.7),
];

const YEARS: std::ops::RangeInclusive<i64> = 2015..=2024;

struct Row {
    ranking: i64,
    country: &'static str,
    region: &'static str,
    happiness: f64,
    gdp: f64,
    social: f64,
    life: f64,
    freedom: f64,
    /// Sparse on purpose: some rows leave the cell empty.
    generosity: Option<f64>,
    corruption: f64,
    year: i64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for year in YEARS {
        let mut year_rows: Vec<Row> = COUNTRIES
            .iter()
            .map(|&(country, region, base)| {
                let happiness = (base + rng.gauss(0.0, 0.15)).clamp(0.0, 10.0);
                let level = happiness / 10.0;
                Row {
                    ranking: 0,
                    country,
                    region,
                    happiness,
                    gdp: (0.4 + 1.6 * level + rng.gauss(0.0, 0.1)).max(0.0),
                    social: (0.5 + 0.8 * level + rng.gauss(0.0, 0.05)).max(0.0),
                    life: (0.3 + 0.6 * level + rng.gauss(0.0, 0.05)).max(0.0),
                    freedom: (0.3 + 0.5 * level + rng.gauss(0.0, 0.05)).max(0.0),
                    generosity: (rng.next_f64() > 0.1).then(|| rng.gauss(0.0, 0.1)),
                    corruption: (0.05 + 0.4 * level + rng.gauss(0.0, 0.05)).max(0.0),
                    year,
                }
            })
            .collect();

        year_rows.sort_by(|a, b| b.happiness.total_cmp(&a.happiness));
        for (i, row) in year_rows.iter_mut().enumerate() {
            row.ranking = i as i64 + 1;
        }
        rows.extend(year_rows);
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.ranking.to_string(),
            r.country.to_string(),
            r.region.to_string(),
            format!("{:.3}", r.happiness),
            format!("{:.3}", r.gdp),
            format!("{:.3}", r.social),
            format!("{:.3}", r.life),
            format!("{:.3}", r.freedom),
            r.generosity.map(|g| format!("{g:.3}")).unwrap_or_default(),
            format!("{:.3}", r.corruption),
            r.year.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_RANKING, DataType::Int64, false),
        Field::new(COL_COUNTRY, DataType::Utf8, false),
        Field::new(COL_REGION, DataType::Utf8, false),
        Field::new(COL_HAPPINESS, DataType::Float64, false),
        Field::new(COL_GDP, DataType::Float64, false),
        Field::new(COL_SOCIAL, DataType::Float64, false),
        Field::new(COL_LIFE, DataType::Float64, false),
        Field::new(COL_FREEDOM, DataType::Float64, false),
        Field::new(COL_GENEROSITY, DataType::Float64, true),
        Field::new(COL_CORRUPTION, DataType::Float64, false),
        Field::new(COL_YEAR, DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rows.iter().map(|r| r.ranking).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.country).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.region).collect::<Vec<_>>())),
        float(|r| r.happiness),
        float(|r| r.gdp),
        float(|r| r.social),
        float(|r| r.life),
        float(|r| r.freedom),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.generosity).collect::<Vec<_>>(),
        )),
        float(|r| r.corruption),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv("happiness_clean.csv", &rows)?;
    write_parquet("happiness_clean.parquet", &rows)?;

    println!(
        "Wrote {} rows ({} countries × {} years) to happiness_clean.csv and happiness_clean.parquet",
        rows.len(),
        COUNTRIES.len(),
        YEARS.count()
    );
    Ok(())
}
