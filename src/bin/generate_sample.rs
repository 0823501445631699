use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Gutenberg-Richter style magnitudes: exponential above `min`.
    fn magnitude(&mut self, min: f64) -> f64 {
        let u = self.next_f64().max(1e-12);
        (min - u.ln() / 2.3).min(9.5)
    }
}

/// Seismic regions: country, centre latitude, centre longitude, typical depth (km).
const REGIONS: [(&str, f64, f64, f64); 12] = [
    ("Chile", -30.0, -71.5, 35.0),
    ("Japan", 36.5, 141.0, 40.0),
    ("Indonesia", -3.0, 122.0, 60.0),
    ("Peru", -12.0, -76.5, 70.0),
    ("Mexico", 17.0, -99.0, 30.0),
    ("Turkey", 39.0, 35.0, 12.0),
    ("Philippines", 12.0, 125.0, 45.0),
    ("Nepal", 28.0, 84.5, 15.0),
    ("New Zealand", -41.0, 174.0, 25.0),
    ("United States", 38.0, -122.0, 10.0),
    ("Greece", 38.5, 23.0, 15.0),
    ("Italy", 42.5, 13.0, 10.0),
];

const FIRST_YEAR: i32 = 2000;
const YEARS: i64 = 24;
const EVENTS: usize = 1500;

/// One CSV row; `None` fields are written as empty cells.
#[derive(Serialize)]
struct Row {
    date: Option<String>,
    mag: Option<f64>,
    depth: Option<f64>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1).unwrap_or_default();
    (0..EVENTS)
        .map(|i| {
            let (country, lat, lon, depth) = REGIONS[rng.below(REGIONS.len())];
            let day = rng.below((YEARS * 365) as usize) as i64;
            let date = start + Duration::days(day);
            let mut row = Row {
                date: Some(format!("{}T{:02}:{:02}:00Z", date, rng.below(24), rng.below(60))),
                mag: Some((rng.magnitude(4.5) * 10.0).round() / 10.0),
                depth: Some(rng.gauss(depth, depth * 0.4).abs().max(1.0)),
                country: Some(country.to_string()),
                latitude: rng.gauss(lat, 2.5).clamp(-90.0, 90.0),
                longitude: rng.gauss(lon, 2.5).clamp(-180.0, 180.0),
            };
            // A few incomplete rows, as found in real catalogues.
            match i % 97 {
                0 => row.country = None,
                1 => row.depth = None,
                2 => row.date = Some("unknown".to_string()),
                _ => {}
            }
            row
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, true),
        Field::new("mag", DataType::Float64, true),
        Field::new("depth", DataType::Float64, true),
        Field::new("country", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.date.as_deref()))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.mag))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.depth))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.country.as_deref()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "cleaned_file.csv";
    let parquet_path = "sample_quakes.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} events ({} regions, {}–{}) to {csv_path} and {parquet_path}",
        rows.len(),
        REGIONS.len(),
        FIRST_YEAR,
        FIRST_YEAR + YEARS as i32 - 1
    );
    Ok(())
}
