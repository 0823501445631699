use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Dataset, RawRecord, REQUIRED_COLUMNS, date_from_epoch_millis, parse_date};

/// Load failures that abort the load as a whole.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an earthquake dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required columns
/// * `.json`    – `[{ "date": ..., "mag": ..., ... }, ...]`
/// * `.parquet` – any column types castable to text (date) and float
///
/// Rows with a missing required field are dropped, never repaired.
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()).into());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => return Err(DatasetError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} events from {} ({} incomplete rows dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped
    );
    Ok(dataset.with_source(path))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one event per row.
/// Columns other than the required ones are ignored. Text cells are not
/// trimmed, so `" Chile"` and `"Chile"` stay distinct countries.
pub fn read_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DatasetError::MissingColumn(col).into());
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            // A row that cannot be mapped at all counts as incomplete.
            Err(e) if !e.is_io_error() => {
                log::debug!("CSV row {row_no}: {e}");
                rows.push(RawRecord::default());
            }
            Err(e) => return Err(e).with_context(|| format!("CSV row {row_no}")),
        }
    }

    Ok(Dataset::from_raw(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2010-02-27", "mag": 8.8, "depth": 22.9,
///     "country": "Chile", "latitude": -36.1, "longitude": -72.9 },
///   ...
/// ]
/// ```
///
/// `date` may also be milliseconds since the epoch, which is what pandas
/// writes for datetime columns by default.
pub fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .map(|rec| rec.as_object().map(json_to_raw).unwrap_or_default());

    Ok(Dataset::from_raw(rows))
}

fn json_to_raw(obj: &Map<String, JsonValue>) -> RawRecord {
    let date = match obj.get("date") {
        Some(JsonValue::String(s)) => parse_date(s),
        Some(JsonValue::Number(n)) => n.as_i64().and_then(date_from_epoch_millis),
        _ => None,
    };
    RawRecord {
        // Normalise to ISO so the shared validation path parses it again.
        date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        mag: json_f64(obj.get("mag")),
        depth: json_f64(obj.get("depth")),
        country: obj.get("country").and_then(|v| v.as_str()).map(str::to_string),
        latitude: json_f64(obj.get("latitude")),
        longitude: json_f64(obj.get("longitude")),
    }
}

fn json_f64(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing event rows.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): the date column may be a string, a
/// date or a timestamp, and numeric columns any int or float width.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str, to: &DataType| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| DatasetError::MissingColumn(name))?;
            cast(batch.column(idx).as_ref(), to)
                .with_context(|| format!("converting column '{name}'"))
        };

        let date = column("date", &DataType::Utf8)?;
        let country = column("country", &DataType::Utf8)?;
        let mag = column("mag", &DataType::Float64)?;
        let depth = column("depth", &DataType::Float64)?;
        let lat = column("latitude", &DataType::Float64)?;
        let lon = column("longitude", &DataType::Float64)?;

        let date = date.as_string::<i32>();
        let country = country.as_string::<i32>();

        for row in 0..batch.num_rows() {
            rows.push(RawRecord {
                date: (!date.is_null(row)).then(|| date.value(row).to_string()),
                country: (!country.is_null(row)).then(|| country.value(row).to_string()),
                mag: f64_at(&mag, row),
                depth: f64_at(&depth, row),
                latitude: f64_at(&lat, row),
                longitude: f64_at(&lon, row),
            });
        }
    }

    Ok(Dataset::from_raw(rows))
}

fn f64_at(col: &ArrayRef, row: usize) -> Option<f64> {
    let arr = col.as_primitive::<Float64Type>();
    (!arr.is_null(row)).then(|| arr.value(row))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
date,mag,depth,country,latitude,longitude,place
2010-02-27T06:34:11.530Z,8.8,22.9,Chile,-36.12,-72.90,offshore Bio-Bio
2011-03-11T05:46:24.120Z,9.1,29.0,Japan,38.30,142.37,near the east coast
2011-04-07,7.1,,Japan,38.27,141.59,missing depth
bogus,6.0,10.0,Peru,-15.0,-75.0,bad date
2012-01-01,5.0,10.0,,0.0,0.0,no country
2013-05-05,abc,10.0,Peru,-15.0,-75.0,bad magnitude
";

    #[test]
    fn load_csv_drops_incomplete_rows() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped, 4);
        assert_eq!(ds.year_bounds, Some((2010, 2011)));
        assert!(ds.records.iter().all(|r| !r.country.is_empty()));
        assert_eq!(ds.records[1].magnitude, 9.1);
    }

    #[test]
    fn load_csv_na_country_labels_are_dropped() {
        let csv = "\
date,mag,depth,country,latitude,longitude
2010-01-01,5.0,10.0,NA,1.0,1.0
2010-01-02,5.0,10.0,null,1.0,1.0
2010-01-03,5.0,10.0,None,1.0,1.0
2010-01-04,5.0,10.0,N/A,1.0,1.0
2010-01-05,5.0,10.0,Chile,1.0,1.0
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.countries.iter().collect::<Vec<_>>(), vec!["Chile"]);
        assert_eq!(ds.dropped, 4);
    }

    #[test]
    fn load_csv_treats_na_tokens_as_missing() {
        let csv = "\
date,mag,depth,country,latitude,longitude
2010-01-01,5.0,10.0,NA,1.0,1.0
2010-01-02,5.0,10.0,null,1.0,1.0
2010-01-03,5.0,10.0,None,1.0,1.0
2010-01-04,5.0,10.0,N/A,1.0,1.0
2010-01-05,5.0,10.0,Chile,1.0,1.0
NaT,5.0,10.0,Chile,1.0,1.0
2010-01-06,NaN,10.0,Chile,1.0,1.0
2010-01-07,5.0,#N/A,Chile,1.0,1.0
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        let kept: Vec<&str> = ds.records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(kept, vec!["Chile"]);
        assert_eq!(ds.dropped, 7);
    }

    #[test]
    fn load_csv_keeps_untrimmed_countries_and_infinity() {
        let csv = "\
date,mag,depth,country,latitude,longitude
2010-01-01, 5.0 ,inf,Chile,1.0,1.0
2010-01-02,5.0,10.0, Chile,1.0,1.0
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].magnitude, 5.0);
        assert_eq!(ds.records[0].depth, f64::INFINITY);
        assert_eq!(ds.countries.len(), 2);
        assert!(ds.countries.contains(" Chile"));
    }

    #[test]
    fn load_json_treats_na_tokens_as_missing() {
        let json = r#"[
            {"date": "2011-03-11", "mag": 9.1, "depth": 29, "country": "N/A",
             "latitude": 38.3, "longitude": 142.37},
            {"date": "2011-03-11", "mag": "nan", "depth": 29, "country": "Japan",
             "latitude": 38.3, "longitude": 142.37}
        ]"#;
        let ds = read_json(json).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.dropped, 2);
    }

    #[test]
    fn load_csv_requires_columns() {
        let err = read_csv("date,mag,country,latitude,longitude\n".as_bytes()).unwrap_err();
        match err.downcast_ref::<DatasetError>() {
            Some(DatasetError::MissingColumn(col)) => assert_eq!(*col, "depth"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_csv_short_row_is_dropped() {
        let csv = "date,mag,depth,country,latitude,longitude\n2010-01-01,5.0\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.dropped, 1);
    }

    #[test]
    fn load_json_records() {
        let json = r#"[
            {"date": 1267252451000, "mag": 8.8, "depth": 22.9, "country": "Chile",
             "latitude": -36.12, "longitude": -72.9},
            {"date": "2011-03-11", "mag": "9.1", "depth": 29, "country": "Japan",
             "latitude": 38.3, "longitude": 142.37},
            {"date": "2011-03-12", "mag": 6.0, "depth": 10, "country": null,
             "latitude": 38.3, "longitude": 142.37},
            "not an object"
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped, 2);
        assert_eq!(ds.records[0].year, 2010);
        assert_eq!(ds.records[1].depth, 29.0);
    }

    #[test]
    fn load_json_rejects_non_array() {
        assert!(read_json(r#"{"date": "2010-01-01"}"#).is_err());
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn load_parquet_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Utf8, true),
            Field::new("mag", DataType::Float64, true),
            Field::new("depth", DataType::Float64, true),
            Field::new("country", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("2010-02-27"), Some("2011-03-11"), Some("2012-01-01")])),
                Arc::new(Float64Array::from(vec![Some(8.8), Some(9.1), Some(6.0)])),
                Arc::new(Float64Array::from(vec![Some(22.9), None, Some(10.0)])),
                Arc::new(StringArray::from(vec![Some("Chile"), Some("Japan"), Some("<NA>")])),
                Arc::new(Float64Array::from(vec![-36.12, 38.3, 0.0])),
                Arc::new(Float64Array::from(vec![-72.9, 142.37, 0.0])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("quake-loader-{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped, 2);
        assert_eq!(ds.records[0].country, "Chile");
        assert_eq!(ds.source.as_deref(), Some(path.as_path()));
    }
}
