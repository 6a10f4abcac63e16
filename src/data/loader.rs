use std::io::{Cursor, Read};
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::builtin;
use super::encoding::{encode_labels, parse_label};
use super::model::{Sample, Species, TrainingSet, N_FEATURES};
use super::source::{DataSource, LoadOptions};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and encode a training set from `source`.
///
/// The source is read exactly once; file handles and response bodies are
/// dropped before this returns, only the derived training set is kept.
pub fn load(source: &DataSource, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    info!("loading training data from {source}");
    let set = match source {
        DataSource::LocalFile(path) => load_file(path, options),
        DataSource::Remote(url) => load_remote(url, options),
        DataSource::BuiltIn => load_builtin(options),
    }?;
    info!("loaded {} samples from {source}", set.len());
    debug!("label table: {}", set.label_table());
    Ok(set)
}

/// Load a local file. Dispatch by extension.
///
/// * `.json`           – `[{"features": [..4], "label": ..}, ...]` or `[[f, f, f, f, label], ...]`
/// * `.parquet`/`.pq`  – four numeric columns followed by a string or integer label column
/// * anything else     – CSV, four numeric columns then the label
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, options),
        "json" => load_json(path, options),
        _ => {
            let file = std::fs::File::open(path)?;
            load_reader(file, options)
        }
    }
}

/// Fetch a CSV over HTTP(S) with a default client.
pub fn load_remote(url: &str, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let client = reqwest::blocking::Client::new();
    load_remote_with(&client, url, options)
}

/// Fetch a CSV over HTTP(S) with the given client. Non-2xx responses fail.
pub fn load_remote_with(
    client: &reqwest::blocking::Client,
    url: &str,
    options: &LoadOptions,
) -> Result<TrainingSet, LoadError> {
    let http_err = |e: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };
    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(http_err)?;
    debug!("fetched {} bytes from {url}", body.len());

    load_reader(Cursor::new(body), options)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any byte stream.
///
/// Every record is four numbers followed by the label. With
/// `options.has_header` the first row is consumed as a header.
pub fn load_reader(reader: impl Read, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut species = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        if record.len() != N_FEATURES + 1 {
            return Err(LoadError::Shape {
                row,
                message: format!(
                    "expected {} fields, found {}",
                    N_FEATURES + 1,
                    record.len()
                ),
            });
        }

        let mut values = [0.0; N_FEATURES];
        for (column, slot) in values.iter_mut().enumerate() {
            *slot = parse_feature(&record[column], row, column)?;
        }
        samples.push(Sample(values));
        species.push(parse_label(&record[N_FEATURES], row)?);
    }

    finish(samples, species, options)
}

/// NaN and infinities are rejected: one of them poisons the whole fit.
pub(crate) fn parse_feature(cell: &str, row: usize, column: usize) -> Result<f64, LoadError> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::Parse {
            row,
            column,
            value: cell.to_string(),
        })
}

fn finish(
    samples: Vec<Sample>,
    species: Vec<Species>,
    options: &LoadOptions,
) -> Result<TrainingSet, LoadError> {
    if samples.is_empty() {
        return Err(LoadError::Empty);
    }
    let (labels, table) = encode_labels(&species, options.encoding)?;
    Ok(TrainingSet::new(samples, labels, table))
}

// ---------------------------------------------------------------------------
// Built-in dataset
// ---------------------------------------------------------------------------

fn load_builtin(options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let iris = builtin::load_iris()?;
    // Targets index into the bundled name table; re-encode so the requested
    // ordering still applies.
    let species = iris
        .targets
        .iter()
        .map(|&t| iris.target_names[t])
        .collect();
    finish(iris.samples, species, options)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts either records (`{"features": [...], "label": ...}`) or plain
/// rows (`[f, f, f, f, label]`). Labels may be names or integer indices.
fn load_json(path: &Path, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let rows = root.as_array().ok_or_else(|| LoadError::Shape {
        row: 0,
        message: "expected top-level JSON array".into(),
    })?;

    let mut samples = Vec::with_capacity(rows.len());
    let mut species = Vec::with_capacity(rows.len());

    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let (features, label): (&[JsonValue], Option<&JsonValue>) = match value {
            JsonValue::Object(obj) => {
                let features = obj
                    .get("features")
                    .and_then(|v| v.as_array())
                    .map(|a| a.as_slice())
                    .unwrap_or_default();
                (features, obj.get("label"))
            }
            JsonValue::Array(cells) => match cells.split_last() {
                Some((label, features)) => (features, Some(label)),
                None => (&[], None),
            },
            _ => (&[], None),
        };

        if features.len() != N_FEATURES {
            return Err(LoadError::Shape {
                row,
                message: format!("expected {N_FEATURES} features, found {}", features.len()),
            });
        }

        let mut values = [0.0; N_FEATURES];
        for (column, (slot, v)) in values.iter_mut().zip(features).enumerate() {
            *slot = match v {
                JsonValue::Number(n) => n.as_f64().filter(|f| f.is_finite()),
                JsonValue::String(s) => parse_feature(s, row, column).ok(),
                _ => None,
            }
            .ok_or_else(|| LoadError::Parse {
                row,
                column,
                value: v.to_string(),
            })?;
        }
        samples.push(Sample(values));
        species.push(json_label(label, row)?);
    }

    finish(samples, species, options)
}

fn json_label(value: Option<&JsonValue>, row: usize) -> Result<Species, LoadError> {
    match value {
        Some(JsonValue::String(s)) => parse_label(s, row),
        Some(JsonValue::Number(n)) => parse_label(&n.to_string(), row),
        other => Err(LoadError::UnknownLabel {
            row,
            label: other.map_or_else(|| "<missing>".to_string(), |v| v.to_string()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: four Float64/Float32 feature columns (any names) in form
/// order, then a Utf8, Int32/Int64 or integral Float64 label column. Works
/// with files written by Pandas, Polars or the `export_iris` binary.
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<TrainingSet, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut samples = Vec::new();
    let mut species = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        if batch.num_columns() != N_FEATURES + 1 {
            return Err(LoadError::Shape {
                row: samples.len() + 1,
                message: format!(
                    "expected {} columns, found {}",
                    N_FEATURES + 1,
                    batch.num_columns()
                ),
            });
        }

        let offset = samples.len();
        for r in 0..batch.num_rows() {
            let row = offset + r + 1;
            let mut values = [0.0; N_FEATURES];
            for (column, slot) in values.iter_mut().enumerate() {
                let col = batch.column(column);
                *slot = extract_f64(col, r).ok_or_else(|| LoadError::Parse {
                    row,
                    column,
                    value: describe_cell(col, r),
                })?;
            }
            samples.push(Sample(values));
            species.push(extract_label(batch.column(N_FEATURES), r, row)?);
        }
    }

    finish(samples, species, options)
}

// -- Parquet / Arrow helpers --

/// Null and non-finite cells yield `None`.
fn extract_f64(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn describe_cell(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return "<null>".into();
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
    .unwrap_or_else(|| format!("{:?}", col.data_type()))
}

fn extract_label(col: &ArrayRef, index: usize, row: usize) -> Result<Species, LoadError> {
    let unknown = |label: String| LoadError::UnknownLabel { row, label };
    if col.is_null(index) {
        return Err(unknown("<null>".into()));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| unknown("<utf8>".into()))?;
            parse_label(arr.value(index), row)
        }
        DataType::LargeUtf8 => parse_label(col.as_string::<i64>().value(index), row),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| unknown("<int32>".into()))?;
            parse_label(&arr.value(index).to_string(), row)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| unknown("<int64>".into()))?;
            parse_label(&arr.value(index).to_string(), row)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| unknown("<float64>".into()))?;
            parse_label(&arr.value(index).to_string(), row)
        }
        other => Err(unknown(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoding::LabelEncoding;
    use crate::data::model::LabelTable;

    const HEADERLESS: &str = "5.1,3.5,1.4,0.2,Iris-setosa\n\
                              7.0,3.2,4.7,1.4,Iris-versicolor\n\
                              6.3,3.3,6.0,2.5,Iris-virginica\n";

    fn opts(has_header: bool) -> LoadOptions {
        LoadOptions {
            has_header,
            encoding: LabelEncoding::DatasetOrder,
        }
    }

    #[test]
    fn headerless_rows_are_all_data() {
        let set = load_reader(HEADERLESS.as_bytes(), &opts(false)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.labels(), &[0, 1, 2]);
        assert_eq!(set.samples()[1], Sample::new(7.0, 3.2, 4.7, 1.4));
    }

    #[test]
    fn header_row_is_consumed() {
        let text = format!("sepal_length,sepal_width,petal_length,petal_width,species\n{HEADERLESS}");
        let set = load_reader(text.as_bytes(), &opts(true)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set, load_reader(HEADERLESS.as_bytes(), &opts(false)).unwrap());
    }

    #[test]
    fn header_without_flag_is_a_parse_error() {
        let text = format!("a,b,c,d,species\n{HEADERLESS}");
        let err = load_reader(text.as_bytes(), &opts(false)).unwrap_err();
        assert!(matches!(err, LoadError::Parse { row: 1, column: 0, .. }));
    }

    #[test]
    fn integer_labels_are_accepted() {
        let text = "x1,x2,x3,x4,target\n5.1,3.5,1.4,0.2,0\n6.3,3.3,6.0,2.5,2\n";
        let set = load_reader(text.as_bytes(), &opts(true)).unwrap();
        assert_eq!(set.labels(), &[0, 2]);
    }

    #[test]
    fn malformed_feature_reports_position() {
        let text = "5.1,3.5,1.4,0.2,Iris-setosa\n5.1,abc,1.4,0.2,Iris-setosa\n";
        let err = load_reader(text.as_bytes(), &opts(false)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at row 2, column 1: 'abc' is not a number"
        );
    }

    #[test]
    fn non_finite_features_are_rejected() {
        for cell in ["nan", "NaN", "inf", "-infinity"] {
            let text = format!("5.1,3.5,1.4,0.2,Iris-setosa\n{cell},3.0,5.0,1.8,2\n");
            let err = load_reader(text.as_bytes(), &opts(false)).unwrap_err();
            match err {
                LoadError::Parse { row, column, value } => {
                    assert_eq!((row, column), (2, 0));
                    assert_eq!(value, cell);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        let text = "5.1,3.5,1.4,0.2,Iris-unknown\n";
        let err = load_reader(text.as_bytes(), &opts(false)).unwrap_err();
        assert!(matches!(err, LoadError::UnknownLabel { row: 1, .. }));
    }

    #[test]
    fn wrong_field_count_is_a_shape_error() {
        let text = "5.1,3.5,1.4,Iris-setosa\n";
        let err = load_reader(text.as_bytes(), &opts(false)).unwrap_err();
        assert!(matches!(err, LoadError::Shape { row: 1, .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            load_reader("".as_bytes(), &opts(false)),
            Err(LoadError::Empty)
        ));
        assert!(matches!(
            load_reader("a,b,c,d,e\n".as_bytes(), &opts(true)),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn builtin_matches_dataset_order() {
        let set = load(&DataSource::BuiltIn, &opts(false)).unwrap();
        assert_eq!(set.len(), 150);
        assert_eq!(*set.label_table(), LabelTable::dataset_order());
        assert_eq!(
            set.class_counts(),
            vec![
                (Species::Setosa, 50),
                (Species::Versicolor, 50),
                (Species::Virginica, 50)
            ]
        );
    }

    #[test]
    fn builtin_honours_alphabetical_encoding() {
        let options = LoadOptions {
            has_header: false,
            encoding: LabelEncoding::Alphabetical,
        };
        let set = load(&DataSource::BuiltIn, &options).unwrap();
        assert_eq!(set.label_table().decode(0), Some(Species::Setosa));
        assert_eq!(set.labels()[0], 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = DataSource::LocalFile("/nonexistent/iris.csv".into());
        assert!(matches!(load(&source, &opts(false)), Err(LoadError::Io(_))));
    }
}
