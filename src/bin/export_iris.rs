//! Write the bundled iris dataset to disk in a format the loader reads.
//!
//! ```text
//! export_iris [OUTPUT]      # OUTPUT ends in .csv, .json or .parquet (default iris.parquet)
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

use iris_form::data::builtin::{load_iris, BuiltinIris};

const FEATURE_NAMES: [&str; 4] = ["sepal_width", "sepal_height", "petal_width", "petal_height"];

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "iris.parquet".to_string());
    let output_path = Path::new(&output);
    let iris = load_iris().context("decoding bundled dataset")?;

    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(output_path, &iris)?,
        "json" => write_json(output_path, &iris)?,
        "parquet" | "pq" => write_parquet(output_path, &iris)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} samples to {output}", iris.samples.len());
    Ok(())
}

fn species_names(iris: &BuiltinIris) -> Vec<&'static str> {
    iris.targets
        .iter()
        .map(|&t| iris.target_names[t].name())
        .collect()
}

/// Headerless: four measurements then the species name.
fn write_csv(path: &Path, iris: &BuiltinIris) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context("creating CSV file")?;
    for (sample, name) in iris.samples.iter().zip(species_names(iris)) {
        let mut row: Vec<String> = sample.as_slice().iter().map(|v| v.to_string()).collect();
        row.push(name.to_string());
        writer.write_record(&row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

/// Records-oriented: `[{"features": [...], "label": "Iris-setosa"}, ...]`.
fn write_json(path: &Path, iris: &BuiltinIris) -> Result<()> {
    let records: Vec<_> = iris
        .samples
        .iter()
        .zip(species_names(iris))
        .map(|(sample, name)| json!({ "features": sample.as_slice(), "label": name }))
        .collect();
    let text = serde_json::to_string_pretty(&records).context("serializing JSON")?;
    std::fs::write(path, text).context("writing JSON file")?;
    Ok(())
}

fn write_parquet(path: &Path, iris: &BuiltinIris) -> Result<()> {
    let mut fields: Vec<Field> = FEATURE_NAMES
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, false))
        .collect();
    fields.push(Field::new("species", DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<Arc<dyn arrow::array::Array>> = (0..FEATURE_NAMES.len())
        .map(|j| {
            let values: Float64Array = iris.samples.iter().map(|s| s.0[j]).collect::<Vec<_>>().into();
            Arc::new(values) as Arc<dyn arrow::array::Array>
        })
        .collect();
    columns.push(Arc::new(StringArray::from(species_names(iris))));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}
