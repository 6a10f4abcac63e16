//! The canonical Iris dataset, compiled in.
//!
//! Stored the way toy-dataset bundles ship it: the first line is
//! `n_samples,n_features,<target names...>` and every following row is four
//! measurements plus an integer target already encoded against those names.

use super::loader::parse_feature;
use super::model::{Sample, Species, N_FEATURES};
use crate::error::LoadError;

const IRIS_CSV: &str = include_str!("../../data/iris.csv");

/// Decoded contents of the bundled file.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinIris {
    pub samples: Vec<Sample>,
    pub targets: Vec<usize>,
    /// Ready-made name table: `target_names[target]`.
    pub target_names: Vec<Species>,
}

/// Parse the bundled dataset.
pub fn load_iris() -> Result<BuiltinIris, LoadError> {
    parse_bundle(IRIS_CSV)
}

fn parse_bundle(text: &str) -> Result<BuiltinIris, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records.next().ok_or(LoadError::Empty)??;
    let n_samples: usize = header_field(&header, 0)?;
    let n_features: usize = header_field(&header, 1)?;
    if n_features != N_FEATURES {
        return Err(LoadError::Shape {
            row: 0,
            message: format!("expected {N_FEATURES} features, header declares {n_features}"),
        });
    }
    let target_names = header
        .iter()
        .skip(2)
        .map(|name| {
            Species::from_name(name).ok_or_else(|| LoadError::UnknownLabel {
                row: 0,
                label: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut samples = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for (i, record) in records.enumerate() {
        let row = i + 1;
        let record = record?;
        if record.len() != N_FEATURES + 1 {
            return Err(LoadError::Shape {
                row,
                message: format!("expected {} fields, found {}", N_FEATURES + 1, record.len()),
            });
        }
        let mut values = [0.0; N_FEATURES];
        for (column, slot) in values.iter_mut().enumerate() {
            *slot = parse_feature(&record[column], row, column)?;
        }
        let cell = &record[N_FEATURES];
        let target: usize = cell
            .parse()
            .ok()
            .filter(|t| *t < target_names.len())
            .ok_or_else(|| LoadError::UnknownLabel {
                row,
                label: cell.to_string(),
            })?;
        samples.push(Sample(values));
        targets.push(target);
    }

    if samples.len() != n_samples {
        return Err(LoadError::Shape {
            row: samples.len(),
            message: format!("header declares {n_samples} rows, found {}", samples.len()),
        });
    }

    Ok(BuiltinIris {
        samples,
        targets,
        target_names,
    })
}

fn header_field(header: &csv::StringRecord, index: usize) -> Result<usize, LoadError> {
    let cell = header.get(index).unwrap_or("");
    cell.parse().map_err(|_| LoadError::Parse {
        row: 0,
        column: index,
        value: cell.to_string(),
    })
}
