use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{LabelTable, Species};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Encoding strategy
// ---------------------------------------------------------------------------

/// How species names are assigned integer labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LabelEncoding {
    /// Fixed table: setosa=0, versicolor=1, virginica=2.
    #[default]
    DatasetOrder,
    /// Fitted from the data: distinct names sorted, numbered from 0.
    Alphabetical,
}

/// Interpret one label cell.
///
/// A species name in either long or short form, or an integer already
/// encoded in dataset order (`0..3`). Integral floats such as `2.0` are read
/// as integers.
pub fn parse_label(cell: &str, row: usize) -> Result<Species, LoadError> {
    let cell = cell.trim();
    let unknown = || LoadError::UnknownLabel {
        row,
        label: cell.to_string(),
    };
    if let Ok(value) = cell.parse::<f64>() {
        let index = (value >= 0.0 && value.fract() == 0.0).then_some(value as usize);
        return index
            .and_then(|i| LabelTable::dataset_order().decode(i))
            .ok_or_else(unknown);
    }
    Species::from_name(cell).ok_or_else(unknown)
}

/// Build the label table for `labels` and encode each of them.
pub fn encode_labels(
    labels: &[Species],
    encoding: LabelEncoding,
) -> Result<(Vec<usize>, LabelTable), LoadError> {
    let table = match encoding {
        LabelEncoding::DatasetOrder => LabelTable::dataset_order(),
        LabelEncoding::Alphabetical => fit_alphabetical(labels)?,
    };
    let encoded = labels.iter().map(|sp| table.encode(*sp)).collect();
    Ok((encoded, table))
}

fn fit_alphabetical(labels: &[Species]) -> Result<LabelTable, LoadError> {
    let seen: BTreeSet<Species> = labels.iter().copied().collect();
    let missing: Vec<&'static str> = Species::ALL
        .into_iter()
        .filter(|sp| !seen.contains(sp))
        .map(Species::name)
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingClasses { missing });
    }

    let mut order = Species::ALL;
    order.sort_by_key(|sp| sp.name());
    LabelTable::from_order(order).ok_or(LoadError::MissingClasses {
        missing: Vec::new(),
    })
}
