use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of measurements per sample.
pub const N_FEATURES: usize = 4;

// ---------------------------------------------------------------------------
// Species – the three known classes
// ---------------------------------------------------------------------------

/// One of the three iris species the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "Iris-setosa")]
    Setosa,
    #[serde(rename = "Iris-versicolor")]
    Versicolor,
    #[serde(rename = "Iris-virginica")]
    Virginica,
}

impl Species {
    /// All species in dataset-declared order.
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    /// Canonical name, e.g. `Iris-setosa`.
    pub fn name(self) -> &'static str {
        match self {
            Species::Setosa => "Iris-setosa",
            Species::Versicolor => "Iris-versicolor",
            Species::Virginica => "Iris-virginica",
        }
    }

    /// Accepts the canonical name or the bare species (`setosa`), ignoring case.
    pub fn from_name(s: &str) -> Option<Species> {
        let s = s.trim();
        let bare = match s.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("iris-") => &s[5..],
            _ => s,
        };
        Species::ALL
            .into_iter()
            .find(|sp| sp.name()[5..].eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Sample – four measurements in form order
// ---------------------------------------------------------------------------

/// Sepal width, sepal height, petal width, petal height.
/// Values are taken as-is; no unit or range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample(pub [f64; N_FEATURES]);

impl Sample {
    pub fn new(swidth: f64, sheight: f64, pwidth: f64, pheight: f64) -> Self {
        Sample([swidth, sheight, pwidth, pheight])
    }

    pub fn sepal_width(&self) -> f64 {
        self.0[0]
    }

    pub fn sepal_height(&self) -> f64 {
        self.0[1]
    }

    pub fn petal_width(&self) -> f64 {
        self.0[2]
    }

    pub fn petal_height(&self) -> f64 {
        self.0[3]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// LabelTable – explicit index <-> species bijection
// ---------------------------------------------------------------------------

/// Fixed mapping between integer labels and species names.
///
/// Always holds each of the three species exactly once, so `encode` and
/// `decode` are inverse to each other for the life of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTable {
    order: [Species; 3],
}

/// One row of a [`LabelTable`], as exposed over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    pub index: usize,
    pub species: Species,
}

impl LabelTable {
    /// setosa=0, versicolor=1, virginica=2.
    pub fn dataset_order() -> Self {
        LabelTable {
            order: Species::ALL,
        }
    }

    /// Build from an explicit order. Returns `None` unless every species
    /// appears exactly once.
    pub fn from_order(order: [Species; 3]) -> Option<Self> {
        let mut sorted = order;
        sorted.sort();
        (sorted == Species::ALL).then_some(LabelTable { order })
    }

    pub fn encode(&self, species: Species) -> usize {
        // Every species is present by construction.
        self.order
            .iter()
            .position(|s| *s == species)
            .unwrap_or_default()
    }

    pub fn decode(&self, index: usize) -> Option<Species> {
        self.order.get(index).copied()
    }

    pub fn entries(&self) -> Vec<LabelEntry> {
        self.order
            .iter()
            .enumerate()
            .map(|(index, species)| LabelEntry {
                index,
                species: *species,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for LabelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sp) in self.order.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{i}={sp}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TrainingSet – the loaded, encoded dataset
// ---------------------------------------------------------------------------

/// Aligned samples and encoded labels, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    samples: Vec<Sample>,
    labels: Vec<usize>,
    table: LabelTable,
}

impl TrainingSet {
    /// `samples` and `labels` must have the same length and every label
    /// must decode under `table`; the loader guarantees both.
    pub(crate) fn new(samples: Vec<Sample>, labels: Vec<usize>, table: LabelTable) -> Self {
        debug_assert_eq!(samples.len(), labels.len());
        debug_assert!(labels.iter().all(|&l| l < table.len()));
        TrainingSet {
            samples,
            labels,
            table,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn label_table(&self) -> &LabelTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Row count per species, in label-table order.
    pub fn class_counts(&self) -> Vec<(Species, usize)> {
        let mut counts = [0usize; 3];
        for &label in &self.labels {
            counts[label] += 1;
        }
        self.table
            .entries()
            .into_iter()
            .map(|e| (e.species, counts[e.index]))
            .collect()
    }
}
