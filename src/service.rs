use anyhow::Context;
use log::info;
use serde::Serialize;

use crate::classifier::{Classifier, LogisticRegression};
use crate::config::Config;
use crate::data::loader;
use crate::data::model::{LabelTable, Sample, Species, TrainingSet};
use crate::data::source::DataSource;
use crate::error::ClassifierError;

// ---------------------------------------------------------------------------
// Prediction service
// ---------------------------------------------------------------------------

/// Trained model plus the label table it was trained against.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct IrisService {
    model: LogisticRegression,
    table: LabelTable,
    info: ServiceInfo,
}

/// Summary of what the service was trained on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub source: String,
    pub samples: usize,
    pub class_counts: Vec<(Species, usize)>,
}

impl IrisService {
    /// Load the configured source and fit on it: the whole startup sequence
    /// before the server binds.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = config.data_source();
        let set = loader::load(&source, &config.load_options())
            .with_context(|| format!("loading training data from {source}"))?;
        for (species, count) in set.class_counts() {
            info!("  {species}: {count} samples");
        }
        let model = LogisticRegression::new().with_max_iter(config.max_iter);
        Self::train(&source, set, model).context("training classifier")
    }

    /// Fit `model` on `set`. The training set is consumed; only its label
    /// table and summary survive.
    pub fn train(
        source: &DataSource,
        set: TrainingSet,
        mut model: LogisticRegression,
    ) -> Result<Self, ClassifierError> {
        let table = *set.label_table();
        model.fit(set.samples(), set.labels(), table.len())?;

        let info = ServiceInfo {
            source: source.to_string(),
            samples: set.len(),
            class_counts: set.class_counts(),
        };
        info!(
            "model trained on {} samples from {} ({})",
            info.samples, info.source, table
        );

        Ok(IrisService { model, table, info })
    }

    /// Predicted species for one sample.
    pub fn predict(&self, sample: &Sample) -> Result<Species, ClassifierError> {
        let index = self.model.predict(sample)?;
        self.table
            .decode(index)
            .ok_or(ClassifierError::LabelOutOfRange {
                label: index,
                n_classes: self.table.len(),
            })
    }

    /// Predicted species name, e.g. `Iris-setosa`.
    pub fn predict_name(&self, sample: &Sample) -> Result<&'static str, ClassifierError> {
        self.predict(sample).map(Species::name)
    }

    pub fn label_table(&self) -> &LabelTable {
        &self.table
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::source::LoadOptions;

    fn builtin_service() -> IrisService {
        let set = load(&DataSource::BuiltIn, &LoadOptions::default()).unwrap();
        IrisService::train(&DataSource::BuiltIn, set, LogisticRegression::new()).unwrap()
    }

    #[test]
    fn setosa_exemplar_is_named() {
        let service = builtin_service();
        let name = service
            .predict_name(&Sample::new(5.1, 3.5, 1.4, 0.2))
            .unwrap();
        assert_eq!(name, "Iris-setosa");
    }

    #[test]
    fn info_reflects_training_data() {
        let service = builtin_service();
        assert_eq!(service.info().source, "builtin");
        assert_eq!(service.info().samples, 150);
        assert_eq!(service.info().class_counts.len(), 3);
        assert_eq!(*service.label_table(), LabelTable::dataset_order());
    }

    #[test]
    fn repeated_training_predicts_identically() {
        let a = builtin_service();
        let b = builtin_service();
        for sample in [
            Sample::new(5.1, 3.5, 1.4, 0.2),
            Sample::new(6.0, 2.7, 5.1, 1.6),
            Sample::new(0.0, 0.0, 0.0, 0.0),
        ] {
            assert_eq!(a.predict(&sample).unwrap(), b.predict(&sample).unwrap());
        }
    }
}
