//! Logistic-regression classifier backed by `linfa-logistic`.
//!
//! The adapter only converts samples into `ndarray` matrices and maps
//! errors; fitting (L-BFGS) and inference belong to the library.

use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2};

use crate::data::model::{Sample, N_FEATURES};
use crate::error::ClassifierError;

/// A trainable classifier over four-feature samples.
pub trait Classifier {
    /// Fit on aligned samples and labels in `0..n_classes`.
    fn fit(&mut self, x: &[Sample], y: &[usize], n_classes: usize) -> Result<(), ClassifierError>;

    /// Predicted label for one sample.
    fn predict(&self, x: &Sample) -> Result<usize, ClassifierError>;
}

/// Multinomial logistic regression with linfa's default L2 penalty.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    max_iter: u64,
    fitted: Option<MultiFittedLogisticRegression<f64, usize>>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_iter: 1000,
            fitted: None,
        }
    }

    /// Solver iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Class probabilities for one sample, in label order.
    pub fn predict_proba(&self, x: &Sample) -> Result<Vec<f64>, ClassifierError> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted)?;
        Ok(fitted.predict_probabilities(&to_matrix(std::slice::from_ref(x))).into_raw_vec())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &[Sample], y: &[usize], n_classes: usize) -> Result<(), ClassifierError> {
        if x.len() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                samples: x.len(),
                labels: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ClassifierError::EmptyInput);
        }
        if let Some(&label) = y.iter().find(|&&l| l >= n_classes) {
            return Err(ClassifierError::LabelOutOfRange { label, n_classes });
        }

        let dataset = Dataset::new(to_matrix(x), Array1::from(y.to_vec()));
        let fitted = MultiLogisticRegression::default()
            .max_iterations(self.max_iter)
            .fit(&dataset)
            .map_err(|e| ClassifierError::Fit(e.to_string()))?;
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Sample) -> Result<usize, ClassifierError> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted)?;
        let predicted: Array1<usize> = fitted.predict(&to_matrix(std::slice::from_ref(x)));
        predicted.first().copied().ok_or(ClassifierError::NotFitted)
    }
}

fn to_matrix(x: &[Sample]) -> Array2<f64> {
    Array2::from_shape_fn((x.len(), N_FEATURES), |(i, j)| x[i].0[j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin::load_iris;

    fn fitted_on_iris() -> (LogisticRegression, Vec<Sample>, Vec<usize>) {
        let iris = load_iris().unwrap();
        let mut model = LogisticRegression::new();
        model.fit(&iris.samples, &iris.targets, 3).unwrap();
        (model, iris.samples, iris.targets)
    }

    #[test]
    fn predicts_setosa_and_virginica_exemplars() {
        let (model, _, _) = fitted_on_iris();
        assert_eq!(model.predict(&Sample::new(5.1, 3.5, 1.4, 0.2)).unwrap(), 0);
        assert_eq!(model.predict(&Sample::new(6.3, 3.3, 6.0, 2.5)).unwrap(), 2);
    }

    #[test]
    fn training_accuracy_is_high() {
        let (model, x, y) = fitted_on_iris();
        let correct = x
            .iter()
            .zip(&y)
            .filter(|(s, l)| model.predict(s).unwrap() == **l)
            .count();
        let acc = correct as f64 / y.len() as f64;
        assert!(acc >= 0.9, "training accuracy {acc}");
    }

    #[test]
    fn fitting_is_deterministic() {
        let (a, x, _) = fitted_on_iris();
        let (b, _, _) = fitted_on_iris();
        for s in &x {
            assert_eq!(a.predict_proba(s).unwrap(), b.predict_proba(s).unwrap());
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (model, _, _) = fitted_on_iris();
        let p = model.predict_proba(&Sample::new(5.9, 3.0, 5.1, 1.8)).unwrap();
        assert_eq!(p.len(), 3);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_input() {
        let mut model = LogisticRegression::new();
        let s = Sample::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(model.fit(&[], &[], 3), Err(ClassifierError::EmptyInput));
        assert_eq!(
            model.fit(&[s], &[0, 1], 3),
            Err(ClassifierError::LengthMismatch {
                samples: 1,
                labels: 2
            })
        );
        assert_eq!(
            model.fit(&[s], &[3], 3),
            Err(ClassifierError::LabelOutOfRange {
                label: 3,
                n_classes: 3
            })
        );
        assert_eq!(model.predict(&s), Err(ClassifierError::NotFitted));
        assert_eq!(model.predict_proba(&s), Err(ClassifierError::NotFitted));
    }
}
