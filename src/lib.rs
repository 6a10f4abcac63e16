//! Iris species prediction behind a web form.
//!
//! Training data is loaded once from a local file, a remote CSV or the
//! bundled dataset, a logistic-regression model is fitted on it, and the
//! resulting [`service::IrisService`] answers form submissions.

pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod service;
pub mod web;

pub use classifier::{Classifier, LogisticRegression};
pub use data::encoding::LabelEncoding;
pub use data::model::{LabelTable, Sample, Species, TrainingSet};
pub use data::source::{DataSource, LoadOptions};
pub use error::{ClassifierError, FormError, LoadError};
pub use service::IrisService;
