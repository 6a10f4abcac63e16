/// Data layer: core types, sources, encoding and loading.
///
/// Architecture:
/// ```text
///  local .csv / .json / .parquet   remote CSV   bundled iris
///        │                            │              │
///        └────────────┬───────────────┴──────────────┘
///                     ▼
///               ┌──────────┐
///               │  loader   │  parse rows → (Sample, Species)
///               └──────────┘
///                     │
///                     ▼
///               ┌──────────┐
///               │ encoding  │  Species → usize via LabelTable
///               └──────────┘
///                     │
///                     ▼
///               ┌─────────────┐
///               │ TrainingSet  │  Vec<Sample>, Vec<usize>, LabelTable
///               └─────────────┘
/// ```

pub mod builtin;
pub mod encoding;
pub mod loader;
pub mod model;
pub mod source;
