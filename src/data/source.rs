use std::fmt;
use std::path::PathBuf;

use super::encoding::LabelEncoding;

/// Where the training data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// CSV, JSON or Parquet file on local disk.
    LocalFile(PathBuf),
    /// CSV fetched once over HTTP(S).
    Remote(String),
    /// The canonical 150-row dataset compiled into the binary.
    BuiltIn,
}

impl DataSource {
    /// `builtin` → [`DataSource::BuiltIn`], `http(s)://…` → [`DataSource::Remote`],
    /// anything else is a local path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("builtin") {
            DataSource::BuiltIn
        } else if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Remote(s.to_string())
        } else {
            DataSource::LocalFile(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::LocalFile(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => f.write_str(url),
            DataSource::BuiltIn => f.write_str("builtin"),
        }
    }
}

/// Parsing options shared by every source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// First CSV row is a header, not data. Ignored for the built-in set.
    pub has_header: bool,
    pub encoding: LabelEncoding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dispatches_on_prefix() {
        assert_eq!(DataSource::parse("builtin"), DataSource::BuiltIn);
        assert_eq!(DataSource::parse("BuiltIn"), DataSource::BuiltIn);
        assert_eq!(
            DataSource::parse("https://example.org/iris.csv"),
            DataSource::Remote("https://example.org/iris.csv".into())
        );
        assert_eq!(
            DataSource::parse("data/iris.csv"),
            DataSource::LocalFile(PathBuf::from("data/iris.csv"))
        );
    }

    #[test]
    fn display_round_trips() {
        for s in ["builtin", "http://localhost/x.csv", "iris.parquet"] {
            assert_eq!(DataSource::parse(s).to_string(), s);
        }
    }
}
