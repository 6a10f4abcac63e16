use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

use crate::data::encoding::LabelEncoding;
use crate::data::source::{DataSource, LoadOptions};

/// Serve an iris species prediction form.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Training data: `builtin`, a local .csv/.json/.parquet path, or an http(s) URL.
    #[arg(long, env = "IRIS_SOURCE", default_value = "builtin")]
    pub source: String,

    /// Treat the first CSV row as a header.
    #[arg(long, env = "IRIS_HEADER")]
    pub header: bool,

    /// How species names map to integer labels.
    #[arg(long, env = "IRIS_ENCODING", value_enum, default_value_t = LabelEncoding::DatasetOrder)]
    pub encoding: LabelEncoding,

    #[arg(long, env = "IRIS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    #[arg(long, env = "IRIS_PORT", default_value_t = 5000)]
    pub port: u16,

    /// L-BFGS iteration cap for the classifier.
    #[arg(long, env = "IRIS_MAX_ITER", default_value_t = 1000)]
    pub max_iter: u64,
}

impl Config {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            has_header: self.header,
            encoding: self.encoding,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
