use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use iris_form::config::Config;
use iris_form::IrisService;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Load and fit before the runtime starts: the remote client blocks, and
    // any failure here should stop the process before it binds.
    let service = IrisService::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async move {
        let addr = config.addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        iris_form::web::serve(listener, Arc::new(service))
            .await
            .context("server failed")
    })
}
