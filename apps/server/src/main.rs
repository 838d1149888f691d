use anyhow::Context;
use rollcall::domain::config::ApiConfig;
use rollcall::kernel::config::load_config;
use rollcall_logger::Logger;
use rollcall_server::{Server, load_env_file};
use std::path::PathBuf;

#[rollcall_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file(None)?;

    let path = std::env::args().nth(1).map(PathBuf::from);
    let cfg: ApiConfig =
        load_config(path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_str(&cfg.logging.level)?
        .directory(cfg.logging.directory.clone())
        .json(cfg.logging.json)
        .init()?;
    tracing::debug!(env_file, "Environment loaded");

    Server::builder().config(cfg).build().await?.run().await
}
