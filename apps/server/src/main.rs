use anyhow::Context;
use ohub::domain::config::{ApiConfig, LoggingConfig};
use ohub::kernel::config::load_config;
use ohub_logger::{Logger, LoggerConfig, parse_level};
use ohub_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(None::<&str>).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder()
        .config(logger_config(&cfg.logging)?)
        .name(env!("CARGO_PKG_NAME"))
        .init()?;

    Server::builder().config(cfg).build().await?.run().await
}

fn logger_config(logging: &LoggingConfig) -> anyhow::Result<LoggerConfig> {
    Ok(LoggerConfig {
        console: logging.console,
        directory: logging.directory.clone(),
        level: parse_level(&logging.level)?,
        max_files: logging.max_files,
        json: logging.json,
        filter: logging.filter.clone(),
        ..LoggerConfig::default()
    })
}
