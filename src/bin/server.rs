//! Reply server binary.
//!
//! Config is read from the first argument, then `MOODLINE_CONFIG`, then the
//! default config path if it exists. Defaults are used otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use moodline::config::MoodConfig;
use moodline::server::MoodServer;
use moodline::startup::initialize;

fn config_path() -> Option<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Some(PathBuf::from(arg));
    }
    if let Some(env) = std::env::var_os("MOODLINE_CONFIG") {
        return Some(PathBuf::from(env));
    }
    let default = MoodConfig::default_config_path();
    default.exists().then_some(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("moodline=info,moodline_classify=info")
            }),
        )
        .init();

    let config = match config_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            MoodConfig::from_file(&path)
                .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?
        }
        None => {
            tracing::info!("no config file found; using defaults");
            MoodConfig::default()
        }
    };

    let engine = Arc::new(initialize(&config)?);

    let probe = engine.pipeline().resolve("hello").await;
    tracing::info!(label = %probe.label, stage = ?probe.stage, "self-test for 'hello'");

    let server = MoodServer::start(engine, &config.server).await?;
    tracing::info!(
        "endpoints: POST http://{addr}/predict, GET http://{addr}/test, GET http://{addr}/emotions",
        addr = server.addr()
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.shutdown();
    Ok(())
}
