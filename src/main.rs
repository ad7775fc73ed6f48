use tracing_subscriber::EnvFilter;

use agentg::api;
use agentg::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if config.dev_mode {
        tracing::warn!("DEV_MODE enabled: auth checks are disabled");
    }

    api::serve(config).await
}
