use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber. `RUST_LOG` takes precedence over
/// `default_filter`.
pub fn init_subscriber(default_filter: &str) -> Result<(), anyhow::Error> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
