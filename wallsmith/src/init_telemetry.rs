use tracing_subscriber::EnvFilter;

/// Initializes the fmt subscriber. `RUST_LOG` wins over the debug flag.
pub fn init_telemetry_and_tracing(debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to initialize tracing: {err}"))?;
    Ok(())
}
