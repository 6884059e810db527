use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.init();
    }
}
