use tracing_subscriber::EnvFilter;

/// Stderr logger, filter taken from `RUST_LOG` with an `info` default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
