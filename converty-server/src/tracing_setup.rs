use tracing_subscriber::EnvFilter;

/// Initialize tracing from configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn install_tracing(cfg: &converty_config::LoggingConfig) {
    use tracing_subscriber::fmt::time::ChronoUtc;

    let env_filter_str = std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.level.clone());

    if cfg.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::new(&env_filter_str))
            .with_timer(ChronoUtc::rfc_3339())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&env_filter_str))
            .init();
    }
}
