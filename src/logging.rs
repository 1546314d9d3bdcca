use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter, e.g. `JD_SKILLS_LOG=debug`.
pub const LOG_ENV: &str = "JD_SKILLS_LOG";

/// Installs the global subscriber. `default_level` applies when
/// [`LOG_ENV`] is unset or unparsable. Calling it twice is a no-op.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},sqlx=warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .try_init();
}
