/// Initialize structured logging with tracing.
/// Hosts and test harnesses call this once at startup; the library itself
/// only emits events and never installs a subscriber.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).json());

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::info!("Structured logging initialized");
    }
}
