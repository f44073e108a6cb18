/// Configures the global tracing subscriber. Call once at startup.
///
/// - `RUST_LOG` selects verbosity, defaulting to `info`
///   (e.g. `RUST_LOG=score_ledger::order_actor=debug`)
/// - Uptime timestamps show how long each operation takes
/// - Compact single-line output
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
