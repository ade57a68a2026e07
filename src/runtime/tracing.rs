/// Initializes structured logging.
///
/// Verbosity comes from `RUST_LOG` (e.g. `RUST_LOG=catalog_browser=debug`).
/// Spans from `#[instrument]` are printed inline in compact form, so a batch
/// log line carries the operation and ids it belongs to.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
