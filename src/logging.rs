use tracing_subscriber::prelude::*;

/// Installs the global `fmt` subscriber on stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this a
/// second time is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
