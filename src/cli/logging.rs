//! Diagnostic logging for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber.
///
/// `--verbose` turns on debug events from this crate; otherwise `RUST_LOG`
/// is honoured, falling back to warnings only.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("confstore=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
