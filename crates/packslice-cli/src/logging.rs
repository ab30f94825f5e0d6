//! tracing-subscriber setup

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, logging to stderr
///
/// `RUST_LOG` wins over `-v` when set. Stdout stays free for `--json` output.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
