use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "EDGEMAP_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "edgemap=debug" } else { "warn" }
}

/// Installs the stderr subscriber. Stdout carries only command output.
///
/// `EDGEMAP_LOG` wins over `--verbose`. A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
