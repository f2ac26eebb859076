use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,hokm_backend=info,actix_web=info";

/// Install the process-wide subscriber. `RUST_LOG` overrides the filter;
/// `HOKM_LOG_FORMAT=text` swaps JSON lines for human-readable output.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let text = std::env::var("HOKM_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("text"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if text {
        registry.with(fmt::layer().with_target(false)).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_ansi(false).json())
            .init();
    }
}
