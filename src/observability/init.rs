//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFileWriter;
use crate::infrastructure::resolve_log_path;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else `config.trace_level`, else
/// `info`. Events go to the rotating file named by `config.log_file`, or to
/// stderr when no log file is configured.
///
/// Only the first call installs a subscriber; later calls are no-ops.
///
/// # Example
///
/// ```rust
/// use marketview::observability::init_tracing;
/// use marketview::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let directive = filter_directive(
        std::env::var("RUST_LOG").ok().as_deref(),
        config.trace_level.as_deref(),
    );
    let registry = tracing_subscriber::registry().with(EnvFilter::new(directive));

    let result = match config.log_file.as_deref() {
        Some(log_file) => {
            let writer = RotatingFileWriter::new(resolve_log_path(log_file));
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(log_file = ?config.log_file, "tracing initialized");
    }
}

fn filter_directive(env: Option<&str>, configured: Option<&str>) -> String {
    [env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_precedence() {
        assert_eq!(filter_directive(Some("trace"), Some("warn")), "trace");
        assert_eq!(filter_directive(None, Some("warn")), "warn");
        assert_eq!(filter_directive(Some(""), Some("warn")), "warn");
        assert_eq!(filter_directive(None, None), "info");
    }

    #[test]
    fn repeated_init_is_harmless() {
        let config = Config::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}
