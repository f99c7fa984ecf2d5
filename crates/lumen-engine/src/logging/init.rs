use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provide one.
///
/// wgpu's internals are chatty at `info`; keep them at `warn` so shader and
/// lifecycle messages from the demos stay readable.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "lumen_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Picks the filter string: explicit config first, then `RUST_LOG`, then
    /// [`DEFAULT_FILTER`].
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> String {
        self.env_filter
            .as_deref()
            .or(rust_log.filter(|s| !s.trim().is_empty()))
            .unwrap_or(DEFAULT_FILTER)
            .to_string()
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = config.resolve_filter(rust_log.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // `try_init` so a host test harness that already installed a logger
        // does not abort us.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig { env_filter: Some("debug".into()), ..Default::default() };
        assert_eq!(cfg.resolve_filter(Some("warn")), "debug");
    }

    #[test]
    fn rust_log_used_when_unset() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.resolve_filter(Some("lumen_engine=trace")), "lumen_engine=trace");
    }

    #[test]
    fn blank_rust_log_falls_back_to_default() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.resolve_filter(Some("  ")), DEFAULT_FILTER);
        assert_eq!(cfg.resolve_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
