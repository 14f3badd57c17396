//! Runtime Configuration

/// Runtime configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Dispatch `connected` and `attribute-changed` events on component
    /// elements by default
    pub emit_lifecycle_events: bool,

    /// Filter used by [`crate::init_logging`] when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emit_lifecycle_events: false,
            log_filter: "info".to_string(),
        }
    }
}
