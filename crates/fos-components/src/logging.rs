//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber. `RUST_LOG` wins over `filter`.
///
/// Calling this again once a global subscriber exists is a no-op.
pub fn init_logging(filter: &str) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter)?,
    };

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}
