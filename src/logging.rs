//! Tracing subscriber bootstrap

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::error::{Result, WardrobeError};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "wardrobe_core=info";

/// Timestamp layout for log lines
const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_directives`. Returns
/// [`WardrobeError::InvalidConfig`] if a global subscriber is already set.
pub fn init_tracing(default_directives: Option<&str>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives.unwrap_or(DEFAULT_LOG_FILTER)));

    fmt()
        .with_env_filter(env_filter)
        .with_timer(fmt::time::ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
        .with_target(true)
        .try_init()
        .map_err(|e| WardrobeError::InvalidConfig(format!("tracing already initialized: {e}")))
}
