//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::{GateforgeError, LogConfig};

/// Installs a `fmt` subscriber as the global default.
///
/// `RUST_LOG` wins when it is set; otherwise `config.default_directive`
/// is used (e.g. `"info"` or `"gateforge_admin=debug,info"`).
///
/// # Errors
/// [`GateforgeError::Config`] if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), GateforgeError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| GateforgeError::Config(format!("tracing already initialised: {e}")))
}
