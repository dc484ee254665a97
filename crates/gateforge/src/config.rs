//! Platform configuration.
//!
//! Every struct here derives `Deserialize` with `#[serde(default)]`, so a
//! config file only needs the fields it changes:
//!
//! ```json
//! { "license": { "enforce_expiration": true }, "log": { "default_directive": "debug" } }
//! ```

use std::path::Path;

use gateforge_admin::{AdminConfig, PasswordConfig};
use gateforge_license::LicenseConfig;
use serde::{Deserialize, Serialize};

use crate::GateforgeError;

/// What to seed into an empty store on first start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Set to `false` to start with whatever the store holds.
    pub seed: bool,

    /// Username of the super admin created when no account exists.
    pub admin_username: String,

    /// That admin's initial password. Change it after first login.
    pub admin_password: String,

    /// Key of the demo license created when it is missing.
    pub demo_license_key: String,

    pub demo_expiration_days: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed: true,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            demo_license_key: "TEST-LICENSE-12345DEMO".to_string(),
            demo_expiration_days: 365,
        }
    }
}

/// Logging defaults. `RUST_LOG` overrides `default_directive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub default_directive: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
        }
    }
}

/// Everything a [`Platform`](crate::Platform) is configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub license: LicenseConfig,
    pub password: PasswordConfig,
    pub bootstrap: BootstrapConfig,
    pub log: LogConfig,
}

impl PlatformConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GateforgeError> {
        serde_json::from_str(json)
            .map_err(|e| GateforgeError::Config(format!("invalid config: {e}")))
    }

    /// Reads and parses a JSON config file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, GateforgeError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            GateforgeError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// The admin layer's slice of this config.
    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig {
            password: self.password.clone(),
            key_generation_attempts: self.license.key_generation_attempts,
        }
    }
}
