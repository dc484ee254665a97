//! Admin layer configuration.

use serde::{Deserialize, Serialize};

/// Argon2id cost parameters for new password hashes.
///
/// Verification always uses the parameters embedded in the stored hash,
/// so changing these only affects hashes created afterwards.
///
/// The defaults are argon2's recommended minimums. Tests drop them to
/// the floor to keep debug builds fast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,

    /// Number of passes.
    pub iterations: u32,

    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    /// The cheapest parameters argon2 accepts. For tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }
}

/// Configuration for the [`AdminDirectory`](crate::AdminDirectory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub password: PasswordConfig,

    /// How many random keys `generate_license` tries before giving up.
    pub key_generation_attempts: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: PasswordConfig::default(),
            key_generation_attempts: 16,
        }
    }
}
