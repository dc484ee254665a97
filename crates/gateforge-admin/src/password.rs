//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::{AdminError, PasswordConfig};

/// Hashes admin passwords into PHC strings and checks them.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Builds a hasher with the given cost parameters.
    ///
    /// # Errors
    /// [`AdminError::Hash`] if argon2 rejects the parameters.
    pub fn new(config: &PasswordConfig) -> Result<Self, AdminError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AdminError::Hash(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AdminError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AdminError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on a mismatch and `Err` only if the stored hash
    /// is malformed.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AdminError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AdminError::Hash(format!("malformed stored hash: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AdminError::Hash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}
