//! License key generation.

use gateforge_store::RecordStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{License, LicenseError, LicenseKey};

/// Characters a generated key segment is drawn from.
pub const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of hyphen-separated segments in a generated key.
pub const KEY_SEGMENTS: usize = 4;

/// Characters per segment.
pub const KEY_SEGMENT_LEN: usize = 5;

/// Generates a random key of the form `XXXXX-XXXXX-XXXXX-XXXXX`.
///
/// Takes the RNG as a parameter so tests can pass a seeded one. The key
/// is not checked against the store; use [`unique_license_key`] for that.
pub fn generate_license_key<R: Rng + ?Sized>(rng: &mut R) -> LicenseKey {
    let mut key =
        String::with_capacity(KEY_SEGMENTS * (KEY_SEGMENT_LEN + 1));
    for segment in 0..KEY_SEGMENTS {
        if segment > 0 {
            key.push('-');
        }
        for _ in 0..KEY_SEGMENT_LEN {
            let idx = rng.random_range(0..KEY_ALPHABET.len());
            key.push(char::from(KEY_ALPHABET[idx]));
        }
    }
    LicenseKey::new(key)
}

/// Generates keys until one is not already persisted.
///
/// # Errors
/// - [`LicenseError::KeySpaceExhausted`] after `attempts` collisions
/// - [`LicenseError::Store`] if the uniqueness lookup fails
pub async fn unique_license_key<S: RecordStore>(
    store: &S,
    attempts: u32,
) -> Result<LicenseKey, LicenseError> {
    // The thread-local RNG isn't `Send`; seed a `StdRng` from it instead of
    // holding it across the lookups.
    let mut rng = StdRng::from_rng(&mut rand::rng());
    unique_license_key_with(store, attempts, &mut rng).await
}

/// [`unique_license_key`] drawing from a caller-supplied RNG.
pub async fn unique_license_key_with<S: RecordStore, R: Rng + Send>(
    store: &S,
    attempts: u32,
    rng: &mut R,
) -> Result<LicenseKey, LicenseError> {
    for attempt in 1..=attempts {
        let key = generate_license_key(&mut *rng);
        if store.get::<License>(key.as_str()).await?.is_none() {
            return Ok(key);
        }
        tracing::warn!(%key, attempt, "generated license key collided");
    }
    Err(LicenseError::KeySpaceExhausted(attempts))
}
