//! First-start seeding: a super admin and the demo license.

use gateforge_admin::{AdminAccount, PasswordHasher, Role};
use gateforge_license::{License, LicenseKey, SYSTEM_ISSUER};
use gateforge_store::RecordStore;

use crate::{BootstrapConfig, GateforgeError};

/// What [`seed_store`] created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub demo_license_created: bool,
}

/// Seeds an empty store.
///
/// - If there are no admin accounts at all, creates the configured super
///   admin.
/// - If the demo license key is missing, creates it: unrestricted, valid
///   for `demo_expiration_days`, issued by `"system"`.
///
/// Running it again is harmless; existing records are never touched.
pub async fn seed_store<S: RecordStore>(
    store: &S,
    config: &BootstrapConfig,
    hasher: &PasswordHasher,
) -> Result<SeedReport, GateforgeError> {
    let mut report = SeedReport::default();
    if !config.seed {
        return Ok(report);
    }

    if store.count::<AdminAccount>().await? == 0 {
        if !LicenseKey::admin_key_round_trips(&config.admin_username) {
            return Err(GateforgeError::Config(format!(
                "bootstrap admin username {:?} has no unambiguous admin key",
                config.admin_username
            )));
        }
        let hash = hasher.hash_password(&config.admin_password)?;
        store
            .create(AdminAccount::new(
                config.admin_username.as_str(),
                hash,
                Role::SuperAdmin,
            ))
            .await?;
        tracing::info!(username = %config.admin_username, "seeded default super admin");
        report.admin_created = true;
    }

    let demo_key = LicenseKey::new(&config.demo_license_key);
    if store.get::<License>(demo_key.as_str()).await?.is_none() {
        store
            .create(License::issue(
                demo_key.clone(),
                Some(config.demo_expiration_days),
                [],
                SYSTEM_ISSUER,
            ))
            .await?;
        tracing::info!(key = %demo_key, "seeded demo license");
        report.demo_license_created = true;
    }

    Ok(report)
}
