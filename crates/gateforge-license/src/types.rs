//! License data types: keys, game identifiers, and the license record.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use gateforge_store::{Record, RecordId, RecordKind};
use serde::{Deserialize, Serialize};

/// The `created_by` value for licenses nobody issued by hand: the
/// bootstrap demo license and every admin session license.
pub const SYSTEM_ISSUER: &str = "system";

const ADMIN_KEY_PREFIX: &str = "ADMIN-";
const ADMIN_KEY_SUFFIX: &str = "-PERMANENT";

// ---------------------------------------------------------------------------
// LicenseKey
// ---------------------------------------------------------------------------

/// A license key, the unique identifier of a [`License`].
///
/// Two shapes exist:
///
/// - generated end-user keys, `XXXXX-XXXXX-XXXXX-XXXXX` (four segments of
///   five characters from `A-Z0-9`);
/// - admin session keys, `ADMIN-{USERNAME}-PERMANENT`, one per admin.
///
/// Lookups treat keys as opaque strings, so other stored keys (like the
/// bootstrap demo key) work too. Surrounding whitespace is trimmed on
/// construction because keys are usually pasted in by hand.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Wraps a key string, trimming surrounding whitespace.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_string())
    }

    /// The deterministic session key for an admin: `ADMIN-{USERNAME}-PERMANENT`.
    ///
    /// The username is upper-cased, so every spelling of the same
    /// (case-insensitive) username maps to the same key.
    pub fn admin(username: &str) -> Self {
        Self(format!(
            "{ADMIN_KEY_PREFIX}{}{ADMIN_KEY_SUFFIX}",
            username.trim().to_uppercase()
        ))
    }

    /// Parses the admin username back out of an admin session key.
    ///
    /// Returns the username lower-cased, or `None` if this isn't an
    /// admin key.
    pub fn admin_username(&self) -> Option<String> {
        self.0
            .strip_prefix(ADMIN_KEY_PREFIX)
            .and_then(|rest| rest.strip_suffix(ADMIN_KEY_SUFFIX))
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
    }

    /// Returns `true` if `username` comes back unchanged (lower-cased)
    /// from [`admin`](Self::admin) followed by
    /// [`admin_username`](Self::admin_username).
    ///
    /// Names with a lossy case mapping fail: `"straße"` upper-cases to
    /// `STRASSE` and parses back as `"strasse"`, so it would share an
    /// admin key with a different account.
    pub fn admin_key_round_trips(username: &str) -> bool {
        let expected = username.trim().to_lowercase();
        Self::admin(username).admin_username().as_deref() == Some(expected.as_str())
    }

    /// Returns `true` for keys of the form `ADMIN-{USERNAME}-PERMANENT`.
    pub fn is_admin_key(&self) -> bool {
        self.admin_username().is_some()
    }

    /// Returns `true` if the key has the generated `XXXXX-XXXXX-XXXXX-XXXXX`
    /// shape.
    pub fn is_generated_format(&self) -> bool {
        let segments: Vec<&str> = self.0.split('-').collect();
        segments.len() == crate::KEY_SEGMENTS
            && segments.iter().all(|segment| {
                segment.len() == crate::KEY_SEGMENT_LEN
                    && segment
                        .bytes()
                        .all(|b| crate::KEY_ALPHABET.contains(&b))
            })
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LicenseKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// Identifier of a game in the platform's catalog (e.g. `"slot-machine"`).
///
/// The catalog itself lives outside this crate; licenses only carry the
/// ids they are restricted to.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// License
// ---------------------------------------------------------------------------

/// A persisted license, stored in the `generated_licenses` collection.
///
/// The same record type covers end-user licenses and admin session
/// licenses; `is_admin` tells them apart.
///
/// ## Lifecycle
///
/// ```text
/// issue() ──→ [active, unused] ──login()──→ [active, used] ──revoke──→ [inactive]
/// ```
///
/// Revocation is terminal for end-user keys. An admin's own session key
/// is the exception: logging out revokes it and logging in again
/// reactivates the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Store-assigned id; `None` until the record is created.
    #[serde(default)]
    pub id: Option<RecordId>,

    pub key: LicenseKey,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Nominal validity in days from `created_at`. `None` for permanent
    /// licenses (all admin session licenses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_days: Option<u32>,

    /// Username of the issuing admin, or [`SYSTEM_ISSUER`].
    pub created_by: String,

    /// `false` once revoked.
    pub is_active: bool,

    /// When the license was first adopted as a session.
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,

    /// Who first used it.
    #[serde(default)]
    pub used_by: Option<String>,

    /// Games this license opens. Empty means every game.
    #[serde(default)]
    pub allowed_games: BTreeSet<GameId>,

    /// Marks an administrator session credential.
    #[serde(default)]
    pub is_admin: bool,
}

impl License {
    /// Builds a new, active, unused end-user license.
    ///
    /// Timestamps are provisional; the store overwrites them on create.
    pub fn issue(
        key: LicenseKey,
        expiration_days: Option<u32>,
        allowed_games: impl IntoIterator<Item = GameId>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            key,
            created_at: now,
            updated_at: now,
            expiration_days,
            created_by: created_by.into(),
            is_active: true,
            used_at: None,
            used_by: None,
            allowed_games: allowed_games.into_iter().collect(),
            is_admin: false,
        }
    }

    /// Builds the permanent session license for an admin, already marked
    /// as used by them at `now`.
    pub fn admin_session(username: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            key: LicenseKey::admin(username),
            created_at: now,
            updated_at: now,
            expiration_days: None,
            created_by: SYSTEM_ISSUER.to_string(),
            is_active: true,
            used_at: Some(now),
            used_by: Some(username.to_string()),
            allowed_games: BTreeSet::new(),
            is_admin: true,
        }
    }

    /// Returns `true` if the license opens every game.
    pub fn is_unrestricted(&self) -> bool {
        self.allowed_games.is_empty()
    }

    /// Returns `true` if this license's allow-list admits `game`.
    ///
    /// Does not consider `is_admin` or `is_active`; see
    /// [`has_game_access`](crate::has_game_access) for the full rule.
    pub fn allows(&self, game: &GameId) -> bool {
        self.is_unrestricted() || self.allowed_games.contains(game)
    }

    /// When the license stops being valid, if it ever does.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration_days
            .map(|days| self.created_at + Duration::days(i64::from(days)))
    }

    /// Returns `true` if the expiration window has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|end| now >= end)
    }

    /// Whether this license can back a session.
    ///
    /// Active licenses are valid; with `enforce_expiration` they must also
    /// be inside their expiration window.
    pub fn is_valid_session(
        &self,
        enforce_expiration: bool,
        now: DateTime<Utc>,
    ) -> bool {
        self.is_active && !(enforce_expiration && self.is_expired_at(now))
    }

    /// Returns `true` until the license has been used once.
    pub fn is_unused(&self) -> bool {
        self.used_at.is_none()
    }

    /// Stamps first use.
    pub fn mark_used(&mut self, used_by: impl Into<String>, at: DateTime<Utc>) {
        self.used_at = Some(at);
        self.used_by = Some(used_by.into());
    }

    /// The most recent meaningful timestamp: first use, else last update.
    ///
    /// Session restoration requires one to exist before adopting a
    /// persisted admin license.
    pub fn session_anchor(&self) -> DateTime<Utc> {
        self.used_at.unwrap_or(self.updated_at)
    }

    /// The admin username for admin session licenses.
    pub fn admin_username(&self) -> Option<String> {
        if self.is_admin {
            self.key.admin_username()
        } else {
            None
        }
    }
}

impl Record for License {
    const KIND: RecordKind = RecordKind::License;

    fn raw_key(&self) -> &str {
        self.key.as_str()
    }

    fn normalize_key(key: &str) -> String {
        key.trim().to_string()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_key_uppercases_username() {
        let key = LicenseKey::admin("alice");
        assert_eq!(key.as_str(), "ADMIN-ALICE-PERMANENT");
        assert_eq!(LicenseKey::admin(" Alice "), key);
    }

    #[test]
    fn test_admin_username_round_trips_lowercased() {
        assert_eq!(
            LicenseKey::admin("Alice").admin_username(),
            Some("alice".to_string())
        );
        // Hyphenated usernames keep their inner hyphens.
        assert_eq!(
            LicenseKey::new("ADMIN-JOHN-DOE-PERMANENT").admin_username(),
            Some("john-doe".to_string())
        );
    }

    #[test]
    fn test_admin_username_rejects_non_admin_keys() {
        assert_eq!(LicenseKey::new("ABCDE-12345-FGHIJ-67890").admin_username(), None);
        assert_eq!(LicenseKey::new("ADMIN--PERMANENT").admin_username(), None);
        assert_eq!(LicenseKey::new("ADMIN-BOB").admin_username(), None);
        assert!(!LicenseKey::new("TEST-LICENSE-12345DEMO").is_admin_key());
    }

    #[test]
    fn test_admin_key_round_trips_rejects_lossy_case_mapping() {
        assert!(LicenseKey::admin_key_round_trips("alice"));
        assert!(LicenseKey::admin_key_round_trips(" Alice "));
        assert!(LicenseKey::admin_key_round_trips("john-doe"));
        assert!(LicenseKey::admin_key_round_trips("müller"));

        // ß upper-cases to SS, so the key parses back as "strasse".
        assert_eq!(LicenseKey::admin("straße"), LicenseKey::admin("strasse"));
        assert!(!LicenseKey::admin_key_round_trips("straße"));
        assert!(!LicenseKey::admin_key_round_trips("   "));
    }

    #[test]
    fn test_is_generated_format() {
        assert!(LicenseKey::new("ABCDE-12345-FGHIJ-67890").is_generated_format());
        assert!(!LicenseKey::new("abcde-12345-FGHIJ-67890").is_generated_format());
        assert!(!LicenseKey::new("ABCDE-12345-FGHIJ").is_generated_format());
        assert!(!LicenseKey::new("ABCDE-12345-FGHIJ-678901").is_generated_format());
        assert!(!LicenseKey::new("TEST-LICENSE-12345DEMO").is_generated_format());
        assert!(!LicenseKey::admin("admin").is_generated_format());
    }

    #[test]
    fn test_license_key_trims_input() {
        assert_eq!(LicenseKey::new("  KEY \n").as_str(), "KEY");
    }

    #[test]
    fn test_issue_creates_active_unused_license() {
        let license = License::issue(
            LicenseKey::new("ABCDE-12345-FGHIJ-67890"),
            Some(30),
            [GameId::from("slot-machine")],
            "alice",
        );
        assert!(license.is_active);
        assert!(license.is_unused());
        assert!(!license.is_admin);
        assert_eq!(license.created_by, "alice");
        assert!(license.allows(&GameId::from("slot-machine")));
        assert!(!license.allows(&GameId::from("test-game")));
    }

    #[test]
    fn test_admin_session_is_permanent_and_used() {
        let now = Utc::now();
        let license = License::admin_session("admin", now);
        assert!(license.is_admin);
        assert_eq!(license.expiration_days, None);
        assert_eq!(license.expires_at(), None);
        assert_eq!(license.created_by, SYSTEM_ISSUER);
        assert_eq!(license.used_at, Some(now));
        assert_eq!(license.admin_username(), Some("admin".to_string()));
    }

    #[test]
    fn test_expiration_window() {
        let mut license = License::issue(LicenseKey::new("K"), Some(30), [], "a");
        let created = license.created_at;

        assert!(!license.is_expired_at(created + Duration::days(29)));
        assert!(license.is_expired_at(created + Duration::days(30)));

        license.expiration_days = None;
        assert!(!license.is_expired_at(created + Duration::days(10_000)));
    }

    #[test]
    fn test_is_valid_session_respects_enforcement_flag() {
        let license = License::issue(LicenseKey::new("K"), Some(1), [], "a");
        let later = license.created_at + Duration::days(2);

        assert!(license.is_valid_session(false, later));
        assert!(!license.is_valid_session(true, later));

        let mut revoked = license.clone();
        revoked.is_active = false;
        assert!(!revoked.is_valid_session(false, revoked.created_at));
    }

    #[test]
    fn test_session_anchor_prefers_used_at() {
        let mut license = License::issue(LicenseKey::new("K"), None, [], "a");
        assert_eq!(license.session_anchor(), license.updated_at);

        let used = license.created_at + Duration::hours(1);
        license.mark_used("bob", used);
        assert_eq!(license.session_anchor(), used);
        assert_eq!(license.used_by.as_deref(), Some("bob"));
    }

    #[test]
    fn test_license_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "key": "TEST-LICENSE-12345DEMO",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "created_by": "system",
            "is_active": true
        }"#;
        let license: License = serde_json::from_str(json).unwrap();
        assert!(license.is_unrestricted());
        assert!(!license.is_admin);
        assert_eq!(license.id, None);
        assert_eq!(license.expiration_days, None);
    }
}
