//! The session: the single "current license" and the handles used to
//! observe it.
//!
//! The [`LicenseAuthority`](crate::LicenseAuthority) owns the only
//! writer (a `tokio::sync::watch` sender). Every other component holds a
//! [`SessionView`], which reads a consistent snapshot at any time and can
//! wait for the next change. Dropping a view is how an observer
//! unsubscribes.

use chrono::Utc;
use tokio::sync::watch;

use crate::{GameId, License, access};

/// The narrow interface through which other components adopt or clear
/// the session.
///
/// The admin layer needs to install admin licenses as the session, and
/// the license authority needs nothing from the admin layer. Passing
/// this trait into the admin layer's constructors keeps the dependency
/// one-way.
pub trait SessionSink: Send + Sync + 'static {
    /// Adopts `license` as the current session without consulting the
    /// store.
    fn set_current_license(&self, license: License);

    /// The current session's license, if any.
    fn current_license(&self) -> Option<License>;

    /// Clears the current session. Persisted records are untouched.
    fn logout(&self);

    /// A read handle on the session.
    fn session(&self) -> SessionView;
}

/// A read-only, cloneable handle on the current session.
///
/// ```text
/// LicenseAuthority ──(watch::Sender)──→ SessionView, SessionView, ...
/// ```
#[derive(Debug, Clone)]
pub struct SessionView {
    rx: watch::Receiver<Option<License>>,
    enforce_expiration: bool,
}

impl SessionView {
    pub(crate) fn new(
        rx: watch::Receiver<Option<License>>,
        enforce_expiration: bool,
    ) -> Self {
        Self {
            rx,
            enforce_expiration,
        }
    }

    /// A copy of the current license, valid or not.
    pub fn snapshot(&self) -> Option<License> {
        self.rx.borrow().clone()
    }

    /// The current license if it can back a session right now (active,
    /// and unexpired when expiration is enforced).
    pub fn valid_license(&self) -> Option<License> {
        self.rx
            .borrow()
            .as_ref()
            .filter(|license| {
                license.is_valid_session(self.enforce_expiration, Utc::now())
            })
            .cloned()
    }

    /// `true` iff a session exists and is valid.
    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().as_ref().is_some_and(|license| {
            license.is_valid_session(self.enforce_expiration, Utc::now())
        })
    }

    /// `true` iff the session is valid and is an admin session.
    pub fn is_admin(&self) -> bool {
        self.valid_license().is_some_and(|license| license.is_admin)
    }

    /// The admin's username, for valid admin sessions.
    pub fn admin_username(&self) -> Option<String> {
        self.valid_license()
            .and_then(|license| license.admin_username())
    }

    /// Whether the session may open `game`.
    pub fn has_game_access(&self, game: &GameId) -> bool {
        access::has_game_access(self.valid_license().as_ref(), game)
    }

    /// Waits until the session changes.
    ///
    /// Returns `false` if the authority has been dropped and no further
    /// changes can happen.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// A raw `watch` receiver, for callers that want to `select!` on it.
    pub fn subscribe(&self) -> watch::Receiver<Option<License>> {
        self.rx.clone()
    }
}
