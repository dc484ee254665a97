//! Route guards.
//!
//! A guard looks at the session and decides whether a navigation may
//! proceed. The router that acts on the decision lives outside this
//! crate; these are plain functions over a [`SessionView`].

use gateforge_license::{GameId, SessionView};

/// Where a rejected navigation is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/home",
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

impl GuardDecision {
    pub fn is_allowed(self) -> bool {
        self == GuardDecision::Allow
    }
}

/// Pages that need any valid session.
pub fn auth_guard(session: &SessionView) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}

/// Pages that belong to one game. Signed-in users without access go
/// home instead of to the login page.
pub fn game_guard(session: &SessionView, game: &GameId) -> GuardDecision {
    if !session.is_authenticated() {
        GuardDecision::Redirect(Route::Login)
    } else if !session.has_game_access(game) {
        GuardDecision::Redirect(Route::Home)
    } else {
        GuardDecision::Allow
    }
}

/// Admin pages.
pub fn admin_guard(session: &SessionView) -> GuardDecision {
    if session.is_admin() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}
