//! Game access rules.
//!
//! Pure functions over a session snapshot, so navigation and route
//! guards can evaluate them without touching the store.

use crate::{GameId, License};

/// Whether `session` may open `game`.
///
/// - admin sessions open everything;
/// - no session opens nothing;
/// - otherwise an empty allow-list means unrestricted, and a non-empty
///   one must contain `game`.
///
/// Validity (revocation, expiration) is the caller's concern; pass
/// `None` for a session that is not valid.
pub fn has_game_access(session: Option<&License>, game: &GameId) -> bool {
    match session {
        None => false,
        Some(license) if license.is_admin => true,
        Some(license) => license.allows(game),
    }
}

/// Filters `catalog` down to the games `session` may open, keeping
/// catalog order.
pub fn accessible_games(
    session: Option<&License>,
    catalog: impl IntoIterator<Item = GameId>,
) -> Vec<GameId> {
    catalog
        .into_iter()
        .filter(|game| has_game_access(session, game))
        .collect()
}

/// Short human summary of a license's reach: `"All games"` or
/// `"N game(s)"`.
pub fn describe_game_access(license: &License) -> String {
    if license.is_admin || license.is_unrestricted() {
        "All games".to_string()
    } else {
        format!("{} game(s)", license.allowed_games.len())
    }
}
