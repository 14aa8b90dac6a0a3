//! Turning an Enter keypress into a game to load.

use crate::model::{GameId, Suggestion};

#[derive(Clone, Debug, PartialEq)]
pub enum EnterAction {
    /// Blank input; nothing happens.
    Ignore,
    Load(GameId),
    /// No suggestions on hand: fetch for this query, then [`resolve_fetched`].
    FetchThenResolve(String),
}

/// Case-insensitive exact title match first, then the first suggestion in
/// server order.
pub fn best_match<'a>(query: &str, suggestions: &'a [Suggestion]) -> Option<&'a GameId> {
    let needle = query.to_lowercase();
    suggestions
        .iter()
        .find(|s| s.title().to_lowercase() == needle)
        .or_else(|| suggestions.first())
        .map(|s| &s.id)
}

pub fn resolve_enter(raw_input: &str, latest: &[Suggestion]) -> EnterAction {
    let query = raw_input.trim();
    if query.is_empty() {
        return EnterAction::Ignore;
    }
    match best_match(query, latest) {
        Some(id) => EnterAction::Load(id.clone()),
        None => EnterAction::FetchThenResolve(query.to_string()),
    }
}

/// Second chance after a fresh fetch; `None` means the not-found state.
pub fn resolve_fetched(query: &str, fetched: &[Suggestion]) -> Option<GameId> {
    best_match(query.trim(), fetched).cloned()
}
