//! Records received from the Discover backend.
//!
//! The backend serializes a dataframe row, so any column may come back as a
//! string, a number or `null`. Reads here are lenient: a value counts as
//! present only when it would be truthy on the page (non-empty string,
//! number, `true`).

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DiscoverError;

/// Catalog identifier. Numbers and strings are both accepted on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(GameId(number_text(n))),
            Value::String(s) if !s.trim().is_empty() => Some(GameId(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        GameId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        GameId::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid game id: {value}")))
    }
}

/// One row of the search-ahead dropdown.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Suggestion {
    pub id: GameId,
    #[serde(rename = "Title", deserialize_with = "required_text")]
    pub title: String,
}

impl Suggestion {
    pub fn new(id: u64, title: &str) -> Self {
        Suggestion {
            id: GameId::from(id),
            title: title.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Full detail payload for one catalog entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GameRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<GameId>,
    #[serde(rename = "Title", default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "title", default, deserialize_with = "lenient_text")]
    pub title_lower: Option<String>,
    #[serde(rename = "Game Description", default, deserialize_with = "lenient_text")]
    pub game_description: Option<String>,
    #[serde(rename = "description", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "Developer", default, deserialize_with = "lenient_text")]
    pub developer: Option<String>,
    #[serde(rename = "Publisher", default, deserialize_with = "lenient_text")]
    pub publisher: Option<String>,
    #[serde(rename = "Release Date", default, deserialize_with = "lenient_text")]
    pub release_date: Option<String>,
    #[serde(rename = "Popular Tags", default, deserialize_with = "lenient_text")]
    pub popular_tags: Option<String>,
    #[serde(rename = "Link", default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
    #[serde(rename = "Supported Languages", default, deserialize_with = "lenient_text")]
    pub supported_languages: Option<String>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub recommendations: Vec<GameRecord>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl GameRecord {
    /// `Title`, then `title`, then `"Untitled"`.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.title_lower.as_deref())
            .unwrap_or("Untitled")
    }

    /// `Game Description`, then `description`, then empty.
    pub fn display_description(&self) -> &str {
        self.game_description
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(is_truthy)
    }
}

/// Split a comma-separated tag column, trimming and dropping empties.
pub fn split_tags(raw: Option<&str>, limit: usize) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Parse a `/api/suggest` body. Anything but a JSON array is an empty list;
/// entries without a usable id or title are skipped.
pub fn parse_suggestions(body: &str) -> Result<Vec<Suggestion>, DiscoverError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Classify a `/api/game/:id` response. Non-OK status, malformed body and a
/// truthy `error` field all end up as errors.
pub fn parse_game(
    status: u16,
    ok: bool,
    status_text: &str,
    body: &str,
) -> Result<GameRecord, DiscoverError> {
    if !ok {
        return Err(DiscoverError::Http {
            status,
            status_text: status_text.to_string(),
        });
    }
    let record: GameRecord = serde_json::from_str(body)?;
    if record.has_error() {
        let reason = match &record.error {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        return Err(DiscoverError::Backend(reason));
    }
    Ok(record)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(number_text(&n)).filter(|s| s != "0"),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    })
}

fn required_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_text(d)?.ok_or_else(|| serde::de::Error::custom("expected a non-empty title"))
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<GameId>, D::Error> {
    Ok(GameId::from_value(&Value::deserialize(d)?))
}

fn lenient_records<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<GameRecord>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let list = parse_suggestions(r#"[{"id": 12, "Title": "Portal"}, {"id": "34", "Title": "Braid"}, {"id": 5.0, "Title": "Limbo"}]"#).unwrap();
        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["12", "34", "5"]);
        assert_eq!(list[0].title(), "Portal");
    }

    #[test]
    fn non_array_suggest_body_is_empty() {
        assert!(parse_suggestions(r#"{"error": "boom"}"#).unwrap().is_empty());
        assert!(parse_suggestions("null").unwrap().is_empty());
    }

    #[test]
    fn malformed_suggestion_entries_are_skipped() {
        let list = parse_suggestions(
            r#"[{"Title": "no id"}, 3, {"id": 9, "Title": "Celeste"}, {"id": null}, {"id": 4}, {"id": 5, "Title": ""}, {"id": 6, "Title": null}]"#,
        )
        .unwrap();
        assert_eq!(list, vec![Suggestion::new(9, "Celeste")]);
    }

    #[test]
    fn invalid_suggest_json_is_an_error() {
        assert!(matches!(parse_suggestions("<html>"), Err(DiscoverError::Parse(_))));
    }

    #[test]
    fn lenient_fields_follow_page_truthiness() {
        let rec: GameRecord = serde_json::from_str(
            r#"{"id": 1, "Title": "", "title": "fallback", "Developer": null, "Release Date": 2004, "Link": false, "Popular Tags": ["x"]}"#,
        )
        .unwrap();
        assert_eq!(rec.display_title(), "fallback");
        assert_eq!(rec.developer, None);
        assert_eq!(rec.release_date.as_deref(), Some("2004"));
        assert_eq!(rec.link, None);
        assert_eq!(rec.popular_tags, None);
    }

    #[test]
    fn title_defaults_to_untitled() {
        assert_eq!(GameRecord::default().display_title(), "Untitled");
    }

    #[test]
    fn description_falls_back_to_lowercase_key() {
        let rec: GameRecord = serde_json::from_str(r#"{"description": "short"}"#).unwrap();
        assert_eq!(rec.display_description(), "short");
    }

    #[test]
    fn recommendations_tolerate_junk() {
        let rec: GameRecord =
            serde_json::from_str(r#"{"id": 1, "recommendations": [{"id": 2, "Title": "B"}, "x", null]}"#).unwrap();
        assert_eq!(rec.recommendations.len(), 1);
        let none: GameRecord = serde_json::from_str(r#"{"id": 1, "recommendations": null}"#).unwrap();
        assert!(none.recommendations.is_empty());
    }

    #[test]
    fn tags_are_trimmed_and_limited() {
        assert_eq!(split_tags(Some(" RPG, ,Indie ,Co-op"), 6), ["RPG", "Indie", "Co-op"]);
        assert_eq!(split_tags(Some("a,b,c,d"), 2), ["a", "b"]);
        assert!(split_tags(None, 6).is_empty());
    }

    #[test]
    fn error_field_and_http_status_both_fail() {
        assert!(matches!(
            parse_game(404, false, "NOT FOUND", r#"{"error": "not found"}"#),
            Err(DiscoverError::Http { status: 404, .. })
        ));
        assert!(matches!(
            parse_game(200, true, "OK", r#"{"error": "not found"}"#),
            Err(DiscoverError::Backend(ref m)) if m == "not found"
        ));
        assert!(parse_game(200, true, "OK", r#"{"id": 3, "error": ""}"#).is_ok());
    }

    #[test]
    fn unparsable_game_body_fails() {
        assert!(matches!(
            parse_game(200, true, "OK", "<h1>maintenance</h1>"),
            Err(DiscoverError::Parse(_))
        ));
        assert!(matches!(
            parse_game(500, false, "INTERNAL SERVER ERROR", "<h1>500</h1>"),
            Err(DiscoverError::Http { status: 500, .. })
        ));
    }
}
