//! Page wiring and tunables. Every field has a default matching the stock
//! Discover template, so `{}` is a valid config and callers only override
//! what differs on their page.

use serde::Deserialize;

use crate::error::DiscoverError;

/// Ids of the host page elements the controller binds to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub input: String,
    pub suggestions: String,
    pub game_info: String,
    pub recommendations: String,
    /// Optional on the page; the controller skips it when absent.
    pub recommendation_title: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            input: "gameInput".into(),
            suggestions: "suggestions".into(),
            game_info: "gameInfo".into(),
            recommendations: "recommendations".into(),
            recommendation_title: "recommendationTitle".into(),
        }
    }
}

/// Backend endpoints and navigation targets.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Routes {
    /// `GET <suggest>?q=<query>`
    pub suggest: String,
    /// `GET <game>/<id>`
    pub game: String,
    /// Link target `<insights>/<id>`
    pub insights: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            suggest: "/api/suggest".into(),
            game: "/api/game".into(),
            insights: "/insights".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoverConfig {
    pub elements: ElementIds,
    pub routes: Routes,
    pub debounce_ms: u32,
    pub primary_tag_limit: usize,
    pub recommendation_tag_limit: usize,
    pub description_limit: usize,
    pub shape_class: String,
    pub autofocus: bool,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            routes: Routes::default(),
            debounce_ms: 180,
            primary_tag_limit: 6,
            recommendation_tag_limit: 3,
            description_limit: 1000,
            shape_class: "shape".into(),
            autofocus: true,
        }
    }
}

impl DiscoverConfig {
    /// Parse a (possibly partial) JSON object over the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self, DiscoverError> {
        let config: DiscoverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DiscoverError> {
        let ids = [
            ("elements.input", &self.elements.input),
            ("elements.suggestions", &self.elements.suggestions),
            ("elements.gameInfo", &self.elements.game_info),
            ("elements.recommendations", &self.elements.recommendations),
            ("routes.suggest", &self.routes.suggest),
            ("routes.game", &self.routes.game),
            ("routes.insights", &self.routes.insights),
        ];
        if let Some((name, _)) = ids.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DiscoverError::Config(format!("{name} must not be empty")));
        }
        Ok(())
    }

    pub fn suggest_url(&self, encoded_query: &str) -> String {
        format!("{}?q={}", self.routes.suggest, encoded_query)
    }

    pub fn game_url(&self, encoded_id: &str) -> String {
        format!("{}/{}", self.routes.game.trim_end_matches('/'), encoded_id)
    }

    pub fn insights_url(&self, id: &str) -> String {
        format!("{}/{}", self.routes.insights.trim_end_matches('/'), id)
    }
}
