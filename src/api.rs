//! Calls to the Discover backend via `window.fetch`.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, window};

use crate::config::DiscoverConfig;
use crate::error::DiscoverError;
use crate::model::{GameId, GameRecord, Suggestion, parse_game, parse_suggestions};

struct RawResponse {
    status: u16,
    ok: bool,
    status_text: String,
    body: String,
}

async fn get(url: &str) -> Result<RawResponse, DiscoverError> {
    let win = window().ok_or_else(|| DiscoverError::Js("no window".into()))?;
    let response: Response = JsFuture::from(win.fetch_with_str(url))
        .await
        .map_err(|e| DiscoverError::js(&e))?
        .dyn_into()
        .map_err(|e| DiscoverError::js(&e))?;
    let body = JsFuture::from(response.text().map_err(|e| DiscoverError::js(&e))?)
        .await
        .map_err(|e| DiscoverError::js(&e))?
        .as_string()
        .ok_or_else(|| DiscoverError::Js("response body was not text".into()))?;
    Ok(RawResponse {
        status: response.status(),
        ok: response.ok(),
        status_text: response.status_text(),
        body,
    })
}

pub async fn fetch_suggestions(config: &DiscoverConfig, query: &str) -> Result<Vec<Suggestion>, DiscoverError> {
    let encoded = String::from(js_sys::encode_uri_component(query));
    let raw = get(&config.suggest_url(&encoded)).await?;
    if !raw.ok {
        return Err(DiscoverError::Http {
            status: raw.status,
            status_text: raw.status_text,
        });
    }
    parse_suggestions(&raw.body)
}

pub async fn fetch_game(config: &DiscoverConfig, id: &GameId) -> Result<GameRecord, DiscoverError> {
    let encoded = String::from(js_sys::encode_uri_component(id.as_str()));
    let raw = get(&config.game_url(&encoded)).await?;
    parse_game(raw.status, raw.ok, &raw.status_text, &raw.body)
}
