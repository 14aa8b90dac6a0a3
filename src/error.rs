use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("backend reported an error: {0}")]
    Backend(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl DiscoverError {
    /// Wrap a thrown JS value, keeping its message when it is an `Error`.
    pub fn js(value: &JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{value:?}"));
        DiscoverError::Js(message)
    }
}

impl From<DiscoverError> for JsValue {
    fn from(err: DiscoverError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
