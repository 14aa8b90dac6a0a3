//! Game Discover page controller.
//!
//! Wires the search box of the Discover page to the backend: debounced
//! type-ahead suggestions, Enter-to-search, and a detail panel with
//! recommended games. The page skeleton is server-rendered; this crate only
//! binds to it. Everything except `controller` and `api` is plain Rust and
//! tested natively.

use wasm_bindgen::prelude::*;

mod api;
pub mod config;
mod console;
mod controller;
pub mod error;
pub mod escape;
pub mod model;
pub mod parallax;
pub mod render;
pub mod resolve;
pub mod sequence;
pub mod view;

pub use config::DiscoverConfig;
pub use error::DiscoverError;
pub use escape::{escape_attr, escape_html};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Page entrypoints
// -----------------------------------------------------------------------------

/// Bind to the stock Discover page (`#gameInput`, `#suggestions`, ...).
#[wasm_bindgen]
pub fn start_discover() -> Result<(), JsValue> {
    controller::start(DiscoverConfig::default())?;
    Ok(())
}

/// Bind using a JSON config; omitted fields keep their defaults.
#[wasm_bindgen]
pub fn start_discover_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = DiscoverConfig::from_json(config_json)?;
    controller::start(config)?;
    Ok(())
}

/// Unbind every listener, e.g. before client-side navigation away.
#[wasm_bindgen]
pub fn stop_discover() {
    controller::stop();
}
