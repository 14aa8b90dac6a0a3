// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use game_discover::model::{Suggestion, parse_game};
use game_discover::render::{game_panel, suggestion_rows};
use game_discover::view::replace_children;
use game_discover::{DiscoverConfig, start_discover, stop_discover};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlElement, HtmlInputElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const SKELETON: [(&str, &str); 5] = [
    ("input", "gameInput"),
    ("ul", "suggestions"),
    ("div", "gameInfo"),
    ("div", "recommendations"),
    ("h2", "recommendationTitle"),
];

// Records every requested url and answers from globals set by `Page::mount`.
const FETCH_STUB: &str = r#"
    window.__discoverCalls.push(url);
    const suggest = url.indexOf('/api/suggest') === 0;
    const body = suggest ? window.__discoverSuggest : window.__discoverGame;
    const delay = suggest ? window.__discoverSuggestDelay : 0;
    return new Promise(function (resolve) {
        setTimeout(function () {
            resolve(new Response(body, { status: 200, headers: { 'Content-Type': 'application/json' } }));
        }, delay);
    });
"#;

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn set_global(name: &str, value: &JsValue) {
    let win = web_sys::window().unwrap();
    Reflect::set(&win, &JsValue::from_str(name), value).unwrap();
}

/// Discover page skeleton with a stubbed `window.fetch` and a running controller.
struct Page {
    original_fetch: JsValue,
}

impl Page {
    fn mount(suggest_body: &str, game_body: &str, suggest_delay_ms: u32) -> Page {
        let doc = document();
        let body = doc.body().unwrap();
        for (tag, id) in SKELETON {
            let el = doc.create_element(tag).unwrap();
            el.set_id(id);
            body.append_child(&el).unwrap();
        }
        let win = web_sys::window().unwrap();
        let original_fetch = Reflect::get(&win, &JsValue::from_str("fetch")).unwrap();
        set_global("__discoverCalls", &Array::new());
        set_global("__discoverSuggest", &JsValue::from_str(suggest_body));
        set_global("__discoverGame", &JsValue::from_str(game_body));
        set_global("__discoverSuggestDelay", &JsValue::from_f64(suggest_delay_ms as f64));
        set_global("fetch", &Function::new_with_args("url", FETCH_STUB));
        start_discover().unwrap();
        Page { original_fetch }
    }

    fn calls(&self, prefix: &str) -> Vec<String> {
        let win = web_sys::window().unwrap();
        let calls: Array = Reflect::get(&win, &JsValue::from_str("__discoverCalls"))
            .unwrap()
            .dyn_into()
            .unwrap();
        calls
            .iter()
            .filter_map(|v| v.as_string())
            .filter(|url| url.starts_with(prefix))
            .collect()
    }

    fn input(&self) -> HtmlInputElement {
        document().get_element_by_id("gameInput").unwrap().dyn_into().unwrap()
    }

    fn type_text(&self, text: &str) {
        let input = self.input();
        input.set_value(text);
        input.dispatch_event(&Event::new("input").unwrap()).unwrap();
    }

    fn press_enter(&self) {
        let init = KeyboardEventInit::new();
        init.set_key("Enter");
        let evt = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        self.input().dispatch_event(&evt).unwrap();
    }

    fn suggestions(&self) -> HtmlElement {
        document().get_element_by_id("suggestions").unwrap().dyn_into().unwrap()
    }

    fn suggestions_display(&self) -> String {
        self.suggestions().style().get_property_value("display").unwrap()
    }

    fn text_of(&self, id: &str) -> String {
        document().get_element_by_id(id).unwrap().text_content().unwrap_or_default()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        stop_discover();
        let doc = document();
        for (_, id) in SKELETON {
            if let Some(el) = doc.get_element_by_id(id) {
                el.remove();
            }
        }
        set_global("fetch", &self.original_fetch);
    }
}

#[wasm_bindgen_test]
fn mounted_tree_keeps_markup_as_text() {
    let doc = document();
    let host = doc.create_element("div").unwrap();
    let record = parse_game(200, true, "OK", r#"{"id": 1, "Title": "<img src=x onerror=alert(1)>"}"#).unwrap();
    let panel = game_panel(&record, &DiscoverConfig::default());
    replace_children(&doc, &host, &[panel.game_info]).unwrap();

    assert!(host.query_selector("img").unwrap().is_none());
    let h3 = host.query_selector("h3").unwrap().unwrap();
    assert_eq!(h3.text_content().unwrap(), "<img src=x onerror=alert(1)>");
}

#[wasm_bindgen_test]
fn suggestion_rows_replace_previous_children() {
    let doc = document();
    let list = doc.create_element("ul").unwrap();
    let rows = suggestion_rows(&[Suggestion::new(1, "Foo"), Suggestion::new(2, "Bar")]);
    replace_children(&doc, &list, &rows).unwrap();
    replace_children(&doc, &list, &rows[..1]).unwrap();
    assert_eq!(list.child_element_count(), 1);
    let row = list.first_element_child().unwrap();
    assert_eq!(row.get_attribute("data-id").as_deref(), Some("1"));
}

#[wasm_bindgen_test]
fn start_fails_without_page_skeleton() {
    stop_discover();
    assert!(start_discover().is_err());
}

#[wasm_bindgen_test]
async fn keystroke_burst_fetches_once_after_quiet_period() {
    let page = Page::mount(r#"[{"id": 1, "Title": "Hades"}]"#, "{}", 0);
    page.type_text("h");
    page.type_text("ha");
    page.type_text("had");
    TimeoutFuture::new(100).await;
    assert!(page.calls("/api/suggest").is_empty());

    TimeoutFuture::new(300).await;
    assert_eq!(page.calls("/api/suggest"), ["/api/suggest?q=had"]);
    assert_eq!(page.suggestions_display(), "block");
    assert_eq!(page.suggestions().child_element_count(), 1);
}

#[wasm_bindgen_test]
async fn whitespace_input_hides_dropdown_without_fetching() {
    let page = Page::mount(r#"[{"id": 1, "Title": "Hades"}]"#, "{}", 0);
    page.type_text("hades");
    TimeoutFuture::new(400).await;
    assert_eq!(page.suggestions_display(), "block");

    page.type_text("   ");
    TimeoutFuture::new(400).await;
    assert_eq!(page.calls("/api/suggest").len(), 1);
    assert_eq!(page.suggestions_display(), "none");
    assert_eq!(page.suggestions().child_element_count(), 0);
}

#[wasm_bindgen_test]
async fn enter_before_debounce_with_empty_result_shows_not_found() {
    // The Enter fetch outlives the pending debounce; Enter must still resolve.
    let page = Page::mount("[]", "{}", 300);
    page.type_text("hades");
    TimeoutFuture::new(50).await;
    page.press_enter();
    TimeoutFuture::new(800).await;

    assert_eq!(page.calls("/api/suggest"), ["/api/suggest?q=hades"]);
    assert_eq!(page.text_of("gameInfo"), "No game found for that query.");
    assert!(page.calls("/api/game").is_empty());
}

#[wasm_bindgen_test]
async fn enter_loads_exact_match_from_fresh_suggestions() {
    let page = Page::mount(
        r#"[{"id": 1, "Title": "Hades II"}, {"id": 2, "Title": "Hades"}]"#,
        r#"{"id": 2, "Title": "Hades", "Developer": "Supergiant", "recommendations": []}"#,
        0,
    );
    page.type_text("hades");
    page.press_enter();
    TimeoutFuture::new(500).await;

    assert_eq!(page.calls("/api/game"), ["/api/game/2"]);
    let h3 = document().query_selector("#gameInfo h3").unwrap().unwrap();
    assert_eq!(h3.text_content().unwrap(), "Hades");
    assert_eq!(page.text_of("recommendations"), "No recommendations available.");
    assert_eq!(page.suggestions_display(), "none");
}

#[wasm_bindgen_test]
async fn clicking_a_suggestion_fills_input_and_loads_game() {
    let page = Page::mount(
        r#"[{"id": 7, "Title": "Celeste"}]"#,
        r#"{"id": 7, "Title": "Celeste", "recommendations": [{"id": 8, "Title": "Towerfall"}]}"#,
        0,
    );
    page.type_text("cel");
    TimeoutFuture::new(400).await;
    let row: HtmlElement = page.suggestions().first_element_child().unwrap().dyn_into().unwrap();
    row.click();
    TimeoutFuture::new(200).await;

    assert_eq!(page.input().value(), "Celeste");
    assert_eq!(page.suggestions_display(), "none");
    assert_eq!(page.calls("/api/game"), ["/api/game/7"]);
    let title: HtmlElement = document()
        .get_element_by_id("recommendationTitle")
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(title.style().get_property_value("display").unwrap(), "block");
}
