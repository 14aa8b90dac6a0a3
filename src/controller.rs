//! Discover page controller: binds the search input, the suggestion dropdown
//! and the detail/recommendation panels of the host page.
//!
//! The controller lives in thread-local state between `start` and `stop`.
//! Event closures and finished fetches reach it through [`with_controller`],
//! so none of them hold a borrow across an `await`. Suggestion rows and
//! recommendation cards are handled by delegated listeners on their
//! containers; re-rendering a list never drops a closure that is running.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent, window};

use crate::api;
use crate::config::DiscoverConfig;
use crate::console;
use crate::error::DiscoverError;
use crate::model::{GameId, GameRecord, Suggestion};
use crate::parallax::{pointer_offset, shape_transform};
use crate::render::{Panel, game_panel, loading_panel, not_found_panel, suggestion_rows};
use crate::resolve::{EnterAction, resolve_enter, resolve_fetched};
use crate::sequence::Generation;
use crate::view::replace_children;

thread_local! {
    static CONTROLLER: RefCell<Option<DiscoverController>> = const { RefCell::new(None) };
}

/// Run `f` against the live controller. Does nothing once the controller is
/// stopped (late timers and responses end up here).
fn with_controller(f: impl FnOnce(&mut DiscoverController)) {
    CONTROLLER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => {
            if let Some(controller) = guard.as_mut() {
                f(controller);
            }
        }
        Err(_) => console::warn("controller", "re-entrant event ignored"),
    });
}

/// Build a controller for the current page and make it the live one,
/// tearing down any previous instance first.
pub fn start(config: DiscoverConfig) -> Result<(), DiscoverError> {
    stop();
    let mut controller = DiscoverController::attach(config)?;
    controller.listeners = controller.bind()?;
    if controller.config.autofocus {
        let _ = controller.input.focus();
    }
    let previous = CONTROLLER.with(|cell| cell.replace(Some(controller)));
    drop(previous);
    Ok(())
}

/// Remove every listener and forget the controller.
pub fn stop() {
    let previous = CONTROLLER.with(|cell| cell.borrow_mut().take());
    drop(previous);
}

/// A DOM listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, DiscoverError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| DiscoverError::js(&e))?;
        Ok(Listener { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AfterSuggest {
    /// Plain type-ahead: just show the dropdown.
    Show,
    /// Enter with no suggestions on hand: resolve against the fresh list.
    ResolveEnter,
}

pub struct DiscoverController {
    config: Rc<DiscoverConfig>,
    doc: Document,
    input: HtmlInputElement,
    suggestions: HtmlElement,
    game_info: Element,
    recommendations: Element,
    recommendation_title: Option<HtmlElement>,
    latest_suggestions: Vec<Suggestion>,
    debounce: Generation,
    pending_debounce: Option<Timeout>,
    suggest_requests: Generation,
    detail_requests: Generation,
    listeners: Vec<Listener>,
}

fn required<T: JsCast>(doc: &Document, id: &str) -> Result<T, DiscoverError> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| DiscoverError::MissingElement(id.to_string()))
}

/// The element an event was dispatched to, if it is an element.
fn event_element(evt: &Event) -> Option<Element> {
    evt.target().and_then(|t| t.dyn_into::<Element>().ok())
}

impl DiscoverController {
    fn attach(config: DiscoverConfig) -> Result<Self, DiscoverError> {
        let doc = window()
            .and_then(|w| w.document())
            .ok_or_else(|| DiscoverError::Js("no document".into()))?;
        let ids = &config.elements;
        let input = required::<HtmlInputElement>(&doc, &ids.input)?;
        let suggestions = required::<HtmlElement>(&doc, &ids.suggestions)?;
        let game_info = required::<Element>(&doc, &ids.game_info)?;
        let recommendations = required::<Element>(&doc, &ids.recommendations)?;
        let recommendation_title = doc
            .get_element_by_id(&ids.recommendation_title)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Ok(DiscoverController {
            config: Rc::new(config),
            doc,
            input,
            suggestions,
            game_info,
            recommendations,
            recommendation_title,
            latest_suggestions: Vec::new(),
            debounce: Generation::new(),
            pending_debounce: None,
            suggest_requests: Generation::new(),
            detail_requests: Generation::new(),
            listeners: Vec::new(),
        })
    }

    fn bind(&self) -> Result<Vec<Listener>, DiscoverError> {
        let mut listeners = Vec::new();

        listeners.push(Listener::attach(&self.input, "input", |_evt| {
            with_controller(|c| c.on_input());
        })?);

        listeners.push(Listener::attach(&self.input, "keydown", |evt| {
            let is_enter = evt
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|k| k.key() == "Enter");
            if is_enter {
                evt.prevent_default();
                with_controller(|c| c.on_enter());
            }
        })?);

        listeners.push(Listener::attach(&self.suggestions, "click", |evt| {
            if let Some(target) = event_element(&evt) {
                with_controller(|c| c.on_suggestion_click(&target));
            }
        })?);

        listeners.push(Listener::attach(&self.recommendations, "click", |evt| {
            if let Some(target) = event_element(&evt) {
                with_controller(|c| c.on_recommendation_click(&target));
            }
        })?);

        listeners.push(Listener::attach(&self.doc, "click", |evt| {
            let target = evt.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            with_controller(|c| c.on_document_click(target.as_ref()));
        })?);

        if let Some(parallax) = self.bind_parallax()? {
            listeners.push(parallax);
        }
        Ok(listeners)
    }

    /// Background shapes drift with the pointer. Independent of everything
    /// else; pages without shapes get no listener.
    fn bind_parallax(&self) -> Result<Option<Listener>, DiscoverError> {
        let selector = format!(".{}", self.config.shape_class);
        let found = self
            .doc
            .query_selector_all(&selector)
            .map_err(|e| DiscoverError::js(&e))?;
        let shapes: Vec<HtmlElement> = (0..found.length())
            .filter_map(|i| found.get(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .collect();
        if shapes.is_empty() {
            return Ok(None);
        }
        let listener = Listener::attach(&self.doc, "mousemove", move |evt| {
            let (Some(mouse), Some(win)) = (evt.dyn_ref::<MouseEvent>(), window()) else {
                return;
            };
            let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let offset = pointer_offset(mouse.client_x() as f64, mouse.client_y() as f64, width, height);
            for (i, shape) in shapes.iter().enumerate() {
                let _ = shape.style().set_property("transform", &shape_transform(offset, i));
            }
        })?;
        Ok(Some(listener))
    }

    // --- Type-ahead ------------------------------------------------------------

    fn on_input(&mut self) {
        // Dropping the pending timeout clears it.
        self.pending_debounce = None;
        let ticket = self.debounce.advance();
        let query = self.input.value().trim().to_string();
        if query.is_empty() {
            self.suggest_requests.advance();
            self.latest_suggestions.clear();
            self.hide_suggestions();
            return;
        }
        let timeout = Timeout::new(self.config.debounce_ms, move || {
            with_controller(|c| c.on_debounce_elapsed(ticket, query));
        });
        self.pending_debounce = Some(timeout);
    }

    fn on_debounce_elapsed(&mut self, ticket: u64, query: String) {
        if !self.debounce.is_current(ticket) {
            return;
        }
        self.request_suggestions(query, AfterSuggest::Show);
    }

    fn request_suggestions(&mut self, query: String, after: AfterSuggest) {
        let ticket = self.suggest_requests.advance();
        let config = Rc::clone(&self.config);
        spawn_local(async move {
            let result = api::fetch_suggestions(&config, &query).await;
            with_controller(|c| c.on_suggestions(ticket, &query, result, after));
        });
    }

    fn on_suggestions(
        &mut self,
        ticket: u64,
        query: &str,
        result: Result<Vec<Suggestion>, DiscoverError>,
        after: AfterSuggest,
    ) {
        if !self.suggest_requests.is_current(ticket) {
            console::debug("suggest", &format!("dropped stale response for {query:?}"));
            return;
        }
        match result {
            Ok(list) => {
                self.latest_suggestions = list;
                self.show_suggestions();
            }
            Err(err) => {
                console::error("suggest", &err.to_string());
                self.latest_suggestions.clear();
                self.hide_suggestions();
            }
        }
        if after == AfterSuggest::ResolveEnter {
            match resolve_fetched(query, &self.latest_suggestions) {
                Some(id) => {
                    self.load_game(id);
                    self.hide_suggestions();
                }
                None => self.apply_panel(not_found_panel()),
            }
        }
    }

    fn on_enter(&mut self) {
        // A pending type-ahead fetch must not supersede the Enter fetch.
        self.pending_debounce = None;
        self.debounce.advance();
        match resolve_enter(&self.input.value(), &self.latest_suggestions) {
            EnterAction::Ignore => {}
            EnterAction::Load(id) => {
                self.load_game(id);
                self.hide_suggestions();
            }
            EnterAction::FetchThenResolve(query) => {
                self.request_suggestions(query, AfterSuggest::ResolveEnter);
            }
        }
    }

    fn show_suggestions(&self) {
        if self.latest_suggestions.is_empty() {
            self.hide_suggestions();
            return;
        }
        let rows = suggestion_rows(&self.latest_suggestions);
        if let Err(e) = replace_children(&self.doc, &self.suggestions, &rows) {
            console::error("suggest", &DiscoverError::js(&e).to_string());
            return;
        }
        let _ = self.suggestions.style().set_property("display", "block");
    }

    fn hide_suggestions(&self) {
        let _ = self.suggestions.style().set_property("display", "none");
        self.suggestions.set_text_content(None);
    }

    fn on_suggestion_click(&mut self, target: &Element) {
        let Ok(Some(row)) = target.closest(".suggest-item") else {
            return;
        };
        let Some(id) = row.get_attribute("data-id").filter(|id| !id.is_empty()) else {
            return;
        };
        self.input.set_value(&row.text_content().unwrap_or_default());
        self.hide_suggestions();
        self.load_game(GameId::new(id));
    }

    fn on_document_click(&self, target: Option<&web_sys::Node>) {
        let Some(target) = target else {
            return;
        };
        let on_input = self.input.unchecked_ref::<web_sys::Node>().is_same_node(Some(target));
        if !on_input && !self.suggestions.contains(Some(target)) {
            self.hide_suggestions();
        }
    }

    // --- Details -----------------------------------------------------------------

    /// Show the loading card, fetch the record and render it. Only the newest
    /// load may render; earlier responses are dropped.
    fn load_game(&mut self, id: GameId) {
        self.apply_panel(loading_panel());
        let ticket = self.detail_requests.advance();
        let config = Rc::clone(&self.config);
        spawn_local(async move {
            let result = api::fetch_game(&config, &id).await;
            with_controller(|c| c.on_game(ticket, &id, result));
        });
    }

    fn on_game(&mut self, ticket: u64, id: &GameId, result: Result<GameRecord, DiscoverError>) {
        if !self.detail_requests.is_current(ticket) {
            console::debug("game", &format!("dropped stale response for id {id}"));
            return;
        }
        match result {
            Ok(record) => self.apply_panel(game_panel(&record, &self.config)),
            Err(err) => {
                console::error("game", &format!("id {id}: {err}"));
                self.apply_panel(not_found_panel());
            }
        }
    }

    fn on_recommendation_click(&mut self, target: &Element) {
        let Ok(Some(card)) = target.closest(".card[data-id]") else {
            return;
        };
        if let Some(id) = card.get_attribute("data-id").filter(|id| !id.is_empty()) {
            self.load_game(GameId::new(id));
        }
    }

    fn apply_panel(&self, panel: Panel) {
        let rendered = replace_children(&self.doc, &self.game_info, std::slice::from_ref(&panel.game_info))
            .and_then(|()| replace_children(&self.doc, &self.recommendations, &panel.recommendations));
        if let Err(e) = rendered {
            console::error("render", &DiscoverError::js(&e).to_string());
        }
        if let Some(title) = &self.recommendation_title {
            let display = if panel.show_recommendation_title { "block" } else { "none" };
            let _ = title.style().set_property("display", display);
        }
    }
}
