//! Detail panel, recommendation cards and dropdown rows as [`Node`] trees.

use crate::config::DiscoverConfig;
use crate::model::{GameRecord, Suggestion, split_tags};
use crate::view::{Node, el};

const MUTED: &str = "color:var(--muted)";
const INSIGHTS_GRADIENT: &str = "background:linear-gradient(90deg,#00b4d8,#be00ff);";

/// Everything the detail area shows at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub game_info: Node,
    pub recommendations: Vec<Node>,
    pub show_recommendation_title: bool,
}

fn message_card(message: &str, muted: bool) -> Node {
    let p = el("p").text(message);
    let p = if muted { p.style(MUTED) } else { p };
    el("div").class("card").child(p).into()
}

/// Placeholder shown as soon as a load starts.
pub fn loading_panel() -> Panel {
    Panel {
        game_info: message_card("Loading game details...", false),
        recommendations: Vec::new(),
        show_recommendation_title: false,
    }
}

pub fn not_found_panel() -> Panel {
    Panel {
        game_info: message_card("No game found for that query.", true),
        recommendations: Vec::new(),
        show_recommendation_title: false,
    }
}

/// Link target. Only `http(s)` URLs pass; anything else (absent,
/// `javascript:`, `data:`) becomes `"#"`.
fn href(link: Option<&str>) -> String {
    let Some(link) = link.map(str::trim) else {
        return "#".to_string();
    };
    let scheme = link.split_once(':').map(|(s, _)| s.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("http" | "https") => link.to_string(),
        _ => "#".to_string(),
    }
}

fn insights_href(config: &DiscoverConfig, record: &GameRecord) -> String {
    match &record.id {
        Some(id) => config.insights_url(id.as_str()),
        None => "#".to_string(),
    }
}

fn badges(tags: Vec<String>) -> Vec<Node> {
    tags.into_iter()
        .map(|t| el("span").class("badge").text(t).into())
        .collect()
}

fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn game_card(record: &GameRecord, config: &DiscoverConfig) -> Node {
    let mut meta = format!("By {}", record.developer.as_deref().unwrap_or(""));
    if let Some(year) = record.release_date.as_deref() {
        meta.push_str(" • ");
        meta.push_str(year);
    }
    let tags = split_tags(record.popular_tags.as_deref(), config.primary_tag_limit);
    let description = truncate_chars(record.display_description(), config.description_limit);

    el("div")
        .class("card game-card")
        .child(el("h3").text(record.display_title()))
        .child(el("div").class("meta").text(meta))
        .child(el("div").style("margin:10px 0").children(badges(tags)))
        .child(
            el("p")
                .style("line-height:1.4;color:#dbeaf5")
                .text(description),
        )
        .child(
            el("div")
                .style("margin-top:10px; display:flex; gap:10px; flex-wrap:wrap;")
                .child(
                    el("a")
                        .attr("target", "_blank")
                        .attr("rel", "noopener")
                        .attr("href", href(record.link.as_deref()))
                        .class("login-btn")
                        .style("padding:8px 12px;font-size:14px;border-radius:8px;")
                        .text("Open on Steam"),
                )
                .child(
                    el("a")
                        .attr("href", insights_href(config, record))
                        .class("login-btn")
                        .style(&format!(
                            "padding:8px 12px;font-size:14px;border-radius:8px;{INSIGHTS_GRADIENT}"
                        ))
                        .text("View Insights"),
                ),
        )
        .into()
}

/// One recommendation card. Cards with an id carry `data-id` and are clickable.
pub fn recommendation_card(record: &GameRecord, config: &DiscoverConfig) -> Node {
    let tags = split_tags(record.popular_tags.as_deref(), config.recommendation_tag_limit);
    let mut card = el("div").class("card");
    if let Some(id) = &record.id {
        card = card.attr("data-id", id.as_str()).style("cursor:pointer");
    }
    card.child(el("h4").style("margin:0 0 6px 0").text(record.display_title()))
        .child(el("div").class("meta").text(record.developer.as_deref().unwrap_or("")))
        .child(el("div").style("margin-top:8px").children(badges(tags)))
        .child(
            el("div")
                .style("margin-top:10px;display:flex;gap:8px;")
                .child(
                    el("a")
                        .class("login-btn")
                        .attr("target", "_blank")
                        .attr("rel", "noopener")
                        .attr("href", href(record.link.as_deref()))
                        .style("padding:8px 10px;font-size:13px;border-radius:8px;")
                        .text("Steam"),
                )
                .child(
                    el("a")
                        .class("login-btn")
                        .attr("href", insights_href(config, record))
                        .style(&format!(
                            "padding:8px 10px;font-size:13px;border-radius:8px;{INSIGHTS_GRADIENT}"
                        ))
                        .text("Insights"),
                ),
        )
        .into()
}

pub fn game_panel(record: &GameRecord, config: &DiscoverConfig) -> Panel {
    let game_info = game_card(record, config);
    if record.recommendations.is_empty() {
        return Panel {
            game_info,
            recommendations: vec![message_card("No recommendations available.", true)],
            show_recommendation_title: false,
        };
    }
    Panel {
        game_info,
        recommendations: record
            .recommendations
            .iter()
            .map(|r| recommendation_card(r, config))
            .collect(),
        show_recommendation_title: true,
    }
}

/// Dropdown rows; each carries the game id for the delegated click handler.
pub fn suggestion_rows(list: &[Suggestion]) -> Vec<Node> {
    list.iter()
        .map(|s| {
            el("li")
                .class("suggest-item")
                .attr("data-id", s.id.as_str())
                .text(s.title())
                .into()
        })
        .collect()
}
