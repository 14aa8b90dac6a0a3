//! Escaping helpers applied whenever backend-supplied text is serialized as markup.
//!
//! DOM mounting goes through `create_text_node` / `set_attribute` and never needs
//! these; they back [`crate::view::Node::to_html`].

/// Escape `&`, `<` and `>`. Absent or empty input yields an empty string.
pub fn escape_html(s: Option<&str>) -> String {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `"` and `'` for use inside a quoted attribute. Absent or empty input
/// yields `"#"` so a link never points at the current page by accident.
pub fn escape_attr(s: Option<&str>) -> String {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return "#".to_string();
    };
    s.replace('"', "&quot;").replace('\'', "&#39;")
}
