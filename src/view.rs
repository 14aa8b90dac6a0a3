//! Structural UI tree.
//!
//! Renderers build [`Node`] values instead of markup strings. Mounting uses
//! `create_element` / `set_attribute` / `create_text_node`, so backend text is
//! never parsed as HTML. [`Node::to_html`] exists for logging and tests and
//! escapes everything it emits.

use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::escape::{escape_attr, escape_html};

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Start building an element.
pub fn el(tag: &'static str) -> Element {
    Element { tag, attrs: Vec::new(), children: Vec::new() }
}

pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn style(self, style: &str) -> Self {
        self.attr("style", style)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(text(s))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl Node {
    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }

    /// Every element in the subtree (self included) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |e| {
            if e.has_class(class) {
                found.push(e);
            }
        });
        found
    }

    /// Every element in the subtree (self included) with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |e| {
            if e.tag == tag {
                found.push(e);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(e) = self {
            visit(e);
            for c in &e.children {
                c.walk(visit);
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape_html(Some(t))),
            Node::Element(e) => {
                out.push('<');
                out.push_str(e.tag);
                for (name, value) in &e.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    // Empty attribute values stay empty; escape_attr would turn them into "#".
                    if !value.is_empty() {
                        out.push_str(&escape_attr(Some(&escape_html(Some(value)))));
                    }
                    out.push('"');
                }
                out.push('>');
                for c in &e.children {
                    c.write_html(out);
                }
                out.push_str("</");
                out.push_str(e.tag);
                out.push('>');
            }
        }
    }

    /// Build the live DOM subtree for this node.
    pub fn mount(&self, doc: &Document) -> Result<web_sys::Node, JsValue> {
        match self {
            Node::Text(t) => Ok(doc.create_text_node(t).into()),
            Node::Element(e) => {
                let dom = doc.create_element(e.tag)?;
                for (name, value) in &e.attrs {
                    dom.set_attribute(name, value)?;
                }
                for c in &e.children {
                    dom.append_child(&c.mount(doc)?)?;
                }
                Ok(dom.into())
            }
        }
    }
}

/// Replace every child of `container` with the mounted `nodes`.
pub fn replace_children(doc: &Document, container: &web_sys::Element, nodes: &[Node]) -> Result<(), JsValue> {
    container.set_text_content(None);
    for n in nodes {
        container.append_child(&n.mount(doc)?)?;
    }
    Ok(())
}
