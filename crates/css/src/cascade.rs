//! Style attachment: cascade, grammar defaulting, root override, and
//! inheritance, grounded in `attachment.py`'s `attach_styles`.
//!
//! Resolved declarations are written back onto the element tree itself
//! (`html::Document::set_style`) rather than into a side table — computed
//! style lives on the node. `ComputedStyle` below is a read-only typed view
//! over whatever is currently stored there.

use std::collections::VecDeque;

use html::{Document, NodeId};

use crate::cssom::Cssom;
use crate::values::{
    BackgroundColorValue, ColorValue, Display, FontSizeValue, FontStyleValue, FontWeightValue,
    Length, Position,
};

const MARGIN_PADDING_BORDER: &[&str] = &[
    "margin-left",
    "margin-right",
    "margin-top",
    "margin-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "padding-bottom",
    "border-left",
    "border-right",
    "border-top",
    "border-bottom",
];

const BOX_OFFSETS: &[&str] = &["width", "height", "left", "right", "top", "bottom"];

const INHERITABLE_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "font-size",
    "font-style",
    "font-weight",
];

/// Default value a property falls back to when unset or grammatically
/// invalid — see `attachment.py::parse_style`.
fn default_for(property: &str) -> &'static str {
    match property {
        p if MARGIN_PADDING_BORDER.contains(&p) => "0px",
        p if BOX_OFFSETS.contains(&p) => "auto",
        "color" | "border-color" => "inherit",
        "background-color" => "inherit",
        "font-size" => "inherit",
        "font-weight" => "inherit",
        "font-style" => "inherit",
        "display" => "none",
        "position" => "static",
        _ => "",
    }
}

fn is_valid(property: &str, value: &str) -> bool {
    match property {
        p if MARGIN_PADDING_BORDER.contains(&p) => Length::parse_no_auto(value).is_some(),
        p if BOX_OFFSETS.contains(&p) => Length::parse_allow_auto(value).is_some(),
        "color" | "border-color" => ColorValue::parse(value).is_some(),
        "background-color" => BackgroundColorValue::parse(value).is_some(),
        "font-size" => FontSizeValue::parse(value).is_some(),
        "font-weight" => FontWeightValue::parse(value).is_some(),
        "font-style" => FontStyleValue::parse(value).is_some(),
        "display" => Display::parse(value).is_some(),
        "position" => Position::parse(value).is_some(),
        _ => false,
    }
}

const ALL_PROPERTIES: &[&str] = &[
    "margin-left",
    "margin-right",
    "margin-top",
    "margin-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "padding-bottom",
    "border-left",
    "border-right",
    "border-top",
    "border-bottom",
    "width",
    "height",
    "left",
    "right",
    "top",
    "bottom",
    "color",
    "border-color",
    "background-color",
    "font-size",
    "font-weight",
    "font-style",
    "display",
    "position",
];

/// Runs the cascade for one element against the four CSSOM buckets,
/// defaults/validates every recognised property, and applies the `html`
/// root override — but does not yet resolve `inherit` (the caller does
/// that once the parent's resolved style is available).
fn cascade_one(doc: &Document, id: NodeId, cssom: &Cssom) -> Vec<(String, String)> {
    let mut raw: Vec<(String, String)> = Vec::new();
    let mut apply = |decls: &crate::cssom::Declarations, raw: &mut Vec<(String, String)>| {
        for (k, v) in &decls.0 {
            if let Some(existing) = raw.iter_mut().find(|(rk, _): &&mut (String, String)| rk == k)
            {
                existing.1 = v.clone();
            } else {
                raw.push((k.clone(), v.clone()));
            }
        }
    };

    apply(&cssom.universal, &mut raw);
    if let Some(tag) = doc.tag(id) {
        if let Some(decls) = cssom.tags.get(tag) {
            apply(decls, &mut raw);
        }
    }
    for class in doc.classes(id) {
        if let Some(decls) = cssom.classes.get(class) {
            apply(decls, &mut raw);
        }
    }
    if let Some(id_attr) = doc.id_attr(id) {
        if let Some(decls) = cssom.ids.get(id_attr) {
            apply(decls, &mut raw);
        }
    }

    let mut resolved: Vec<(String, String)> = ALL_PROPERTIES
        .iter()
        .map(|property| {
            let value = raw
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.as_str());
            let value = match value {
                Some(v) if is_valid(property, v) => v.to_string(),
                _ => default_for(property).to_string(),
            };
            (property.to_string(), value)
        })
        .collect();

    if doc.tag(id) == Some("html") {
        set(&mut resolved, "position", "relative");
        set(&mut resolved, "display", "block");
        for (property, default_value) in [
            ("color", "#000000"),
            ("border-color", "#000000"),
            ("background-color", "transparent"),
            ("font-size", "16px"),
            ("font-weight", "normal"),
            ("font-style", "normal"),
        ] {
            if get(&resolved, property) == Some("inherit") {
                set(&mut resolved, property, default_value);
            }
        }
    }

    resolved
}

fn get<'a>(decls: &'a [(String, String)], property: &str) -> Option<&'a str> {
    decls
        .iter()
        .find(|(k, _)| k == property)
        .map(|(_, v)| v.as_str())
}

fn set(decls: &mut [(String, String)], property: &str, value: &str) {
    if let Some(existing) = decls.iter_mut().find(|(k, _)| k == property) {
        existing.1 = value.to_string();
    }
}

/// Computes and stores resolved styles for every element in `doc`,
/// breadth-first from the root so a node's inheritable properties can
/// always be resolved from its already-processed parent.
pub fn attach_styles(doc: &mut Document, cssom: &Cssom) {
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(doc.root());

    while let Some(id) = queue.pop_front() {
        if !doc.is_element(id) {
            continue;
        }
        let mut resolved = cascade_one(doc, id, cssom);

        let parent_style = doc.parent(id).map(|p| doc.style(p).to_vec());
        for property in INHERITABLE_PROPERTIES {
            if get(&resolved, property) == Some("inherit") {
                let inherited = parent_style
                    .as_deref()
                    .and_then(|p| get(p, property))
                    .unwrap_or_else(|| default_for(property))
                    .to_string();
                set(&mut resolved, property, &inherited);
            }
        }

        doc.set_style(id, resolved);
        for child in doc.children(id) {
            queue.push_back(*child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_order_is_universal_then_tag_then_class_then_id() {
        let mut doc = html::parse(r#"<html><body><p class="warn" id="lead">hi</p></body></html>"#);
        let mut cssom = Cssom::new();
        cssom.ingest(
            "* { color: #111111; } p { color: #222222; } .warn { color: #333333; } #lead { color: #444444; }",
        );
        attach_styles(&mut doc, &cssom);
        let root = doc.root();
        let body = doc.children(root)[0];
        let p = doc.children(body)[0];
        assert_eq!(get(doc.style(p), "color"), Some("#444444"));
    }

    #[test]
    fn inheritable_property_falls_through_to_parent() {
        let mut doc = html::parse("<html><body><p>hi</p></body></html>");
        let mut cssom = Cssom::new();
        cssom.ingest("body { color: #00ff00; }");
        attach_styles(&mut doc, &cssom);
        let root = doc.root();
        let body = doc.children(root)[0];
        let p = doc.children(body)[0];
        assert_eq!(get(doc.style(p), "color"), Some("#00ff00"));
    }

    #[test]
    fn non_inheritable_property_defaults_rather_than_inherits() {
        let mut doc = html::parse("<html><body><p>hi</p></body></html>");
        let mut cssom = Cssom::new();
        cssom.ingest("body { width: 200px; }");
        attach_styles(&mut doc, &cssom);
        let root = doc.root();
        let body = doc.children(root)[0];
        let p = doc.children(body)[0];
        assert_eq!(get(doc.style(p), "width"), Some("auto"));
    }

    #[test]
    fn html_root_is_forced_block_and_relative() {
        let mut doc = html::parse("<html><body></body></html>");
        let cssom = Cssom::new();
        attach_styles(&mut doc, &cssom);
        let root = doc.root();
        assert_eq!(get(doc.style(root), "display"), Some("block"));
        assert_eq!(get(doc.style(root), "position"), Some("relative"));
    }

    #[test]
    fn invalid_value_falls_back_to_default() {
        let mut doc = html::parse("<html><body><p>hi</p></body></html>");
        let mut cssom = Cssom::new();
        cssom.ingest("p { display: flex; }");
        attach_styles(&mut doc, &cssom);
        let root = doc.root();
        let body = doc.children(root)[0];
        let p = doc.children(body)[0];
        assert_eq!(get(doc.style(p), "display"), Some("none"));
    }
}
