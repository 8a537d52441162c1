//! Stylesheet ingestion into the four-bucket CSS object model.
//!
//! The cascade this workspace implements is not CSS specificity — it is a
//! fixed bucket order (universal, then tag, then class, then id) applied in
//! source order within each bucket. `Cssom` models exactly that, rather than
//! the general `Vec<Rule>` + specificity-tuple shape.

use std::collections::HashMap;

/// Declarations attached to one selector bucket. Later `ingest` calls for
/// the same selector extend/override this in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Declarations(pub Vec<(String, String)>);

impl Declarations {
    fn set(&mut self, property: String, value: String) {
        if let Some(existing) = self.0.iter_mut().find(|(k, _)| *k == property) {
            existing.1 = value;
        } else {
            self.0.push((property, value));
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }
}

/// The stylesheet's four selector buckets.
#[derive(Clone, Debug, Default)]
pub struct Cssom {
    pub universal: Declarations,
    pub tags: HashMap<String, Declarations>,
    pub classes: HashMap<String, Declarations>,
    pub ids: HashMap<String, Declarations>,
}

impl Cssom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `text` for `selector { prop: value; ... }` rules and merges
    /// their declarations into the matching bucket. Unrecognised selectors
    /// and malformed declaration text are logged and skipped — a stylesheet
    /// with a typo in one rule must not take the rest of the sheet with it.
    pub fn ingest(&mut self, text: &str) {
        let text = strip_comments(text);
        let mut rest = text.as_str();
        while !rest.trim_start().is_empty() {
            rest = rest.trim_start();
            let Some(open) = rest.find('{') else {
                log::warn!("unconsumed trailing text in stylesheet: `{}`", rest.trim());
                break;
            };
            let selector = rest[..open].trim();
            let Some(close) = rest[open..].find('}') else {
                log::warn!("unterminated rule body for selector `{}`", selector);
                break;
            };
            let body = &rest[open + 1..open + close];
            rest = &rest[open + close + 1..];

            if selector.is_empty() {
                log::warn!("empty selector before `{{`; skipping rule body");
                continue;
            }
            let Some(bucket) = self.bucket_for(selector) else {
                log::warn!("unknown selector `{}`; rule ignored", selector);
                continue;
            };
            ingest_declarations(bucket, body);
        }
    }

    fn bucket_for(&mut self, selector: &str) -> Option<&mut Declarations> {
        if selector == "*" {
            return Some(&mut self.universal);
        }
        if let Some(class) = selector.strip_prefix('.') {
            if !is_ident(class) {
                return None;
            }
            return Some(self.classes.entry(class.to_string()).or_default());
        }
        if let Some(id) = selector.strip_prefix('#') {
            if !is_ident(id) {
                return None;
            }
            return Some(self.ids.entry(id.to_string()).or_default());
        }
        if is_ident(selector) {
            return Some(self.tags.entry(selector.to_string()).or_default());
        }
        None
    }
}

fn ingest_declarations(into: &mut Declarations, body: &str) {
    for part in body.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((property, value)) = part.split_once(':') else {
            log::warn!("malformed declaration `{}`; skipping", part);
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        if property.is_empty() || value.is_empty() || !is_ident(&property) {
            log::warn!("malformed declaration `{}`; skipping", part);
            continue;
        }
        into.set(property, value);
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        rest = &rest[start + 2..];
        match rest.find("*/") {
            Some(end) => rest = &rest[end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
