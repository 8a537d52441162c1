//! Stack-based tree builder with tag-mismatch recovery.

use crate::dom::{Document, NodeId};
use crate::error::{ParseWarning, ParseWarningKind};
use crate::tokenizer::{Token, line_col, tokenize};

/// Parses `input` into an element tree. The root element is always `html`,
/// even if the source never opens one explicitly — callers that need a
/// strict "malformed document" signal should inspect `Document::root`'s tag.
pub fn parse(input: &str) -> Document {
    let tokens = tokenize(input);

    let mut doc: Option<Document> = None;
    // Stack of (element id, tag name) for elements still open.
    let mut stack: Vec<(NodeId, String)> = Vec::new();

    for spanned in &tokens {
        match &spanned.token {
            Token::Text(text) => {
                if let Some((parent, _)) = stack.last() {
                    if let Some(doc) = doc.as_mut() {
                        doc.alloc_text(*parent, text.clone());
                    }
                }
                // Text before any open element (including before the root) is
                // dropped: nothing is on the stack to attach it to.
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                if doc.is_none() {
                    let mut root = Document::with_root(name.clone(), attributes.clone());
                    let _ = &mut root;
                    doc = Some(root);
                    let root_id = doc.as_ref().unwrap().root();
                    if !self_closing {
                        stack.push((root_id, name.clone()));
                    }
                    continue;
                }

                let document = doc.as_mut().unwrap();
                let id = if let Some((parent, _)) = stack.last() {
                    document.alloc_element(*parent, name.clone(), attributes.clone())
                } else {
                    // Sibling of the (already closed) root: nothing sane to
                    // attach to; drop it like stray post-root markup.
                    continue;
                };
                if !self_closing {
                    stack.push((id, name.clone()));
                }
            }
            Token::EndTag(name) => {
                let (line, column) = line_col(input, spanned.offset);
                if !stack.iter().any(|(_, tag)| tag == name) {
                    log::warn!(
                        "{}",
                        ParseWarning {
                            kind: ParseWarningKind::UnmatchedEndTag,
                            tag: name.clone(),
                            line,
                            column,
                        }
                    );
                    continue;
                }
                while let Some((_, top)) = stack.last() {
                    if top == name {
                        stack.pop();
                        break;
                    }
                    let (_, unclosed) = stack.pop().unwrap();
                    log::warn!(
                        "{}",
                        ParseWarning {
                            kind: ParseWarningKind::AutoClosedForEndTag,
                            tag: unclosed,
                            line,
                            column,
                        }
                    );
                }
            }
        }
    }

    while let Some((_, tag)) = stack.pop() {
        log::warn!(
            "{}",
            ParseWarning {
                kind: ParseWarningKind::AutoClosedAtEof,
                tag,
                line: 0,
                column: 0,
            }
        );
    }

    doc.unwrap_or_else(|| Document::with_root("html", Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;

    #[test]
    fn builds_nested_tree() {
        let doc = parse("<html><body><p>hi</p></body></html>");
        let root = doc.root();
        assert_eq!(doc.tag(root), Some("html"));
        let body = doc.children(root)[0];
        assert_eq!(doc.tag(body), Some("body"));
        let p = doc.children(body)[0];
        assert_eq!(doc.tag(p), Some("p"));
        let text = doc.children(p)[0];
        assert_eq!(doc.text(text), Some("hi"));
    }

    #[test]
    fn unmatched_end_tag_is_dropped_not_fatal() {
        let doc = parse("<html><body></span></body></html>");
        let root = doc.root();
        let body = doc.children(root)[0];
        assert_eq!(doc.tag(body), Some("body"));
    }

    #[test]
    fn mismatched_close_auto_closes_intervening_tags() {
        let doc = parse("<html><body><div><p>x</div></body></html>");
        let root = doc.root();
        let body = doc.children(root)[0];
        let div = doc.children(body)[0];
        assert_eq!(doc.tag(div), Some("div"));
        let p = doc.children(div)[0];
        assert_eq!(doc.tag(p), Some("p"));
    }

    #[test]
    fn leftover_open_tags_auto_close_at_eof() {
        let doc = parse("<html><body><div>");
        let root = doc.root();
        assert!(matches!(doc.kind(root), NodeKind::Element { .. }));
    }

    #[test]
    fn quoted_attribute_with_space_is_preserved() {
        let doc = parse(r#"<html><body><div style="position: relative"></div></body></html>"#);
        let root = doc.root();
        let body = doc.children(root)[0];
        let div = doc.children(body)[0];
        assert_eq!(doc.attr(div, "style"), Some("position: relative"));
    }
}
