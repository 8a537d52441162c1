//! Render-tree construction, grounded in `renderer.py`'s
//! `construct_render_tree`.
//!
//! Three passes over the styled element tree:
//!  1. walk the DOM, dropping `display: none` subtrees and lifting blocks
//!     out of inline ancestors,
//!  2. hoist positioned blocks to their nearest positioned ancestor, or to
//!     the viewport root for `fixed`,
//!  3. wrap runs of inline/text children that are siblings of block
//!     children in anonymous blocks.

use std::collections::VecDeque;

use css::values::{Display, Position};
use css::ComputedStyle;
use html::{Document, NodeId};

use crate::error::{RenderTreeError, Result};

/// Index into a [`RenderTree`]'s arena. Stable for the tree's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderId(u32);

impl RenderId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderKind {
    /// A box with `display: block`, participating in block-mode layout.
    Block,
    /// A box with `display: inline`, participating in line breaking only.
    Inline,
    /// A text run, leaf-only, always a child of an inline or block box.
    Text,
}

struct Slot {
    kind: RenderKind,
    /// The backing DOM node. Anonymous blocks point at a node allocated via
    /// `Document::alloc_floating_element`, used only so inherited styles
    /// resolve sensibly.
    dom: NodeId,
    parent: Option<RenderId>,
    children: Vec<RenderId>,
}

/// The render tree built from a styled [`Document`].
pub struct RenderTree {
    slots: Vec<Slot>,
    root: RenderId,
}

impl RenderTree {
    pub fn root(&self) -> RenderId {
        self.root
    }

    /// Number of slots in the arena, including detached/abandoned ones —
    /// an upper bound for indexing a per-node side table (e.g. the layout
    /// solver's box-model storage).
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn kind(&self, id: RenderId) -> RenderKind {
        self.slots[id.index()].kind
    }

    pub fn dom_node(&self, id: RenderId) -> NodeId {
        self.slots[id.index()].dom
    }

    pub fn parent(&self, id: RenderId) -> Option<RenderId> {
        self.slots[id.index()].parent
    }

    pub fn children(&self, id: RenderId) -> &[RenderId] {
        &self.slots[id.index()].children
    }

    pub fn style<'a>(&self, doc: &'a Document, id: RenderId) -> ComputedStyle<'a> {
        ComputedStyle::of(doc, self.dom_node(id))
    }

    pub fn position(&self, doc: &Document, id: RenderId) -> Position {
        self.style(doc, id).position()
    }

    pub fn is_positioned(&self, doc: &Document, id: RenderId) -> bool {
        self.position(doc, id).is_positioned()
    }

    fn alloc(&mut self, kind: RenderKind, dom: NodeId, parent: Option<RenderId>) -> RenderId {
        let id = RenderId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            dom,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn add_child(&mut self, parent: RenderId, child: RenderId) {
        self.slots[child.index()].parent = Some(parent);
        self.slots[parent.index()].children.push(child);
    }

    fn remove_child(&mut self, parent: RenderId, child: RenderId) {
        self.slots[child.index()].parent = None;
        self.slots[parent.index()]
            .children
            .retain(|id| *id != child);
    }

    fn insert_after(&mut self, parent: RenderId, child: RenderId, sibling: RenderId) {
        self.slots[child.index()].parent = Some(parent);
        let children = &mut self.slots[parent.index()].children;
        let position = children.iter().position(|id| *id == sibling).unwrap();
        children.insert(position + 1, child);
    }

    fn abandon_children(&mut self, parent: RenderId) -> Vec<RenderId> {
        let children = std::mem::take(&mut self.slots[parent.index()].children);
        for child in &children {
            self.slots[child.index()].parent = None;
        }
        children
    }
}

/// Builds an anonymous block: a synthesized render block with no real DOM
/// backing, used to hold inline/text runs that are siblings of block boxes.
/// `parent_dom` supplies the inherited styles it needs.
fn anonymous_block(doc: &mut Document, tree: &mut RenderTree, parent_dom: NodeId) -> RenderId {
    let floating = doc.alloc_floating_element(parent_dom, "div");
    // Inherits the containing block's resolved style wholesale, then
    // overrides the four properties the anonymous box itself defines.
    let mut style = doc.style(parent_dom).to_vec();
    for (property, value) in [
        ("display", "block"),
        ("position", "static"),
        ("width", "auto"),
        ("height", "auto"),
    ] {
        if let Some(existing) = style.iter_mut().find(|(k, _)| k == property) {
            existing.1 = value.to_string();
        } else {
            style.push((property.to_string(), value.to_string()));
        }
    }
    doc.set_style(floating, style);
    tree.alloc(RenderKind::Block, floating, None)
}

/// Builds the render tree from the (already styled) document.
pub fn construct_render_tree(doc: &mut Document) -> Result<RenderTree> {
    let root_dom = doc.root();
    if ComputedStyle::of(doc, root_dom).display() != Display::Block {
        return Err(RenderTreeError::RootNotBlock);
    }

    let mut tree = RenderTree {
        slots: Vec::new(),
        root: RenderId(0),
    };
    let root_id = tree.alloc(RenderKind::Block, root_dom, None);
    tree.root = root_id;

    // Pass 1: drop `display: none`, lift blocks out of inline ancestors.
    let mut worklist: VecDeque<RenderId> = VecDeque::new();
    worklist.push_back(root_id);
    while let Some(ro) = worklist.pop_front() {
        let dom = tree.dom_node(ro);
        for &child_dom in doc.children(dom).to_vec().iter() {
            if doc.text(child_dom).is_some() {
                let text_id = tree.alloc(RenderKind::Text, child_dom, None);
                tree.add_child(ro, text_id);
                continue;
            }
            if !doc.is_element(child_dom) {
                continue;
            }
            let style = ComputedStyle::of(doc, child_dom);
            match style.display() {
                Display::None => continue,
                Display::Block => {
                    let block_id = tree.alloc(RenderKind::Block, child_dom, None);
                    if tree.kind(ro) == RenderKind::Inline {
                        // Walk up to the nearest block ancestor and insert the
                        // lifted block as its sibling, right after `ro`'s chain.
                        let mut ancestor = ro;
                        let mut inline_sibling = ro;
                        while tree.kind(ancestor) != RenderKind::Block {
                            let parent = tree.parent(ancestor).expect("inline root is impossible");
                            inline_sibling = ancestor;
                            ancestor = parent;
                        }
                        tree.insert_after(ancestor, block_id, inline_sibling);
                    } else {
                        tree.add_child(ro, block_id);
                    }
                    worklist.push_back(block_id);
                }
                Display::Inline => {
                    let inline_id = tree.alloc(RenderKind::Inline, child_dom, None);
                    tree.add_child(ro, inline_id);
                    worklist.push_back(inline_id);
                }
            }
        }
    }

    // Pass 2: hoist positioned blocks.
    let mut worklist: VecDeque<RenderId> = VecDeque::new();
    worklist.push_back(root_id);
    while let Some(ro) = worklist.pop_front() {
        for child in tree.children(ro).to_vec() {
            if tree.kind(child) != RenderKind::Block {
                continue;
            }
            match tree.position(doc, child) {
                Position::Absolute => {
                    if !tree.is_positioned(doc, ro) {
                        let mut ancestor = ro;
                        loop {
                            if tree.is_positioned(doc, ancestor) {
                                break;
                            }
                            ancestor = tree
                                .parent(ancestor)
                                .ok_or(RenderTreeError::NoPositionedAncestor)?;
                        }
                        tree.remove_child(ro, child);
                        tree.add_child(ancestor, child);
                    }
                }
                Position::Fixed => {
                    if ro != root_id {
                        tree.remove_child(ro, child);
                        tree.add_child(root_id, child);
                    }
                }
                _ => {}
            }
            worklist.push_back(child);
        }
    }

    // Pass 3: wrap mixed inline/block children in anonymous blocks.
    let mut worklist: VecDeque<RenderId> = VecDeque::new();
    worklist.push_back(root_id);
    while let Some(ro) = worklist.pop_front() {
        let children = tree.children(ro).to_vec();
        let has_block = children.iter().any(|c| tree.kind(*c) == RenderKind::Block);
        let has_non_block = children.iter().any(|c| tree.kind(*c) != RenderKind::Block);
        if has_block && has_non_block {
            let abandoned = tree.abandon_children(ro);
            let parent_dom = tree.dom_node(ro);
            let mut pending_anonymous: Option<RenderId> = None;
            for child in abandoned {
                if tree.kind(child) == RenderKind::Block {
                    tree.add_child(ro, child);
                    pending_anonymous = None;
                } else {
                    let anon = match pending_anonymous {
                        Some(id) => id,
                        None => {
                            let id = anonymous_block(doc, &mut tree, parent_dom);
                            tree.add_child(ro, id);
                            pending_anonymous = Some(id);
                            id
                        }
                    };
                    tree.add_child(anon, child);
                }
            }
        }
        for child in tree.children(ro).to_vec() {
            if tree.kind(child) == RenderKind::Block {
                worklist.push_back(child);
            }
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use css::{attach_styles, Cssom};

    fn build(html_source: &str, css_source: &str) -> (Document, RenderTree) {
        let mut doc = html::parse(html_source);
        let mut cssom = Cssom::new();
        cssom.ingest(css_source);
        attach_styles(&mut doc, &cssom);
        let tree = construct_render_tree(&mut doc).unwrap();
        (doc, tree)
    }

    #[test]
    fn display_none_subtree_is_pruned() {
        let (_doc, tree) = build(
            "<html><body><div class=\"hidden\">x</div><p>keep</p></body></html>",
            "body { display: block; } div { display: block; } p { display: block; } .hidden { display: none; }",
        );
        let root = tree.root();
        let body = tree.children(root)[0];
        assert_eq!(tree.children(body).len(), 1);
    }

    #[test]
    fn block_inside_inline_is_lifted_to_block_ancestor() {
        let (doc, tree) = build(
            "<html><body><span><div>block</div></span></body></html>",
            "body { display: block; } span { display: inline; } div { display: block; }",
        );
        let root = tree.root();
        let body = tree.children(root)[0];
        // span (inline) and div (block, lifted out) are now siblings under body.
        assert_eq!(tree.children(body).len(), 2);
        let kinds: Vec<RenderKind> = tree.children(body).iter().map(|id| tree.kind(*id)).collect();
        assert!(kinds.contains(&RenderKind::Inline));
        assert!(kinds.contains(&RenderKind::Block));
        let _ = doc;
    }

    #[test]
    fn absolute_block_hoists_to_positioned_ancestor() {
        let (doc, tree) = build(
            "<html><body><div id=\"rel\"><div id=\"abs\">x</div></div></body></html>",
            "body { display: block; } div { display: block; } #rel { position: relative; } #abs { position: absolute; }",
        );
        let root = tree.root();
        let body = tree.children(root)[0];
        let rel = tree.children(body)[0];
        assert_eq!(tree.children(rel).len(), 1);
        let _ = doc;
    }

    #[test]
    fn mixed_inline_and_block_children_get_anonymous_wrapper() {
        let (_doc, tree) = build(
            "<html><body>text<div>block</div></body></html>",
            "body { display: block; } div { display: block; }",
        );
        let root = tree.root();
        let body = tree.children(root)[0];
        let children = tree.children(body);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.kind(children[0]), RenderKind::Block);
        assert_eq!(tree.kind(children[1]), RenderKind::Block);
    }
}
