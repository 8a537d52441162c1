//! The layout solver: two-phase box-model sizing and positioning over the
//! render tree, grounded in `layout.py`'s `construct_layout`.
//!
//! Three explicit worklists rather than recursion: a pre-order stack for
//! phase A (sizing), a LIFO for "needs height" blocks (deepest-visited
//! first) for phase B (children height + positioning), and an
//! order-independent list of positioned blocks for phase C
//! (relative/absolute/fixed offsets).

use css::values::{Length, Position};
use css::ComputedStyle;
use html::Document;

use crate::box_model::BoxModel;
use crate::error::{LayoutError, LayoutResult};
use crate::render_tree::{RenderId, RenderKind, RenderTree};
use crate::text::{construct_render_lines, FontMetrics, RenderLines};

/// Resolves a style length against a containing-block basis.
/// `Length::Auto` is only legal when `allow_auto` is set (top/right/bottom/
/// left, and `width`/`height` inside phase A); reaching it otherwise is the
/// one `MalformedLength` case, which should be unreachable given the style
/// attacher's grammar defaulting.
fn compute_length(value: Length, basis: i32, allow_auto: bool) -> LayoutResult<i32> {
    match value {
        Length::Px(n) => Ok(n),
        Length::Percent(n) => Ok(basis * n / 100),
        Length::Auto if allow_auto => Ok(0),
        Length::Auto => Err(LayoutError::MalformedLength),
    }
}

/// The result of running the solver: every render node's resolved box
/// model, plus the packed text lines for nodes whose children are all
/// inline/text.
pub struct Layout {
    boxes: Vec<Option<BoxModel>>,
    lines: Vec<Option<RenderLines>>,
}

impl Layout {
    pub fn box_model(&self, id: RenderId) -> &BoxModel {
        self.boxes[id.index()]
            .as_ref()
            .expect("every render node is sized by the layout solver")
    }

    /// `Some` only for a block whose children are all inline/text.
    pub fn lines(&self, id: RenderId) -> Option<&RenderLines> {
        self.lines[id.index()].as_ref()
    }
}

/// Runs the layout solver over `tree`. `window_width` and `window_height`
/// are the viewport the root resolves its containing block against.
pub fn compute_layout(
    doc: &Document,
    tree: &RenderTree,
    metrics: &dyn FontMetrics,
    window_width: i32,
    window_height: i32,
) -> LayoutResult<Layout> {
    let root = tree.root();
    let root_style = tree.style(doc, root);
    if root_style.display() != css::values::Display::Block
        || root_style.position() != Position::Relative
    {
        return Err(LayoutError::RootNotRelativeBlock);
    }

    let len = tree.len();
    let mut boxes: Vec<Option<BoxModel>> = vec![None; len];
    let mut lines: Vec<Option<RenderLines>> = vec![None; len];
    // Tracks which render nodes had a `N%` height demoted to `auto`, so
    // phase B can apply the same demotion when it decides whether to
    // overwrite `content_height` from children, and so a percent-height
    // child of a demoted parent demotes too (demotion is transitive: a
    // parent reads as effectively auto once it's demoted, even though its
    // own declared style is still `N%`).
    let mut height_demoted: Vec<bool> = vec![false; len];

    let mut pre_order: Vec<RenderId> = vec![root];
    let mut needs_height: Vec<RenderId> = Vec::new();
    let mut positioned: Vec<RenderId> = Vec::new();

    // Phase A — pre-order descent (sizing).
    while let Some(id) = pre_order.pop() {
        let (containing_width, containing_height) = match tree.parent(id) {
            None => (window_width, window_height),
            Some(parent) => {
                let parent_bm = boxes[parent.index()]
                    .as_ref()
                    .expect("parent sized before child in pre-order traversal");
                (parent_bm.content_width, parent_bm.content_height)
            }
        };

        let style = tree.style(doc, id);

        let mut height_style = style.height();
        if let Some(parent) = tree.parent(id) {
            let parent_height_auto =
                height_demoted[parent.index()] || tree.style(doc, parent).height() == Length::Auto;
            if parent_height_auto {
                if let Length::Percent(_) = height_style {
                    height_style = Length::Auto;
                    height_demoted[id.index()] = true;
                }
            }
        }

        if tree.is_positioned(doc, id) {
            positioned.push(id);
        }

        let mut bm = BoxModel::default();
        bm.margin_left = compute_length(style.margin_left(), containing_width, false)?;
        bm.margin_right = compute_length(style.margin_right(), containing_width, false)?;
        bm.margin_top = compute_length(style.margin_top(), containing_width, false)?;
        bm.margin_bottom = compute_length(style.margin_bottom(), containing_width, false)?;
        bm.padding_left = compute_length(style.padding_left(), containing_width, false)?;
        bm.padding_right = compute_length(style.padding_right(), containing_width, false)?;
        bm.padding_top = compute_length(style.padding_top(), containing_width, false)?;
        bm.padding_bottom = compute_length(style.padding_bottom(), containing_width, false)?;
        bm.border_left = compute_length(style.border_left(), containing_width, false)?;
        bm.border_right = compute_length(style.border_right(), containing_width, false)?;
        bm.border_top = compute_length(style.border_top(), containing_width, false)?;
        bm.border_bottom = compute_length(style.border_bottom(), containing_width, false)?;

        match style.width() {
            Length::Auto => bm.set_box_width(containing_width),
            other => bm.set_width(compute_length(other, containing_width, false)?),
        }

        // Resolve height greedily whenever it isn't `auto`, independent of
        // what kind of children follow.
        if height_style != Length::Auto {
            bm.set_height(compute_length(height_style, containing_height, false)?);
        }

        let children = tree.children(id).to_vec();
        if children.is_empty() {
            if height_style == Length::Auto {
                bm.content_height = 0;
            }
        } else if children
            .iter()
            .all(|child| tree.kind(*child) != RenderKind::Block)
        {
            let built = construct_render_lines(doc, tree, metrics, id, bm.content_width);
            if height_style == Length::Auto {
                bm.content_height = built.height();
            }
            lines[id.index()] = Some(built);
        } else {
            // All-block children: defer height-from-children and child
            // positioning to phase B, regardless of whether this block's
            // own height is auto (children still need relative offsets).
            needs_height.push(id);
            for &child in children.iter().rev() {
                pre_order.push(child);
            }
        }

        boxes[id.index()] = Some(bm);
    }

    // Phase B — post-order ascent (height + child positioning). Deeper
    // blocks were pushed later in phase A's traversal, so popping this
    // stack visits them before their ancestors.
    while let Some(id) = needs_height.pop() {
        let children = tree.children(id).to_vec();
        let mut children_height = 0i32;
        for &child in &children {
            {
                let child_bm = boxes[child.index()]
                    .as_mut()
                    .expect("child sized in phase A");
                child_bm.relative_left = 0;
                child_bm.relative_top = children_height;
            }
            if matches!(
                tree.position(doc, child),
                Position::Static | Position::Relative
            ) {
                children_height += boxes[child.index()].as_ref().unwrap().box_height();
            }
        }

        let mut height_style = tree.style(doc, id).height();
        if height_demoted[id.index()] {
            height_style = Length::Auto;
        }
        if height_style == Length::Auto {
            boxes[id.index()].as_mut().unwrap().content_height = children_height.max(0);
        }
    }

    // Phase C — positioned-element offsets; order is irrelevant. The root
    // is always `position: relative` (the style attacher's root override)
    // but has no parent to offset against, so it's skipped here exactly as
    // `layout.py` does (`if ro.parent: ...`), not treated as the
    // `PositionedNodeMissingParent` error case — every *other* positioned
    // node is guaranteed a parent by the render tree's hoisting pass.
    for id in positioned {
        let Some(parent) = tree.parent(id) else {
            continue;
        };
        let parent_bm = *boxes[parent.index()].as_ref().unwrap();
        let style = tree.style(doc, id);

        match style.position() {
            Position::Relative => {
                let top = compute_length(style.top(), parent_bm.content_width, true)?;
                let left = compute_length(style.left(), parent_bm.content_width, true)?;
                let bottom = compute_length(style.bottom(), parent_bm.content_width, true)?;
                let right = compute_length(style.right(), parent_bm.content_width, true)?;
                let bm = boxes[id.index()].as_mut().unwrap();
                bm.relative_top += top - bottom;
                bm.relative_left += left - right;
            }
            Position::Absolute | Position::Fixed => {
                let (box_width, box_height) = {
                    let bm = boxes[id.index()].as_ref().unwrap();
                    (bm.box_width(), bm.box_height())
                };
                if style.top() != Length::Auto {
                    let top = compute_length(style.top(), parent_bm.content_width, false)?;
                    boxes[id.index()].as_mut().unwrap().relative_top = top;
                }
                if style.left() != Length::Auto {
                    let left = compute_length(style.left(), parent_bm.content_width, false)?;
                    boxes[id.index()].as_mut().unwrap().relative_left = left;
                }
                if style.bottom() != Length::Auto {
                    let bottom = compute_length(style.bottom(), parent_bm.content_width, false)?;
                    boxes[id.index()].as_mut().unwrap().relative_top =
                        parent_bm.content_height - box_height - bottom;
                }
                if style.right() != Length::Auto {
                    let right = compute_length(style.right(), parent_bm.content_width, false)?;
                    boxes[id.index()].as_mut().unwrap().relative_left =
                        parent_bm.content_width - box_width - right;
                }
            }
            Position::Static => {}
        }
    }

    Ok(Layout { boxes, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MetricsFont;
    use css::{attach_styles, Cssom};

    fn build(html_source: &str, css_source: &str) -> (Document, RenderTree) {
        let mut doc = html::parse(html_source);
        let mut cssom = Cssom::new();
        cssom.ingest(css_source);
        attach_styles(&mut doc, &cssom);
        let tree = crate::render_tree::construct_render_tree(&mut doc).unwrap();
        (doc, tree)
    }

    #[test]
    fn zero_children_auto_height_block_is_zero_height() {
        let (doc, tree) = build(
            "<html><body><div id=\"empty\"></div></body></html>",
            "body { display: block; } div { display: block; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let empty = tree.children(body)[0];
        assert_eq!(layout.box_model(empty).content_height, 0);
    }

    #[test]
    fn percent_of_basis_is_exact_at_zero_and_hundred() {
        assert_eq!(compute_length(Length::Percent(0), 200, false).unwrap(), 0);
        assert_eq!(compute_length(Length::Percent(100), 200, false).unwrap(), 200);
    }

    #[test]
    fn auto_percent_height_child_of_auto_parent_resolves_to_zero() {
        let (doc, tree) = build(
            "<html><body><div id=\"parent\"><div id=\"child\">x</div></div></body></html>",
            "body { display: block; } div { display: block; } #child { height: 50%; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let parent = tree.children(body)[0];
        let child = tree.children(parent)[0];
        // Demoted to `auto`: resolves from its own (empty-of-blocks) content,
        // not 50% of the parent's unresolved auto height.
        assert_eq!(layout.box_model(child).content_height, layout.lines(child).unwrap().height());
    }

    #[test]
    fn percent_height_demotion_cascades_through_two_levels() {
        let (doc, tree) = build(
            r#"<html><body><div id="div1"><div id="div2">x</div></div></body></html>"#,
            "body { display: block; } div { display: block; }
             #div1 { height: 50%; } #div2 { height: 50%; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let div1 = tree.children(body)[0];
        let div2 = tree.children(div1)[0];
        // body's height is auto, so div1 demotes to auto; div1 is now
        // effectively auto too, so div2 demotes in turn and sizes from its
        // own line content rather than 0% of div1's still-unresolved height.
        assert_eq!(layout.box_model(div2).content_height, layout.lines(div2).unwrap().height());
        assert_ne!(layout.box_model(div2).content_height, 0);
    }

    #[test]
    fn block_children_stack_vertically_by_box_height() {
        let (doc, tree) = build(
            "<html><body><div id=\"a\"></div><div id=\"b\"></div></body></html>",
            "body { display: block; } div { display: block; } #a { height: 30px; } #b { height: 40px; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let children = tree.children(body);
        let a = children[0];
        let b = children[1];
        assert_eq!(layout.box_model(a).relative_top, 0);
        assert_eq!(layout.box_model(b).relative_top, 30);
    }

    #[test]
    fn absolute_block_offsets_against_positioned_ancestor() {
        let (doc, tree) = build(
            r#"<html><body><div id="rel"><div id="abs"></div></div></body></html>"#,
            "body { display: block; } div { display: block; }
             #rel { position: relative; width: 200px; height: 200px; }
             #abs { position: absolute; top: 10px; left: 20px; width: 50px; height: 50px; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let rel = tree.children(body)[0];
        let abs = tree.children(rel)[0];
        assert_eq!(layout.box_model(abs).relative_top, 10);
        assert_eq!(layout.box_model(abs).relative_left, 20);
    }

    #[test]
    fn absolute_block_right_and_bottom_override_top_and_left() {
        let (doc, tree) = build(
            r#"<html><body><div id="rel"><div id="abs"></div></div></body></html>"#,
            "body { display: block; } div { display: block; }
             #rel { position: relative; width: 200px; height: 200px; }
             #abs { position: absolute; bottom: 10px; right: 20px; width: 50px; height: 30px; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let rel = tree.children(body)[0];
        let abs = tree.children(rel)[0];
        // parent content box is 200x200 (border-box width/height, no border/padding).
        assert_eq!(layout.box_model(abs).relative_top, 200 - 30 - 10);
        assert_eq!(layout.box_model(abs).relative_left, 200 - 50 - 20);
    }

    #[test]
    fn word_wider_than_available_width_still_gets_one_line() {
        let (doc, tree) = build(
            "<html><body><p id=\"p\">hi</p></body></html>",
            "body { display: block; } p { display: block; width: 1px; }",
        );
        let layout = compute_layout(&doc, &tree, &MetricsFont, 800, 600).unwrap();
        let root = tree.root();
        let body = tree.children(root)[0];
        let p = tree.children(body)[0];
        let lines = layout.lines(p).unwrap();
        assert_eq!(lines.num_lines(), 1);
    }
}
