//! Line breaking and the metrics-only font service, grounded in
//! `text_layout.py`.
//!
//! There is no real font rasterization here: `FontMetrics` is a
//! deterministic per-character advance-width model over a fixed ascending
//! table of supported pixel sizes, the same role `get_font`'s
//! closest-size snapping plays in the original.

use css::values::{FontStyle, FontWeight};
use html::Document;

use crate::render_tree::{RenderId, RenderKind, RenderTree};

/// Ascending table of font sizes the metrics service actually supports.
/// A request for any other size snaps to its nearest neighbour here.
pub const SUPPORTED_FONT_SIZES: [i32; 7] = [11, 13, 16, 19, 24, 32, 40];

pub fn snap_font_size(requested: i32) -> i32 {
    *SUPPORTED_FONT_SIZES
        .iter()
        .min_by_key(|size| (*size - requested).abs())
        .expect("SUPPORTED_FONT_SIZES is non-empty")
}

/// Measures text for layout purposes. Implementors don't need to rasterize
/// anything — only report the advance width and line height a given run of
/// text would occupy.
pub trait FontMetrics {
    /// Returns `(width, height)` in px for `word` set at `font_size` (already
    /// snapped), `weight`, and `style`.
    fn measure(&self, word: &str, font_size: i32, weight: FontWeight, style: FontStyle) -> (i32, i32);
}

/// The crate's built-in metrics service: a fixed-advance model keyed only
/// off the snapped font size and weight (italics don't change advance width
/// in this model, matching a monospace approximation).
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsFont;

impl FontMetrics for MetricsFont {
    fn measure(&self, word: &str, font_size: i32, weight: FontWeight, _style: FontStyle) -> (i32, i32) {
        let size = snap_font_size(font_size);
        let mut advance = ((size as f32) * 0.6).round() as i32;
        if weight == FontWeight::Bold {
            advance = ((advance as f32) * 1.15).round() as i32;
        }
        let width = advance * word.chars().count() as i32;
        let height = ((size as f32) * 1.2).round() as i32;
        (width, height)
    }
}

/// Splits `text` into words the way `construct_render_lines` expects: a
/// split point falls immediately after every whitespace character, so each
/// word (but the last) carries its trailing whitespace. Upstream text is
/// already whitespace-normalized, so runs of whitespace never reach here —
/// this only has to handle the single-separator case.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if ch.is_whitespace() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[derive(Clone, Debug)]
pub struct WordObject {
    pub word: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, Default)]
pub struct LineObject {
    pub words: Vec<WordObject>,
}

impl LineObject {
    pub fn width(&self) -> i32 {
        self.words.iter().map(|w| w.width).sum()
    }

    pub fn height(&self) -> i32 {
        self.words.iter().map(|w| w.height).max().unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderLines {
    pub lines: Vec<LineObject>,
}

impl RenderLines {
    pub fn width(&self) -> i32 {
        self.lines.iter().map(|l| l.width()).max().unwrap_or(0)
    }

    pub fn height(&self) -> i32 {
        self.lines.iter().map(|l| l.height()).sum()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn num_words(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }
}

/// Collects every text descendant of `block`, in document order, stopping
/// at nested blocks (a block whose children are all inline/text owns its
/// own line-breaking pass).
fn collect_text_descendants(tree: &RenderTree, block: RenderId) -> Vec<RenderId> {
    let mut texts = Vec::new();
    let mut worklist: std::collections::VecDeque<RenderId> = std::collections::VecDeque::new();
    for &child in tree.children(block) {
        worklist.push_back(child);
    }
    // In-order traversal: process inline descendants depth-first before moving on.
    let mut stack: Vec<RenderId> = worklist.into_iter().rev().collect();
    while let Some(id) = stack.pop() {
        match tree.kind(id) {
            RenderKind::Text => texts.push(id),
            RenderKind::Inline => {
                for &child in tree.children(id).iter().rev() {
                    stack.push(child);
                }
            }
            RenderKind::Block => unreachable!("nested block during inline collection"),
        }
    }
    texts
}

fn word_objects_for_text(
    doc: &Document,
    tree: &RenderTree,
    metrics: &dyn FontMetrics,
    text_id: RenderId,
) -> Vec<WordObject> {
    let parent = tree.parent(text_id).expect("text render node always has a parent");
    let style = tree.style(doc, parent);
    let font_size = style.font_size();
    let weight = style.font_weight();
    let font_style = style.font_style();

    let text = doc
        .text(tree.dom_node(text_id))
        .expect("Text render node backs a text DOM node");

    split_words(text)
        .into_iter()
        .map(|word| {
            let (width, height) = metrics.measure(&word, font_size, weight, font_style);
            WordObject { word, width, height }
        })
        .collect()
}

/// Greedily packs words into lines: a word starts a new line only when it
/// wouldn't fit on the current one, and a single word wider than the
/// available width still gets its own line rather than being split.
fn pack_lines(words: Vec<WordObject>, available_width: i32) -> RenderLines {
    if words.is_empty() {
        return RenderLines::default();
    }
    let max_word_width = words.iter().map(|w| w.width).max().unwrap_or(0);
    let effective_width = available_width.max(max_word_width);

    let mut lines: Vec<LineObject> = Vec::new();
    let mut current = LineObject::default();
    for word in words {
        if !current.words.is_empty() && current.width() + word.width > effective_width {
            lines.push(std::mem::take(&mut current));
        }
        current.words.push(word);
    }
    if !current.words.is_empty() {
        lines.push(current);
    }
    RenderLines { lines }
}

/// Builds the `RenderLines` for a render block whose children are entirely
/// inline/text, used by the layout solver once it has the block's content
/// width available.
pub fn construct_render_lines(
    doc: &Document,
    tree: &RenderTree,
    metrics: &dyn FontMetrics,
    block: RenderId,
    available_width: i32,
) -> RenderLines {
    let words: Vec<WordObject> = collect_text_descendants(tree, block)
        .into_iter()
        .flat_map(|text_id| word_objects_for_text(doc, tree, metrics, text_id))
        .collect();
    pack_lines(words, available_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_font_size_picks_nearest_supported() {
        assert_eq!(snap_font_size(15), 16);
        assert_eq!(snap_font_size(12), 11);
        assert_eq!(snap_font_size(100), 40);
    }

    #[test]
    fn split_words_keeps_trailing_whitespace_with_word() {
        assert_eq!(split_words("Hello world"), vec!["Hello ", "world"]);
    }

    #[test]
    fn split_words_handles_no_trailing_space() {
        assert_eq!(split_words("one"), vec!["one"]);
    }

    #[test]
    fn pack_lines_never_splits_a_single_word() {
        let words = vec![WordObject { word: "wide".into(), width: 500, height: 20 }];
        let lines = pack_lines(words, 100);
        assert_eq!(lines.num_lines(), 1);
        assert_eq!(lines.lines[0].width(), 500);
    }

    #[test]
    fn pack_lines_wraps_when_width_exceeded() {
        let words = vec![
            WordObject { word: "aa ".into(), width: 30, height: 20 },
            WordObject { word: "bb ".into(), width: 30, height: 20 },
            WordObject { word: "cc".into(), width: 30, height: 20 },
        ];
        let lines = pack_lines(words, 50);
        assert_eq!(lines.num_lines(), 2);
    }

    #[test]
    fn metrics_font_is_deterministic() {
        let metrics = MetricsFont;
        let a = metrics.measure("hi", 16, FontWeight::Normal, FontStyle::Normal);
        let b = metrics.measure("hi", 16, FontWeight::Normal, FontStyle::Normal);
        assert_eq!(a, b);
        let bold = metrics.measure("hi", 16, FontWeight::Bold, FontStyle::Normal);
        assert!(bold.0 > a.0);
    }
}
