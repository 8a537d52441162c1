//! Typed view over a resolved element's style declarations.
//!
//! By the time [`crate::cascade::attach_styles`] has run, every element's
//! `html::Document::style` slice holds fully-resolved, grammar-valid string
//! values with no `inherit` left in it. `ComputedStyle` is a thin borrowing
//! wrapper that parses those strings into the typed values from
//! [`crate::values`] on demand rather than storing them pre-parsed.

use html::{Document, NodeId};

use crate::values::{Display, FontStyle, FontWeight, Length, Position, Rgb};

/// Borrows one element's resolved style out of the document.
pub struct ComputedStyle<'a> {
    declarations: &'a [(String, String)],
}

impl<'a> ComputedStyle<'a> {
    pub fn of(doc: &'a Document, id: NodeId) -> Self {
        ComputedStyle {
            declarations: doc.style(id),
        }
    }

    fn raw(&self, property: &str) -> &'a str {
        self.declarations
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    fn length_allow_auto(&self, property: &str) -> Length {
        Length::parse_allow_auto(self.raw(property)).unwrap_or(Length::Auto)
    }

    fn length_no_auto(&self, property: &str) -> Length {
        Length::parse_no_auto(self.raw(property)).unwrap_or(Length::Px(0))
    }

    pub fn width(&self) -> Length {
        self.length_allow_auto("width")
    }

    pub fn height(&self) -> Length {
        self.length_allow_auto("height")
    }

    pub fn left(&self) -> Length {
        self.length_allow_auto("left")
    }

    pub fn right(&self) -> Length {
        self.length_allow_auto("right")
    }

    pub fn top(&self) -> Length {
        self.length_allow_auto("top")
    }

    pub fn bottom(&self) -> Length {
        self.length_allow_auto("bottom")
    }

    pub fn margin_left(&self) -> Length {
        self.length_no_auto("margin-left")
    }

    pub fn margin_right(&self) -> Length {
        self.length_no_auto("margin-right")
    }

    pub fn margin_top(&self) -> Length {
        self.length_no_auto("margin-top")
    }

    pub fn margin_bottom(&self) -> Length {
        self.length_no_auto("margin-bottom")
    }

    pub fn padding_left(&self) -> Length {
        self.length_no_auto("padding-left")
    }

    pub fn padding_right(&self) -> Length {
        self.length_no_auto("padding-right")
    }

    pub fn padding_top(&self) -> Length {
        self.length_no_auto("padding-top")
    }

    pub fn padding_bottom(&self) -> Length {
        self.length_no_auto("padding-bottom")
    }

    pub fn border_left(&self) -> Length {
        self.length_no_auto("border-left")
    }

    pub fn border_right(&self) -> Length {
        self.length_no_auto("border-right")
    }

    pub fn border_top(&self) -> Length {
        self.length_no_auto("border-top")
    }

    pub fn border_bottom(&self) -> Length {
        self.length_no_auto("border-bottom")
    }

    pub fn display(&self) -> Display {
        Display::parse(self.raw("display")).unwrap_or(Display::None)
    }

    pub fn position(&self) -> Position {
        Position::parse(self.raw("position")).unwrap_or(Position::Static)
    }

    /// `color`/`border-color`/`background-color` are `inherit`-free by the
    /// time attachment finishes, so a resolved hex value always parses.
    pub fn color(&self) -> Rgb {
        Rgb::parse(self.raw("color")).unwrap_or(Rgb::BLACK)
    }

    pub fn border_color(&self) -> Rgb {
        Rgb::parse(self.raw("border-color")).unwrap_or(Rgb::BLACK)
    }

    /// `None` means `transparent`.
    pub fn background_color(&self) -> Option<Rgb> {
        Rgb::parse(self.raw("background-color"))
    }

    pub fn font_size(&self) -> i32 {
        self.raw("font-size")
            .strip_suffix("px")
            .and_then(|n| n.parse().ok())
            .unwrap_or(16)
    }

    pub fn font_weight(&self) -> FontWeight {
        match self.raw("font-weight") {
            "bold" => FontWeight::Bold,
            _ => FontWeight::Normal,
        }
    }

    pub fn font_style(&self) -> FontStyle {
        match self.raw("font-style") {
            "italic" => FontStyle::Italic,
            _ => FontStyle::Normal,
        }
    }
}
