//! The box model, grounded in `box_model.py`'s `BoxModel`.
//!
//! All twelve margin/padding/border metrics and the content box are held as
//! non-negative pixel integers; `width`/`height` setters clamp the derived
//! content dimension at zero rather than going negative, matching the
//! original's `max(..., 0)` guards.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Box-model metrics for one render block.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxModel {
    pub content_width: i32,
    pub content_height: i32,

    pub margin_top: i32,
    pub margin_right: i32,
    pub margin_bottom: i32,
    pub margin_left: i32,

    pub padding_top: i32,
    pub padding_right: i32,
    pub padding_bottom: i32,
    pub padding_left: i32,

    pub border_top: i32,
    pub border_right: i32,
    pub border_bottom: i32,
    pub border_left: i32,

    /// Position relative to the parent's content box, resolved during
    /// layout. Absolute top-left within the viewport is derived by the
    /// reference renderer by walking the tree.
    pub relative_left: i32,
    pub relative_top: i32,
}

impl BoxModel {
    pub fn padding_width(&self) -> i32 {
        self.padding_left + self.padding_right
    }

    pub fn padding_height(&self) -> i32 {
        self.padding_top + self.padding_bottom
    }

    pub fn border_width(&self) -> i32 {
        self.border_left + self.border_right
    }

    pub fn border_height(&self) -> i32 {
        self.border_top + self.border_bottom
    }

    pub fn margin_width(&self) -> i32 {
        self.margin_left + self.margin_right
    }

    pub fn margin_height(&self) -> i32 {
        self.margin_top + self.margin_bottom
    }

    /// Border-box width: content + padding + border (border-box sizing is
    /// the only sizing model this crate supports).
    pub fn width(&self) -> i32 {
        self.border_width() + self.padding_width() + self.content_width
    }

    pub fn height(&self) -> i32 {
        self.border_height() + self.padding_height() + self.content_height
    }

    pub fn set_width(&mut self, width: i32) {
        self.content_width = (width - self.border_width() - self.padding_width()).max(0);
    }

    pub fn set_height(&mut self, height: i32) {
        self.content_height = (height - self.border_height() - self.padding_height()).max(0);
    }

    /// Border-box width plus margins: the space this box occupies among
    /// its siblings.
    pub fn box_width(&self) -> i32 {
        self.content_width + self.padding_width() + self.border_width() + self.margin_width()
    }

    /// Sets content width so the margin-inclusive box occupies exactly
    /// `box_width` — used only for the `width: auto` case, where the box
    /// is defined to fill its container including margins.
    pub fn set_box_width(&mut self, box_width: i32) {
        self.content_width =
            (box_width - self.padding_width() - self.border_width() - self.margin_width()).max(0);
    }

    pub fn box_height(&self) -> i32 {
        self.content_height + self.padding_height() + self.border_height() + self.margin_height()
    }

    /// The border box, positioned at `(left, top)` in whatever coordinate
    /// space the caller is working in (parent content box or viewport).
    pub fn border_rect(&self, left: i32, top: i32) -> Rect {
        Rect {
            left: left + self.margin_left,
            top: top + self.margin_top,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn padding_rect(&self, left: i32, top: i32) -> Rect {
        let border = self.border_rect(left, top);
        Rect {
            left: border.left + self.border_left,
            top: border.top + self.border_top,
            width: border.width - self.border_width(),
            height: border.height - self.border_height(),
        }
    }

    pub fn content_rect(&self, left: i32, top: i32) -> Rect {
        let padding = self.padding_rect(left, top);
        Rect {
            left: padding.left + self.padding_left,
            top: padding.top + self.padding_top,
            width: self.content_width,
            height: self.content_height,
        }
    }

    /// The box-box (including margins), the space this box reserves among
    /// its siblings when stacking vertically.
    pub fn box_rect(&self, left: i32, top: i32) -> Rect {
        Rect {
            left,
            top,
            width: self.box_width(),
            height: self.box_height(),
        }
    }
}
