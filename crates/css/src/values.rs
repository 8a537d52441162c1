//! Value grammars for the recognised properties.

/// A length-bearing value: `Npx`, `N%`, or (where the grammar allows it)
/// `auto`. Percentages are kept symbolic here — resolving one against a
/// containing-block basis is the layout solver's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    Auto,
    Px(i32),
    Percent(i32),
}

impl Length {
    /// Grammar: `N px` or `N %` or `auto` (width, height, top/right/bottom/left).
    pub fn parse_allow_auto(value: &str) -> Option<Length> {
        if value == "auto" {
            return Some(Length::Auto);
        }
        Self::parse_no_auto(value)
    }

    /// Grammar: `N px` or `N %` only (margin/padding/border-*-width).
    pub fn parse_no_auto(value: &str) -> Option<Length> {
        if let Some(digits) = value.strip_suffix("px") {
            return digits.parse::<i32>().ok().filter(|n| *n >= 0).map(Length::Px);
        }
        if let Some(digits) = value.strip_suffix('%') {
            return digits
                .parse::<i32>()
                .ok()
                .filter(|n| *n >= 0)
                .map(Length::Percent);
        }
        None
    }
}

/// A resolved `#rrggbb` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn parse(value: &str) -> Option<Rgb> {
        let hex = value.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb(r, g, b))
    }
}

/// `color` / `border-color`: a resolved hex color, or `inherit` pending
/// resolution against the parent's computed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorValue {
    Rgb(Rgb),
    Inherit,
}

impl ColorValue {
    pub fn parse(value: &str) -> Option<ColorValue> {
        if value == "inherit" {
            return Some(ColorValue::Inherit);
        }
        Rgb::parse(value).map(ColorValue::Rgb)
    }
}

/// `background-color`: a resolved hex color, transparent, or `inherit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundColorValue {
    Rgb(Rgb),
    Transparent,
    Inherit,
}

impl BackgroundColorValue {
    pub fn parse(value: &str) -> Option<BackgroundColorValue> {
        match value {
            "transparent" => Some(BackgroundColorValue::Transparent),
            "inherit" => Some(BackgroundColorValue::Inherit),
            _ => Rgb::parse(value).map(BackgroundColorValue::Rgb),
        }
    }
}

/// A resolved background color, once `inherit` has been chased to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    Rgb(Rgb),
    Transparent,
}

/// `font-size`: a resolved pixel size, or `inherit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSizeValue {
    Px(i32),
    Inherit,
}

impl FontSizeValue {
    pub fn parse(value: &str) -> Option<FontSizeValue> {
        if value == "inherit" {
            return Some(FontSizeValue::Inherit);
        }
        let digits = value.strip_suffix("px")?;
        digits.parse::<i32>().ok().filter(|n| *n >= 0).map(FontSizeValue::Px)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeightValue {
    Resolved(FontWeight),
    Inherit,
}

impl FontWeightValue {
    pub fn parse(value: &str) -> Option<FontWeightValue> {
        match value {
            "normal" => Some(FontWeightValue::Resolved(FontWeight::Normal)),
            "bold" => Some(FontWeightValue::Resolved(FontWeight::Bold)),
            "inherit" => Some(FontWeightValue::Inherit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyleValue {
    Resolved(FontStyle),
    Inherit,
}

impl FontStyleValue {
    pub fn parse(value: &str) -> Option<FontStyleValue> {
        match value {
            "normal" => Some(FontStyleValue::Resolved(FontStyle::Normal)),
            "italic" => Some(FontStyleValue::Resolved(FontStyle::Italic)),
            "inherit" => Some(FontStyleValue::Inherit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    None,
}

impl Display {
    pub fn parse(value: &str) -> Option<Display> {
        match value {
            "block" => Some(Display::Block),
            "inline" => Some(Display::Inline),
            "none" => Some(Display::None),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn parse(value: &str) -> Option<Position> {
        match value {
            "static" => Some(Position::Static),
            "relative" => Some(Position::Relative),
            "absolute" => Some(Position::Absolute),
            "fixed" => Some(Position::Fixed),
            _ => None,
        }
    }

    pub fn is_positioned(self) -> bool {
        !matches!(self, Position::Static)
    }
}
