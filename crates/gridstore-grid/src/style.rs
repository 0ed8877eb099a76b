//! Range styles and borders.
//!
//! Every attribute of a [`RangeStyle`] is guarded by its own [`StyleFlags`]
//! bit, so "unset" stays distinguishable from "set to the default value". That
//! is what makes the Cell → Row → Column → Root cascade work: a layer only
//! speaks for the attributes it flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Presence flags for [`RangeStyle`] attributes.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct StyleFlags: u32 {
        const BACK_COLOR = 1 << 0;
        const TEXT_COLOR = 1 << 1;
        const FONT_NAME = 1 << 2;
        const FONT_SIZE = 1 << 3;
        const BOLD = 1 << 4;
        const ITALIC = 1 << 5;
        const UNDERLINE = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
        const HORIZONTAL_ALIGN = 1 << 8;
        const VERTICAL_ALIGN = 1 << 9;
        const TEXT_WRAP = 1 << 10;
        const INDENT = 1 << 11;
        const ROTATION = 1 << 12;

        const FONT = Self::FONT_NAME.bits()
            | Self::FONT_SIZE.bits()
            | Self::BOLD.bits()
            | Self::ITALIC.bits()
            | Self::UNDERLINE.bits()
            | Self::STRIKETHROUGH.bits();
        const ALIGNMENT = Self::HORIZONTAL_ALIGN.bits() | Self::VERTICAL_ALIGN.bits();
    }
}

/// An ARGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub argb: u32,
}

impl Color {
    pub const fn new_argb(argb: u32) -> Self {
        Self { argb }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            argb: 0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32,
        }
    }

    pub const fn black() -> Self {
        Self { argb: 0xFF00_0000 }
    }

    pub const fn white() -> Self {
        Self { argb: 0xFFFF_FFFF }
    }

    pub const fn transparent() -> Self {
        Self { argb: 0 }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::new_argb(0xFF00_0000 | value)),
            8 => Some(Self::new_argb(value)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.argb)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Default font size in 1/100 points.
pub const DEFAULT_FONT_SIZE_100PT: u16 = 1000;

/// A flag-gated set of style attributes.
///
/// Values of unflagged attributes are always kept at their defaults, so two
/// styles with the same flags and the same flagged values compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct RangeStyle {
    pub flags: StyleFlags,
    pub back_color: Option<Color>,
    pub text_color: Option<Color>,
    pub font_name: Option<String>,
    /// Font size in 1/100 points (e.g. 1100 = 11pt).
    pub font_size_100pt: Option<u16>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub text_wrap: bool,
    pub indent: u16,
    /// Text rotation in degrees, `-90..=90`.
    pub rotation: i16,
}

macro_rules! style_setter {
    ($name:ident, $field:ident, $ty:ty, $flag:ident) => {
        #[must_use]
        pub fn $name(mut self, value: $ty) -> Self {
            self.$field = value;
            self.flags |= StyleFlags::$flag;
            self
        }
    };
}

impl RangeStyle {
    /// A style with no attributes set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The worksheet root style: every attribute flagged, at its default.
    pub fn root() -> Self {
        Self {
            flags: StyleFlags::all(),
            back_color: None,
            text_color: Some(Color::black()),
            font_name: Some("Calibri".to_string()),
            font_size_100pt: Some(DEFAULT_FONT_SIZE_100PT),
            ..Self::default()
        }
    }

    style_setter!(with_back_color, back_color, Option<Color>, BACK_COLOR);
    style_setter!(with_text_color, text_color, Option<Color>, TEXT_COLOR);
    style_setter!(with_font_name, font_name, Option<String>, FONT_NAME);
    style_setter!(with_font_size, font_size_100pt, Option<u16>, FONT_SIZE);
    style_setter!(with_bold, bold, bool, BOLD);
    style_setter!(with_italic, italic, bool, ITALIC);
    style_setter!(with_underline, underline, bool, UNDERLINE);
    style_setter!(with_strikethrough, strikethrough, bool, STRIKETHROUGH);
    style_setter!(with_horizontal_align, horizontal_align, HorizontalAlign, HORIZONTAL_ALIGN);
    style_setter!(with_vertical_align, vertical_align, VerticalAlign, VERTICAL_ALIGN);
    style_setter!(with_text_wrap, text_wrap, bool, TEXT_WRAP);
    style_setter!(with_indent, indent, u16, INDENT);
    style_setter!(with_rotation, rotation, i16, ROTATION);

    pub fn has(&self, flag: StyleFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Copy every attribute `src` flags within `mask`, overwriting ours.
    pub fn copy_from(&mut self, src: &RangeStyle, mask: StyleFlags) {
        let mask = mask & src.flags;
        for flag in mask.iter() {
            self.copy_attr(src, flag);
        }
        self.flags |= mask;
    }

    /// Overlay all attributes `src` flags.
    pub fn merge_from(&mut self, src: &RangeStyle) {
        self.copy_from(src, StyleFlags::all());
    }

    /// Take attributes from `layer` that we do not already have.
    pub fn fill_missing_from(&mut self, layer: &RangeStyle) {
        let missing = layer.flags - self.flags;
        self.copy_from(layer, missing);
    }

    /// Unset the attributes in `mask`, resetting their values.
    pub fn remove(&mut self, mask: StyleFlags) {
        let blank = RangeStyle::default();
        for flag in (mask & self.flags).iter() {
            self.copy_attr(&blank, flag);
        }
        self.flags -= mask;
    }

    /// Only the attributes in `mask`.
    pub fn project(&self, mask: StyleFlags) -> RangeStyle {
        let mut out = RangeStyle::new();
        out.copy_from(self, mask);
        out
    }

    fn copy_attr(&mut self, src: &RangeStyle, flag: StyleFlags) {
        match flag {
            StyleFlags::BACK_COLOR => self.back_color = src.back_color,
            StyleFlags::TEXT_COLOR => self.text_color = src.text_color,
            StyleFlags::FONT_NAME => self.font_name.clone_from(&src.font_name),
            StyleFlags::FONT_SIZE => self.font_size_100pt = src.font_size_100pt,
            StyleFlags::BOLD => self.bold = src.bold,
            StyleFlags::ITALIC => self.italic = src.italic,
            StyleFlags::UNDERLINE => self.underline = src.underline,
            StyleFlags::STRIKETHROUGH => self.strikethrough = src.strikethrough,
            StyleFlags::HORIZONTAL_ALIGN => self.horizontal_align = src.horizontal_align,
            StyleFlags::VERTICAL_ALIGN => self.vertical_align = src.vertical_align,
            StyleFlags::TEXT_WRAP => self.text_wrap = src.text_wrap,
            StyleFlags::INDENT => self.indent = src.indent,
            StyleFlags::ROTATION => self.rotation = src.rotation,
            _ => {}
        }
    }
}

/// Merge `style` into an optional explicit style slot, creating it on demand.
pub fn apply_to_slot(slot: &mut Option<RangeStyle>, style: &RangeStyle) {
    slot.get_or_insert_with(RangeStyle::new).merge_from(style);
}

/// Remove `mask` from an optional explicit style slot, dropping it when empty.
/// Returns whether anything changed.
pub fn remove_from_slot(slot: &mut Option<RangeStyle>, mask: StyleFlags) -> bool {
    let Some(style) = slot else {
        return false;
    };
    if !style.flags.intersects(mask) {
        return false;
    }
    style.remove(mask);
    if style.is_empty() {
        *slot = None;
    }
    true
}

/// Resolve a cascade of optional layers, highest priority first.
///
/// The last layer is expected to be the root style, which flags everything.
pub fn cascade(layers: &[Option<&RangeStyle>]) -> RangeStyle {
    let mut out = RangeStyle::new();
    for layer in layers.iter().flatten() {
        out.fill_missing_from(layer);
        if out.flags.is_all() {
            break;
        }
    }
    out
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderLine {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    Thick,
}

/// One side of a cell border.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderSide {
    pub line: BorderLine,
    pub color: Color,
}

impl BorderSide {
    pub const fn new(line: BorderLine, color: Color) -> Self {
        Self { line, color }
    }
}

impl Default for BorderSide {
    fn default() -> Self {
        Self::new(BorderLine::Solid, Color::black())
    }
}

/// Borders stored on a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBorders {
    pub top: Option<BorderSide>,
    pub bottom: Option<BorderSide>,
    pub left: Option<BorderSide>,
    pub right: Option<BorderSide>,
}

impl CellBorders {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

bitflags! {
    /// Which edges of a range a border operation addresses.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BorderPositions: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const INSIDE_HORIZONTAL = 1 << 4;
        const INSIDE_VERTICAL = 1 << 5;

        const OUTLINE = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
        const INSIDE = Self::INSIDE_HORIZONTAL.bits() | Self::INSIDE_VERTICAL.bits();
    }
}
