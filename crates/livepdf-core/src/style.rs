//! Style configuration store.
//!
//! Holds the render parameters sent alongside the document content. Every
//! update is validated against its field's domain; a rejected value leaves
//! the stored configuration untouched, so a [`StyleSettings`] can never be
//! observed in an invalid or partially updated state.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StyleError;

pub const FONT_SIZE_RANGE: RangeInclusive<u8> = 8..=24;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f64> = 1.0..=3.0;
pub const MARGIN_RANGE: RangeInclusive<u16> = 0..=144;

/// Fonts the rendering service knows how to map to a CSS font stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontFamily {
    #[default]
    Inter,
    Arial,
    Helvetica,
    #[serde(rename = "Times-Roman")]
    TimesRoman,
    Courier,
    Georgia,
    Verdana,
}

impl FontFamily {
    pub const ALL: [FontFamily; 7] = [
        FontFamily::Inter,
        FontFamily::Arial,
        FontFamily::Helvetica,
        FontFamily::TimesRoman,
        FontFamily::Courier,
        FontFamily::Georgia,
        FontFamily::Verdana,
    ];

    /// Name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter",
            FontFamily::Arial => "Arial",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesRoman => "Times-Roman",
            FontFamily::Courier => "Courier",
            FontFamily::Georgia => "Georgia",
            FontFamily::Verdana => "Verdana",
        }
    }

    /// Look up a catalog entry by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color in lowercase `#rrggbb` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse `#rrggbb` or `#rgb` (case-insensitive), normalizing to
    /// lowercase `#rrggbb`.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let normalized = match digits.len() {
            6 => digits.to_ascii_lowercase(),
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase(),
            _ => return None,
        };
        Some(Self(format!("#{}", normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn black() -> Self {
        Self("#000000".to_string())
    }

    fn white() -> Self {
        Self("#ffffff".to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render parameters. Serializes to the flat field set the rendering
/// service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleSettings {
    pub font_family: FontFamily,
    pub font_size: u8,
    pub line_height: f64,
    pub margin_top: u16,
    pub margin_bottom: u16,
    pub margin_left: u16,
    pub margin_right: u16,
    pub text_color: HexColor,
    pub background_color: HexColor,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Inter,
            font_size: 12,
            line_height: 1.6,
            margin_top: 72,
            margin_bottom: 72,
            margin_left: 72,
            margin_right: 72,
            text_color: HexColor::black(),
            background_color: HexColor::white(),
        }
    }
}

/// Addressable fields of [`StyleSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleField {
    FontFamily,
    FontSize,
    LineHeight,
    MarginTop,
    MarginBottom,
    MarginLeft,
    MarginRight,
    TextColor,
    BackgroundColor,
}

impl StyleField {
    pub const ALL: [StyleField; 9] = [
        StyleField::FontFamily,
        StyleField::FontSize,
        StyleField::LineHeight,
        StyleField::MarginTop,
        StyleField::MarginBottom,
        StyleField::MarginLeft,
        StyleField::MarginRight,
        StyleField::TextColor,
        StyleField::BackgroundColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleField::FontFamily => "font_family",
            StyleField::FontSize => "font_size",
            StyleField::LineHeight => "line_height",
            StyleField::MarginTop => "margin_top",
            StyleField::MarginBottom => "margin_bottom",
            StyleField::MarginLeft => "margin_left",
            StyleField::MarginRight => "margin_right",
            StyleField::TextColor => "text_color",
            StyleField::BackgroundColor => "background_color",
        }
    }
}

impl fmt::Display for StyleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleField {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| StyleError::UnknownField(name.to_string()))
    }
}

/// Split a `field=value` assignment as given on a command line.
pub fn parse_assignment(raw: &str) -> Result<(StyleField, String), StyleError> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| StyleError::MalformedAssignment(raw.to_string()))?;
    Ok((field.parse()?, value.to_string()))
}

fn parse_in_range<T>(raw: &str, range: &RangeInclusive<T>) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    raw.trim().parse::<T>().ok().filter(|v| range.contains(v))
}

/// Owns the current [`StyleSettings`] and applies validated updates.
#[derive(Debug, Clone, Default)]
pub struct StyleStore {
    current: StyleSettings,
}

impl StyleStore {
    pub fn new(settings: StyleSettings) -> Self {
        Self { current: settings }
    }

    pub fn current(&self) -> &StyleSettings {
        &self.current
    }

    /// Apply `raw` to `field`, returning the resulting settings.
    ///
    /// Values outside the field's domain are dropped and the previous value
    /// is kept. Other fields are never touched.
    pub fn update(&mut self, field: StyleField, raw: &str) -> StyleSettings {
        self.try_update(field, raw);
        self.current.clone()
    }

    /// Like [`update`](Self::update), but reports whether `raw` was accepted.
    pub fn try_update(&mut self, field: StyleField, raw: &str) -> bool {
        let s = &mut self.current;
        let accepted = match field {
            StyleField::FontFamily => FontFamily::from_name(raw.trim())
                .map(|v| s.font_family = v)
                .is_some(),
            StyleField::FontSize => parse_in_range(raw, &FONT_SIZE_RANGE)
                .map(|v| s.font_size = v)
                .is_some(),
            StyleField::LineHeight => parse_in_range(raw, &LINE_HEIGHT_RANGE)
                .map(|v| s.line_height = v)
                .is_some(),
            StyleField::MarginTop => parse_in_range(raw, &MARGIN_RANGE)
                .map(|v| s.margin_top = v)
                .is_some(),
            StyleField::MarginBottom => parse_in_range(raw, &MARGIN_RANGE)
                .map(|v| s.margin_bottom = v)
                .is_some(),
            StyleField::MarginLeft => parse_in_range(raw, &MARGIN_RANGE)
                .map(|v| s.margin_left = v)
                .is_some(),
            StyleField::MarginRight => parse_in_range(raw, &MARGIN_RANGE)
                .map(|v| s.margin_right = v)
                .is_some(),
            StyleField::TextColor => HexColor::parse(raw)
                .map(|v| s.text_color = v)
                .is_some(),
            StyleField::BackgroundColor => HexColor::parse(raw)
                .map(|v| s.background_color = v)
                .is_some(),
        };

        if !accepted {
            tracing::debug!(field = %field, value = raw, "Rejected style value, keeping previous");
        }
        accepted
    }
}
