// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed style configuration for a [`TextBlock`](crate::TextBlock).

use alloc::string::String;

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "only needed when `std` is disabled")]
use core_maths::CoreFloat;

use crate::{Error, Insets};

/// Default decrement applied to the scale factor on each fitting step.
pub const DEFAULT_SCALE_FACTOR_STEP: f64 = 0.05;

/// The line height used when none is set: the font size times 1.2, rounded.
pub fn initial_line_height(font_size: f64) -> f64 {
    (font_size * 1.2).round()
}

/// A font family and its size at scale factor 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name or CSS-style family list, passed through to the shaper.
    pub family: String,
    /// Point size before scaling.
    pub size: f64,
}

impl FontSpec {
    /// Create a new font description.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("sans-serif", 17.0)
    }
}

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgba8(0, 0, 0, 255);

    /// Create a color from its components.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Horizontal alignment of lines within the available width.
///
/// Lines are laid out left-to-right, so `Start` is the left edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Align lines to the left edge.
    #[default]
    Start,
    /// Align lines to the right edge.
    End,
    /// Center each line.
    Center,
    /// Stretch every line except the last to the full width.
    Justify,
}

bitflags::bitflags! {
    /// Which kinds of spans a [`Detector`](crate::detect::Detector) should look for.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DetectorKinds: u8 {
        /// Telephone numbers.
        const PHONE_NUMBER = 0b0000_0001;
        /// Web and mail links written in plain text.
        const LINK = 0b0000_0010;
        /// Postal addresses.
        const ADDRESS = 0b0000_0100;
        /// Dates and times.
        const CALENDAR_EVENT = 0b0000_1000;
    }
}

/// The complete set of options that shape and decorate a block.
///
/// Every recognized option is a field; there is no open-ended attribute map. Use
/// [`StyleProperty`] to change one option at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family and unscaled size.
    pub font: FontSpec,
    /// Text color.
    pub color: Color,
    /// Extra advance after every character, scaled together with the font.
    pub kerning: f64,
    /// Distance between baselines at scale 1.0. `None` uses [`initial_line_height`].
    pub line_height: Option<f64>,
    /// Horizontal alignment of lines.
    pub alignment: Alignment,
    /// Whether a line is drawn under the text.
    pub underlined: bool,
    /// Maximum number of lines, 0 for no maximum.
    pub maximum_number_of_lines: usize,
    /// Extra spacing around the text inside the block's rect.
    pub text_insets: Insets,
    /// Extra spacing around clipping rects. Positive values keep text further away.
    pub clipping_rect_insets: Insets,
    /// The smallest scale factor the fitting search may use, in `(0, 1]`.
    ///
    /// At 1.0, the default, the text is never scaled.
    pub minimum_scale_factor: f64,
    /// Decrement applied to the scale factor on each fitting step.
    pub scale_factor_step: f64,
    /// Whether the last visible line shows an ellipsis when text is cut off.
    pub breaks_last_line: bool,
    /// Whether soft hyphens are inserted between syllables before shaping.
    pub hyphenated: bool,
    /// Makes the last line shorter by this amount, when a maximum line count is set.
    pub last_line_inset: f64,
    /// Prefer a smaller scale over splitting a word across lines.
    ///
    /// Splits that leave fewer than five characters on the next line are tolerated. When every
    /// fitting scale splits a word, the largest of them is used.
    pub prefers_non_wrapped_words: bool,
    /// Which kinds of spans to detect in the text.
    pub data_detectors: DetectorKinds,
}

impl TextStyle {
    /// Create a style with the given font and default values for everything else.
    pub fn new(font: FontSpec) -> Self {
        Self {
            font,
            ..Self::default()
        }
    }

    /// Build a style by applying `properties` in order on top of the defaults.
    pub fn from_properties(properties: impl IntoIterator<Item = StyleProperty>) -> Self {
        let mut style = Self::default();
        for property in properties {
            style.apply(property);
        }
        style
    }

    /// The line height at scale 1.0.
    pub fn line_height(&self) -> f64 {
        self.line_height
            .unwrap_or_else(|| initial_line_height(self.font.size))
    }

    /// Set one option.
    pub fn apply(&mut self, property: StyleProperty) {
        match property {
            StyleProperty::FontFamily(family) => self.font.family = family,
            StyleProperty::FontSize(size) => self.font.size = size,
            StyleProperty::Color(color) => self.color = color,
            StyleProperty::Kerning(kerning) => self.kerning = kerning,
            StyleProperty::LineHeight(line_height) => self.line_height = Some(line_height),
            StyleProperty::Alignment(alignment) => self.alignment = alignment,
            StyleProperty::Underlined(underlined) => self.underlined = underlined,
            StyleProperty::MaximumNumberOfLines(lines) => self.maximum_number_of_lines = lines,
            StyleProperty::TextInsets(insets) => self.text_insets = insets,
            StyleProperty::ClippingRectInsets(insets) => self.clipping_rect_insets = insets,
            StyleProperty::MinimumScaleFactor(factor) => self.minimum_scale_factor = factor,
            StyleProperty::ScaleFactorStep(step) => self.scale_factor_step = step,
            StyleProperty::BreaksLastLine(breaks) => self.breaks_last_line = breaks,
            StyleProperty::Hyphenated(hyphenated) => self.hyphenated = hyphenated,
            StyleProperty::LastLineInset(inset) => self.last_line_inset = inset,
            StyleProperty::PrefersNonWrappedWords(prefers) => {
                self.prefers_non_wrapped_words = prefers;
            }
            StyleProperty::DataDetectors(kinds) => self.data_detectors = kinds,
        }
    }

    /// Check that every numeric option lies in its domain.
    pub fn validate(&self) -> Result<(), Error> {
        fn check(property: &'static str, value: f64, ok: bool) -> Result<(), Error> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(Error::invalid_style(property, value))
            }
        }

        check("font_size", self.font.size, self.font.size > 0.0)?;
        if let Some(line_height) = self.line_height {
            check("line_height", line_height, line_height > 0.0)?;
        }
        check("kerning", self.kerning, true)?;
        check(
            "minimum_scale_factor",
            self.minimum_scale_factor,
            self.minimum_scale_factor > 0.0 && self.minimum_scale_factor <= 1.0,
        )?;
        check(
            "scale_factor_step",
            self.scale_factor_step,
            self.scale_factor_step > 0.0,
        )?;
        check(
            "last_line_inset",
            self.last_line_inset,
            self.last_line_inset >= 0.0,
        )?;
        Ok(())
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            color: Color::BLACK,
            kerning: 0.0,
            line_height: None,
            alignment: Alignment::Start,
            underlined: false,
            maximum_number_of_lines: 0,
            text_insets: Insets::ZERO,
            clipping_rect_insets: Insets::ZERO,
            minimum_scale_factor: 1.0,
            scale_factor_step: DEFAULT_SCALE_FACTOR_STEP,
            breaks_last_line: false,
            hyphenated: false,
            last_line_inset: 0.0,
            prefers_non_wrapped_words: false,
            data_detectors: DetectorKinds::empty(),
        }
    }
}

/// A single style option, for changing a [`TextStyle`] one field at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleProperty {
    /// Font family name.
    FontFamily(String),
    /// Font size at scale 1.0.
    FontSize(f64),
    /// Text color.
    Color(Color),
    /// Extra advance after every character.
    Kerning(f64),
    /// Line height at scale 1.0.
    LineHeight(f64),
    /// Horizontal alignment.
    Alignment(Alignment),
    /// Underline decoration.
    Underlined(bool),
    /// Maximum number of lines, 0 for none.
    MaximumNumberOfLines(usize),
    /// Spacing around the text.
    TextInsets(Insets),
    /// Spacing around clipping rects.
    ClippingRectInsets(Insets),
    /// Smallest admissible scale factor.
    MinimumScaleFactor(f64),
    /// Scale factor decrement per fitting step.
    ScaleFactorStep(f64),
    /// Ellipsis on the last visible line.
    BreaksLastLine(bool),
    /// Soft hyphens between syllables.
    Hyphenated(bool),
    /// Shortening of the last line.
    LastLineInset(f64),
    /// Prefer scaling down over splitting words.
    PrefersNonWrappedWords(bool),
    /// Kinds of spans to detect.
    DataDetectors(DetectorKinds),
}
