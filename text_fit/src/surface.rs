// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::hyphenate::SOFT_HYPHEN;
use crate::{Color, FontSpec, Point, Rect};

/// One line of a block, ready to be drawn.
#[derive(Clone, Debug)]
pub struct DrawLine<'a> {
    /// The shaped text of the line. May contain soft hyphens.
    pub text: &'a str,
    /// Byte range of the line in the block's source text.
    pub text_range: Range<usize>,
    /// The line's rect, relative to the block's origin.
    pub rect: Rect,
    /// Font family and unscaled size.
    pub font: &'a FontSpec,
    /// Font size after scaling.
    pub font_size: f64,
    /// Text color.
    pub color: Color,
    /// Scaled extra advance after every character.
    pub kerning: f64,
    /// Whether to draw an underline.
    pub underlined: bool,
    /// The text was cut off after this line and an ellipsis should follow it.
    pub ellipsized: bool,
    /// The line breaks at a soft hyphen, which should be drawn as a hyphen.
    pub hyphenated: bool,
}

impl DrawLine<'_> {
    /// The characters to display: soft hyphens removed, then a hyphen or ellipsis appended.
    pub fn visible_text(&self) -> String {
        let mut visible = self
            .text
            .chars()
            .filter(|&c| c != SOFT_HYPHEN)
            .collect::<String>();
        if self.ellipsized {
            visible.truncate(visible.trim_end().len());
            visible.push('\u{2026}');
        } else if self.hyphenated {
            visible.push('-');
        }
        visible
    }
}

/// Something lines of text can be drawn onto.
pub trait Surface {
    /// Draw `line` with its rect offset by `origin`.
    fn draw_line(&mut self, line: &DrawLine<'_>, origin: Point);

    /// Restrict further drawing to `clip`, or lift the restriction with `None`.
    fn set_clip(&mut self, clip: Option<Rect>) {
        let _ = clip;
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn draw_line(&mut self, line: &DrawLine<'_>, origin: Point) {
        (**self).draw_line(line, origin);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        (**self).set_clip(clip);
    }
}

/// A line captured by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedLine {
    /// The visible text of the line.
    pub text: String,
    /// Where the line was drawn on the surface.
    pub rect: Rect,
    /// Scaled font size.
    pub font_size: f64,
    /// The clip in effect while drawing.
    pub clip: Option<Rect>,
}

/// A surface that remembers what was drawn on it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    /// Every line drawn, in order.
    pub lines: Vec<RecordedLine>,
    clip: Option<Rect>,
}

impl RecordingSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything drawn so far.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.clip = None;
    }
}

impl Surface for RecordingSurface {
    fn draw_line(&mut self, line: &DrawLine<'_>, origin: Point) {
        self.lines.push(RecordedLine {
            text: line.visible_text(),
            rect: line.rect + origin.to_vec2(),
            font_size: line.font_size,
            clip: self.clip,
        });
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }
}
