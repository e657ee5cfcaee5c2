// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley shaping backend for [`text_fit`].
//!
//! [`ParleyShaper`] implements [`text_fit::Shaper`] by building a [`parley::Layout`] for every
//! attempted scale and breaking it line by line against the widths the block asks for.
//!
//! ## Scope
//!
//! Only the properties a [`text_fit::ShapeStyle`] carries are lowered: the font family list,
//! the font size, the line height and letter spacing. Alignment and clipping stay with the
//! block, so lines come back unaligned and starting at zero.
//!
//! ## Example
//!
//! ```no_run
//! use text_fit::{FontSpec, Rect, TextBlock, TextStyle};
//! use text_fit_parley::ParleyShaper;
//!
//! let mut shaper = ParleyShaper::new();
//! let mut block = TextBlock::new("Hello world", TextStyle::new(FontSpec::new("serif", 20.0)))
//!     .unwrap();
//! let bounds = block.compute_bounding_rect(&mut shaper, Rect::new(0.0, 0.0, 120.0, 40.0), None);
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("text_fit_parley requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use parley::layout::BreakReason as ParleyBreakReason;
use parley::style::{FontStack, LineHeight, OverflowWrap, StyleProperty};
use parley::{FontContext, Layout, LayoutContext};
use text_fit::{BreakReason, LineBox, LineConstraints, ShapeStyle, Shaper};

/// A [`Shaper`] backed by Parley.
///
/// The font and layout contexts are kept between calls so font lookups and shaping buffers are
/// reused across attempts.
pub struct ParleyShaper {
    font_cx: FontContext,
    layout_cx: LayoutContext<()>,
    layout: Layout<()>,
    quantize: bool,
}

impl fmt::Debug for ParleyShaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParleyShaper")
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl Default for ParleyShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyShaper {
    /// Create a shaper with a fresh font context.
    pub fn new() -> Self {
        Self::with_font_context(FontContext::new())
    }

    /// Create a shaper using fonts from `font_cx`.
    pub fn with_font_context(font_cx: FontContext) -> Self {
        Self {
            font_cx,
            layout_cx: LayoutContext::new(),
            layout: Layout::new(),
            quantize: true,
        }
    }

    /// Choose whether glyph positions are rounded to whole pixels.
    pub fn set_quantize(&mut self, quantize: bool) {
        self.quantize = quantize;
    }

    /// The font context, for registering fonts.
    pub fn font_context_mut(&mut self) -> &mut FontContext {
        &mut self.font_cx
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Parley lays out in f32, block geometry stays within its range."
    )]
    fn build(&mut self, text: &str, style: &ShapeStyle<'_>) {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, self.quantize);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Borrowed(
            &style.font.family,
        ))));
        builder.push_default(StyleProperty::FontSize(style.font_size as f32));
        builder.push_default(StyleProperty::LineHeight(LineHeight::Absolute(
            style.line_height as f32,
        )));
        builder.push_default(StyleProperty::LetterSpacing(style.kerning as f32));
        // Words wider than a line are split instead of overflowing.
        builder.push_default(StyleProperty::OverflowWrap(OverflowWrap::Anywhere));
        builder.build_into(&mut self.layout, text);
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Parley lays out in f32, block geometry stays within its range."
    )]
    fn break_lines(&mut self, constraints: &LineConstraints) {
        let mut breaker = self.layout.break_lines();
        let mut index = 0;
        while breaker
            .break_next(constraints.width(index) as f32)
            .is_some()
        {
            index += 1;
        }
        breaker.finish();
    }
}

impl Shaper for ParleyShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &ShapeStyle<'_>,
        constraints: &LineConstraints,
    ) -> Vec<LineBox> {
        if text.is_empty() {
            return Vec::new();
        }
        self.build(text, style);
        self.break_lines(constraints);

        self.layout
            .lines()
            .map(|line| {
                let metrics = line.metrics();
                let text_range = line.text_range();
                let mut carets = vec![(text_range.start, 0.0)];
                let mut x = 0.0;
                for run in line.runs() {
                    for cluster in run.visual_clusters() {
                        x += f64::from(cluster.advance());
                        carets.push((cluster.text_range().end, x));
                    }
                }
                // Visual order differs from text order in right-to-left runs.
                carets.sort_by_key(|&(index, _)| index);
                carets.dedup_by_key(|&mut (index, _)| index);
                LineBox {
                    text_range,
                    width: f64::from(metrics.advance - metrics.trailing_whitespace),
                    height: constraints.line_height,
                    break_reason: match line.break_reason() {
                        ParleyBreakReason::None => BreakReason::None,
                        ParleyBreakReason::Regular => BreakReason::Regular,
                        ParleyBreakReason::Explicit => BreakReason::Explicit,
                        ParleyBreakReason::Emergency => BreakReason::Emergency,
                    },
                    carets,
                }
            })
            .collect()
    }
}
