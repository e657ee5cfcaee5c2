// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive text fitting.
//!
//! `text_fit` lays out blocks of styled text into rectangles, shrinking the font scale step by
//! step until the text satisfies its constraints (maximum line count, available height, clipping
//! regions, a shortened last line). A [`Composer`] stacks many such blocks into one region,
//! shares a clipping rect between them, negotiates with a [`RenderObserver`] before drawing, and
//! surfaces the links found along the way for hit-testing.
//!
//! Shaping is delegated to a [`Shaper`]. The crate ships a deterministic
//! [`FixedAdvanceShaper`]; the `text_fit_parley` crate provides one backed by Parley.
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables [`detect::DetectionQueue`], which runs detectors on
//!   worker threads.
//! - `libm`: Floating point support for `no_std` targets.
//!
//! Geometry comes from [`kurbo`], re-exported for convenience. Coordinates are y-down.
//!
//! ## Example
//!
//! ```
//! use text_fit::{FixedAdvanceShaper, FontSpec, Rect, TextBlock, TextStyle};
//!
//! let mut style = TextStyle::new(FontSpec::new("sans-serif", 20.0));
//! style.line_height = Some(24.0);
//! style.maximum_number_of_lines = 1;
//! style.minimum_scale_factor = 0.5;
//!
//! let mut block = TextBlock::new("Hello world", style).unwrap();
//! let mut shaper = FixedAdvanceShaper::default();
//! // 11 characters at 10 units each do not fit in 80 units until the font shrinks.
//! let rect = block.compute_bounding_rect(&mut shaper, Rect::new(0.0, 0.0, 80.0, 200.0), None);
//!
//! assert!(block.string_fits_proposed_rect());
//! assert_eq!(block.actual_number_of_lines(), 1);
//! assert!(block.actual_scale_factor() < 1.0);
//! assert!(rect.width() <= 80.0);
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
compile_error!("text_fit requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

mod block;
mod composer;
mod error;
mod hyphenate;
mod link;
mod shape;
mod style;
mod surface;
mod text;

pub mod detect;

#[cfg(test)]
mod tests;

pub use block::{BlockId, TextBlock};
pub use composer::{Composer, Negotiation, Placement, RenderObserver, MAX_CONSECUTIVE_VETOES};
pub use error::{Error, ErrorKind};
pub use kurbo;
pub use kurbo::{Insets, Point, Rect, Size};
pub use link::{
    DetectedSpan, LinkSighting, LinkTarget, SpanRegistry, TextLink,
    HIGHLIGHT_CORNER_RADIUS, TOUCH_PADDING,
};
pub use shape::{BreakReason, FixedAdvanceShaper, LineBox, LineConstraints, ShapeStyle, Shaper};
pub use style::{
    initial_line_height, Alignment, Color, DetectorKinds, FontSpec, StyleProperty, TextStyle,
    DEFAULT_SCALE_FACTOR_STEP,
};
pub use surface::{DrawLine, RecordedLine, RecordingSurface, Surface};
pub use text::StyledText;
