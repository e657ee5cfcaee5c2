// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::detect::{DetectedRange, Detector};
use crate::{
    DetectedSpan, DetectorKinds, FixedAdvanceShaper, FontSpec, LineBox, LineConstraints, Rect,
    RecordingSurface, ShapeStyle, Shaper, TextBlock, TextStyle,
};

/// Font size used by [`TestEnv::style`]. With the default shaper every character is 10 units wide.
pub(crate) const FONT_SIZE: f64 = 20.0;

/// Line height used by [`TestEnv::style`].
pub(crate) const LINE_HEIGHT: f64 = 24.0;

/// A [`FixedAdvanceShaper`] that counts how often it shapes.
#[derive(Default)]
pub(crate) struct CountingShaper {
    inner: FixedAdvanceShaper,
    pub(crate) calls: usize,
}

impl Shaper for CountingShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &ShapeStyle<'_>,
        constraints: &LineConstraints,
    ) -> Vec<LineBox> {
        self.calls += 1;
        self.inner.shape(text, style, constraints)
    }
}

/// Finds English weekday names.
pub(crate) struct WeekdayDetector;

impl Detector for WeekdayDetector {
    fn detect(&self, text: &str, _kinds: DetectorKinds) -> Vec<DetectedRange> {
        const DAYS: [&str; 7] = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        let mut found = Vec::new();
        for day in DAYS {
            for (start, _) in text.match_indices(day) {
                found.push(DetectedRange {
                    range: start..start + day.len(),
                    span: DetectedSpan::new(DetectorKinds::CALENDAR_EVENT, day),
                });
            }
        }
        found.sort_by_key(|detected| detected.range.start);
        found
    }
}

/// Shaper, surface and style defaults shared by the tests.
pub(crate) struct TestEnv {
    pub(crate) shaper: CountingShaper,
    pub(crate) surface: RecordingSurface,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        Self {
            shaper: CountingShaper::default(),
            surface: RecordingSurface::new(),
        }
    }

    /// A 20 unit font on 24 unit lines.
    pub(crate) fn style() -> TextStyle {
        let mut style = TextStyle::new(FontSpec::new("sans-serif", FONT_SIZE));
        style.line_height = Some(LINE_HEIGHT);
        style
    }

    pub(crate) fn block(text: &str, style: TextStyle) -> TextBlock {
        TextBlock::new(text, style).unwrap()
    }

    /// Lay out `block` inside a rect of the given width at the origin, without a height limit.
    pub(crate) fn fit(&mut self, block: &mut TextBlock, width: f64) -> Rect {
        self.fit_in(block, Rect::new(0.0, 0.0, width, f64::INFINITY))
    }

    pub(crate) fn fit_in(&mut self, block: &mut TextBlock, rect: Rect) -> Rect {
        block.compute_bounding_rect(&mut self.shaper, rect, None)
    }

    /// The visible text of every line drawn so far.
    pub(crate) fn drawn_text(&self) -> Vec<&str> {
        self.surface
            .lines
            .iter()
            .map(|line| line.text.as_str())
            .collect()
    }
}
