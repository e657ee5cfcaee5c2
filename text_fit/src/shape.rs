// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface to text shaping, and a deterministic shaper for fixed-advance text.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use crate::hyphenate::SOFT_HYPHEN;
use crate::FontSpec;

/// Returns `true` if `rect` has a positive width and height.
///
/// An unbounded bottom edge counts as an area.
pub(crate) fn has_area(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

/// Returns `true` if both rects share some area. Touching edges do not count.
pub(crate) fn shares_area(a: Rect, b: Rect) -> bool {
    has_area(a.intersect(b))
}

/// Reason that a line was broken.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum BreakReason {
    /// No break: the text ended on this line.
    #[default]
    None,
    /// Break at a line break opportunity such as a space or a soft hyphen.
    Regular,
    /// Break caused by a newline in the text.
    Explicit,
    /// The line had no opportunity left and was split inside a word.
    Emergency,
}

/// One shaped line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBox {
    /// Byte range of the line in the shaped text, including trailing whitespace.
    pub text_range: Range<usize>,
    /// Advance of the line, excluding trailing whitespace.
    pub width: f64,
    /// Height of the line box.
    pub height: f64,
    /// Why the line ended.
    pub break_reason: BreakReason,
    /// Horizontal position of each character boundary in the line, relative to its start.
    ///
    /// Sorted by offset, starting with `text_range.start` at 0.
    pub carets: Vec<(usize, f64)>,
}

impl LineBox {
    /// The horizontal position of the caret before `index`.
    ///
    /// Offsets between recorded stops resolve to the preceding stop. Offsets past the end of
    /// the line resolve to the last stop.
    pub fn caret_x(&self, index: usize) -> f64 {
        match self.carets.binary_search_by_key(&index, |&(offset, _)| offset) {
            Ok(i) => self.carets[i].1,
            Err(0) => 0.0,
            Err(i) => self.carets[i - 1].1,
        }
    }

    /// Returns `true` if the line ends at a soft hyphen it breaks after.
    pub fn ends_with_hyphen(&self, text: &str) -> bool {
        self.break_reason == BreakReason::Regular
            && text
                .get(self.text_range.clone())
                .is_some_and(|line| line.ends_with(SOFT_HYPHEN))
    }
}

/// Font parameters at the scale being tried.
#[derive(Copy, Clone, Debug)]
pub struct ShapeStyle<'a> {
    /// Font family and unscaled size.
    pub font: &'a FontSpec,
    /// Scaled font size.
    pub font_size: f64,
    /// Scaled line height.
    pub line_height: f64,
    /// Scaled extra advance after each character.
    pub kerning: f64,
}

/// Per-line available width.
///
/// Coordinates are relative to the top-left corner of the text area, that is the block's rect
/// shrunk by its text insets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineConstraints {
    /// Width of the text area.
    pub width: f64,
    /// Distance between lines.
    pub line_height: f64,
    /// A region lines must not overlap.
    pub exclusion: Option<Rect>,
    /// Shortening of one line, as `(line index, inset)`.
    pub last_line: Option<(usize, f64)>,
}

impl LineConstraints {
    /// Lines of equal `width`.
    pub fn new(width: f64, line_height: f64) -> Self {
        Self {
            width,
            line_height,
            exclusion: None,
            last_line: None,
        }
    }

    /// Cut lines that vertically overlap `exclusion`.
    ///
    /// An exclusion that reaches the left edge removes the left part of a line, any other
    /// removes everything from its left edge onwards.
    pub fn with_exclusion(mut self, exclusion: Rect) -> Self {
        if has_area(exclusion) {
            self.exclusion = Some(exclusion);
        }
        self
    }

    /// Shorten line `index` by `inset`.
    pub fn with_last_line_inset(mut self, index: usize, inset: f64) -> Self {
        if inset > 0.0 {
            self.last_line = Some((index, inset));
        }
        self
    }

    /// The horizontal offset and available width of line `index`.
    pub fn line_extent(&self, index: usize) -> (f64, f64) {
        let mut offset = 0.0;
        let mut width = self.width;
        if let Some(exclusion) = self.exclusion {
            let top = index as f64 * self.line_height;
            let line = Rect::new(0.0, top, self.width, top + self.line_height);
            if shares_area(line, exclusion) {
                if exclusion.x0 <= 0.0 {
                    offset = exclusion.x1.min(self.width);
                    width = self.width - offset;
                } else {
                    width = exclusion.x0.min(self.width);
                }
            }
        }
        if let Some((last, inset)) = self.last_line {
            if index == last {
                width -= inset;
            }
        }
        (offset, width.max(0.0))
    }

    /// The available width of line `index`.
    pub fn width(&self, index: usize) -> f64 {
        self.line_extent(index).1
    }
}

/// Breaks text into lines.
///
/// Implementations produce every line of the text, ignoring any line limit, so callers can tell
/// whether the text overflowed.
pub trait Shaper {
    /// Shape `text` into lines that respect `constraints`.
    fn shape(
        &mut self,
        text: &str,
        style: &ShapeStyle<'_>,
        constraints: &LineConstraints,
    ) -> Vec<LineBox>;
}

impl<S: Shaper + ?Sized> Shaper for &mut S {
    fn shape(
        &mut self,
        text: &str,
        style: &ShapeStyle<'_>,
        constraints: &LineConstraints,
    ) -> Vec<LineBox> {
        (**self).shape(text, style, constraints)
    }
}

/// A shaper where every character, including whitespace, has the same advance.
///
/// Lines break greedily after whitespace or at soft hyphens, which take one advance when a line
/// ends at them and none otherwise. A word wider than its line is split where it overflows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedAdvanceShaper {
    /// Advance of one character, as a fraction of the font size.
    pub advance: f64,
}

impl FixedAdvanceShaper {
    /// A shaper with the given advance per character, in ems.
    pub fn new(advance: f64) -> Self {
        Self { advance }
    }
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[derive(Copy, Clone)]
struct Opportunity {
    /// Index into the character list where the next line would start.
    next: usize,
    width: f64,
    carets: usize,
}

impl Shaper for FixedAdvanceShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &ShapeStyle<'_>,
        constraints: &LineConstraints,
    ) -> Vec<LineBox> {
        let advance = self.advance * style.font_size + style.kerning;
        let chars = text.char_indices().collect::<Vec<_>>();
        let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);

        let mut lines = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let available = constraints.width(lines.len());
            let start = pos;
            let mut x = 0.0;
            let mut content_width = 0.0;
            let mut carets = vec![(byte_at(start), 0.0)];
            let mut opportunity: Option<Opportunity> = None;
            let mut end = (chars.len(), content_width, BreakReason::None);

            while pos < chars.len() {
                let c = chars[pos].1;
                if c == '\n' {
                    pos += 1;
                    carets.push((byte_at(pos), x));
                    end = (pos, content_width, BreakReason::Explicit);
                    break;
                }
                if c == SOFT_HYPHEN {
                    pos += 1;
                    carets.push((byte_at(pos), x));
                    if x + advance <= available {
                        opportunity = Some(Opportunity {
                            next: pos,
                            width: x + advance,
                            carets: carets.len(),
                        });
                    }
                    continue;
                }
                if c.is_whitespace() {
                    x += advance;
                    pos += 1;
                    carets.push((byte_at(pos), x));
                    opportunity = Some(Opportunity {
                        next: pos,
                        width: content_width,
                        carets: carets.len(),
                    });
                    continue;
                }
                if pos > start && x + advance > available {
                    end = match opportunity {
                        Some(op) => {
                            carets.truncate(op.carets);
                            (op.next, op.width, BreakReason::Regular)
                        }
                        None => (pos, content_width, BreakReason::Emergency),
                    };
                    break;
                }
                x += advance;
                content_width = x;
                pos += 1;
                carets.push((byte_at(pos), x));
                end = (chars.len(), content_width, BreakReason::None);
            }

            let (next, width, break_reason) = end;
            lines.push(LineBox {
                text_range: byte_at(start)..byte_at(next),
                width,
                height: constraints.line_height,
                break_reason,
                carets,
            });
            pos = next;
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{
        has_area, shares_area, BreakReason, FixedAdvanceShaper, LineConstraints, ShapeStyle,
        Shaper,
    };
    use crate::{FontSpec, Rect};

    fn shape(text: &str, width: f64) -> Vec<super::LineBox> {
        shape_with(text, LineConstraints::new(width, 12.0))
    }

    fn shape_with(text: &str, constraints: LineConstraints) -> Vec<super::LineBox> {
        let font = FontSpec::new("mono", 20.0);
        let style = ShapeStyle {
            font: &font,
            font_size: 20.0,
            line_height: 12.0,
            kerning: 0.0,
        };
        // 10 units per character.
        FixedAdvanceShaper::default().shape(text, &style, &constraints)
    }

    fn ranges(text: &str, width: f64) -> Vec<&str> {
        shape(text, width)
            .into_iter()
            .map(|line| &text[line.text_range])
            .collect()
    }

    #[test]
    fn breaks_after_spaces() {
        let text = "Hello world";
        let lines = shape(text, 80.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(&text[lines[0].text_range.clone()], "Hello ");
        assert_eq!(lines[0].width, 50.0, "trailing space is not counted");
        assert_eq!(lines[0].break_reason, BreakReason::Regular);
        assert_eq!(lines[1].break_reason, BreakReason::None);
        assert_eq!(shape(text, 110.0).len(), 1);
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(ranges("abcdefgh", 30.0), ["abc", "def", "gh"]);
        let lines = shape("abcdefgh", 30.0);
        assert_eq!(lines[0].break_reason, BreakReason::Emergency);
        // Nothing fits, but every line takes at least one character.
        assert_eq!(ranges("abc", 0.0), ["a", "b", "c"]);
    }

    #[test]
    fn newlines_force_breaks() {
        assert_eq!(ranges("one\ntwo\n", 1000.0), ["one\n", "two\n"]);
        let lines = shape("one\ntwo", 1000.0);
        assert_eq!(lines[0].break_reason, BreakReason::Explicit);
        assert_eq!(lines[0].width, 30.0);
    }

    #[test]
    fn soft_hyphens_are_opportunities() {
        let text = "ex\u{AD}ten\u{AD}sive";
        let lines = shape(text, 60.0);
        assert_eq!(&text[lines[0].text_range.clone()], "ex\u{AD}ten\u{AD}");
        assert_eq!(lines[0].width, 60.0, "five letters plus a hyphen");
        assert!(lines[0].ends_with_hyphen(text));
        assert!(!lines[1].ends_with_hyphen(text));
    }

    #[test]
    fn carets_follow_characters() {
        let lines = shape("ab cd", 1000.0);
        assert_eq!(lines[0].caret_x(0), 0.0);
        assert_eq!(lines[0].caret_x(3), 30.0);
        assert_eq!(lines[0].caret_x(5), 50.0);
        assert_eq!(lines[0].caret_x(99), 50.0);
    }

    #[test]
    fn exclusions_cut_overlapping_lines() {
        let constraints =
            LineConstraints::new(100.0, 10.0).with_exclusion(Rect::new(60.0, 5.0, 200.0, 15.0));
        assert_eq!(constraints.line_extent(0), (0.0, 60.0));
        assert_eq!(constraints.line_extent(1), (0.0, 60.0));
        assert_eq!(constraints.line_extent(2), (0.0, 100.0));

        let constraints =
            LineConstraints::new(100.0, 10.0).with_exclusion(Rect::new(-5.0, 0.0, 30.0, 10.0));
        assert_eq!(constraints.line_extent(0), (30.0, 70.0));
        assert_eq!(constraints.line_extent(1), (0.0, 100.0));
    }

    #[test]
    fn touching_rects_share_no_area() {
        let line = Rect::new(0.0, 10.0, 100.0, 20.0);
        assert!(!shares_area(line, Rect::new(0.0, 20.0, 100.0, 30.0)));
        assert!(!shares_area(line, Rect::new(100.0, 0.0, 150.0, 30.0)));
        assert!(shares_area(line, Rect::new(50.0, 19.0, 60.0, 21.0)));
        assert!(has_area(Rect::new(0.0, 0.0, 100.0, f64::INFINITY)));
        assert!(!has_area(Rect::new(5.0, 5.0, 5.0, 100.0)));
        assert!(!has_area(Rect::ZERO));

        // An exclusion ending where a line starts leaves the line alone.
        let constraints =
            LineConstraints::new(100.0, 10.0).with_exclusion(Rect::new(60.0, 0.0, 200.0, 10.0));
        assert_eq!(constraints.line_extent(1), (0.0, 100.0));
    }

    #[test]
    fn last_line_inset_shortens_one_line() {
        let constraints = LineConstraints::new(100.0, 10.0).with_last_line_inset(1, 40.0);
        assert_eq!(constraints.width(0), 100.0);
        assert_eq!(constraints.width(1), 60.0);
        let lines = shape_with("aaaa bbbb cccc", constraints);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].width, 40.0);
    }
}
