// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "only needed when `std` is disabled")]
use core_maths::CoreFloat;
use kurbo::{Insets, Rect, Size, Vec2};

use crate::detect::{DetectedRange, DetectionRequest, DetectionResult};
use crate::hyphenate::{ShapingText, SOFT_HYPHEN};
use crate::shape::has_area;
use crate::{
    Alignment, BreakReason, DetectorKinds, DrawLine, Error, LineBox, LineConstraints,
    LinkSighting, LinkTarget, ShapeStyle, Shaper, SpanRegistry, StyleProperty, StyledText,
    Surface, TextStyle,
};

/// A split word leaving fewer characters than this on the next line is tolerated by
/// [`TextStyle::prefers_non_wrapped_words`].
const MIN_WRAPPED_FRAGMENT: usize = 5;

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`TextBlock`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    fn next() -> Self {
        Self(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// One laid out line.
#[derive(Clone, Debug)]
struct PlacedLine {
    line: LineBox,
    /// Relative to the block's origin.
    rect: Rect,
    source_range: Range<usize>,
    ellipsized: bool,
    hyphenated: bool,
}

/// Everything computed for one proposed rect and clipping rect.
#[derive(Clone, Debug)]
struct LayoutCache {
    proposed: Rect,
    clipping: Option<Rect>,
    shaping: ShapingText,
    lines: Vec<PlacedLine>,
    bounds: Rect,
    scale: f64,
    font_size: f64,
    kerning: f64,
    fits: bool,
    /// Relative to the block's origin.
    links: SpanRegistry,
}

/// The lines produced at one scale.
struct Attempt {
    scale: f64,
    font_size: f64,
    line_height: f64,
    kerning: f64,
    constraints: LineConstraints,
    lines: Vec<LineBox>,
}

impl Attempt {
    fn visible_lines(&self, max_lines: usize) -> usize {
        if max_lines == 0 {
            self.lines.len()
        } else {
            self.lines.len().min(max_lines)
        }
    }

    fn fits(&self, style: &TextStyle, proposed: Rect) -> bool {
        let max_lines = style.maximum_number_of_lines;
        if max_lines != 0 && self.lines.len() > max_lines {
            return false;
        }
        let height = self.visible_lines(max_lines) as f64 * self.line_height
            + style.text_insets.y_value();
        !proposed.height().is_finite() || height <= proposed.height()
    }

    /// Returns `true` if a visible line splits a word and leaves too much of it for the next line.
    fn splits_word(&self, text: &str, max_lines: usize) -> bool {
        let visible = &self.lines[..self.visible_lines(max_lines)];
        visible.windows(2).any(|pair| {
            if pair[0].break_reason != BreakReason::Emergency {
                return false;
            }
            let leftover = text[pair[1].text_range.clone()]
                .chars()
                .take_while(|c| !c.is_whitespace())
                .filter(|&c| c != SOFT_HYPHEN)
                .count();
            leftover >= MIN_WRAPPED_FRAGMENT
        })
    }
}

/// An independently laid out block of styled text.
///
/// A block searches for the largest font scale at which its text satisfies the style's
/// constraints inside a proposed rect, then caches the resulting line geometry until it is
/// invalidated. Every setter invalidates the cache.
#[derive(Debug)]
pub struct TextBlock {
    id: BlockId,
    name: Option<String>,
    text: StyledText,
    style: TextStyle,
    generation: u64,
    requested_generation: Option<u64>,
    cache: Option<LayoutCache>,
    links: SpanRegistry,
    stale: bool,
}

impl TextBlock {
    /// Create a block, checking that `style` is valid.
    pub fn new(text: impl Into<StyledText>, style: TextStyle) -> Result<Self, Error> {
        style.validate()?;
        Ok(Self {
            id: BlockId::next(),
            name: None,
            text: text.into(),
            style,
            generation: 0,
            requested_generation: None,
            cache: None,
            links: SpanRegistry::new(),
            stale: false,
        })
    }

    /// Create a block whose style is built from `properties` applied over the defaults.
    pub fn from_properties(
        text: impl Into<StyledText>,
        properties: impl IntoIterator<Item = StyleProperty>,
    ) -> Result<Self, Error> {
        Self::new(text, TextStyle::from_properties(properties))
    }

    /// Give the block a name for lookup in a [`Composer`](crate::Composer).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The block's identity.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The block's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The block's text and links.
    pub fn text(&self) -> &StyledText {
        &self.text
    }

    /// The block's style.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Counter that changes whenever the text or style changes.
    ///
    /// Detection results computed for an older generation are discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if a layout is cached.
    pub fn is_laid_out(&self) -> bool {
        self.cache.is_some()
    }

    /// The rect of each visible line, relative to the block's origin.
    pub fn line_rects(&self) -> impl ExactSizeIterator<Item = Rect> + '_ {
        let lines = self.cache.as_ref().map_or(&[][..], |cache| &cache.lines[..]);
        lines.iter().map(|line| line.rect)
    }

    /// The scale the text was laid out at, 1.0 before any layout.
    pub fn actual_scale_factor(&self) -> f64 {
        self.cache.as_ref().map_or(1.0, |cache| cache.scale)
    }

    /// The number of visible lines.
    pub fn actual_number_of_lines(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lines.len())
    }

    /// Returns `false` if the last layout found no scale that satisfies every constraint.
    pub fn string_fits_proposed_rect(&self) -> bool {
        self.cache.as_ref().is_none_or(|cache| cache.fits)
    }

    /// The rect returned by the last layout.
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.cache.as_ref().map(|cache| cache.bounds)
    }

    /// The links of the last draw, with rects in surface coordinates.
    ///
    /// Empty until the block is drawn, and again after every new layout or skipped draw.
    pub fn links(&self) -> &SpanRegistry {
        &self.links
    }

    /// Forget the links of the last draw, keeping the layout.
    pub(crate) fn clear_links(&mut self) {
        self.links.clear();
    }

    /// Throw away the cached layout and links.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            log::trace!("invalidated block {:?}", self.id);
        }
        self.links.clear();
        self.stale = true;
    }

    /// Returns `true` once after every invalidation.
    pub(crate) fn take_stale(&mut self) -> bool {
        core::mem::take(&mut self.stale)
    }

    fn content_changed(&mut self) {
        self.generation += 1;
        self.invalidate();
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<StyledText>) {
        self.text = text.into();
        self.content_changed();
    }

    /// Replace the whole style.
    pub fn set_style(&mut self, style: TextStyle) -> Result<(), Error> {
        style.validate()?;
        self.style = style;
        self.content_changed();
        Ok(())
    }

    /// Change one style option.
    ///
    /// On error the style is left unchanged.
    pub fn apply(&mut self, property: StyleProperty) -> Result<(), Error> {
        let mut style = self.style.clone();
        style.apply(property);
        self.set_style(style)
    }

    /// Change the unscaled font size.
    pub fn set_font_size(&mut self, size: f64) -> Result<(), Error> {
        self.apply(StyleProperty::FontSize(size))
    }

    /// Change the unscaled line height.
    pub fn set_line_height(&mut self, line_height: f64) -> Result<(), Error> {
        self.apply(StyleProperty::LineHeight(line_height))
    }

    /// Change the smallest scale the search may use.
    pub fn set_minimum_scale_factor(&mut self, factor: f64) -> Result<(), Error> {
        self.apply(StyleProperty::MinimumScaleFactor(factor))
    }

    /// Change the scale decrement per step.
    pub fn set_scale_factor_step(&mut self, step: f64) -> Result<(), Error> {
        self.apply(StyleProperty::ScaleFactorStep(step))
    }

    /// Change the shortening of the last line.
    pub fn set_last_line_inset(&mut self, inset: f64) -> Result<(), Error> {
        self.apply(StyleProperty::LastLineInset(inset))
    }

    fn set(&mut self, property: StyleProperty) {
        self.style.apply(property);
        self.content_changed();
    }

    /// Change the alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.set(StyleProperty::Alignment(alignment));
    }

    /// Change the maximum number of lines, 0 for none.
    pub fn set_maximum_number_of_lines(&mut self, lines: usize) {
        self.set(StyleProperty::MaximumNumberOfLines(lines));
    }

    /// Change the spacing around the text.
    pub fn set_text_insets(&mut self, insets: Insets) {
        self.set(StyleProperty::TextInsets(insets));
    }

    /// Change the spacing kept from clipping rects.
    pub fn set_clipping_rect_insets(&mut self, insets: Insets) {
        self.set(StyleProperty::ClippingRectInsets(insets));
    }

    /// Toggle the ellipsis on cut off text.
    pub fn set_breaks_last_line(&mut self, breaks: bool) {
        self.set(StyleProperty::BreaksLastLine(breaks));
    }

    /// Toggle hyphenation.
    pub fn set_hyphenated(&mut self, hyphenated: bool) {
        self.set(StyleProperty::Hyphenated(hyphenated));
    }

    /// Toggle the underline.
    pub fn set_underlined(&mut self, underlined: bool) {
        self.set(StyleProperty::Underlined(underlined));
    }

    /// Toggle the preference for unsplit words.
    pub fn set_prefers_non_wrapped_words(&mut self, prefers: bool) {
        self.set(StyleProperty::PrefersNonWrappedWords(prefers));
    }

    /// Change the kinds of spans to detect.
    pub fn set_data_detectors(&mut self, kinds: DetectorKinds) {
        self.set(StyleProperty::DataDetectors(kinds));
    }

    /// Lay out the text inside `proposed` and return the rect it occupies.
    ///
    /// The width of `proposed` is binding; its height is a maximum, or no limit when not finite.
    /// Text flows around `clipping_rect` when it has an area. The clipping rect is first enlarged
    /// in place by the style's clipping rect insets.
    ///
    /// The result is cached: calling again with the same rects returns it without shaping.
    pub fn compute_bounding_rect<S: Shaper + ?Sized>(
        &mut self,
        shaper: &mut S,
        proposed: Rect,
        clipping_rect: Option<&mut Rect>,
    ) -> Rect {
        let clipping = match clipping_rect {
            Some(rect) if has_area(*rect) => {
                *rect = *rect + self.style.clipping_rect_insets;
                Some(*rect)
            }
            _ => None,
        };

        if let Some(cache) = &self.cache {
            if cache.proposed == proposed && cache.clipping == clipping {
                return cache.bounds;
            }
        }

        let cache = self.layout(shaper, proposed, clipping);
        log::debug!(
            "block {:?}: {} lines at scale {:.2}, fits: {}",
            self.id,
            cache.lines.len(),
            cache.scale,
            cache.fits
        );
        let bounds = cache.bounds;
        self.links.clear();
        self.cache = Some(cache);
        bounds
    }

    fn layout<S: Shaper + ?Sized>(
        &self,
        shaper: &mut S,
        proposed: Rect,
        clipping: Option<Rect>,
    ) -> LayoutCache {
        let shaping = if self.style.hyphenated {
            ShapingText::hyphenated(self.text.as_str())
        } else {
            ShapingText::plain(self.text.as_str())
        };

        if self.text.is_empty() || !has_area(proposed) {
            return LayoutCache {
                proposed,
                clipping,
                shaping,
                lines: Vec::new(),
                bounds: Rect::from_origin_size(proposed.origin(), Size::ZERO),
                scale: 1.0,
                font_size: self.style.font.size,
                kerning: self.style.kerning,
                fits: self.text.is_empty(),
                links: SpanRegistry::new(),
            };
        }

        let style = &self.style;
        let minimum = style.minimum_scale_factor.min(1.0);
        let searching = minimum < 1.0;
        let mut step = 0_u32;
        // The first attempt that fits but breaks inside a word.
        let mut split: Option<Attempt> = None;
        let (attempt, fits) = loop {
            // Rounded so repeated steps land on clean factors.
            let scale = ((1.0 - f64::from(step) * style.scale_factor_step) * 1e9).round() / 1e9;
            let scale = scale.max(minimum);
            // Treat rounding noise just above the minimum as the minimum itself.
            let scale = if scale - minimum < 1e-9 { minimum } else { scale };
            let attempt = self.shape_at(shaper, &shaping, proposed, clipping, scale);
            let fits = attempt.fits(style, proposed);
            log::trace!(
                "block {:?}: scale {scale:.2} gives {} lines, fits: {fits}",
                self.id,
                attempt.lines.len()
            );
            if !searching {
                break (attempt, fits);
            }
            if fits {
                if !(style.prefers_non_wrapped_words
                    && attempt.splits_word(shaping.as_str(), style.maximum_number_of_lines))
                {
                    break (attempt, true);
                }
                if split.is_none() {
                    split = Some(attempt);
                }
            }
            if scale <= minimum {
                if let Some(split) = split.take() {
                    log::debug!(
                        "block {:?}: every fitting scale splits a word, keeping {:.2}",
                        self.id,
                        split.scale
                    );
                    break (split, true);
                }
                let fallback = (minimum + 1.0) / 2.0;
                log::debug!(
                    "block {:?}: no scale fits, falling back to {fallback:.2}",
                    self.id
                );
                break (
                    self.shape_at(shaper, &shaping, proposed, clipping, fallback),
                    false,
                );
            }
            step += 1;
        };

        self.place(proposed, clipping, shaping, attempt, fits)
    }

    fn shape_at<S: Shaper + ?Sized>(
        &self,
        shaper: &mut S,
        shaping: &ShapingText,
        proposed: Rect,
        clipping: Option<Rect>,
        scale: f64,
    ) -> Attempt {
        let style = &self.style;
        let insets = style.text_insets;
        let font_size = style.font.size * scale;
        let line_height = style.line_height() * scale;
        let kerning = style.kerning * scale;

        let mut constraints =
            LineConstraints::new((proposed.width() - insets.x_value()).max(0.0), line_height);
        if let Some(clipping) = clipping {
            let text_origin = proposed.origin();
            constraints = constraints.with_exclusion(
                clipping - Vec2::new(text_origin.x + insets.x0, text_origin.y + insets.y0),
            );
        }
        if style.maximum_number_of_lines > 0 {
            constraints = constraints
                .with_last_line_inset(style.maximum_number_of_lines - 1, style.last_line_inset);
        }

        let shape_style = ShapeStyle {
            font: &style.font,
            font_size,
            line_height,
            kerning,
        };
        let lines = shaper.shape(shaping.as_str(), &shape_style, &constraints);
        Attempt {
            scale,
            font_size,
            line_height,
            kerning,
            constraints,
            lines,
        }
    }

    fn place(
        &self,
        proposed: Rect,
        clipping: Option<Rect>,
        shaping: ShapingText,
        attempt: Attempt,
        fits: bool,
    ) -> LayoutCache {
        let style = &self.style;
        let insets = style.text_insets;
        let max_lines = style.maximum_number_of_lines;
        let visible = attempt.visible_lines(max_lines);
        let truncated = visible < attempt.lines.len();

        let mut lines = Vec::with_capacity(visible);
        let mut links = SpanRegistry::new();
        for (index, line) in attempt.lines.into_iter().take(visible).enumerate() {
            let (offset, available) = attempt.constraints.line_extent(index);
            let is_last = index + 1 == visible;
            let slack = (available - line.width).max(0.0);
            let (dx, width) = match style.alignment {
                Alignment::Start => (0.0, line.width),
                Alignment::End => (slack, line.width),
                Alignment::Center => (slack / 2.0, line.width),
                Alignment::Justify
                    if !is_last && line.break_reason != BreakReason::Explicit =>
                {
                    (0.0, line.width.max(available))
                }
                Alignment::Justify => (0.0, line.width),
            };
            let x0 = insets.x0 + offset + dx;
            let y0 = insets.y0 + index as f64 * attempt.line_height;
            let rect = Rect::new(x0, y0, x0 + width, y0 + attempt.line_height);

            let source_range =
                shaping.to_source(line.text_range.start)..shaping.to_source(line.text_range.end);
            for (range, target) in self.text.links_for_range(source_range.clone()) {
                let start = range.start.max(source_range.start);
                let end = range.end.min(source_range.end);
                let shaped = shaping.to_shaping(start..end);
                let link_rect = Rect::new(
                    x0 + line.caret_x(shaped.start),
                    rect.y0,
                    x0 + line.caret_x(shaped.end),
                    rect.y1,
                );
                links.record(target, range.clone(), link_rect);
            }

            lines.push(PlacedLine {
                hyphenated: line.ends_with_hyphen(shaping.as_str()),
                ellipsized: style.breaks_last_line && truncated && is_last,
                line,
                rect,
                source_range,
            });
        }

        let width = lines
            .iter()
            .map(|line| line.rect.x1)
            .fold(insets.x0, f64::max)
            + insets.x1;
        let height = insets.y_value() + visible as f64 * attempt.line_height;

        LayoutCache {
            proposed,
            clipping,
            shaping,
            lines,
            bounds: Rect::from_origin_size(proposed.origin(), Size::new(width, height)),
            scale: attempt.scale,
            font_size: attempt.font_size,
            kerning: attempt.kerning,
            fits,
            links,
        }
    }

    /// Draw the cached layout with its origin at `rect`'s origin.
    ///
    /// Returns the links drawn, whose rects are now in surface coordinates. Fails with
    /// [`ErrorKind::NotLaidOut`](crate::ErrorKind::NotLaidOut) if no layout is cached.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        rect: Rect,
    ) -> Result<Vec<LinkSighting>, Error> {
        let Some(cache) = &self.cache else {
            return Err(Error::not_laid_out(self.id));
        };
        let origin = rect.origin();
        for placed in &cache.lines {
            surface.draw_line(
                &DrawLine {
                    text: &cache.shaping.as_str()[placed.line.text_range.clone()],
                    text_range: placed.source_range.clone(),
                    rect: placed.rect,
                    font: &self.style.font,
                    font_size: cache.font_size,
                    color: self.style.color,
                    kerning: cache.kerning,
                    underlined: self.style.underlined,
                    ellipsized: placed.ellipsized,
                    hyphenated: placed.hyphenated,
                },
                origin,
            );
        }
        self.links = cache.links.translated(origin.to_vec2());
        Ok(self
            .links
            .iter()
            .map(|link| LinkSighting::new(self.id, link))
            .collect())
    }

    /// Like [`draw`](Self::draw), with drawing restricted to `clipping_rect` when it has an area.
    pub fn draw_clipped<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        rect: Rect,
        clipping_rect: Rect,
    ) -> Result<Vec<LinkSighting>, Error> {
        if !has_area(clipping_rect) {
            return self.draw(surface, rect);
        }
        surface.set_clip(Some(clipping_rect));
        let result = self.draw(surface, rect);
        surface.set_clip(None);
        result
    }

    /// Lay out for `rect` unless that layout is cached, then draw.
    pub fn compute_and_draw<T: Shaper + ?Sized, S: Surface + ?Sized>(
        &mut self,
        shaper: &mut T,
        surface: &mut S,
        rect: Rect,
        clipping_rect: Option<&mut Rect>,
    ) -> Vec<LinkSighting> {
        let bounds = self.compute_bounding_rect(shaper, rect, clipping_rect);
        // The layout was just cached, so drawing cannot fail.
        self.draw(surface, bounds).unwrap_or_default()
    }

    /// A snapshot of the text to run detection on.
    ///
    /// Returns `None` when no detector kinds are enabled, the text is empty, or a request was
    /// already made for the current generation.
    pub fn detection_request(&mut self) -> Option<DetectionRequest> {
        if self.style.data_detectors.is_empty()
            || self.text.is_empty()
            || self.requested_generation == Some(self.generation)
        {
            return None;
        }
        self.requested_generation = Some(self.generation);
        Some(DetectionRequest {
            block: self.id,
            generation: self.generation,
            text: self.text.as_str().into(),
            kinds: self.style.data_detectors,
        })
    }

    /// Merge detected spans into the text's links.
    ///
    /// Returns `Ok(false)` if the result belongs to another block or an older generation. Spans
    /// whose range is already linked are skipped. The layout is invalidated when a span was
    /// added.
    pub fn apply_detection(&mut self, result: &DetectionResult) -> Result<bool, Error> {
        Ok(self.merge_detection(result)?.is_some())
    }

    /// Merge a detection result, returning the spans that were new.
    pub(crate) fn merge_detection(
        &mut self,
        result: &DetectionResult,
    ) -> Result<Option<Vec<DetectedRange>>, Error> {
        if result.block != self.id || result.generation != self.generation {
            log::debug!(
                "discarding detection result for block {:?} generation {}",
                result.block,
                result.generation
            );
            return Ok(None);
        }
        for detected in &result.spans {
            self.text.check_range(&detected.range)?;
        }
        let mut added = Vec::new();
        for detected in &result.spans {
            let target = LinkTarget::Detected(detected.span.clone());
            if self.text.merge_link(detected.range.clone(), target)? {
                added.push(detected.clone());
            }
        }
        if !added.is_empty() {
            // Links changed but the text did not: keep the generation.
            self.invalidate();
        }
        Ok(Some(added))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::TextBlock;
    use crate::{
        Alignment, ErrorKind, FixedAdvanceShaper, FontSpec, Insets, Rect, RecordingSurface,
        TextStyle,
    };

    fn style() -> TextStyle {
        let mut style = TextStyle::new(FontSpec::new("sans-serif", 20.0));
        style.line_height = Some(24.0);
        style
    }

    #[test]
    fn draw_before_layout_is_an_error() {
        let mut block = TextBlock::new("Hello", style()).unwrap();
        let mut surface = RecordingSurface::new();
        let err = block
            .draw(&mut surface, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotLaidOut);
        assert_eq!(err.block(), Some(block.id()));
    }

    #[test]
    fn ids_are_unique() {
        let a = TextBlock::new("a", style()).unwrap();
        let b = TextBlock::new("a", style()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn alignment_and_insets_offset_lines() {
        let mut shaper = FixedAdvanceShaper::default();
        let mut s = style();
        s.text_insets = Insets::new(6.0, 4.0, 6.0, 4.0);
        s.alignment = Alignment::End;
        let mut block = TextBlock::new("abc", s).unwrap();
        let bounds =
            block.compute_bounding_rect(&mut shaper, Rect::new(10.0, 20.0, 122.0, 500.0), None);
        let rects = block.line_rects().collect::<Vec<_>>();
        // 100 units of text area, 30 of text.
        assert_eq!(rects, [Rect::new(76.0, 4.0, 106.0, 28.0)]);
        assert_eq!(bounds, Rect::new(10.0, 20.0, 122.0, 52.0));

        block.set_alignment(Alignment::Center);
        block.compute_bounding_rect(&mut shaper, Rect::new(10.0, 20.0, 122.0, 500.0), None);
        assert_eq!(block.line_rects().next(), Some(Rect::new(41.0, 4.0, 71.0, 28.0)));
    }

    #[test]
    fn invalid_setters_leave_style_unchanged() {
        let mut block = TextBlock::new("abc", style()).unwrap();
        let generation = block.generation();
        let err = block.set_minimum_scale_factor(1.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStyle);
        assert_eq!(block.style().minimum_scale_factor, 1.0);
        assert_eq!(block.generation(), generation);
        assert!(block.set_font_size(0.0).is_err());
        assert!(block.set_font_size(12.0).is_ok());
        assert_eq!(block.generation(), generation + 1);
    }
}
