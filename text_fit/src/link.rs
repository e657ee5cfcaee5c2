// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive spans and their on-screen geometry.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{BezPath, Point, Rect, RoundedRect, Shape, Vec2};
use smallvec::SmallVec;

use crate::{BlockId, DetectorKinds};

/// Padding around link rects within which touches still hit the link.
pub const TOUCH_PADDING: f64 = 10.0;

/// Corner radius of the rounded rects in a [`TextLink::highlight_path`].
pub const HIGHLIGHT_CORNER_RADIUS: f64 = 3.0;

/// A span found by a [`Detector`](crate::detect::Detector).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedSpan {
    /// The single kind of data found.
    pub kind: DetectorKinds,
    /// Detector-specific payload, such as a normalized phone number or date.
    pub payload: String,
}

impl DetectedSpan {
    /// Create a new detected span.
    pub fn new(kind: DetectorKinds, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

/// What activating a link leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// An explicit link applied to the text.
    Url(String),
    /// A span found by data detection.
    Detected(DetectedSpan),
}

/// An interactive span together with the rects it covers, one per line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLink {
    target: LinkTarget,
    range: Range<usize>,
    rects: SmallVec<[Rect; 2]>,
}

impl TextLink {
    /// Create a link without any rects.
    pub fn new(target: LinkTarget, range: Range<usize>) -> Self {
        Self {
            target,
            range,
            rects: SmallVec::new(),
        }
    }

    /// What the link leads to.
    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// Byte range of the link in its block's text.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The rects covered by the link, in line order.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Append the rect of one more line.
    pub fn add_rect(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    /// Returns `true` if one of the link's rects contains `point`.
    pub fn contains_point(&self, point: Point) -> bool {
        self.rects.iter().any(|rect| rect.contains(point))
    }

    /// Returns `true` if `point` lies within [`TOUCH_PADDING`] of one of the link's rects.
    pub fn touch_region_contains_point(&self, point: Point) -> bool {
        self.rects
            .iter()
            .any(|rect| rect.inflate(TOUCH_PADDING, TOUCH_PADDING).contains(point))
    }

    /// The shape to fill when the link is highlighted: one rounded rect sub-path per line.
    pub fn highlight_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for rect in &self.rects {
            path.extend(RoundedRect::from_rect(*rect, HIGHLIGHT_CORNER_RADIUS).path_elements(0.1));
        }
        path
    }

    pub(crate) fn translated(&self, offset: Vec2) -> Self {
        Self {
            target: self.target.clone(),
            range: self.range.clone(),
            rects: self.rects.iter().map(|rect| *rect + offset).collect(),
        }
    }
}

/// The links of one block, with at most one entry per range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanRegistry {
    links: Vec<TextLink>,
}

impl SpanRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `target` covering `range` occupies `rect`.
    ///
    /// A rect for a range already present is appended to the existing entry. Returns `true` if a
    /// new entry was created.
    pub fn record(&mut self, target: &LinkTarget, range: Range<usize>, rect: Rect) -> bool {
        if let Some(link) = self.links.iter_mut().find(|link| link.range == range) {
            link.add_rect(rect);
            return false;
        }
        let mut link = TextLink::new(target.clone(), range);
        link.add_rect(rect);
        self.links.push(link);
        true
    }

    /// All links, in the order they were first recorded.
    pub fn links(&self) -> &[TextLink] {
        &self.links
    }

    /// Iterate over the links.
    pub fn iter(&self) -> impl Iterator<Item = &TextLink> {
        self.links.iter()
    }

    /// The number of distinct ranges.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if no links were recorded.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Remove every link.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// The link whose rects contain `point`.
    pub fn link_at(&self, point: Point) -> Option<&TextLink> {
        self.exact_link_at(point).or_else(|| self.touched_link_at(point))
    }

    pub(crate) fn exact_link_at(&self, point: Point) -> Option<&TextLink> {
        self.links.iter().find(|link| link.contains_point(point))
    }

    pub(crate) fn touched_link_at(&self, point: Point) -> Option<&TextLink> {
        self.links.iter().find(|link| link.touch_region_contains_point(point))
    }

    pub(crate) fn translated(&self, offset: Vec2) -> Self {
        Self {
            links: self.links.iter().map(|link| link.translated(offset)).collect(),
        }
    }
}

/// A link drawn on a surface, reported to the [`RenderObserver`](crate::RenderObserver).
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSighting {
    /// The block that drew the link.
    pub block: BlockId,
    /// What the link leads to.
    pub target: LinkTarget,
    /// Byte range of the link in the block's text.
    pub range: Range<usize>,
    /// Bounds of all of the link's rects on the surface.
    pub rect: Rect,
}

impl LinkSighting {
    pub(crate) fn new(block: BlockId, link: &TextLink) -> Self {
        let rect = link
            .rects()
            .iter()
            .copied()
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);
        Self {
            block,
            target: link.target().clone(),
            range: link.range(),
            rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use kurbo::{PathEl, Point, Rect, Shape};

    use super::{LinkTarget, SpanRegistry, TextLink};

    fn target() -> LinkTarget {
        LinkTarget::Url("https://linebender.org".to_string())
    }

    #[test]
    fn touch_region_extends_past_rects() {
        let mut link = TextLink::new(target(), 0..4);
        link.add_rect(Rect::new(10.0, 10.0, 50.0, 30.0));
        assert!(link.contains_point(Point::new(20.0, 20.0)));
        assert!(!link.contains_point(Point::new(55.0, 20.0)));
        assert!(link.touch_region_contains_point(Point::new(55.0, 20.0)));
        assert!(link.touch_region_contains_point(Point::new(0.0, 0.0)));
        assert!(!link.touch_region_contains_point(Point::new(61.0, 20.0)));
    }

    #[test]
    fn record_merges_by_range() {
        let mut registry = SpanRegistry::new();
        let first = Rect::new(0.0, 0.0, 40.0, 10.0);
        let second = Rect::new(0.0, 10.0, 20.0, 20.0);
        assert!(registry.record(&target(), 3..12, first));
        assert!(!registry.record(&target(), 3..12, second));
        assert!(registry.record(&target(), 0..2, first));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.links()[0].rects(), [first, second]);
    }

    #[test]
    fn highlight_path_has_one_sub_path_per_line() {
        let mut link = TextLink::new(target(), 0..9);
        link.add_rect(Rect::new(0.0, 0.0, 40.0, 10.0));
        link.add_rect(Rect::new(0.0, 10.0, 20.0, 20.0));
        let path = link.highlight_path();
        let sub_paths = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(sub_paths, 2);
        let bounds = path.bounding_box();
        assert!((bounds.x1 - 40.0).abs() < 1e-6 && (bounds.y1 - 20.0).abs() < 1e-6);
        assert!(path.contains(Point::new(5.0, 15.0)));
        assert!(!path.contains(Point::new(30.0, 15.0)), "the second line is shorter");
        assert!(TextLink::new(target(), 0..1).highlight_path().elements().is_empty());
    }

    #[test]
    fn exact_hits_win_over_touches() {
        let mut registry = SpanRegistry::new();
        registry.record(&target(), 0..2, Rect::new(0.0, 0.0, 10.0, 10.0));
        registry.record(&target(), 5..9, Rect::new(15.0, 0.0, 30.0, 10.0));
        let hit = registry.link_at(Point::new(16.0, 5.0));
        assert_eq!(hit.map(TextLink::range), Some(5..9));
        let near = registry.link_at(Point::new(12.0, 5.0));
        assert_eq!(near.map(TextLink::range), Some(0..2), "first touch region wins");
        assert!(registry.link_at(Point::new(100.0, 100.0)).is_none());
    }
}
