// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::{Error, LinkTarget};

/// A string with link targets applied to byte ranges within it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    links: Vec<(Range<usize>, LinkTarget)>,
}

impl StyledText {
    /// Create a `StyledText` with no links applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            links: Vec::new(),
        }
    }

    /// Borrow the underlying text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the length of the underlying text, in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the underlying text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply a link `target` to a `range` within the text.
    pub fn apply_link(&mut self, range: Range<usize>, target: LinkTarget) -> Result<(), Error> {
        self.check_range(&range)?;
        self.links.push((range, target));
        Ok(())
    }

    /// Iterate over all links and the ranges they apply to, in the order they were applied.
    pub fn links_iter(&self) -> impl ExactSizeIterator<Item = (&Range<usize>, &LinkTarget)> {
        self.links.iter().map(|(range, target)| (range, target))
    }

    /// Get an iterator over the links that overlap the given `range`.
    pub fn links_for_range(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (&Range<usize>, &LinkTarget)> {
        self.links
            .iter()
            .filter(move |(link, _)| link.start < range.end && link.end > range.start)
            .map(|(range, target)| (range, target))
    }

    /// Returns the number of links applied to the text.
    pub fn links_len(&self) -> usize {
        self.links.len()
    }

    /// Remove all links.
    pub fn clear_links(&mut self) {
        self.links.clear();
    }

    /// Apply a link unless one already covers exactly `range`.
    ///
    /// Returns `Ok(true)` if the link was added.
    pub(crate) fn merge_link(
        &mut self,
        range: Range<usize>,
        target: LinkTarget,
    ) -> Result<bool, Error> {
        self.check_range(&range)?;
        if self.links.iter().any(|(existing, _)| *existing == range) {
            return Ok(false);
        }
        self.links.push((range, target));
        Ok(true)
    }

    pub(crate) fn check_range(&self, range: &Range<usize>) -> Result<(), Error> {
        let len = self.text.len();
        if range.start > range.end {
            return Err(Error::invalid_range(range.start, range.end, len));
        }
        if range.end > len {
            return Err(Error::invalid_bounds(range.start, range.end, len));
        }
        if !self.text.is_char_boundary(range.start) || !self.text.is_char_boundary(range.end) {
            return Err(Error::not_on_char_boundary(range.start, range.end, len));
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::StyledText;
    use crate::{DetectedSpan, DetectorKinds, ErrorKind, LinkTarget};

    fn url(s: &str) -> LinkTarget {
        LinkTarget::Url(s.to_string())
    }

    #[test]
    fn links_for_range() {
        let mut text = StyledText::new("Visit example.org today");
        assert!(text.apply_link(6..17, url("https://example.org")).is_ok());
        assert!(text.apply_link(18..23, url("about:today")).is_ok());

        let hits = text.links_for_range(0..7).collect::<Vec<_>>();
        assert_eq!(hits.len(), 1, "only the first link overlaps 0..7");
        assert_eq!(*hits[0].0, 6..17);
        assert_eq!(text.links_for_range(0..6).count(), 0);
        assert_eq!(text.links_len(), 2);

        text.clear_links();
        assert_eq!(text.links_iter().len(), 0);
    }

    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    #[test]
    fn bad_link_ranges() {
        let mut text = StyledText::new("héllo");

        let err = text.apply_link(3..1, url("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);

        let err = text.apply_link(0..9, url("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);

        // 'é' spans bytes 1..3.
        let err = text.apply_link(2..4, url("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        assert_eq!(err.range(), Some(2..4));
        assert_eq!(text.links_len(), 0, "rejected links are not stored");
    }

    #[test]
    fn merge_link_skips_existing_ranges() {
        let mut text = StyledText::new("Lunch on Friday");
        let span = LinkTarget::Detected(DetectedSpan::new(
            DetectorKinds::CALENDAR_EVENT,
            "friday",
        ));
        assert_eq!(text.merge_link(9..15, span.clone()), Ok(true));
        assert_eq!(text.merge_link(9..15, span), Ok(false));
        assert_eq!(text.links_len(), 1);
    }
}
