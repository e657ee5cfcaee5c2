// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::BlockId;

/// Rich error type for text fitting operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the context needed to explain it: the offending
/// range for link attributes, the block for drawing misuse, or the property for style values.
///
/// Fitting outcomes are never errors. A block that does not fit its rect reports that through
/// [`TextBlock::string_fits_proposed_rect`](crate::TextBlock::string_fits_proposed_rect).
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    context: Context,
}

#[derive(Debug, Clone, PartialEq)]
enum Context {
    Range { start: usize, end: usize, len: usize },
    Block(BlockId),
    Style { property: &'static str, value: f64 },
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The range provided by the caller, for range errors.
    pub fn range(&self) -> Option<core::ops::Range<usize>> {
        match self.context {
            Context::Range { start, end, .. } => Some(start..end),
            _ => None,
        }
    }

    /// The block the error refers to, for drawing errors.
    pub fn block(&self) -> Option<BlockId> {
        match self.context {
            Context::Block(id) => Some(id),
            _ => None,
        }
    }

    /// The name of the rejected style property, for style errors.
    pub fn property(&self) -> Option<&'static str> {
        match self.context {
            Context::Style { property, .. } => Some(property),
            _ => None,
        }
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            context: Context::Range { start, end, len },
        }
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidBounds,
            context: Context::Range { start, end, len },
        }
    }

    pub(crate) fn not_on_char_boundary(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::NotOnCharBoundary,
            context: Context::Range { start, end, len },
        }
    }

    pub(crate) fn not_laid_out(block: BlockId) -> Self {
        Self {
            kind: ErrorKind::NotLaidOut,
            context: Context::Block(block),
        }
    }

    pub(crate) fn invalid_style(property: &'static str, value: f64) -> Self {
        Self {
            kind: ErrorKind::InvalidStyle,
            context: Context::Style { property, value },
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.kind, &self.context) {
            (ErrorKind::InvalidRange, Context::Range { start, end, .. }) => {
                write!(f, "invalid range {start}..{end}: start > end")
            }
            (ErrorKind::InvalidBounds, Context::Range { start, end, len }) => {
                write!(f, "range {start}..{end} out of bounds for len {len}")
            }
            (ErrorKind::NotOnCharBoundary, Context::Range { start, end, .. }) => {
                write!(f, "range {start}..{end} not on UTF-8 boundary")
            }
            (ErrorKind::NotLaidOut, Context::Block(id)) => {
                write!(f, "block {id:?} drawn before its bounding rect was computed")
            }
            (ErrorKind::InvalidStyle, Context::Style { property, value }) => {
                write!(f, "invalid value {value} for style property `{property}`")
            }
            (kind, _) => write!(f, "{kind:?}"),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A link range had `start > end`.
    InvalidRange,

    /// A link range extended past the end of the text.
    InvalidBounds,

    /// A link range did not start or end on a UTF-8 character boundary.
    NotOnCharBoundary,

    /// A block was drawn before any layout was computed for it.
    NotLaidOut,

    /// A style property was given a value outside its domain.
    InvalidStyle,
}
