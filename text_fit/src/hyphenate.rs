// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Soft hyphen insertion and the offset mapping between source and shaping text.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hypher::Lang;

/// U+00AD SOFT HYPHEN, invisible unless a line breaks after it.
pub(crate) const SOFT_HYPHEN: char = '\u{AD}';

const SOFT_HYPHEN_LEN: usize = SOFT_HYPHEN.len_utf8();

/// Text handed to the shaper, possibly with soft hyphens inserted.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapingText {
    text: String,
    /// Source offsets at which a soft hyphen was inserted, ascending.
    inserted: Vec<usize>,
}

impl ShapingText {
    /// Shape the source text unchanged.
    pub(crate) fn plain(text: &str) -> Self {
        Self {
            text: text.into(),
            inserted: Vec::new(),
        }
    }

    /// Insert a soft hyphen between the syllables of every alphabetic word.
    pub(crate) fn hyphenated(text: &str) -> Self {
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        let mut inserted = Vec::new();
        let mut copied = 0;
        for (start, word) in words(text) {
            out.push_str(&text[copied..start]);
            let mut offset = start;
            let mut syllables = hypher::hyphenate(word, Lang::English).peekable();
            while let Some(syllable) = syllables.next() {
                out.push_str(syllable);
                offset += syllable.len();
                if syllables.peek().is_some() {
                    out.push(SOFT_HYPHEN);
                    inserted.push(offset);
                }
            }
            copied = start + word.len();
        }
        out.push_str(&text[copied..]);
        Self {
            text: out,
            inserted,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// Map a source range to the shaping text.
    ///
    /// A hyphen inserted exactly at either end stays outside the range.
    pub(crate) fn to_shaping(&self, range: Range<usize>) -> Range<usize> {
        let before_start = self.inserted.iter().filter(|&&p| p <= range.start).count();
        let before_end = self.inserted.iter().filter(|&&p| p < range.end).count();
        range.start + before_start * SOFT_HYPHEN_LEN..range.end + before_end * SOFT_HYPHEN_LEN
    }

    /// Map an offset in the shaping text back to the source text.
    pub(crate) fn to_source(&self, offset: usize) -> usize {
        let before = self
            .inserted
            .iter()
            .enumerate()
            .filter(|&(k, &p)| p + k * SOFT_HYPHEN_LEN < offset)
            .count();
        offset - before * SOFT_HYPHEN_LEN
    }
}

/// Maximal runs of alphabetic characters with their byte offsets.
fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = text.char_indices().peekable();
    core::iter::from_fn(move || {
        let (start, _) = loop {
            let (i, c) = rest.next()?;
            if c.is_alphabetic() {
                break (i, c);
            }
        };
        let mut end = text.len();
        while let Some(&(i, c)) = rest.peek() {
            if !c.is_alphabetic() {
                end = i;
                break;
            }
            rest.next();
        }
        Some((start, &text[start..end]))
    })
}
