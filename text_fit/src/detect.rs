// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data detection, decoupled from layout.
//!
//! A block hands out a [`DetectionRequest`] snapshot that can be sent to another thread. Running
//! a [`Detector`] on it produces a [`DetectionResult`], which is delivered back through
//! [`Composer::deliver_detection`](crate::Composer::deliver_detection) or
//! [`TextBlock::apply_detection`](crate::TextBlock::apply_detection). Results for text that
//! changed in the meantime are discarded.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::{BlockId, DetectedSpan, DetectorKinds};

/// A span found in a text, with its byte range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedRange {
    /// Byte range in the detected text.
    pub range: Range<usize>,
    /// What was found.
    pub span: DetectedSpan,
}

/// Finds spans of interest in plain text.
pub trait Detector {
    /// Find the spans of the given `kinds` in `text`.
    fn detect(&self, text: &str, kinds: DetectorKinds) -> Vec<DetectedRange>;
}

/// The text of a block at one generation, and what to look for in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionRequest {
    /// The block the text belongs to.
    pub block: BlockId,
    /// The block's generation when the snapshot was taken.
    pub generation: u64,
    /// The text to search.
    pub text: String,
    /// The kinds of spans to search for.
    pub kinds: DetectorKinds,
}

impl DetectionRequest {
    /// Run `detector` on the snapshot.
    pub fn run<D: Detector + ?Sized>(&self, detector: &D) -> DetectionResult {
        let spans = detector
            .detect(&self.text, self.kinds)
            .into_iter()
            .filter(|detected| self.kinds.contains(detected.span.kind))
            .collect();
        DetectionResult {
            block: self.block,
            generation: self.generation,
            spans,
        }
    }
}

/// Spans found for one [`DetectionRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionResult {
    /// The block the spans belong to.
    pub block: BlockId,
    /// The generation of the text that was searched.
    pub generation: u64,
    /// The spans found.
    pub spans: Vec<DetectedRange>,
}

#[cfg(feature = "std")]
pub use queue::DetectionQueue;

#[cfg(feature = "std")]
mod queue {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crossbeam_channel::{Receiver, Sender};

    use super::{DetectionRequest, DetectionResult, Detector};

    /// Runs detection requests on worker threads.
    ///
    /// Results arrive in completion order. Drain them on the thread that owns the blocks and
    /// pass each one to [`Composer::deliver_detection`](crate::Composer::deliver_detection).
    #[derive(Debug)]
    pub struct DetectionQueue {
        sender: Sender<DetectionResult>,
        receiver: Receiver<DetectionResult>,
    }

    impl DetectionQueue {
        /// Create an empty queue.
        pub fn new() -> Self {
            let (sender, receiver) = crossbeam_channel::unbounded();
            Self { sender, receiver }
        }

        /// Run `request` with `detector` on a new thread.
        pub fn spawn<D: Detector + Send + Sync + 'static>(
            &self,
            detector: Arc<D>,
            request: DetectionRequest,
        ) {
            let sender = self.sender.clone();
            thread::spawn(move || {
                let result = request.run(&*detector);
                // The queue was dropped, nobody wants the result.
                let _ = sender.send(result);
            });
        }

        /// Take every result that has arrived so far.
        pub fn poll(&self) -> Vec<DetectionResult> {
            self.receiver.try_iter().collect()
        }

        /// Wait up to `timeout` for the next result.
        pub fn wait(&self, timeout: Duration) -> Option<DetectionResult> {
            self.receiver.recv_timeout(timeout).ok()
        }
    }

    impl Default for DetectionQueue {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{DetectedRange, Detector};
    use crate::{DetectedSpan, DetectorKinds, FontSpec, TextBlock, TextStyle};

    /// Reports every occurrence of "Friday" as a date and every run of 7+ digits as a number.
    struct KeywordDetector;

    impl Detector for KeywordDetector {
        fn detect(&self, text: &str, _kinds: DetectorKinds) -> Vec<DetectedRange> {
            let mut found = text
                .match_indices("Friday")
                .map(|(start, word)| DetectedRange {
                    range: start..start + word.len(),
                    span: DetectedSpan::new(DetectorKinds::CALENDAR_EVENT, "friday"),
                })
                .collect::<Vec<_>>();
            let mut start = None;
            for (i, c) in text.char_indices().chain([(text.len(), ' ')]) {
                match (c.is_ascii_digit(), start) {
                    (true, None) => start = Some(i),
                    (false, Some(s)) => {
                        if i - s >= 7 {
                            found.push(DetectedRange {
                                range: s..i,
                                span: DetectedSpan::new(
                                    DetectorKinds::PHONE_NUMBER,
                                    text[s..i].to_string(),
                                ),
                            });
                        }
                        start = None;
                    }
                    _ => {}
                }
            }
            found
        }
    }

    fn block(text: &str, kinds: DetectorKinds) -> TextBlock {
        let mut style = TextStyle::new(FontSpec::new("sans-serif", 10.0));
        style.data_detectors = kinds;
        TextBlock::new(text, style).unwrap()
    }

    #[test]
    fn requests_once_per_generation() {
        let mut b = block("Call 5550100 on Friday", DetectorKinds::all());
        assert!(b.detection_request().is_some());
        assert!(b.detection_request().is_none(), "already requested");
        b.set_text("Call 5550199 on Friday");
        assert!(b.detection_request().is_some(), "new text, new request");

        let mut off = block("Call 5550100", DetectorKinds::empty());
        assert!(off.detection_request().is_none());
    }

    #[test]
    fn results_are_filtered_by_kind() {
        let mut b = block("Call 5550100 on Friday", DetectorKinds::PHONE_NUMBER);
        let result = b.detection_request().unwrap().run(&KeywordDetector);
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].range, 5..12);
        assert_eq!(result.generation, b.generation());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut b = block("Lunch on Friday", DetectorKinds::CALENDAR_EVENT);
        let result = b.detection_request().unwrap().run(&KeywordDetector);
        b.set_text("Lunch on Saturday");
        assert_eq!(b.apply_detection(&result), Ok(false));
        assert_eq!(b.text().links_len(), 0);
    }

    #[test]
    fn repeated_results_do_not_duplicate_links() {
        let mut b = block("Lunch on Friday", DetectorKinds::CALENDAR_EVENT);
        let result = b.detection_request().unwrap().run(&KeywordDetector);
        assert_eq!(b.apply_detection(&result), Ok(true));
        assert_eq!(b.apply_detection(&result), Ok(true));
        assert_eq!(b.text().links_len(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn queue_runs_requests_off_thread() {
        use std::sync::Arc;
        use std::time::Duration;

        let queue = super::DetectionQueue::new();
        let mut b = block("Lunch on Friday", DetectorKinds::CALENDAR_EVENT);
        queue.spawn(Arc::new(KeywordDetector), b.detection_request().unwrap());
        let result = queue
            .wait(Duration::from_secs(10))
            .expect("the detector finishes");
        assert_eq!(result.block, b.id());
        assert_eq!(b.apply_detection(&result), Ok(true));
        assert!(queue.poll().is_empty());
    }
}
