// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ops::Range;

use crate::detect::DetectedRange;
use crate::{BlockId, LinkSighting, Negotiation, Rect, RenderObserver, TextBlock};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    UpdatedBlocks(usize),
    Computed(BlockId, Rect),
    ShouldRender(usize),
    WillRenderBlocks(Vec<BlockId>, Rect),
    WillRender(BlockId, Rect),
    DidRender(BlockId, Rect),
    DidRenderBlocks(Vec<BlockId>, Rect),
    Link(LinkSighting),
    Detected(BlockId, Vec<Range<usize>>),
}

type Negotiator = Box<dyn FnMut(&mut Negotiation<'_>)>;

/// Records every hook call, and refuses to render a configurable number of times.
pub(crate) struct RecordingObserver {
    events: Rc<RefCell<Vec<Event>>>,
    vetoes: usize,
    negotiator: Option<Negotiator>,
}

impl RecordingObserver {
    /// An observer that approves every render, and the log it writes to.
    pub(crate) fn new() -> (Self, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let observer = Self {
            events: events.clone(),
            vetoes: 0,
            negotiator: None,
        };
        (observer, events)
    }

    /// Refuse the next `vetoes` renders.
    pub(crate) fn vetoing(mut self, vetoes: usize) -> Self {
        self.vetoes = vetoes;
        self
    }

    /// Run `negotiator` on every negotiation before deciding.
    pub(crate) fn negotiating(
        mut self,
        negotiator: impl FnMut(&mut Negotiation<'_>) + 'static,
    ) -> Self {
        self.negotiator = Some(Box::new(negotiator));
        self
    }

    pub(crate) fn into_box(self) -> Option<Box<dyn RenderObserver>> {
        Some(Box::new(self))
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl RenderObserver for RecordingObserver {
    fn did_update_blocks(&mut self, blocks: &[TextBlock]) {
        self.push(Event::UpdatedBlocks(blocks.len()));
    }

    fn did_compute_bounding_rect(&mut self, block: &TextBlock, rect: Rect) {
        self.push(Event::Computed(block.id(), rect));
    }

    fn should_render(&mut self, negotiation: &mut Negotiation<'_>) -> bool {
        self.push(Event::ShouldRender(negotiation.placements.len()));
        if let Some(negotiator) = self.negotiator.as_mut() {
            negotiator(negotiation);
        }
        if self.vetoes > 0 {
            self.vetoes -= 1;
            return false;
        }
        true
    }

    fn will_render_blocks(&mut self, blocks: &[BlockId], rect: Rect) {
        self.push(Event::WillRenderBlocks(blocks.to_vec(), rect));
    }

    fn will_render_block(&mut self, block: &TextBlock, rect: Rect) {
        self.push(Event::WillRender(block.id(), rect));
    }

    fn did_render_block(&mut self, block: &TextBlock, rect: Rect) {
        self.push(Event::DidRender(block.id(), rect));
    }

    fn did_render_blocks(&mut self, blocks: &[BlockId], rect: Rect) {
        self.push(Event::DidRenderBlocks(blocks.to_vec(), rect));
    }

    fn did_encounter_link(&mut self, sighting: &LinkSighting) {
        self.push(Event::Link(sighting.clone()));
    }

    fn did_detect_spans(&mut self, block: &TextBlock, spans: &[DetectedRange]) {
        let ranges = spans.iter().map(|span| span.range.clone()).collect();
        self.push(Event::Detected(block.id(), ranges));
    }
}
