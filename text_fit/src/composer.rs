// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking blocks into one region and drawing them.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::detect::{DetectedRange, DetectionRequest, DetectionResult};
use crate::shape::shares_area;
use crate::{BlockId, Error, LinkSighting, Shaper, Surface, TextBlock, TextLink};

/// The number of vetoes in a row after which [`Composer::render`] gives up.
pub const MAX_CONSECUTIVE_VETOES: usize = 3;

/// Where one block was placed during a render pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// The block.
    pub block: BlockId,
    /// Position of the block in the composer.
    pub index: usize,
    /// The block's bounding rect.
    pub rect: Rect,
}

/// What a [`RenderObserver`] may inspect and change before a render pass draws.
///
/// Changing a block through one of its setters makes the next placement lay it out again, along
/// with every block after it.
#[derive(Debug)]
pub struct Negotiation<'a> {
    /// Every block of the composer, in order.
    pub blocks: &'a mut [TextBlock],
    /// The placement of every block.
    pub placements: &'a [Placement],
    /// The composer's shared clipping rect.
    pub clipping_rect: &'a mut Rect,
}

/// Hooks into a [`Composer`]'s work.
///
/// Every method has a default that does nothing, or approves in the case of
/// [`should_render`](Self::should_render).
pub trait RenderObserver {
    /// Blocks were added, inserted, removed or replaced.
    fn did_update_blocks(&mut self, _blocks: &[TextBlock]) {}

    /// `block` was placed at `rect`.
    fn did_compute_bounding_rect(&mut self, _block: &TextBlock, _rect: Rect) {}

    /// Decide whether to draw the placements. Returning `false` places every block again.
    ///
    /// After [`MAX_CONSECUTIVE_VETOES`] refusals in a row, one more refusal aborts the pass.
    fn should_render(&mut self, _negotiation: &mut Negotiation<'_>) -> bool {
        true
    }

    /// The blocks in `blocks` are about to be drawn, covering `rect` together.
    fn will_render_blocks(&mut self, _blocks: &[BlockId], _rect: Rect) {}

    /// `block` is about to be drawn at `rect`.
    fn will_render_block(&mut self, _block: &TextBlock, _rect: Rect) {}

    /// `block` was drawn at `rect`.
    fn did_render_block(&mut self, _block: &TextBlock, _rect: Rect) {}

    /// Every block in `blocks` was drawn.
    fn did_render_blocks(&mut self, _blocks: &[BlockId], _rect: Rect) {}

    /// A link was drawn. Called once per link after all blocks were drawn.
    fn did_encounter_link(&mut self, _sighting: &LinkSighting) {}

    /// Detection found new spans in `block`, which now needs to be drawn again.
    fn did_detect_spans(&mut self, _block: &TextBlock, _spans: &[DetectedRange]) {}
}

enum Phase {
    Placement,
    Negotiate(Vec<Placement>),
    Draw(Vec<Placement>),
    Abort,
}

/// An ordered stack of [`TextBlock`]s drawn into one region.
///
/// Blocks are placed top-down in collection order, each in the space left below the previous
/// one. With [`set_align_to_bottom`](Self::set_align_to_bottom) the whole stack is then moved
/// down until it touches the bottom of the region.
#[derive(Default)]
pub struct Composer {
    blocks: Vec<TextBlock>,
    names: HashMap<String, SmallVec<[BlockId; 1]>>,
    clipping_rect: Rect,
    align_to_bottom: bool,
    observer: Option<Box<dyn RenderObserver>>,
}

impl core::fmt::Debug for Composer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Composer")
            .field("blocks", &self.blocks)
            .field("names", &self.names)
            .field("clipping_rect", &self.clipping_rect)
            .field("align_to_bottom", &self.align_to_bottom)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Composer {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the observer, returning the previous one.
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn RenderObserver>>,
    ) -> Option<Box<dyn RenderObserver>> {
        core::mem::replace(&mut self.observer, observer)
    }

    /// Remove the observer.
    pub fn take_observer(&mut self) -> Option<Box<dyn RenderObserver>> {
        self.observer.take()
    }

    /// Returns `true` if the stack is moved to the bottom of the region.
    pub fn aligns_to_bottom(&self) -> bool {
        self.align_to_bottom
    }

    /// Choose whether the stack is moved to the bottom of the region.
    pub fn set_align_to_bottom(&mut self, align_to_bottom: bool) {
        self.align_to_bottom = align_to_bottom;
    }

    /// The blocks, in drawing order.
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Replace every block.
    ///
    /// Layouts the blocks already have are kept.
    pub fn set_blocks(&mut self, blocks: Vec<TextBlock>) {
        self.blocks = blocks;
        self.names.clear();
        for block in &self.blocks {
            if let Some(name) = block.name() {
                self.names.entry(name.into()).or_default().push(block.id());
            }
        }
        self.did_update_blocks();
    }

    /// Append a block.
    pub fn add_block(&mut self, block: TextBlock) {
        let index = self.blocks.len();
        self.insert_block(index, block);
    }

    /// Insert a block at `index`, clamped to the number of blocks.
    ///
    /// The block and every block after it are invalidated.
    pub fn insert_block(&mut self, index: usize, block: TextBlock) {
        let index = index.min(self.blocks.len());
        if let Some(name) = block.name() {
            self.names.entry(name.into()).or_default().push(block.id());
        }
        self.blocks.insert(index, block);
        self.invalidate_from(index);
        self.did_update_blocks();
    }

    /// Remove the block at `index`, invalidating every block after it.
    pub fn remove_block(&mut self, index: usize) -> Option<TextBlock> {
        if index >= self.blocks.len() {
            return None;
        }
        let block = self.blocks.remove(index);
        if let Some(name) = block.name() {
            if let Some(ids) = self.names.get_mut(name) {
                ids.retain(|id| *id != block.id());
                if ids.is_empty() {
                    self.names.remove(name);
                }
            }
        }
        self.invalidate_from(index);
        self.did_update_blocks();
        Some(block)
    }

    fn invalidate_from(&mut self, index: usize) {
        for block in &mut self.blocks[index..] {
            block.invalidate();
        }
    }

    fn did_update_blocks(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.did_update_blocks(&self.blocks);
        }
    }

    fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    /// The block with the given id.
    pub fn block(&self, id: BlockId) -> Option<&TextBlock> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    /// The block with the given id, for changing it.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut TextBlock> {
        self.blocks.iter_mut().find(|block| block.id() == id)
    }

    fn position_named(&self, name: &str) -> Option<usize> {
        let id = *self.names.get(name)?.last()?;
        self.position(id)
    }

    /// The most recently added block with the given name.
    pub fn block_named(&self, name: &str) -> Option<&TextBlock> {
        self.position_named(name).map(|index| &self.blocks[index])
    }

    /// The most recently added block with the given name, for changing it.
    pub fn block_named_mut(&mut self, name: &str) -> Option<&mut TextBlock> {
        self.position_named(name).map(|index| &mut self.blocks[index])
    }

    /// The shared clipping rect. An empty rect means no clipping.
    pub fn clipping_rect(&self) -> Rect {
        self.clipping_rect
    }

    /// Change the shared clipping rect.
    pub fn set_clipping_rect(&mut self, clipping_rect: Rect) {
        self.clipping_rect = clipping_rect;
    }

    /// The part of the clipping rect inside `rect`, if they overlap.
    pub fn clipping_rect_intersecting(&self, rect: Rect) -> Option<Rect> {
        shares_area(self.clipping_rect, rect).then(|| self.clipping_rect.intersect(rect))
    }

    /// Place every block inside `rect` and return the area they cover.
    ///
    /// Nothing is drawn and the observer is not asked for approval.
    pub fn compute_bounding_rect<S: Shaper + ?Sized>(
        &mut self,
        shaper: &mut S,
        rect: Rect,
    ) -> Rect {
        let placements = self.place(shaper, rect);
        union(rect, placements.iter())
    }

    /// Place and draw every block inside `rect`.
    ///
    /// Returns the area covered by the drawn blocks, or `None` if the observer refused to draw
    /// more than [`MAX_CONSECUTIVE_VETOES`] times in a row. Blocks outside `rect` are not drawn.
    pub fn render<T: Shaper + ?Sized, S: Surface + ?Sized>(
        &mut self,
        shaper: &mut T,
        surface: &mut S,
        rect: Rect,
    ) -> Option<Rect> {
        let mut vetoes = 0;
        let mut phase = Phase::Placement;
        loop {
            phase = match phase {
                Phase::Placement => Phase::Negotiate(self.place(shaper, rect)),
                Phase::Negotiate(placements) => {
                    let approved = match self.observer.as_mut() {
                        Some(observer) => observer.should_render(&mut Negotiation {
                            blocks: &mut self.blocks,
                            placements: &placements,
                            clipping_rect: &mut self.clipping_rect,
                        }),
                        None => true,
                    };
                    if approved {
                        Phase::Draw(placements)
                    } else {
                        vetoes += 1;
                        if vetoes > MAX_CONSECUTIVE_VETOES {
                            Phase::Abort
                        } else {
                            log::debug!("render vetoed ({vetoes} in a row), placing again");
                            Phase::Placement
                        }
                    }
                }
                Phase::Draw(placements) => return Some(self.draw(surface, rect, &placements)),
                Phase::Abort => {
                    log::warn!("render aborted after {vetoes} consecutive vetoes");
                    return None;
                }
            };
        }
    }

    fn place<S: Shaper + ?Sized>(&mut self, shaper: &mut S, rect: Rect) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(self.blocks.len());
        let mut remaining = rect;
        let mut propagate = false;
        for index in 0..self.blocks.len() {
            let mut clipping = self.clipping_rect_intersecting(remaining);
            let block = &mut self.blocks[index];
            let was_stale = block.take_stale();
            if propagate && !was_stale {
                block.invalidate();
                block.take_stale();
            }
            propagate |= was_stale;

            let bounds = block.compute_bounding_rect(shaper, remaining, clipping.as_mut());
            // Links are published again only for the blocks drawn from this placement.
            block.clear_links();
            if let Some(observer) = self.observer.as_mut() {
                observer.did_compute_bounding_rect(block, bounds);
            }
            placements.push(Placement {
                block: block.id(),
                index,
                rect: bounds,
            });
            remaining = Rect::new(rect.x0, bounds.y1.max(rect.y0), rect.x1, rect.y1);
        }

        if self.align_to_bottom && rect.y1.is_finite() {
            if let Some(last) = placements.last() {
                let dy = rect.y1 - last.rect.y1;
                for placement in &mut placements {
                    placement.rect = placement.rect + Vec2::new(0.0, dy);
                }
            }
        }
        placements
    }

    fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        rect: Rect,
        placements: &[Placement],
    ) -> Rect {
        let drawn = placements
            .iter()
            .filter(|placement| shares_area(placement.rect, rect))
            .collect::<Vec<_>>();
        let ids = drawn.iter().map(|placement| placement.block).collect::<Vec<_>>();
        let covered = union(rect, drawn.iter().copied());

        if let Some(observer) = self.observer.as_mut() {
            observer.will_render_blocks(&ids, covered);
        }
        let mut sightings = Vec::new();
        for placement in drawn {
            let Some(block) = self
                .blocks
                .iter_mut()
                .find(|block| block.id() == placement.block)
            else {
                continue;
            };
            if let Some(observer) = self.observer.as_mut() {
                observer.will_render_block(block, placement.rect);
            }
            match block.draw(surface, placement.rect) {
                Ok(found) => sightings.extend(found),
                Err(err) => log::warn!("skipping block: {err}"),
            }
            if let Some(observer) = self.observer.as_mut() {
                observer.did_render_block(block, placement.rect);
            }
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.did_render_blocks(&ids, covered);
            for sighting in &sightings {
                observer.did_encounter_link(sighting);
            }
        }
        covered
    }

    /// The link at `point` among the drawn blocks, with the block it belongs to.
    ///
    /// Later blocks are searched first. A link containing `point` wins over links whose touch
    /// region contains it.
    pub fn link_at(&self, point: Point) -> Option<(BlockId, &TextLink)> {
        let exact = self.blocks.iter().rev().find_map(|block| {
            block
                .links()
                .exact_link_at(point)
                .map(|link| (block.id(), link))
        });
        exact.or_else(|| {
            self.blocks.iter().rev().find_map(|block| {
                block
                    .links()
                    .touched_link_at(point)
                    .map(|link| (block.id(), link))
            })
        })
    }

    /// Detection requests for every block whose current text was not requested yet.
    pub fn detection_requests(&mut self) -> Vec<DetectionRequest> {
        self.blocks
            .iter_mut()
            .filter_map(TextBlock::detection_request)
            .collect()
    }

    /// Merge a detection result into its block.
    ///
    /// Returns `Ok(false)` if the block was removed or its text changed since the request. When
    /// new spans were found the block is invalidated and the observer is notified.
    pub fn deliver_detection(&mut self, result: &DetectionResult) -> Result<bool, Error> {
        let Some(index) = self.position(result.block) else {
            log::debug!("discarding detection result for removed block {:?}", result.block);
            return Ok(false);
        };
        let block = &mut self.blocks[index];
        let Some(added) = block.merge_detection(result)? else {
            return Ok(false);
        };
        if !added.is_empty() {
            if let Some(observer) = self.observer.as_mut() {
                observer.did_detect_spans(block, &added);
            }
        }
        Ok(true)
    }
}

fn union<'a>(rect: Rect, placements: impl Iterator<Item = &'a Placement>) -> Rect {
    placements
        .map(|placement| placement.rect)
        .reduce(|a, b| a.union(b))
        .unwrap_or_else(|| Rect::from_origin_size(rect.origin(), Size::ZERO))
}
