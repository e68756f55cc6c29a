//! Queue-driven light relaxation shared by every channel.
//!
//! A [`Propagator`] raises cells of one channel from a set of seeds until no neighbor can be
//! raised further. Values only ever increase and are capped per channel, so the number of
//! enqueue events is bounded by cells x cap and the fixed point does not depend on the order
//! the worklist hands cells back.

use std::collections::VecDeque;

use crate::block::{blocks_light, BlockClassifier, BlockId};
use crate::chunk::{Chunk, ChunkDims, Direction, LocalPos};
use crate::settings::{LightChannel, LightSettings};

/// Blocking, attenuation and cap for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationPolicy {
    pub channel: LightChannel,
    pub cap: u8,
    /// Levels lost per hop.
    pub falloff: u8,
}

impl PropagationPolicy {
    pub fn for_channel(channel: LightChannel, settings: &LightSettings) -> Self {
        Self {
            channel,
            cap: settings.cap(channel),
            falloff: 1,
        }
    }

    pub fn sunlight(settings: &LightSettings) -> Self {
        Self::for_channel(LightChannel::Sunlight, settings)
    }

    pub fn sunlight_regen(settings: &LightSettings) -> Self {
        Self::for_channel(LightChannel::SunlightRegen, settings)
    }

    pub fn point_light(settings: &LightSettings) -> Self {
        Self::for_channel(LightChannel::PointLight, settings)
    }

    /// Whether `block` refuses transmitted light on this channel.
    #[inline]
    pub fn blocks<C: BlockClassifier + ?Sized>(&self, classifier: &C, block: BlockId) -> bool {
        blocks_light(classifier, block)
    }

    /// Value proposed to a neighbor one hop away in `direction`.
    ///
    /// Uniform in every direction; sunlight's downward bias comes from seeding alone.
    #[inline]
    pub fn attenuate(&self, value: u8, _direction: Direction) -> u8 {
        value.saturating_sub(self.falloff)
    }

    /// Merge a proposed value into the current one.
    #[inline]
    pub fn merge(&self, current: u8, proposed: u8) -> u8 {
        current.max(proposed.min(self.cap))
    }
}

/// Pending-cell store driving a [`Propagator`].
///
/// Implementations decide only the order cells come back; the fixed point is the same.
pub trait Worklist {
    /// Queue `pos`, whose value was just raised to `level`.
    fn push(&mut self, pos: LocalPos, level: u8);
    fn pop(&mut self) -> Option<LocalPos>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FIFO queue for breadth-first propagation.
#[derive(Debug, Default)]
pub struct LightQueue {
    queue: VecDeque<LocalPos>,
}

impl LightQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(256),
        }
    }
}

impl Worklist for LightQueue {
    fn push(&mut self, pos: LocalPos, _level: u8) {
        self.queue.push_back(pos);
    }

    fn pop(&mut self) -> Option<LocalPos> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Buckets indexed by level, drained brightest first.
///
/// With uniform falloff a cell popped from the top bucket already holds its final value,
/// so most cells spread exactly once per pass.
#[derive(Debug, Default)]
pub struct LevelBuckets {
    buckets: Vec<Vec<LocalPos>>,
    top: usize,
    len: usize,
}

impl LevelBuckets {
    pub fn new(cap: u8) -> Self {
        Self {
            buckets: vec![Vec::new(); cap as usize + 1],
            top: 0,
            len: 0,
        }
    }
}

impl Worklist for LevelBuckets {
    fn push(&mut self, pos: LocalPos, level: u8) {
        let level = level as usize;
        if level >= self.buckets.len() {
            self.buckets.resize_with(level + 1, Vec::new);
        }
        self.buckets[level].push(pos);
        self.top = self.top.max(level);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<LocalPos> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(pos) = self.buckets[self.top].pop() {
                self.len -= 1;
                return Some(pos);
            }
            // len > 0 guarantees a lower non-empty bucket exists.
            self.top -= 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Relaxes one light channel of a chunk from queued seeds.
pub struct Propagator<'c, C: ?Sized, W = LevelBuckets> {
    classifier: &'c C,
    policy: PropagationPolicy,
    dims: ChunkDims,
    worklist: W,
    /// Level each cell was last queued at; 0 when not pending.
    pending: Vec<u8>,
    seeds: usize,
}

impl<'c, C: BlockClassifier + ?Sized> Propagator<'c, C, LevelBuckets> {
    /// Propagator using brightest-first buckets.
    pub fn new(classifier: &'c C, policy: PropagationPolicy, dims: ChunkDims) -> Self {
        Self::with_worklist(classifier, policy, dims, LevelBuckets::new(policy.cap))
    }
}

impl<'c, C: BlockClassifier + ?Sized, W: Worklist> Propagator<'c, C, W> {
    pub fn with_worklist(
        classifier: &'c C,
        policy: PropagationPolicy,
        dims: ChunkDims,
        worklist: W,
    ) -> Self {
        Self {
            classifier,
            policy,
            dims,
            worklist,
            pending: vec![0; dims.volume()],
            seeds: 0,
        }
    }

    #[inline]
    pub fn policy(&self) -> PropagationPolicy {
        self.policy
    }

    /// Number of seeds accepted so far.
    pub fn seeds(&self) -> usize {
        self.seeds
    }

    /// Raise `pos` to at least `value` (capped) and queue it as a source.
    ///
    /// The cell itself is written even when its block blocks light, which is how luminous
    /// opaque blocks hold their own emission. Returns whether the cell was queued.
    pub fn propagate_from(&mut self, chunk: &mut Chunk, pos: LocalPos, value: u8) -> bool {
        debug_assert_eq!(chunk.dims(), self.dims);
        let idx = self.dims.index(pos);
        let (_, values) = chunk.blocks_and_channel_mut(self.policy.channel);
        let merged = self.policy.merge(values[idx], value);
        values[idx] = merged;
        if merged == 0 {
            return false;
        }
        self.seeds += 1;
        self.enqueue(idx, pos, merged)
    }

    /// Queue every nonzero cell already written to the channel. Returns how many were queued.
    pub fn seed_from_channel(&mut self, chunk: &Chunk) -> usize {
        debug_assert_eq!(chunk.dims(), self.dims);
        let dims = self.dims;
        let mut queued = 0;
        for (idx, &value) in chunk.channel(self.policy.channel).iter().enumerate() {
            if value > 0 && self.enqueue(idx, dims.position(idx), value) {
                queued += 1;
            }
        }
        self.seeds += queued;
        queued
    }

    /// Queue a cell unless it is already pending at an equal or higher level.
    #[inline]
    fn enqueue(&mut self, idx: usize, pos: LocalPos, level: u8) -> bool {
        if self.pending[idx] >= level {
            return false;
        }
        self.pending[idx] = level;
        self.worklist.push(pos, level);
        true
    }

    /// Drain the worklist. Returns the number of cells that spread to their neighbors.
    pub fn process(&mut self, chunk: &mut Chunk) -> usize {
        debug_assert_eq!(chunk.dims(), self.dims);
        let dims = self.dims;
        let policy = self.policy;
        let (blocks, values) = chunk.blocks_and_channel_mut(policy.channel);
        let mut nodes_processed = 0;

        while let Some(pos) = self.worklist.pop() {
            let idx = dims.index(pos);
            // Superseded entry; the cell already spread at its current value.
            if self.pending[idx] == 0 {
                continue;
            }
            self.pending[idx] = 0;
            nodes_processed += 1;

            let level = values[idx];
            if level <= policy.falloff {
                continue;
            }

            for dir in Direction::ALL {
                // Chunk edges are hard walls here; cross-chunk relaxation happens elsewhere.
                let Some(neighbor) = pos.step(dir, dims) else {
                    continue;
                };
                let nidx = dims.index(neighbor);
                if policy.blocks(self.classifier, blocks[nidx]) {
                    continue;
                }
                let proposed = policy.attenuate(level, dir);
                let current = values[nidx];
                let merged = policy.merge(current, proposed);
                if merged > current {
                    values[nidx] = merged;
                    if self.pending[nidx] < merged {
                        self.pending[nidx] = merged;
                        self.worklist.push(neighbor, merged);
                    }
                }
            }
        }

        tracing::trace!(
            channel = %policy.channel,
            seeds = self.seeds,
            nodes_processed,
            "light channel relaxed"
        );
        nodes_processed
    }
}
