//! Column scans for sky exposure.
//!
//! Every column is walked from the top layer down with a running ceiling that starts one
//! layer above the chunk (assumed open sky) and drops to each blocking cell it meets. The
//! open depth under that ceiling drives both the regen accumulator and the sunlight seeds.

use crate::block::{BlockClassifier, BlockId};
use crate::chunk::{Chunk, ChunkDims, LocalPos};
use crate::propagation::PropagationPolicy;
use crate::settings::LightChannel;

/// Walk every column top-down. `visit` receives the open depth between the cell and the
/// ceiling above it, or `None` when the cell itself blocks light.
fn scan_columns<C, F>(
    dims: ChunkDims,
    blocks: &[BlockId],
    classifier: &C,
    policy: PropagationPolicy,
    mut visit: F,
) where
    C: BlockClassifier + ?Sized,
    F: FnMut(usize, Option<usize>),
{
    for z in 0..dims.z {
        for x in 0..dims.x {
            let mut ceiling = dims.y;
            for y in (0..dims.y).rev() {
                let idx = dims.index(LocalPos { x, y, z });
                if policy.blocks(classifier, blocks[idx]) {
                    ceiling = y;
                    visit(idx, None);
                } else {
                    visit(idx, Some(ceiling - y - 1));
                }
            }
        }
    }
}

/// Fill the sunlight-regen channel: `min(depth, max_sunlight_regen)` for open cells, 0 for
/// blocking ones. Returns the number of cells at the regen cap.
pub fn populate_sunlight_regen<C: BlockClassifier + ?Sized>(
    chunk: &mut Chunk,
    classifier: &C,
) -> usize {
    let dims = chunk.dims();
    let policy = PropagationPolicy::sunlight_regen(chunk.settings());
    let cap = policy.cap as usize;
    let (blocks, regen) = chunk.blocks_and_channel_mut(LightChannel::SunlightRegen);
    let mut saturated = 0;
    scan_columns(dims, blocks, classifier, policy, |idx, depth| {
        regen[idx] = match depth {
            Some(depth) => {
                if depth >= cap {
                    saturated += 1;
                }
                depth.min(cap) as u8
            }
            None => 0,
        };
    });
    saturated
}

/// Write the committed sunlight seeds: `clamp(depth - threshold, 0, max_sunlight)`.
///
/// For a column open to the top of the chunk `depth` is `size_y - y - 1`, so the seed is the
/// literal `size_y - threshold - y - 1` band near the bottom; cells below an obstruction
/// measure depth from that obstruction instead. Blocking cells seed 0. Cells above the band
/// stay 0 until neighboring chunks are relaxed. Returns the number of nonzero seeds.
pub fn seed_sunlight<C: BlockClassifier + ?Sized>(chunk: &mut Chunk, classifier: &C) -> usize {
    let dims = chunk.dims();
    let settings = *chunk.settings();
    let threshold = settings.sunlight_regen_threshold;
    let policy = PropagationPolicy::sunlight(&settings);
    let cap = policy.cap as usize;
    let (blocks, sunlight) = chunk.blocks_and_channel_mut(LightChannel::Sunlight);
    let mut seeded = 0;
    scan_columns(dims, blocks, classifier, policy, |idx, depth| {
        let seed = depth.map_or(0, |depth| depth.saturating_sub(threshold).min(cap)) as u8;
        if seed > 0 {
            seeded += 1;
        }
        sunlight[idx] = sunlight[idx].max(seed);
    });
    seeded
}
