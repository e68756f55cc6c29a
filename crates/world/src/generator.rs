//! Initial lighting for a freshly generated chunk.
//!
//! Runs the regen scan, seeds sunlight from it, relaxes sunlight, then relaxes point light
//! from every luminous block. Reads and writes only the chunk it is given.

use serde::Serialize;
use tracing::debug;

use crate::block::{emitted_light, BlockClassifier};
use crate::chunk::{Chunk, ChunkPos};
use crate::propagation::{LevelBuckets, PropagationPolicy, Propagator, Worklist};
use crate::settings::LightChannel;
use crate::sunlight::{populate_sunlight_regen, seed_sunlight};

/// Describes one channel's propagation for instrumentation/testkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightUpdate {
    pub chunk_pos: ChunkPos,
    pub light_type: LightChannel,
    pub seeds: usize,
    pub nodes_processed: usize,
}

/// Summary of a full generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightingReport {
    pub chunk_pos: ChunkPos,
    /// Cells whose regen reached the cap.
    pub regen_saturated: usize,
    pub sunlight: LightUpdate,
    pub light: LightUpdate,
}

impl LightingReport {
    pub fn nodes_processed(&self) -> usize {
        self.sunlight.nodes_processed + self.light.nodes_processed
    }
}

/// Populate the regen, sunlight and point-light channels of `chunk` from its blocks.
///
/// Previous light values are discarded, so running this twice on an unmodified chunk
/// leaves identical arrays.
pub fn generate_internal_lighting<C: BlockClassifier + ?Sized>(
    chunk: &mut Chunk,
    classifier: &C,
) -> LightingReport {
    generate_internal_lighting_with(chunk, classifier, |policy| LevelBuckets::new(policy.cap))
}

/// Same as [`generate_internal_lighting`] with a caller-chosen worklist per channel.
pub fn generate_internal_lighting_with<C, W, F>(
    chunk: &mut Chunk,
    classifier: &C,
    mut make_worklist: F,
) -> LightingReport
where
    C: BlockClassifier + ?Sized,
    W: Worklist,
    F: FnMut(PropagationPolicy) -> W,
{
    let chunk_pos = chunk.position();
    let dims = chunk.dims();
    let settings = *chunk.settings();
    chunk.clear_light();

    let regen_saturated = populate_sunlight_regen(chunk, classifier);
    seed_sunlight(chunk, classifier);

    let sunlight_policy = PropagationPolicy::sunlight(&settings);
    let mut sunlight = Propagator::with_worklist(
        classifier,
        sunlight_policy,
        dims,
        make_worklist(sunlight_policy),
    );
    sunlight.seed_from_channel(chunk);
    let sunlight_nodes = sunlight.process(chunk);
    let sunlight = LightUpdate {
        chunk_pos,
        light_type: LightChannel::Sunlight,
        seeds: sunlight.seeds(),
        nodes_processed: sunlight_nodes,
    };

    let light_policy = PropagationPolicy::point_light(&settings);
    let mut light =
        Propagator::with_worklist(classifier, light_policy, dims, make_worklist(light_policy));
    for idx in 0..dims.volume() {
        let luminance = emitted_light(classifier, chunk.blocks()[idx]);
        if luminance > 0 {
            light.propagate_from(chunk, dims.position(idx), luminance);
        }
    }
    let light_nodes = light.process(chunk);
    let light = LightUpdate {
        chunk_pos,
        light_type: LightChannel::PointLight,
        seeds: light.seeds(),
        nodes_processed: light_nodes,
    };

    chunk.mark_light_clean();

    debug!(
        chunk = %chunk_pos,
        regen_saturated,
        sunlight_seeds = sunlight.seeds,
        sunlight_nodes = sunlight.nodes_processed,
        light_seeds = light.seeds,
        light_nodes = light.nodes_processed,
        "generated internal lighting"
    );

    LightingReport {
        chunk_pos,
        regen_saturated,
        sunlight,
        light,
    }
}
