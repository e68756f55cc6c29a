//! Property-based tests for chunk lighting generation.
//!
//! Validates, for random block layouts:
//! - every channel stays within its cap
//! - blocking cells carry no transmitted light
//! - generation is idempotent and independent of worklist order
//! - the result is a local fixed point of the max-minus-one rule

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxlight_world::{
    blocks_light, emitted_light, generate_internal_lighting, generate_internal_lighting_with,
    BlockClassifier, BlockId, Chunk, ChunkDims, ChunkPos, Direction, LightChannel, LightQueue,
    LightSettings, LocalPos, Worklist,
};

const STONE: BlockId = 1;
const GLASS: BlockId = 2;
const TORCH: BlockId = 3;
const GLOWSTONE: BlockId = 4;

const DIMS: ChunkDims = ChunkDims::new(8, 24, 8);

struct TestBlocks;

impl BlockClassifier for TestBlocks {
    fn is_opaque(&self, block_id: BlockId) -> bool {
        matches!(block_id, STONE | GLASS | GLOWSTONE)
    }

    fn is_translucent(&self, block_id: BlockId) -> bool {
        block_id == GLASS
    }

    fn luminance(&self, block_id: BlockId) -> u8 {
        match block_id {
            TORCH => 14,
            GLOWSTONE => 11,
            _ => 0,
        }
    }
}

/// Worklist that hands entries back in a seeded random order.
struct ShuffledWorklist {
    rng: StdRng,
    entries: Vec<LocalPos>,
}

impl Worklist for ShuffledWorklist {
    fn push(&mut self, pos: LocalPos, _level: u8) {
        self.entries.push(pos);
    }

    fn pop(&mut self) -> Option<LocalPos> {
        if self.entries.is_empty() {
            return None;
        }
        let i = self.rng.gen_range(0..self.entries.len());
        Some(self.entries.swap_remove(i))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn random_chunk(seed: u64, solid_percent: u32, emitters: usize) -> Chunk {
    let mut rng = StdRng::seed_from_u64(seed);
    let blocks = (0..DIMS.volume())
        .map(|_| {
            if rng.gen_range(0..100) < solid_percent {
                if rng.gen_bool(0.2) {
                    GLASS
                } else {
                    STONE
                }
            } else {
                0
            }
        })
        .collect();
    let mut chunk = Chunk::from_blocks(
        ChunkPos::new(0, 0, 0),
        DIMS,
        LightSettings::for_height(DIMS.y),
        blocks,
    )
    .expect("block count matches extent");
    for _ in 0..emitters {
        let (x, y, z) = (
            rng.gen_range(0..DIMS.x),
            rng.gen_range(0..DIMS.y),
            rng.gen_range(0..DIMS.z),
        );
        let block = if rng.gen_bool(0.5) { TORCH } else { GLOWSTONE };
        chunk.set_block(x, y, z, block);
    }
    chunk
}

fn layout() -> impl Strategy<Value = (u64, u32, usize)> {
    (any::<u64>(), 0u32..70, 0usize..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every channel respects its cap.
    #[test]
    fn light_levels_in_range((seed, solid, emitters) in layout()) {
        let mut chunk = random_chunk(seed, solid, emitters);
        generate_internal_lighting(&mut chunk, &TestBlocks);
        let settings = *chunk.settings();

        for channel in LightChannel::ALL {
            let cap = settings.cap(channel);
            for (idx, &value) in chunk.channel(channel).iter().enumerate() {
                prop_assert!(
                    value <= cap,
                    "{} {} above cap {} at {}",
                    channel, value, cap, DIMS.position(idx)
                );
            }
        }
    }

    /// Property: blocking cells hold no sunlight or regen, and only their own emission.
    #[test]
    fn blocking_cells_stay_dark((seed, solid, emitters) in layout()) {
        let mut chunk = random_chunk(seed, solid, emitters);
        generate_internal_lighting(&mut chunk, &TestBlocks);

        for (idx, &block) in chunk.blocks().iter().enumerate() {
            if !blocks_light(&TestBlocks, block) {
                continue;
            }
            let pos = DIMS.position(idx);
            prop_assert_eq!(chunk.channel(LightChannel::Sunlight)[idx], 0, "sunlight at {}", pos);
            prop_assert_eq!(chunk.channel(LightChannel::SunlightRegen)[idx], 0, "regen at {}", pos);
            prop_assert_eq!(
                chunk.channel(LightChannel::PointLight)[idx],
                emitted_light(&TestBlocks, block),
                "light at {}", pos
            );
        }
    }

    /// Property: a second pass over the same blocks yields identical arrays.
    #[test]
    fn generation_is_idempotent((seed, solid, emitters) in layout()) {
        let mut chunk = random_chunk(seed, solid, emitters);
        generate_internal_lighting(&mut chunk, &TestBlocks);
        let first = chunk.light_digest();
        generate_internal_lighting(&mut chunk, &TestBlocks);
        prop_assert_eq!(first, chunk.light_digest());
    }

    /// Property: the fixed point does not depend on worklist order.
    #[test]
    fn worklist_order_does_not_matter(
        (seed, solid, emitters) in layout(),
        order_seed in any::<u64>(),
    ) {
        let mut buckets = random_chunk(seed, solid, emitters);
        let mut fifo = buckets.clone();
        let mut shuffled = buckets.clone();

        generate_internal_lighting(&mut buckets, &TestBlocks);
        generate_internal_lighting_with(&mut fifo, &TestBlocks, |_| LightQueue::new());
        let mut stream = order_seed;
        generate_internal_lighting_with(&mut shuffled, &TestBlocks, |_| {
            stream = stream.wrapping_add(1);
            ShuffledWorklist { rng: StdRng::seed_from_u64(stream), entries: Vec::new() }
        });

        prop_assert_eq!(buckets.light_digest(), fifo.light_digest());
        prop_assert_eq!(buckets.light_digest(), shuffled.light_digest());
    }

    /// Property: no lit cell could still raise an open neighbor, and every point-lit cell
    /// that is not an emitter is supported by a neighbor exactly one level brighter.
    #[test]
    fn point_light_is_a_local_fixed_point((seed, solid, emitters) in layout()) {
        let mut chunk = random_chunk(seed, solid, emitters);
        generate_internal_lighting(&mut chunk, &TestBlocks);
        let light = chunk.channel(LightChannel::PointLight);

        for (idx, &value) in light.iter().enumerate() {
            let pos = DIMS.position(idx);
            let block = chunk.blocks()[idx];
            let mut supported = false;
            for dir in Direction::ALL {
                let Some(n) = pos.step(dir, DIMS) else { continue };
                let nidx = DIMS.index(n);
                let neighbor_blocks = blocks_light(&TestBlocks, chunk.blocks()[nidx]);
                if value > 1 && !neighbor_blocks {
                    prop_assert!(
                        light[nidx] >= value - 1,
                        "{} at {} could raise {} at {}",
                        value, pos, light[nidx], n
                    );
                }
                if light[nidx] == value + 1 {
                    supported = true;
                }
            }
            if value > 0 && value != emitted_light(&TestBlocks, block) {
                prop_assert!(supported, "unsupported light {} at {}", value, pos);
            }
        }
    }

    /// Property: sunlight never drops more than one level between open neighbors.
    #[test]
    fn sunlight_is_a_local_fixed_point((seed, solid, emitters) in layout()) {
        let mut chunk = random_chunk(seed, solid, emitters);
        generate_internal_lighting(&mut chunk, &TestBlocks);
        let sunlight = chunk.channel(LightChannel::Sunlight);

        for (idx, &value) in sunlight.iter().enumerate() {
            let pos = DIMS.position(idx);
            for dir in Direction::ALL {
                let Some(n) = pos.step(dir, DIMS) else { continue };
                let nidx = DIMS.index(n);
                if value > 1 && !blocks_light(&TestBlocks, chunk.blocks()[nidx]) {
                    prop_assert!(sunlight[nidx] >= value - 1, "{} at {} vs {}", value, pos, n);
                }
            }
        }
    }

    /// Property: opening a cell never darkens the chunk.
    #[test]
    fn removing_a_block_never_darkens(
        (seed, solid, emitters) in layout(),
        x in 0usize..8, y in 0usize..24, z in 0usize..8,
    ) {
        let mut before = random_chunk(seed, solid, emitters);
        let mut after = before.clone();
        after.set_block(x, y, z, 0);

        generate_internal_lighting(&mut before, &TestBlocks);
        generate_internal_lighting(&mut after, &TestBlocks);

        let lost_emitter = emitted_light(&TestBlocks, before.block(x, y, z)) > 0;
        let sun_before = before.channel(LightChannel::Sunlight);
        let sun_after = after.channel(LightChannel::Sunlight);
        for idx in 0..DIMS.volume() {
            prop_assert!(sun_after[idx] >= sun_before[idx], "sunlight dropped at {}", DIMS.position(idx));
        }
        if !lost_emitter {
            let light_before = before.channel(LightChannel::PointLight);
            let light_after = after.channel(LightChannel::PointLight);
            for idx in 0..DIMS.volume() {
                prop_assert!(light_after[idx] >= light_before[idx], "light dropped at {}", DIMS.position(idx));
            }
        }
    }

    /// Property: a lone emitter lights cells by Manhattan distance in an open chunk.
    #[test]
    fn lone_emitter_is_isotropic(x in 0usize..8, y in 0usize..24, z in 0usize..8) {
        let mut chunk = Chunk::with_settings(
            ChunkPos::new(0, 0, 0),
            DIMS,
            LightSettings::for_height(DIMS.y),
        ).unwrap();
        chunk.set_block(x, y, z, TORCH);
        generate_internal_lighting(&mut chunk, &TestBlocks);

        let center = LocalPos::new(x, y, z);
        for (idx, &value) in chunk.channel(LightChannel::PointLight).iter().enumerate() {
            let pos = DIMS.position(idx);
            let expected = 14usize.saturating_sub(pos.manhattan(center)) as u8;
            prop_assert_eq!(value, expected, "light at {}", pos);
        }
    }
}
