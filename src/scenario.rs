//! Named block layouts the CLI can light.

use anyhow::{Context, Result};
use clap::ValueEnum;
use voxlight_assets::BlockRegistry;
use voxlight_world::{diamond, BlockId, Chunk, ChunkDims, ChunkPos, LightSettings, LocalPos, Region};

/// Height of the shading slab used by `slab` and `gap`.
const SLAB_Y: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// No blocks at all.
    Open,
    /// One full stone layer near the bottom.
    Slab,
    /// The stone layer with a single open cell over the centre column.
    Gap,
    /// A lone torch in the middle of open air.
    Emitter,
    /// Solid ground with a hollow room lit by glowstone and a torch, under a glass skylight.
    Cavern,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Open => "open",
            Scenario::Slab => "slab",
            Scenario::Gap => "gap",
            Scenario::Emitter => "emitter",
            Scenario::Cavern => "cavern",
        }
    }

    /// Default probe column: the horizontal centre of the chunk.
    pub fn default_probe(dims: ChunkDims) -> (usize, usize) {
        (dims.x / 2, dims.z / 2)
    }

    pub fn build(
        self,
        dims: ChunkDims,
        settings: LightSettings,
        registry: &BlockRegistry,
    ) -> Result<Chunk> {
        let mut chunk = Chunk::with_settings(ChunkPos::new(0, 0, 0), dims, settings)
            .with_context(|| format!("cannot allocate a {dims} chunk"))?;
        registry
            .check_settings(&settings)
            .context("block pack does not fit the light caps")?;
        let (cx, cz) = Self::default_probe(dims);
        let slab_y = SLAB_Y.min(dims.y - 1);

        match self {
            Scenario::Open => {}
            Scenario::Slab => fill(&mut chunk, Region::layer(dims, slab_y), registry.require("stone")?),
            Scenario::Gap => {
                fill(&mut chunk, Region::layer(dims, slab_y), registry.require("stone")?);
                chunk.set_block(cx, slab_y, cz, 0);
            }
            Scenario::Emitter => {
                chunk.set_block(cx, dims.y / 2, cz, registry.require("torch")?);
            }
            Scenario::Cavern => build_cavern(&mut chunk, registry)?,
        }
        Ok(chunk)
    }
}

fn fill(chunk: &mut Chunk, region: Region, block: BlockId) {
    for pos in region.positions() {
        chunk.set_block(pos.x, pos.y, pos.z, block);
    }
}

fn build_cavern(chunk: &mut Chunk, registry: &BlockRegistry) -> Result<()> {
    let stone = registry.require("stone")?;
    let glass = registry.require("glass")?;
    let glowstone = registry.require("glowstone")?;
    let torch = registry.require("torch")?;

    let dims = chunk.dims();
    let surface = (dims.y * 3 / 4).max(1);
    fill(chunk, Region::slab(dims, 0, surface), stone);

    // Room interior, one cell of wall on every side where the chunk allows it.
    let floor = 1.min(surface - 1);
    let min = LocalPos::new(dims.x.min(2) / 2, floor, dims.z.min(2) / 2);
    let size = ChunkDims::new(
        dims.x.saturating_sub(2 * min.x).max(1),
        (surface - floor).saturating_sub(1).max(1),
        dims.z.saturating_sub(2 * min.z).max(1),
    );
    let room = Region::new(min, size);
    fill(chunk, room, 0);

    let (cx, cz) = Scenario::default_probe(dims);
    // Glass shaft from the room ceiling to the surface.
    for y in min.y + size.y..surface {
        chunk.set_block(cx, y, cz, glass);
    }
    let ceiling = min.y + size.y - 1;
    chunk.set_block(cx, ceiling, cz, glowstone);
    chunk.set_block(min.x, min.y, min.z, torch);

    // Pillar ring around the probe column, halfway up the room.
    let mid = LocalPos::new(cx, min.y + size.y / 2, cz);
    for pos in diamond(mid, 3, dims).filter(|p| p.y == mid.y && room.contains(*p)) {
        chunk.set_block(pos.x, pos.y, pos.z, stone);
    }
    Ok(())
}
