use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::block::{BlockId, BLOCK_AIR};
use crate::settings::{LightChannel, LightSettings};

/// Chunk width (X axis) in voxels.
pub const CHUNK_SIZE_X: usize = 32;
/// Chunk height (Y axis) in voxels.
pub const CHUNK_SIZE_Y: usize = 64;
/// Chunk depth (Z axis) in voxels.
pub const CHUNK_SIZE_Z: usize = 32;
/// Total voxel count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Errors raised by chunk construction and the fallible accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// Local coordinates outside `[0, dims)`.
    #[error("local position ({x}, {y}, {z}) is outside chunk extent {dims}")]
    OutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        dims: ChunkDims,
    },
    /// A light value above the channel cap.
    #[error("{channel} value {value} exceeds cap {cap}")]
    ValueOutOfRange {
        channel: LightChannel,
        value: u8,
        cap: u8,
    },
    /// Dimensions, caps or block data that cannot form a valid chunk.
    #[error("invalid chunk configuration: {0}")]
    InvalidConfig(String),
}

/// Chunk-local position (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Neighbor one step in `dir`, or `None` when it would leave `dims`.
    #[inline]
    pub fn step(self, dir: Direction, dims: ChunkDims) -> Option<LocalPos> {
        let (dx, dy, dz) = dir.offset();
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        let z = self.z.checked_add_signed(dz as isize)?;
        dims.contains(x, y, z).then_some(LocalPos { x, y, z })
    }

    /// 6-connected (Manhattan) distance to `other`.
    pub fn manhattan(self, other: LocalPos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl fmt::Display for LocalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned neighbor directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    East,
    West,
    South,
    North,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Unit offset (dx, dy, dz).
    #[inline]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::South => (0, 0, 1),
            Direction::North => (0, 0, -1),
        }
    }
}

/// Chunk extent in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl ChunkDims {
    /// Reference 32x64x32 extent.
    pub const REFERENCE: Self = Self {
        x: CHUNK_SIZE_X,
        y: CHUNK_SIZE_Y,
        z: CHUNK_SIZE_Z,
    };

    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.x * self.y * self.z
    }

    #[inline]
    pub const fn contains(self, x: usize, y: usize, z: usize) -> bool {
        x < self.x && y < self.y && z < self.z
    }

    /// Linear index within the SoA arrays. Panics outside the extent.
    #[inline]
    pub fn index(self, pos: LocalPos) -> usize {
        assert!(
            self.contains(pos.x, pos.y, pos.z),
            "local position {pos} is outside chunk extent {self}"
        );
        (pos.y * self.z + pos.z) * self.x + pos.x
    }

    /// Inverse of [`ChunkDims::index`].
    #[inline]
    pub fn position(self, index: usize) -> LocalPos {
        debug_assert!(index < self.volume());
        let layer = self.x * self.z;
        LocalPos {
            x: index % self.x,
            y: index / layer,
            z: (index % layer) / self.x,
        }
    }

    /// Reject zero or overflowing extents.
    pub fn validate(self) -> Result<(), ChunkError> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(ChunkError::InvalidConfig(format!(
                "chunk dimensions must be non-zero (got {self})"
            )));
        }
        if self.x.checked_mul(self.y).and_then(|v| v.checked_mul(self.z)).is_none() {
            return Err(ChunkError::InvalidConfig(format!(
                "chunk dimensions {self} overflow the cell count"
            )));
        }
        Ok(())
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl fmt::Display for ChunkDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Chunk coordinate in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then y, then z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Dirty flags set whenever chunk data changes.
    pub struct DirtyFlags: u8 {
        const BLOCKS = 0b0000_0001;
        const LIGHT = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

/// Chunk storing block ids and three light channels in SoA form plus dirty flags.
///
/// All four arrays always hold exactly `dims.volume()` cells.
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkPos,
    dims: ChunkDims,
    settings: LightSettings,
    blocks: Vec<BlockId>,
    sunlight: Vec<u8>,
    sunlight_regen: Vec<u8>,
    light: Vec<u8>,
    dirty: DirtyFlags,
}

impl Chunk {
    /// Allocate a fresh reference-sized chunk filled with air.
    pub fn new(position: ChunkPos) -> Self {
        Self::allocate(position, ChunkDims::REFERENCE, LightSettings::REFERENCE)
    }

    /// Allocate an air-filled chunk with custom dimensions and caps.
    pub fn with_settings(
        position: ChunkPos,
        dims: ChunkDims,
        settings: LightSettings,
    ) -> Result<Self, ChunkError> {
        dims.validate()?;
        settings.validate(dims)?;
        Ok(Self::allocate(position, dims, settings))
    }

    /// Build a chunk from existing block data laid out by [`ChunkDims::index`].
    pub fn from_blocks(
        position: ChunkPos,
        dims: ChunkDims,
        settings: LightSettings,
        blocks: Vec<BlockId>,
    ) -> Result<Self, ChunkError> {
        let mut chunk = Self::with_settings(position, dims, settings)?;
        if blocks.len() != dims.volume() {
            return Err(ChunkError::InvalidConfig(format!(
                "expected {} blocks for extent {dims}, got {}",
                dims.volume(),
                blocks.len()
            )));
        }
        chunk.blocks = blocks;
        Ok(chunk)
    }

    fn allocate(position: ChunkPos, dims: ChunkDims, settings: LightSettings) -> Self {
        let volume = dims.volume();
        Self {
            position,
            dims,
            settings,
            blocks: vec![BLOCK_AIR; volume],
            sunlight: vec![0; volume],
            sunlight_regen: vec![0; volume],
            light: vec![0; volume],
            dirty: DirtyFlags::all(),
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn settings(&self) -> &LightSettings {
        &self.settings
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        self.dims.index(LocalPos { x, y, z })
    }

    fn checked_index(&self, x: usize, y: usize, z: usize) -> Result<usize, ChunkError> {
        if self.dims.contains(x, y, z) {
            Ok((y * self.dims.z + z) * self.dims.x + x)
        } else {
            Err(ChunkError::OutOfBounds {
                x,
                y,
                z,
                dims: self.dims,
            })
        }
    }

    /// Block at a local position. Panics outside the chunk.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.index(x, y, z)]
    }

    pub fn try_block(&self, x: usize, y: usize, z: usize) -> Result<BlockId, ChunkError> {
        Ok(self.blocks[self.checked_index(x, y, z)?])
    }

    /// Set a block and mark the relevant dirty flags.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        let idx = self.index(x, y, z);
        if self.blocks[idx] != block {
            self.blocks[idx] = block;
            self.dirty.insert(DirtyFlags::BLOCKS | DirtyFlags::LIGHT);
        }
    }

    pub fn try_set_block(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        block: BlockId,
    ) -> Result<(), ChunkError> {
        self.checked_index(x, y, z)?;
        self.set_block(x, y, z, block);
        Ok(())
    }

    pub fn sunlight(&self, x: usize, y: usize, z: usize) -> u8 {
        self.sunlight[self.index(x, y, z)]
    }

    pub fn sunlight_regen(&self, x: usize, y: usize, z: usize) -> u8 {
        self.sunlight_regen[self.index(x, y, z)]
    }

    pub fn light(&self, x: usize, y: usize, z: usize) -> u8 {
        self.light[self.index(x, y, z)]
    }

    /// Value of `channel` at a local position. Panics outside the chunk.
    pub fn channel_value(&self, channel: LightChannel, x: usize, y: usize, z: usize) -> u8 {
        self.channel(channel)[self.index(x, y, z)]
    }

    pub fn try_channel_value(
        &self,
        channel: LightChannel,
        x: usize,
        y: usize,
        z: usize,
    ) -> Result<u8, ChunkError> {
        Ok(self.channel(channel)[self.checked_index(x, y, z)?])
    }

    pub fn set_sunlight(&mut self, x: usize, y: usize, z: usize, value: u8) {
        self.set_channel_value(LightChannel::Sunlight, x, y, z, value);
    }

    pub fn set_sunlight_regen(&mut self, x: usize, y: usize, z: usize, value: u8) {
        self.set_channel_value(LightChannel::SunlightRegen, x, y, z, value);
    }

    pub fn set_light(&mut self, x: usize, y: usize, z: usize, value: u8) {
        self.set_channel_value(LightChannel::PointLight, x, y, z, value);
    }

    /// Write one channel cell. Panics outside the chunk or above the channel cap.
    pub fn set_channel_value(
        &mut self,
        channel: LightChannel,
        x: usize,
        y: usize,
        z: usize,
        value: u8,
    ) {
        if let Err(err) = self.try_set_channel_value(channel, x, y, z, value) {
            panic!("{err}");
        }
    }

    pub fn try_set_channel_value(
        &mut self,
        channel: LightChannel,
        x: usize,
        y: usize,
        z: usize,
        value: u8,
    ) -> Result<(), ChunkError> {
        let idx = self.checked_index(x, y, z)?;
        let cap = self.settings.cap(channel);
        if value > cap {
            return Err(ChunkError::ValueOutOfRange {
                channel,
                value,
                cap,
            });
        }
        self.channel_mut(channel)[idx] = value;
        Ok(())
    }

    /// Borrow raw block storage.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Borrow one light channel's raw storage.
    pub fn channel(&self, channel: LightChannel) -> &[u8] {
        match channel {
            LightChannel::Sunlight => &self.sunlight,
            LightChannel::SunlightRegen => &self.sunlight_regen,
            LightChannel::PointLight => &self.light,
        }
    }

    fn channel_mut(&mut self, channel: LightChannel) -> &mut [u8] {
        match channel {
            LightChannel::Sunlight => &mut self.sunlight,
            LightChannel::SunlightRegen => &mut self.sunlight_regen,
            LightChannel::PointLight => &mut self.light,
        }
    }

    /// Split borrow: blocks read-only, one channel writable.
    pub(crate) fn blocks_and_channel_mut(&mut self, channel: LightChannel) -> (&[BlockId], &mut [u8]) {
        let values = match channel {
            LightChannel::Sunlight => &mut self.sunlight,
            LightChannel::SunlightRegen => &mut self.sunlight_regen,
            LightChannel::PointLight => &mut self.light,
        };
        (&self.blocks, values)
    }

    /// Zero every light channel.
    pub fn clear_light(&mut self) {
        self.sunlight.fill(0);
        self.sunlight_regen.fill(0);
        self.light.fill(0);
        self.dirty.insert(DirtyFlags::LIGHT);
    }

    /// Digest over the extent and all three light channels, for determinism checks.
    pub fn light_digest(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for extent in [self.dims.x, self.dims.y, self.dims.z] {
            hasher.update(&(extent as u64).to_le_bytes());
        }
        hasher.update(&self.sunlight_regen);
        hasher.update(&self.sunlight);
        hasher.update(&self.light);
        hasher.finalize()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Consume and return the current dirty flags.
    pub fn take_dirty_flags(&mut self) -> DirtyFlags {
        let flags = self.dirty;
        self.dirty = DirtyFlags::empty();
        flags
    }

    pub(crate) fn mark_light_clean(&mut self) {
        self.dirty.remove(DirtyFlags::LIGHT);
    }
}
