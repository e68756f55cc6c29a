//! Axis-aligned regions and Manhattan shells over chunk-local positions.

use crate::chunk::{ChunkDims, LocalPos};

/// Axis-aligned box of local positions, `min` inclusive, `min + size` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min: LocalPos,
    pub size: ChunkDims,
}

impl Region {
    pub const fn new(min: LocalPos, size: ChunkDims) -> Self {
        Self { min, size }
    }

    /// Every cell of a chunk.
    pub const fn whole(dims: ChunkDims) -> Self {
        Self::new(LocalPos::new(0, 0, 0), dims)
    }

    /// One full horizontal layer at height `y`.
    pub const fn layer(dims: ChunkDims, y: usize) -> Self {
        Self::new(LocalPos::new(0, y, 0), ChunkDims::new(dims.x, 1, dims.z))
    }

    /// Full-width slab covering heights `[y_min, y_min + height)`.
    pub const fn slab(dims: ChunkDims, y_min: usize, height: usize) -> Self {
        Self::new(LocalPos::new(0, y_min, 0), ChunkDims::new(dims.x, height, dims.z))
    }

    pub const fn volume(&self) -> usize {
        self.size.volume()
    }

    pub fn contains(&self, pos: LocalPos) -> bool {
        pos.x >= self.min.x
            && pos.y >= self.min.y
            && pos.z >= self.min.z
            && pos.x < self.min.x + self.size.x
            && pos.y < self.min.y + self.size.y
            && pos.z < self.min.z + self.size.z
    }

    /// Iterate positions in storage order (x fastest, then z, then y).
    pub fn positions(&self) -> impl Iterator<Item = LocalPos> {
        let Region { min, size } = *self;
        (min.y..min.y + size.y).flat_map(move |y| {
            (min.z..min.z + size.z)
                .flat_map(move |z| (min.x..min.x + size.x).map(move |x| LocalPos::new(x, y, z)))
        })
    }
}

/// Positions at exactly `distance` 6-connected steps from `center`, clipped to `dims`.
///
/// Distance 0 yields `center` alone.
pub fn diamond(
    center: LocalPos,
    distance: usize,
    dims: ChunkDims,
) -> impl Iterator<Item = LocalPos> {
    let d = distance as i64;
    let (cx, cy, cz) = (center.x as i64, center.y as i64, center.z as i64);
    (-d..=d)
        .flat_map(move |dx| {
            let rem = d - dx.abs();
            (-rem..=rem).flat_map(move |dy| {
                let dz = rem - dy.abs();
                let signs: &'static [i64] = if dz == 0 { &[1] } else { &[1, -1] };
                signs.iter().map(move |s| (cx + dx, cy + dy, cz + dz * s))
            })
        })
        .filter_map(move |(x, y, z)| {
            if x < 0 || y < 0 || z < 0 {
                return None;
            }
            let (x, y, z) = (x as usize, y as usize, z as usize);
            dims.contains(x, y, z).then_some(LocalPos::new(x, y, z))
        })
}
