//! Chunk storage and the initial, single-chunk lighting pass.
//!
//! The pass computes three channels from block data alone: sunlight regen (sky exposure
//! depth), sunlight, and point light emitted by luminous blocks.

mod block;
mod chunk;
mod generator;
pub mod propagation;
pub mod region;
mod settings;
pub mod sunlight;

pub use block::*;
pub use chunk::*;
pub use generator::*;
pub use propagation::{LevelBuckets, LightQueue, PropagationPolicy, Propagator, Worklist};
pub use region::{diamond, Region};
pub use settings::*;
