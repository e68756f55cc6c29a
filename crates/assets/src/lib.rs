#![warn(missing_docs)]
//! Block pack schema, validation and the registry the lighting engine classifies blocks with.

mod loader;
mod registry;

pub use loader::{registry_from_file, registry_from_str};
pub use registry::{BlockDescriptor, BlockRegistry};

use serde::Deserialize;
use thiserror::Error;

/// Block definition as written in a pack.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDefinition {
    /// Human-readable identifier (e.g., "stone").
    pub name: String,
    /// Whether the block stops light.
    #[serde(default)]
    pub opaque: bool,
    /// Whether light passes through even though the block is opaque (glass, leaves).
    #[serde(default)]
    pub translucent: bool,
    /// Light emitted by the block, 0-15.
    #[serde(default)]
    pub luminance: u8,
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read asset pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse asset pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// A definition violates a registry rule.
    #[error("invalid block `{name}` (id {id}): {reason}")]
    InvalidBlock {
        /// Block id the definition would receive.
        id: usize,
        /// Block name from the pack.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The pack as a whole is unusable.
    #[error("invalid asset pack: {0}")]
    InvalidPack(String),
}

/// Parse a JSON string into a list of blocks.
pub fn load_blocks_from_str(input: &str) -> Result<Vec<BlockDefinition>, AssetError> {
    Ok(serde_json::from_str(input)?)
}
