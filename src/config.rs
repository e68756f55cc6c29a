use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use voxlight_assets::{registry_from_file, BlockDescriptor, BlockRegistry};
use voxlight_world::{
    ChunkDims, LightSettings, MAX_LIGHT, MAX_SUNLIGHT, MAX_SUNLIGHT_REGEN,
};

pub const DEFAULT_LIGHTING_PATH: &str = "config/lighting.toml";
pub const DEFAULT_BLOCKS_PATH: &str = "config/blocks.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Chunk extent in cells.
    pub chunk: ChunkDims,
    pub max_light: u8,
    pub max_sunlight: u8,
    pub max_sunlight_regen: u8,
    /// Derived as `chunk.y - max_sunlight_regen` when absent.
    pub sunlight_regen_threshold: Option<usize>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkDims::REFERENCE,
            max_light: MAX_LIGHT,
            max_sunlight: MAX_SUNLIGHT,
            max_sunlight_regen: MAX_SUNLIGHT_REGEN,
            sunlight_regen_threshold: None,
        }
    }
}

impl LightingConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let config = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<LightingConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    return LightingConfig::default();
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_LIGHTING_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Lighting config not found at {}. Using defaults",
                        path.display()
                    );
                }
                return LightingConfig::default();
            }
        };

        if let Err(err) = config
            .chunk
            .validate()
            .and_then(|()| config.settings().validate(config.chunk))
        {
            warn!("Invalid lighting config in {}: {err}. Using defaults", path.display());
            return LightingConfig::default();
        }
        config
    }

    pub fn settings(&self) -> LightSettings {
        let threshold = self.sunlight_regen_threshold.unwrap_or_else(|| {
            self.chunk
                .y
                .saturating_sub(self.max_sunlight_regen as usize)
        });
        LightSettings {
            max_light: self.max_light,
            max_sunlight: self.max_sunlight,
            max_sunlight_regen: self.max_sunlight_regen,
            sunlight_regen_threshold: threshold,
        }
    }
}

fn default_block_registry() -> Result<BlockRegistry> {
    Ok(BlockRegistry::new(vec![
        BlockDescriptor::simple("air", false),
        BlockDescriptor::simple("stone", true),
        BlockDescriptor {
            translucent: true,
            ..BlockDescriptor::simple("glass", true)
        },
        BlockDescriptor {
            luminance: 15,
            ..BlockDescriptor::simple("glowstone", true)
        },
        BlockDescriptor::emitter("torch", 14),
    ])?)
}

/// Load the block pack, falling back to a minimal built-in registry when the file is absent
/// or invalid.
pub fn load_block_registry(path: &Path) -> Result<BlockRegistry> {
    match registry_from_file(path) {
        Ok(registry) => Ok(registry),
        Err(err) => {
            warn!("Failed to load block pack {}: {err}. Using built-in blocks", path.display());
            default_block_registry().context("built-in block registry is invalid")
        }
    }
}
