//! Channel caps and the seeding threshold shared by every chunk of a world.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::block::BlockId;
use crate::chunk::{ChunkDims, ChunkError, CHUNK_SIZE_Y};

/// Maximum point-light level (0-15 range).
pub const MAX_LIGHT: u8 = 15;

/// Maximum sunlight level (0-15 range).
pub const MAX_SUNLIGHT: u8 = 15;

/// Saturation point of the sunlight-regen accumulator.
pub const MAX_SUNLIGHT_REGEN: u8 = 16;

/// Row count above the bottom band that seeds no committed sunlight.
pub const SUNLIGHT_REGEN_THRESHOLD: usize = CHUNK_SIZE_Y - MAX_SUNLIGHT_REGEN as usize;

/// Light levels are stored per cell in a nibble.
const LIGHT_STORAGE_CEILING: u8 = 15;

/// The three scalar channels a chunk carries next to its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightChannel {
    /// Directional ambient light from the sky.
    Sunlight,
    /// Sky-exposure depth accumulator.
    SunlightRegen,
    /// Light emitted by luminous blocks.
    PointLight,
}

impl LightChannel {
    /// All channels, in generation order.
    pub const ALL: [LightChannel; 3] = [
        LightChannel::SunlightRegen,
        LightChannel::Sunlight,
        LightChannel::PointLight,
    ];

    /// Short lowercase label used in logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            LightChannel::Sunlight => "sunlight",
            LightChannel::SunlightRegen => "sunlight_regen",
            LightChannel::PointLight => "light",
        }
    }
}

impl fmt::Display for LightChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-channel caps plus the regen threshold used by the sunlight seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSettings {
    pub max_light: u8,
    pub max_sunlight: u8,
    pub max_sunlight_regen: u8,
    /// Seeds are `clamp(ceiling - threshold - y - 1, 0, max_sunlight)`.
    pub sunlight_regen_threshold: usize,
}

impl LightSettings {
    /// Reference configuration for a 32x64x32 chunk.
    pub const REFERENCE: Self = Self {
        max_light: MAX_LIGHT,
        max_sunlight: MAX_SUNLIGHT,
        max_sunlight_regen: MAX_SUNLIGHT_REGEN,
        sunlight_regen_threshold: SUNLIGHT_REGEN_THRESHOLD,
    };

    /// Reference caps with the threshold derived from a chunk height (`size_y - max_regen`).
    pub fn for_height(size_y: usize) -> Self {
        Self {
            sunlight_regen_threshold: size_y.saturating_sub(MAX_SUNLIGHT_REGEN as usize),
            ..Self::REFERENCE
        }
    }

    /// Cap for the given channel.
    #[inline]
    pub fn cap(&self, channel: LightChannel) -> u8 {
        match channel {
            LightChannel::Sunlight => self.max_sunlight,
            LightChannel::SunlightRegen => self.max_sunlight_regen,
            LightChannel::PointLight => self.max_light,
        }
    }

    /// Reject caps of zero, light caps that do not fit a nibble, and thresholds beyond the chunk.
    pub fn validate(&self, dims: ChunkDims) -> Result<(), ChunkError> {
        for channel in LightChannel::ALL {
            if self.cap(channel) == 0 {
                return Err(ChunkError::InvalidConfig(format!(
                    "{channel} cap must be non-zero"
                )));
            }
        }
        if self.max_light > LIGHT_STORAGE_CEILING || self.max_sunlight > LIGHT_STORAGE_CEILING {
            return Err(ChunkError::InvalidConfig(format!(
                "light caps must not exceed {LIGHT_STORAGE_CEILING} (got light {}, sunlight {})",
                self.max_light, self.max_sunlight
            )));
        }
        if self.sunlight_regen_threshold > dims.y {
            return Err(ChunkError::InvalidConfig(format!(
                "sunlight regen threshold {} exceeds chunk height {}",
                self.sunlight_regen_threshold, dims.y
            )));
        }
        Ok(())
    }

    /// Reject a block that would emit more than the point-light cap.
    ///
    /// Generation itself clamps emission to `max_light`; this lets callers refuse such a
    /// block set up front instead.
    pub fn validate_luminance(&self, block_id: BlockId, luminance: u8) -> Result<(), ChunkError> {
        if luminance > self.max_light {
            return Err(ChunkError::InvalidConfig(format!(
                "block {block_id} emits {luminance}, above the light cap {}",
                self.max_light
            )));
        }
        Ok(())
    }
}

impl Default for LightSettings {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_threshold_is_height_minus_regen() {
        assert_eq!(SUNLIGHT_REGEN_THRESHOLD, 48);
        assert_eq!(LightSettings::for_height(64), LightSettings::REFERENCE);
        assert_eq!(LightSettings::for_height(8).sunlight_regen_threshold, 0);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let settings = LightSettings {
            max_sunlight: 0,
            ..LightSettings::REFERENCE
        };
        let err = settings.validate(ChunkDims::REFERENCE).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidConfig(_)));
        assert!(err.to_string().contains("sunlight cap"));
    }

    #[test]
    fn oversized_light_cap_is_rejected() {
        let settings = LightSettings {
            max_light: 16,
            ..LightSettings::REFERENCE
        };
        assert!(settings.validate(ChunkDims::REFERENCE).is_err());
    }

    #[test]
    fn threshold_above_chunk_is_rejected() {
        let settings = LightSettings::REFERENCE;
        let short = ChunkDims::new(32, 16, 32);
        assert!(settings.validate(short).is_err());
        assert!(settings.validate(ChunkDims::REFERENCE).is_ok());
    }

    #[test]
    fn channel_caps() {
        let settings = LightSettings::REFERENCE;
        assert_eq!(settings.cap(LightChannel::Sunlight), 15);
        assert_eq!(settings.cap(LightChannel::SunlightRegen), 16);
        assert_eq!(settings.cap(LightChannel::PointLight), 15);
    }

    #[test]
    fn channel_serializes_snake_case() {
        let json = serde_json::to_string(&LightChannel::SunlightRegen).unwrap();
        assert_eq!(json, "\"sunlight_regen\"");
    }
}
