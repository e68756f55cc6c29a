use std::collections::HashMap;

use voxlight_world::{BlockClassifier, BlockId, ChunkError, LightSettings, BLOCK_AIR, MAX_LIGHT};

use crate::{AssetError, BlockDefinition};

/// Light-relevant block metadata loaded from packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Human-readable identifier (e.g., "stone").
    pub name: String,
    /// Whether the block stops light.
    pub opaque: bool,
    /// Whether light passes through despite `opaque`.
    pub translucent: bool,
    /// Emitted light level.
    pub luminance: u8,
}

impl BlockDescriptor {
    /// Construct descriptor from the JSON definition.
    pub fn from_definition(def: BlockDefinition) -> Self {
        Self {
            name: def.name,
            opaque: def.opaque,
            translucent: def.translucent,
            luminance: def.luminance,
        }
    }

    /// Helper for tests/examples that need a simple descriptor.
    pub fn simple(name: &str, opaque: bool) -> Self {
        Self {
            name: name.to_string(),
            opaque,
            translucent: false,
            luminance: 0,
        }
    }

    /// Non-opaque emitter such as a torch.
    pub fn emitter(name: &str, luminance: u8) -> Self {
        Self {
            luminance,
            ..Self::simple(name, false)
        }
    }
}

/// Registry storing block descriptors keyed by id.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    descriptors: Vec<BlockDescriptor>,
    name_to_id: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Construct a registry from the supplied descriptors, validating them.
    ///
    /// Id 0 must be a transparent, non-luminous `air`; names must be unique and luminance must
    /// not exceed [`MAX_LIGHT`].
    pub fn new(descriptors: Vec<BlockDescriptor>) -> Result<Self, AssetError> {
        if descriptors.len() > BlockId::MAX as usize + 1 {
            return Err(AssetError::InvalidPack(format!(
                "{} blocks exceed the id space",
                descriptors.len()
            )));
        }
        match descriptors.first() {
            None => return Err(AssetError::InvalidPack("pack defines no blocks".into())),
            Some(air) if air.name != "air" || air.opaque || air.luminance > 0 => {
                return Err(invalid(
                    BLOCK_AIR as usize,
                    air,
                    "id 0 must be a transparent, non-luminous `air`",
                ));
            }
            Some(_) => {}
        }

        let mut name_to_id = HashMap::with_capacity(descriptors.len());
        for (id, desc) in descriptors.iter().enumerate() {
            if desc.luminance > MAX_LIGHT {
                return Err(invalid(
                    id,
                    desc,
                    &format!("luminance {} exceeds {MAX_LIGHT}", desc.luminance),
                ));
            }
            if name_to_id.insert(desc.name.clone(), id as BlockId).is_some() {
                return Err(invalid(id, desc, "duplicate name"));
            }
        }
        Ok(Self {
            descriptors,
            name_to_id,
        })
    }

    /// Look up a descriptor by numeric id.
    pub fn descriptor(&self, id: BlockId) -> Option<&BlockDescriptor> {
        self.descriptors.get(id as usize)
    }

    /// Resolve a block id by its name.
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Like [`Self::id_by_name`] but reports the missing name.
    pub fn require(&self, name: &str) -> Result<BlockId, AssetError> {
        self.id_by_name(name)
            .ok_or_else(|| AssetError::InvalidPack(format!("block `{name}` is not defined")))
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Always false for a validated registry, which holds at least `air`.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(id, desc)| (id as BlockId, desc))
    }

    /// Check every emitter against the point-light cap of `settings`.
    pub fn check_settings(&self, settings: &LightSettings) -> Result<(), ChunkError> {
        self.iter()
            .try_for_each(|(id, desc)| settings.validate_luminance(id, desc.luminance))
    }
}

/// Unknown ids classify as transparent and dark.
impl BlockClassifier for BlockRegistry {
    fn is_opaque(&self, block_id: BlockId) -> bool {
        self.descriptor(block_id).map(|d| d.opaque).unwrap_or(false)
    }

    fn is_translucent(&self, block_id: BlockId) -> bool {
        self.descriptor(block_id)
            .map(|d| d.translucent)
            .unwrap_or(false)
    }

    fn luminance(&self, block_id: BlockId) -> u8 {
        self.descriptor(block_id).map(|d| d.luminance).unwrap_or(0)
    }
}

fn invalid(id: usize, desc: &BlockDescriptor, reason: &str) -> AssetError {
    AssetError::InvalidBlock {
        id,
        name: desc.name.clone(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<BlockDescriptor> {
        vec![
            BlockDescriptor::simple("air", false),
            BlockDescriptor::simple("stone", true),
        ]
    }

    #[test]
    fn classifier_reads_descriptors() {
        let mut blocks = base();
        blocks.push(BlockDescriptor::emitter("torch", 14));
        blocks.push(BlockDescriptor {
            translucent: true,
            ..BlockDescriptor::simple("leaves", true)
        });
        let registry = BlockRegistry::new(blocks).unwrap();

        assert!(registry.is_opaque(1));
        assert!(!registry.is_opaque(2));
        assert_eq!(registry.luminance(2), 14);
        assert!(registry.is_translucent(3));
        assert!(!registry.is_opaque(999));
        assert_eq!(registry.luminance(999), 0);
    }

    #[test]
    fn rejects_overbright_luminance() {
        let mut blocks = base();
        blocks.push(BlockDescriptor::emitter("sun", 16));
        let err = BlockRegistry::new(blocks).unwrap_err();
        assert!(matches!(err, AssetError::InvalidBlock { id: 2, .. }));
    }

    #[test]
    fn rejects_bad_air() {
        let err = BlockRegistry::new(vec![BlockDescriptor::simple("stone", true)]).unwrap_err();
        assert!(matches!(err, AssetError::InvalidBlock { id: 0, .. }));

        let err = BlockRegistry::new(vec![BlockDescriptor::emitter("air", 3)]).unwrap_err();
        assert!(err.to_string().contains("air"));

        assert!(matches!(
            BlockRegistry::new(Vec::new()),
            Err(AssetError::InvalidPack(_))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut blocks = base();
        blocks.push(BlockDescriptor::simple("stone", false));
        let err = BlockRegistry::new(blocks).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn emitters_must_fit_the_configured_cap() {
        let mut blocks = base();
        blocks.push(BlockDescriptor::emitter("torch", 14));
        let registry = BlockRegistry::new(blocks).unwrap();
        assert!(registry.check_settings(&LightSettings::REFERENCE).is_ok());

        let dim = LightSettings {
            max_light: 10,
            ..LightSettings::REFERENCE
        };
        let err = registry.check_settings(&dim).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidConfig(_)));
        assert!(err.to_string().contains("block 2 emits 14"));
    }

    #[test]
    fn require_reports_missing_block() {
        let registry = BlockRegistry::new(base()).unwrap();
        assert_eq!(registry.require("stone").unwrap(), 1);
        assert!(registry.require("torch").is_err());
        assert_eq!(registry.iter().count(), 2);
    }
}
