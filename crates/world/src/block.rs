//! Block identities and the classifier contract the lighting engine reads.

/// Block identifier referencing the registry.
pub type BlockId = u16;

/// Reserved ID for air. Always transparent and non-luminous.
pub const BLOCK_AIR: BlockId = 0;

/// Trait for querying the light-relevant properties of a block.
///
/// Implementations are read-only from the engine's perspective and must be safe to share
/// between threads generating different chunks.
pub trait BlockClassifier: Sync {
    /// Whether the block fully blocks light.
    fn is_opaque(&self, block_id: BlockId) -> bool;

    /// Whether light passes through the block even if it renders as solid (glass, leaves).
    fn is_translucent(&self, _block_id: BlockId) -> bool {
        false
    }

    /// Light emitted by the block itself, 0 for non-emitters.
    fn luminance(&self, _block_id: BlockId) -> u8 {
        0
    }
}

impl<T: BlockClassifier + ?Sized> BlockClassifier for &T {
    fn is_opaque(&self, block_id: BlockId) -> bool {
        (**self).is_opaque(block_id)
    }

    fn is_translucent(&self, block_id: BlockId) -> bool {
        (**self).is_translucent(block_id)
    }

    fn luminance(&self, block_id: BlockId) -> u8 {
        (**self).luminance(block_id)
    }
}

/// Returns true when `block_id` stops transmitted light.
///
/// Translucency wins over opacity: a block flagged both ways lets light through. Air never
/// blocks regardless of what the classifier reports.
#[inline]
pub fn blocks_light<C: BlockClassifier + ?Sized>(classifier: &C, block_id: BlockId) -> bool {
    block_id != BLOCK_AIR && classifier.is_opaque(block_id) && !classifier.is_translucent(block_id)
}

/// Light emitted by `block_id`; air always reports 0.
#[inline]
pub fn emitted_light<C: BlockClassifier + ?Sized>(classifier: &C, block_id: BlockId) -> u8 {
    if block_id == BLOCK_AIR {
        0
    } else {
        classifier.luminance(block_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl BlockClassifier for Fixed {
        fn is_opaque(&self, _block_id: BlockId) -> bool {
            true
        }

        fn is_translucent(&self, block_id: BlockId) -> bool {
            block_id == 2
        }

        fn luminance(&self, _block_id: BlockId) -> u8 {
            9
        }
    }

    #[test]
    fn air_never_blocks_or_emits() {
        assert!(!blocks_light(&Fixed, BLOCK_AIR));
        assert_eq!(emitted_light(&Fixed, BLOCK_AIR), 0);
    }

    #[test]
    fn translucency_overrides_opacity() {
        assert!(blocks_light(&Fixed, 1));
        assert!(!blocks_light(&Fixed, 2));
    }

    #[test]
    fn reference_classifier_forwards() {
        let classifier: &dyn BlockClassifier = &Fixed;
        assert!(blocks_light(&classifier, 1));
        assert_eq!(emitted_light(&classifier, 3), 9);
    }
}
