use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use galena_shared::block::BlockId;

/// Which face family of a block a quad belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialVariant {
    Top,
    Side,
    Bottom,
}

impl MaterialVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialVariant::Top => "top",
            MaterialVariant::Side => "side",
            MaterialVariant::Bottom => "bottom",
        }
    }
}

/// Lighting bucket the extraction step assigned to a quad.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightingVariant {
    Lit,
    Shaded,
}

impl LightingVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            LightingVariant::Lit => "lit",
            LightingVariant::Shaded => "shaded",
        }
    }
}

/// Opaque handle to a registered renderable material.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

#[derive(Clone, Debug)]
struct MaterialEntry {
    name: String,
}

/// Read-only three-key material lookup. Shared across chunks behind an
/// `Arc`; registration happens once at resource load, lookups are
/// concurrent-read safe.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    entries: Vec<MaterialEntry>,
    by_key: FxHashMap<(BlockId, MaterialVariant, LightingVariant), MaterialHandle>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        block: BlockId,
        variant: MaterialVariant,
        lighting: LightingVariant,
        name: &str,
    ) -> MaterialHandle {
        if let Some(existing) = self.by_key.get(&(block, variant, lighting)) {
            return *existing;
        }

        let handle = MaterialHandle(
            u32::try_from(self.entries.len()).expect("material registry exceeded u32 capacity"),
        );
        self.entries.push(MaterialEntry {
            name: name.to_string(),
        });
        self.by_key.insert((block, variant, lighting), handle);
        handle
    }

    /// Resolves a quad's material. `None` means the combination was
    /// never registered; a mesh pass must treat that as fatal rather
    /// than render with a guessed material.
    pub fn lookup(
        &self,
        block: BlockId,
        variant: MaterialVariant,
        lighting: LightingVariant,
    ) -> Option<MaterialHandle> {
        self.by_key.get(&(block, variant, lighting)).copied()
    }

    pub fn name_of(&self, handle: MaterialHandle) -> Option<&str> {
        self.entries
            .get(handle.0 as usize)
            .map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const DEFAULT_PALETTE: &[(BlockId, &str)] = &[
    (BlockId::BEDSTONE, "bedstone"),
    (BlockId::STONE, "stone"),
    (BlockId::DIRT, "dirt"),
    (BlockId::GRASS, "grass"),
    (BlockId::SAND, "sand"),
    (BlockId::WATER, "water"),
    (BlockId::LOG, "log"),
    (BlockId::LEAVES, "leaves"),
    (BlockId::PLANKS, "planks"),
    (BlockId::GLASS, "glass"),
    (BlockId::COBBLE, "cobble"),
    (BlockId::SNOW, "snow"),
];

const ALL_VARIANTS: [MaterialVariant; 3] = [
    MaterialVariant::Top,
    MaterialVariant::Side,
    MaterialVariant::Bottom,
];

const ALL_LIGHTING: [LightingVariant; 2] = [LightingVariant::Lit, LightingVariant::Shaded];

/// Builds the registry for the shipped block palette. Air registers
/// nothing: it never produces a surface quad.
pub fn register_default_materials() -> MaterialRegistry {
    let mut registry = MaterialRegistry::new();

    for &(block, stem) in DEFAULT_PALETTE {
        for variant in ALL_VARIANTS {
            for lighting in ALL_LIGHTING {
                let name = format!("{stem}_{}_{}", variant.as_str(), lighting.as_str());
                registry.register(block, variant, lighting, &name);
            }
        }
    }

    registry
}
