use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Pod,
    Zeroable,
)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: Self = Self(0);
    pub const BEDSTONE: Self = Self(1);
    pub const STONE: Self = Self(2);
    pub const DIRT: Self = Self(3);
    pub const GRASS: Self = Self(4);
    pub const SAND: Self = Self(5);
    pub const WATER: Self = Self(6);
    pub const LOG: Self = Self(7);
    pub const LEAVES: Self = Self(8);
    pub const PLANKS: Self = Self(9);
    pub const GLASS: Self = Self(10);
    pub const COBBLE: Self = Self(11);
    pub const SNOW: Self = Self(12);

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Position of one block inside an initial-population payload, in
/// padded-local space `[0, S+2)`. Border entries carry boundary data
/// copied out of neighboring chunks by the loader.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// One entry of the block list a chunk is populated from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    pub position: BlockPos,
}
