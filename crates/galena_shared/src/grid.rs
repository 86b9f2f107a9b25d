use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::block::{BlockId, BlockRecord};
use crate::coords::{
    local_to_storage, padded_to_storage, storage_offset, LocalPos, PaddedPos, PADDED_SIZE,
    PADDED_VOLUME,
};

/// Dense block storage for one chunk: a single contiguous buffer of
/// `(S+2)^3` cells. The one-cell border on every face holds boundary
/// data from neighboring chunks so edge lookups during surface
/// extraction never branch.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    cells: Box<[BlockId; PADDED_VOLUME]>,
}

/// Rejected wholesale snapshot: the replacement buffer must match the
/// padded volume exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSizeError {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for GridSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid snapshot has {} cells, expected {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for GridSizeError {}

impl VoxelGrid {
    pub fn new_empty() -> Self {
        Self {
            cells: Box::new([BlockId::AIR; PADDED_VOLUME]),
        }
    }

    /// Reads the block at an unpadded local coordinate. Panics on
    /// out-of-range input; silent clamping would corrupt neighbor data.
    pub fn get(&self, local: LocalPos) -> BlockId {
        self.cells[storage_offset(local_to_storage(local))]
    }

    /// Writes the block at an unpadded local coordinate. The only
    /// mutator of interior cells after initial population.
    pub fn set(&mut self, local: LocalPos, block: BlockId) {
        let offset = storage_offset(local_to_storage(local));
        self.cells[offset] = block;
    }

    /// Border-inclusive read in padded-local space.
    pub fn get_padded(&self, padded: PaddedPos) -> BlockId {
        self.cells[storage_offset(padded_to_storage(padded))]
    }

    /// Border-inclusive write in padded-local space, used by the loader
    /// to hydrate edge cells from adjacent chunks.
    pub fn set_padded(&mut self, padded: PaddedPos, block: BlockId) {
        let offset = storage_offset(padded_to_storage(padded));
        self.cells[offset] = block;
    }

    /// Bulk-loads an initial block list. Record positions are
    /// padded-local, so the same payload can carry border cells.
    /// Out-of-range positions panic before any narrowing; a wrapped
    /// component must never land in a valid cell.
    pub fn init_from_records(&mut self, blocks: &[BlockRecord]) {
        for record in blocks {
            let padded = PaddedPos {
                x: padded_component(record.position.x),
                y: padded_component(record.position.y),
                z: padded_component(record.position.z),
            };
            self.set_padded(padded, record.id);
        }
    }

    /// Swaps in an authoritative full-grid snapshot. The dimension
    /// invariant is never silently altered.
    pub fn replace_cells(&mut self, cells: Vec<BlockId>) -> Result<(), GridSizeError> {
        let cells: Box<[BlockId; PADDED_VOLUME]> = match cells.try_into() {
            Ok(array) => Box::new(array),
            Err(rejected) => {
                let err = GridSizeError {
                    expected: PADDED_VOLUME,
                    actual: rejected.len(),
                };
                warn!(%err, "rejected grid snapshot");
                return Err(err);
            }
        };

        self.cells = cells;
        Ok(())
    }

    pub fn cells(&self) -> &[BlockId] {
        self.cells.as_slice()
    }
}

fn padded_component(value: u32) -> u8 {
    assert!(
        (value as usize) < PADDED_SIZE,
        "record position component out of bounds: {value}"
    );
    value as u8
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl Serialize for VoxelGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cells.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VoxelGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells = Vec::<BlockId>::deserialize(deserializer)?;
        if cells.len() != PADDED_VOLUME {
            return Err(de::Error::custom(format!(
                "expected {PADDED_VOLUME} cells, got {}",
                cells.len()
            )));
        }

        let cells: [BlockId; PADDED_VOLUME] = cells
            .try_into()
            .map_err(|_| de::Error::custom("failed to deserialize grid cell array"))?;

        Ok(Self {
            cells: Box::new(cells),
        })
    }
}
