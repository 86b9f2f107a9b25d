use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Side length of a chunk in blocks.
pub const CHUNK_SIZE: usize = 16;
/// Side length of the backing grid, including the one-cell neighbor
/// border on every face.
pub const PADDED_SIZE: usize = CHUNK_SIZE + 2;
/// Cell count of the padded backing grid.
pub const PADDED_VOLUME: usize = PADDED_SIZE * PADDED_SIZE * PADDED_SIZE;
/// World distance units per block.
pub const BLOCK_DIMENSION: f32 = 1.0;

/// Chunk origin in chunk-grid units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Chunk-local block coordinate, unpadded, each component in `[0, S)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

/// Padded-local coordinate, each component in `[0, S+2)`. This is the
/// space surface-extraction quads and initial block lists arrive in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaddedPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl ChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Canonical representation used as the chunk's handle in the world
    /// manager's collection. Stable for the lifetime of the chunk and
    /// parseable back via `FromStr`.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.x, self.y, self.z)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChunkPosError(String);

impl fmt::Display for ParseChunkPosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid chunk key {:?}", self.0)
    }
}

impl std::error::Error for ParseChunkPosError {}

impl FromStr for ChunkPos {
    type Err = ParseChunkPosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let mut component = || {
            parts
                .next()
                .and_then(|part| part.parse::<i32>().ok())
                .ok_or_else(|| ParseChunkPosError(s.to_string()))
        };

        let x = component()?;
        let y = component()?;
        let z = component()?;

        if parts.next().is_some() {
            return Err(ParseChunkPosError(s.to_string()));
        }

        Ok(Self { x, y, z })
    }
}

impl Add for ChunkPos {
    type Output = ChunkPos;

    fn add(self, rhs: Self) -> Self::Output {
        ChunkPos {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for ChunkPos {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for ChunkPos {
    type Output = ChunkPos;

    fn sub(self, rhs: Self) -> Self::Output {
        ChunkPos {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl SubAssign for ChunkPos {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

/// Maps an unpadded local coordinate to its position in the padded
/// backing grid. Local `(x, y, z)` stores at padded `(x+1, z+1, y+1)`:
/// the second and third storage axes are swapped. This layout is an
/// external contract with the surface-extraction step; any consumer of
/// raw grid contents depends on it.
pub fn local_to_storage(local: LocalPos) -> PaddedPos {
    assert!(
        (local.x as usize) < CHUNK_SIZE
            && (local.y as usize) < CHUNK_SIZE
            && (local.z as usize) < CHUNK_SIZE,
        "local coordinate out of bounds: ({}, {}, {})",
        local.x,
        local.y,
        local.z
    );

    PaddedPos {
        x: local.x + 1,
        y: local.z + 1,
        z: local.y + 1,
    }
}

/// Maps a padded-local payload coordinate to its storage position,
/// applying the same second/third axis swap without the border offset.
pub fn padded_to_storage(padded: PaddedPos) -> PaddedPos {
    PaddedPos {
        x: padded.x,
        y: padded.z,
        z: padded.y,
    }
}

/// Flat row-major offset of a storage position into the padded buffer.
pub fn storage_offset(storage: PaddedPos) -> usize {
    assert!(
        (storage.x as usize) < PADDED_SIZE
            && (storage.y as usize) < PADDED_SIZE
            && (storage.z as usize) < PADDED_SIZE,
        "storage coordinate out of bounds: ({}, {}, {})",
        storage.x,
        storage.y,
        storage.z
    );

    storage.x as usize
        + storage.y as usize * PADDED_SIZE
        + storage.z as usize * PADDED_SIZE * PADDED_SIZE
}

/// Places a padded-local coordinate in world space. The `-1` undoes the
/// border offset; the origin term positions the chunk in the world.
pub fn padded_to_world(origin: ChunkPos, padded: PaddedPos) -> Vec3 {
    let chunk_span = CHUNK_SIZE as f32 * BLOCK_DIMENSION;
    Vec3::new(
        origin.x as f32 * chunk_span + (padded.x as f32 - 1.0) * BLOCK_DIMENSION,
        origin.y as f32 * chunk_span + (padded.y as f32 - 1.0) * BLOCK_DIMENSION,
        origin.z as f32 * chunk_span + (padded.z as f32 - 1.0) * BLOCK_DIMENSION,
    )
}

fn div_rem_floor(value: i32, divisor: i32) -> (i32, i32) {
    let mut q = value / divisor;
    let mut r = value % divisor;
    if r < 0 {
        q -= 1;
        r += divisor;
    }
    (q, r)
}

pub fn world_to_chunk(world_pos: IVec3) -> (ChunkPos, LocalPos) {
    let size = CHUNK_SIZE as i32;

    let (chunk_x, local_x) = div_rem_floor(world_pos.x, size);
    let (chunk_y, local_y) = div_rem_floor(world_pos.y, size);
    let (chunk_z, local_z) = div_rem_floor(world_pos.z, size);

    (
        ChunkPos {
            x: chunk_x,
            y: chunk_y,
            z: chunk_z,
        },
        LocalPos {
            x: local_x as u8,
            y: local_y as u8,
            z: local_z as u8,
        },
    )
}

pub fn chunk_to_world(chunk_pos: ChunkPos, local: LocalPos) -> IVec3 {
    let size = CHUNK_SIZE as i32;
    IVec3::new(
        chunk_pos.x * size + i32::from(local.x),
        chunk_pos.y * size + i32::from(local.y),
        chunk_pos.z * size + i32::from(local.z),
    )
}

#[cfg(test)]
mod tests {
    use glam::{IVec3, Vec3};

    use super::{
        chunk_to_world, local_to_storage, padded_to_storage, padded_to_world, storage_offset,
        world_to_chunk, ChunkPos, LocalPos, PaddedPos, CHUNK_SIZE, PADDED_SIZE, PADDED_VOLUME,
    };

    #[test]
    fn local_storage_mapping_swaps_second_and_third_axes() {
        let origin = local_to_storage(LocalPos { x: 0, y: 0, z: 0 });
        assert_eq!(origin, PaddedPos { x: 1, y: 1, z: 1 });

        let far = (CHUNK_SIZE - 1) as u8;
        let corner = local_to_storage(LocalPos {
            x: far,
            y: far,
            z: far,
        });
        assert_eq!(
            corner,
            PaddedPos {
                x: far + 1,
                y: far + 1,
                z: far + 1,
            }
        );

        let asymmetric = local_to_storage(LocalPos { x: 1, y: 2, z: 3 });
        assert_eq!(asymmetric, PaddedPos { x: 2, y: 4, z: 3 });
    }

    #[test]
    #[should_panic(expected = "local coordinate out of bounds")]
    fn local_storage_mapping_rejects_out_of_range_input() {
        local_to_storage(LocalPos {
            x: CHUNK_SIZE as u8,
            y: 0,
            z: 0,
        });
    }

    #[test]
    fn padded_payload_coordinates_swap_without_border_offset() {
        let swapped = padded_to_storage(PaddedPos { x: 4, y: 5, z: 6 });
        assert_eq!(swapped, PaddedPos { x: 4, y: 6, z: 5 });

        // Border cells stay addressable.
        assert_eq!(
            padded_to_storage(PaddedPos { x: 0, y: 0, z: 0 }),
            PaddedPos { x: 0, y: 0, z: 0 }
        );
    }

    #[test]
    fn storage_offsets_cover_the_padded_volume_without_collisions() {
        let last = (PADDED_SIZE - 1) as u8;
        assert_eq!(storage_offset(PaddedPos { x: 0, y: 0, z: 0 }), 0);
        assert_eq!(
            storage_offset(PaddedPos {
                x: last,
                y: last,
                z: last,
            }),
            PADDED_VOLUME - 1
        );

        let a = storage_offset(PaddedPos { x: 1, y: 0, z: 0 });
        let b = storage_offset(PaddedPos { x: 0, y: 1, z: 0 });
        let c = storage_offset(PaddedPos { x: 0, y: 0, z: 1 });
        assert_eq!(a, 1);
        assert_eq!(b, PADDED_SIZE);
        assert_eq!(c, PADDED_SIZE * PADDED_SIZE);
    }

    #[test]
    fn padded_to_world_places_chunks_by_origin() {
        // Worked example: S = 16, block dimension = 1, origin (1, 0, 0),
        // padded coordinate (2, 1, 1) lands at world (17, 0, 0).
        let world = padded_to_world(ChunkPos::new(1, 0, 0), PaddedPos { x: 2, y: 1, z: 1 });
        assert_eq!(world, Vec3::new(17.0, 0.0, 0.0));

        let negative = padded_to_world(ChunkPos::new(-1, 0, 2), PaddedPos { x: 1, y: 1, z: 1 });
        assert_eq!(negative, Vec3::new(-16.0, 0.0, 32.0));
    }

    #[test]
    fn chunk_keys_are_stable_and_parse_back() {
        let origin = ChunkPos::new(3, -2, 11);
        assert_eq!(origin.key(), "3:-2:11");
        assert_eq!(origin.key(), ChunkPos::new(3, -2, 11).key());
        assert_eq!("3:-2:11".parse::<ChunkPos>().unwrap(), origin);

        assert_ne!(origin.key(), ChunkPos::new(3, 2, -11).key());

        assert!("3:-2".parse::<ChunkPos>().is_err());
        assert!("3:-2:11:0".parse::<ChunkPos>().is_err());
        assert!("a:b:c".parse::<ChunkPos>().is_err());
    }

    #[test]
    fn chunk_pos_arithmetic_is_component_wise() {
        let a = ChunkPos::new(10, -2, 4);
        let b = ChunkPos::new(-3, 8, 1);

        assert_eq!(a + b, ChunkPos::new(7, 6, 5));
        assert_eq!(a - b, ChunkPos::new(13, -10, 3));

        let mut c = a;
        c += b;
        assert_eq!(c, ChunkPos::new(7, 6, 5));
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn world_to_chunk_handles_negative_and_positive_coordinates() {
        let (chunk0, local0) = world_to_chunk(IVec3::new(-1, -1, -1));
        assert_eq!(chunk0, ChunkPos::new(-1, -1, -1));
        assert_eq!(
            local0,
            LocalPos {
                x: (CHUNK_SIZE - 1) as u8,
                y: (CHUNK_SIZE - 1) as u8,
                z: (CHUNK_SIZE - 1) as u8,
            }
        );

        let (chunk1, local1) = world_to_chunk(IVec3::new(16, 32, 0));
        assert_eq!(chunk1, ChunkPos::new(1, 2, 0));
        assert_eq!(local1, LocalPos { x: 0, y: 0, z: 0 });

        let world = IVec3::new(-17, 47, 33);
        let (chunk2, local2) = world_to_chunk(world);
        assert_eq!(chunk_to_world(chunk2, local2), world);
    }
}
