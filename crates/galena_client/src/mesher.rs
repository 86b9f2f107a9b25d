use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use galena_shared::block::BlockId;
use galena_shared::coords::{padded_to_world, ChunkPos, PaddedPos};

use crate::materials::{LightingVariant, MaterialHandle, MaterialRegistry, MaterialVariant};

/// Quad geometry as delivered by surface extraction, in block-local
/// units relative to the quad's padded coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadGeometry {
    pub corners: [[f32; 3]; 4],
    pub normal: [f32; 3],
    pub uv: [[f32; 2]; 4],
}

/// One extracted surface quad. The field order mirrors the fixed wire
/// format of the extraction step: coordinates, geometry, block type,
/// material variant, lighting variant.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceQuad {
    pub coords: PaddedPos,
    pub geometry: QuadGeometry,
    pub block: BlockId,
    pub material: MaterialVariant,
    pub lighting: LightingVariant,
}

/// A quad placed in world space with its material resolved. Ephemeral:
/// discarded once combined into the chunk mesh.
#[derive(Copy, Clone, Debug)]
pub struct MeshFragment {
    pub geometry: QuadGeometry,
    pub world_pos: Vec3,
    pub material: MaterialHandle,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub material: u32,
}

/// The single renderable unit for one chunk. `is_chunk` lets the scene
/// layer tell chunk meshes apart from other scene objects.
#[derive(Clone, Debug)]
pub struct CombinedMesh {
    pub name: String,
    pub is_chunk: bool,
    pub vertices: Vec<ChunkVertex>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    MissingMaterial {
        block: BlockId,
        material: MaterialVariant,
        lighting: LightingVariant,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::MissingMaterial {
                block,
                material,
                lighting,
            } => write!(
                f,
                "no material registered for block {} as {}/{}",
                block.0,
                material.as_str(),
                lighting.as_str()
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// Converts an ordered quad sequence into world-positioned fragments,
/// one per quad, order-preserving. Empty input allocates nothing. A
/// material miss fails the whole pass; a chunk must not render with a
/// guessed material.
pub fn quads_to_fragments(
    origin: ChunkPos,
    quads: &[SurfaceQuad],
    materials: &MaterialRegistry,
) -> Result<Vec<MeshFragment>, MeshError> {
    if quads.is_empty() {
        return Ok(Vec::new());
    }

    let mut fragments = Vec::with_capacity(quads.len());
    for quad in quads {
        let material = materials
            .lookup(quad.block, quad.material, quad.lighting)
            .ok_or(MeshError::MissingMaterial {
                block: quad.block,
                material: quad.material,
                lighting: quad.lighting,
            })?;

        fragments.push(MeshFragment {
            geometry: quad.geometry,
            world_pos: padded_to_world(origin, quad.coords),
            material,
        });
    }

    Ok(fragments)
}

/// Merges fragments into one mesh: four vertices and six indices per
/// quad, corners translated to their fragment's world position. `None`
/// for empty input so an empty chunk stays meshless.
pub fn combine_fragments(fragments: &[MeshFragment], name: &str) -> Option<CombinedMesh> {
    if fragments.is_empty() {
        return None;
    }

    let mut vertices = Vec::with_capacity(fragments.len() * 4);
    let mut indices = Vec::with_capacity(fragments.len() * 6);

    for fragment in fragments {
        let base = vertices.len() as u32;
        for (corner, uv) in fragment
            .geometry
            .corners
            .iter()
            .zip(fragment.geometry.uv.iter())
        {
            vertices.push(ChunkVertex {
                position: [
                    corner[0] + fragment.world_pos.x,
                    corner[1] + fragment.world_pos.y,
                    corner[2] + fragment.world_pos.z,
                ],
                normal: fragment.geometry.normal,
                tex_coord: *uv,
                material: fragment.material.0,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Some(CombinedMesh {
        name: name.to_string(),
        is_chunk: true,
        vertices,
        indices,
    })
}
