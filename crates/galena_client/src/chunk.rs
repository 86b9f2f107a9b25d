use std::sync::Arc;

use tracing::debug;

use galena_shared::block::{BlockId, BlockRecord};
use galena_shared::coords::{ChunkPos, LocalPos};
use galena_shared::grid::{GridSizeError, VoxelGrid};

use crate::busy::BusyBlocks;
use crate::materials::MaterialRegistry;
use crate::mesher::{
    combine_fragments, quads_to_fragments, CombinedMesh, MeshError, MeshFragment, SurfaceQuad,
};

/// One chunk of the voxel world: the padded block grid, the advisory
/// busy-block set, and the chunk's current mesh data. All mutation is
/// driven from a single owner (the world manager); nothing here locks.
pub struct Chunk {
    origin: ChunkPos,
    name: String,
    grid: VoxelGrid,
    busy: BusyBlocks,
    fragments: Vec<MeshFragment>,
    mesh: Option<CombinedMesh>,
    loading: bool,
    loaded: bool,
    materials: Arc<MaterialRegistry>,
}

impl Chunk {
    pub fn new(materials: Arc<MaterialRegistry>, origin: ChunkPos) -> Self {
        let name = origin.key();
        debug!(chunk = %name, "chunk created");

        Self {
            origin,
            name,
            grid: VoxelGrid::new_empty(),
            busy: BusyBlocks::default(),
            fragments: Vec::new(),
            mesh: None,
            loading: true,
            loaded: false,
            materials,
        }
    }

    /// The chunk's immutable origin, in chunk-grid units.
    pub fn origin(&self) -> ChunkPos {
        self.origin
    }

    /// Canonical chunk handle, derived once from the origin.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an initial block list onto the grid. Runs once at
    /// creation, before the chunk is marked loaded; the loader may also
    /// use it to hydrate the border from neighboring chunks.
    pub fn init_grid(&mut self, blocks: &[BlockRecord]) {
        self.grid.init_from_records(blocks);
        debug!(chunk = %self.name, blocks = blocks.len(), "grid populated");
    }

    /// Replaces the entire backing grid with an authoritative snapshot.
    /// The caller guarantees no get/set is in flight during the swap.
    pub fn set_grid(&mut self, cells: Vec<BlockId>) -> Result<(), GridSizeError> {
        self.grid.replace_cells(cells)?;
        debug!(chunk = %self.name, "grid snapshot applied");
        Ok(())
    }

    pub fn get_block(&self, local: LocalPos) -> BlockId {
        self.grid.get(local)
    }

    pub fn set_block(&mut self, local: LocalPos, block: BlockId) {
        self.grid.set(local, block);
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Converts an extracted quad sequence into world-positioned
    /// fragments, replacing the previous fragment set wholesale.
    pub fn mesh_quads(&mut self, quads: &[SurfaceQuad]) -> Result<(), MeshError> {
        self.fragments = quads_to_fragments(self.origin, quads, &self.materials)?;
        Ok(())
    }

    /// Merges the current fragments into the chunk's combined mesh,
    /// releasing the previous one. No-op while there are no fragments.
    pub fn combine_mesh(&mut self) {
        if let Some(mesh) = combine_fragments(&self.fragments, &self.name) {
            debug!(chunk = %self.name, quads = self.fragments.len(), "mesh combined");
            self.mesh = Some(mesh);
        }
    }

    pub fn get_mesh(&self) -> Option<&CombinedMesh> {
        self.mesh.as_ref()
    }

    pub fn fragments(&self) -> &[MeshFragment] {
        &self.fragments
    }

    /// Flags the chunk render-eligible.
    pub fn mark(&mut self) {
        self.loaded = true;
    }

    pub fn unmark(&mut self) {
        self.loaded = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// One-way transition out of the initial-population phase.
    /// Idempotent on repeated calls.
    pub fn mark_as_finished_loading(&mut self) {
        if self.loading {
            debug!(chunk = %self.name, "finished loading");
        }
        self.loading = false;
    }

    pub fn check_busy_block(&self, local: LocalPos) -> bool {
        self.busy.check(local)
    }

    pub fn tag_busy_block(&mut self, local: LocalPos) {
        self.busy.tag(local);
    }

    pub fn untag_busy_block(&mut self, local: LocalPos) {
        self.busy.untag(local);
    }
}
