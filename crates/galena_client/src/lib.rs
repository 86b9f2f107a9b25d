//! Client-side chunk core: the chunk aggregate, busy-block tracking,
//! material resolution, and mesh assembly. The renderer, network layer,
//! and surface extraction are external collaborators.

pub mod busy;
pub mod chunk;
pub mod materials;
pub mod mesh_worker;
pub mod mesher;
pub mod settings;
