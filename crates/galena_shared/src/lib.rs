//! Data model shared between the chunk core and its collaborators:
//! block identifiers, coordinate spaces, and the padded voxel grid.

pub mod block;
pub mod coords;
pub mod grid;
