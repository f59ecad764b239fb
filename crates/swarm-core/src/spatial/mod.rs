//! Spatial partitioning: hashed uniform grid and neighbor queries.

pub mod grid;
pub mod hash;
pub mod neighbors;

pub use grid::{GridEntry, GridWriter, SpatialGrid, SpatialGrids};
pub use hash::{cell_coord, cell_hash, position_hash, search_radius_cells, search_reach_is_bounded, MAX_SEARCH_CELLS};
pub use neighbors::{populate, NeighborRecord};
