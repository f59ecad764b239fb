//! Sharded Spatial Hash Grid
//!
//! Buckets of agents keyed by [`cell_hash`](super::hash::cell_hash). The grid is
//! rebuilt from scratch every tick through a [`GridWriter`], which borrows the
//! grid mutably for the whole rebuild. Lookups need `&SpatialGrid`, so the borrow
//! checker rules out reading a half-built grid.
//!
//! During a rebuild each shard sits behind its own mutex. Writers that land in
//! the same shard serialize on that shard only; unrelated buckets never contend.

use bevy_ecs::prelude::*;
use glam::Vec3;
use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::hash::position_hash;
use crate::config::SimulationConfig;

/// One agent's entry in a grid bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub entity: Entity,
    pub position: Vec3,
    pub detection_radius: f32,
    /// Unit heading (or zero) at rebuild time
    pub heading: Vec3,
}

type Shard = HashMap<i32, Vec<GridEntry>>;

/// Multi-valued map from cell hash to the agents currently in that cell
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    shards: Vec<Shard>,
    len: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, shard_count: usize) -> Self {
        Self {
            cell_size,
            shards: (0..shard_count.max(1)).map(|_| Shard::new()).collect(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of entries inserted by the last rebuild
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct occupied cell hashes
    pub fn occupied_cells(&self) -> usize {
        self.shards.iter().map(HashMap::len).sum()
    }

    #[inline]
    fn shard_index(hash: i32, shard_count: usize) -> usize {
        (hash as u32 as usize) % shard_count
    }

    /// All entries stored under `hash`, in insertion order
    pub fn bucket(&self, hash: i32) -> &[GridEntry] {
        if self.shards.is_empty() {
            return &[];
        }
        self.shards[Self::shard_index(hash, self.shards.len())]
            .get(&hash)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Discards every entry and opens the grid for concurrent insertion.
    ///
    /// The grid is readable again once the returned writer is dropped or finished.
    pub fn begin_rebuild(&mut self, cell_size: f32) -> GridWriter<'_> {
        self.cell_size = cell_size;
        self.len = 0;
        let shards = mem::take(&mut self.shards)
            .into_iter()
            .map(|mut shard| {
                shard.clear();
                Mutex::new(shard)
            })
            .collect();
        GridWriter {
            cell_size,
            shards,
            inserted: AtomicUsize::new(0),
            grid: self,
        }
    }

    /// Serial rebuild from an iterator; returns the number of entries inserted.
    pub fn rebuild(&mut self, cell_size: f32, entries: impl IntoIterator<Item = GridEntry>) -> usize {
        let writer = self.begin_rebuild(cell_size);
        for entry in entries {
            writer.insert(entry);
        }
        writer.finish()
    }
}

/// Exclusive rebuild handle. Shareable across worker threads.
pub struct GridWriter<'a> {
    grid: &'a mut SpatialGrid,
    cell_size: f32,
    shards: Vec<Mutex<Shard>>,
    inserted: AtomicUsize,
}

impl GridWriter<'_> {
    /// Appends `entry` to the bucket of the cell containing its position.
    pub fn insert(&self, entry: GridEntry) {
        let hash = position_hash(entry.position, self.cell_size);
        let index = SpatialGrid::shard_index(hash, self.shards.len());
        let mut shard = self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        shard.entry(hash).or_default().push(entry);
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Closes the rebuild and returns the number of entries inserted.
    pub fn finish(self) -> usize {
        self.inserted.load(Ordering::Relaxed)
    }
}

impl Drop for GridWriter<'_> {
    fn drop(&mut self) {
        self.grid.shards = mem::take(&mut self.shards)
            .into_iter()
            .map(|shard| shard.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect();
        self.grid.len = *self.inserted.get_mut();
    }
}

/// The two independent grids rebuilt each tick
#[derive(Resource, Debug)]
pub struct SpatialGrids {
    pub prey: SpatialGrid,
    pub predators: SpatialGrid,
}

impl SpatialGrids {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            prey: SpatialGrid::new(config.cell_size, config.grid_shards),
            predators: SpatialGrid::new(config.cell_size, config.grid_shards),
        }
    }
}
