//! Output Module
//!
//! Frame snapshots and population statistics, plus their JSON files.

pub mod frame;
pub mod stats;

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use swarm_snapshot::{FrameSnapshot, PopulationStats};

pub use frame::capture_frame;
pub use stats::collect_stats;

/// File name of the end-of-run statistics
pub const STATS_FILE: &str = "stats.json";

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write a frame to `<dir>/frames/<frame_id>.json`, returning the path written
pub fn write_frame(snapshot: &FrameSnapshot, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
    let frames = dir.as_ref().join("frames");
    fs::create_dir_all(&frames)?;
    let path = frames.join(format!("{}.json", snapshot.frame_id));
    write_json(snapshot, &path)?;
    Ok(path)
}

/// Write `<dir>/stats.json`, returning the path written
pub fn write_stats(stats: &PopulationStats, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
    fs::create_dir_all(dir.as_ref())?;
    let path = dir.as_ref().join(STATS_FILE);
    write_json(stats, &path)?;
    Ok(path)
}
