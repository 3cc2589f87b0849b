//! Per-step terrain snapshots.
//!
//! After every successful move the coordinator hands the terrain to a
//! [`FrameSink`]. [`FrameWriter`] stores each snapshot as
//! `frame_NNNN.txt` in an output directory; nothing else about the run's
//! history is kept.

use crate::error::SimError;

use skyscout_core::Terrain;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives a terrain snapshot after each successful move.
pub trait FrameSink {
    /// Records the terrain state for frame number `frame` (1-based).
    fn record(&mut self, frame: u64, terrain: &Terrain) -> io::Result<()>;
}

/// Writes one text file per frame.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    /// Output directory
    dir: PathBuf,
}

impl FrameWriter {
    /// Creates the writer, creating `dir` if it does not exist.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SimError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SimError::FrameDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `frame`.
    pub fn frame_path(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("frame_{:04}.txt", frame))
    }
}

impl FrameSink for FrameWriter {
    fn record(&mut self, frame: u64, terrain: &Terrain) -> io::Result<()> {
        let path = self.frame_path(frame);
        let mut file = File::create(&path)?;
        file.write_all(terrain.serialize().as_bytes())?;
        debug!(frame, path = %path.display(), "Wrote frame");
        Ok(())
    }
}

/// Discards all frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn record(&mut self, _frame: u64, _terrain: &Terrain) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps the latest snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Number of frames received
    pub count: u64,

    /// Highest frame number seen and its snapshot
    pub last: Option<(u64, String)>,
}

impl FrameSink for MemorySink {
    fn record(&mut self, frame: u64, terrain: &Terrain) -> io::Result<()> {
        self.count += 1;
        if self.last.as_ref().map_or(true, |(seen, _)| frame > *seen) {
            self.last = Some((frame, terrain.serialize()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyscout_core::Position;

    fn small_terrain() -> Terrain {
        Terrain::with_obstacles(3, 2, Position::new(2, 1), [Position::new(0, 1)]).unwrap()
    }

    #[test]
    fn test_frame_path_is_zero_padded() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = FrameWriter::create(tmp.path()).unwrap();

        assert_eq!(writer.frame_path(7), tmp.path().join("frame_0007.txt"));
        assert_eq!(writer.frame_path(1234), tmp.path().join("frame_1234.txt"));
    }

    #[test]
    fn test_writer_creates_directory_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("frames");
        let mut writer = FrameWriter::create(&dir).unwrap();
        let terrain = small_terrain();

        writer.record(1, &terrain).unwrap();

        let written = fs::read_to_string(dir.join("frame_0001.txt")).unwrap();
        assert_eq!(written, terrain.serialize());
        assert_eq!(written, "⬜⬜⬜\n⬛⬜🎯\n");
    }

    #[test]
    fn test_memory_sink_keeps_latest() {
        let mut sink = MemorySink::default();
        let terrain = small_terrain();

        sink.record(2, &terrain).unwrap();
        terrain.place_drone(Position::new(0, 0)).unwrap();
        sink.record(1, &terrain).unwrap();

        assert_eq!(sink.count, 2);
        let (frame, snapshot) = sink.last.unwrap();
        assert_eq!(frame, 2);
        assert!(!snapshot.contains('🛸'));
    }
}
