//! Output directory layout for per-cell BAM files.
//!
//! Filesystems degrade (or impose hard caps) on per-directory entry counts,
//! and a single run can produce tens of thousands of cell BAMs. The grouped
//! layout buckets sinks into numbered subdirectories of at most
//! [`DEFAULT_GROUP_SIZE`] entries each; the flat layout writes everything
//! into the output directory directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Number of cell BAMs per output subdirectory in the grouped layout.
pub const DEFAULT_GROUP_SIZE: usize = 50;

/// File name prefix for per-cell BAMs (`cell_<ordinal>_<barcode>.bam`).
pub const FILE_NAME_PREFIX: &str = "cell_";

/// Extension for per-cell BAMs.
pub const EXTENSION: &str = "bam";

/// How per-cell output files are arranged under the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLayout {
    /// Bucket sinks into numbered subdirectories of `group_size` entries each
    Grouped {
        /// Maximum number of cell BAMs per subdirectory (must be > 0)
        group_size: usize,
    },
    /// Write all sinks directly into the output directory
    Flat,
}

impl Default for GroupLayout {
    fn default() -> Self {
        GroupLayout::Grouped { group_size: DEFAULT_GROUP_SIZE }
    }
}

impl GroupLayout {
    /// Returns the directory group for a 1-based sink ordinal, or `None` in
    /// the flat layout.
    ///
    /// Group boundaries: ordinals 1..=group_size map to group 0,
    /// group_size+1..=2*group_size to group 1, and so on.
    #[must_use]
    pub fn group_id(&self, ordinal: usize) -> Option<usize> {
        debug_assert!(ordinal >= 1, "sink ordinals are 1-based");
        match self {
            GroupLayout::Grouped { group_size } => Some((ordinal - 1) / group_size),
            GroupLayout::Flat => None,
        }
    }

    /// Returns the directory a sink's BAM file lives in.
    #[must_use]
    pub fn sink_dir(&self, output_dir: &Path, ordinal: usize) -> PathBuf {
        match self.group_id(ordinal) {
            Some(group) => output_dir.join(group.to_string()),
            None => output_dir.to_path_buf(),
        }
    }

    /// Computes the output path for a sink. Deterministic: calling this twice
    /// with the same arguments yields the same path.
    #[must_use]
    pub fn sink_path(&self, output_dir: &Path, ordinal: usize, barcode: &str) -> PathBuf {
        self.sink_dir(output_dir, ordinal)
            .join(format!("{FILE_NAME_PREFIX}{ordinal}_{barcode}.{EXTENSION}"))
    }

    /// Creates the directory for a sink if it does not exist yet.
    ///
    /// Idempotent: succeeds without error when the directory already exists.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_sink_dir(&self, output_dir: &Path, ordinal: usize) -> io::Result<PathBuf> {
        let dir = self.sink_dir(output_dir, ordinal);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
