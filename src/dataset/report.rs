//! Summary of one dataset scan.

use std::fmt;
use std::path::PathBuf;

/// Counters collected while aggregating a label-graph directory.
///
/// Purely informational: none of these affect the emitted artifacts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// The directory that was scanned.
    pub lg_dir: PathBuf,

    /// True when the directory could not be listed at all.
    pub directory_missing: bool,

    /// Label-graph files found and processed.
    pub files_scanned: usize,

    /// Files that contributed at least one object.
    pub files_annotated: usize,

    /// Files that were read but produced no objects.
    pub files_empty: usize,

    /// Files that could not be read (missing, permissions, ...).
    pub files_unreadable: usize,

    /// `O,` / `BB,` lines dropped as malformed.
    pub malformed_lines: usize,

    /// Objects written to the annotations.
    pub objects: usize,

    /// Object declarations with no matching bounding box.
    pub objects_without_bbox: usize,

    /// Bounding boxes with no matching object declaration.
    pub bboxes_without_object: usize,

    /// Distinct labels in the class mapping.
    pub classes: usize,
}

impl ScanReport {
    pub fn new(lg_dir: impl Into<PathBuf>) -> Self {
        Self {
            lg_dir: lg_dir.into(),
            ..Default::default()
        }
    }

    /// Files that were dropped from the annotations.
    pub fn files_skipped(&self) -> usize {
        self.files_empty + self.files_unreadable
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.directory_missing {
            return writeln!(
                f,
                "Scan failed: directory {} could not be read",
                self.lg_dir.display()
            );
        }

        writeln!(
            f,
            "Scanned {} label-graph file(s) in {}",
            self.files_scanned,
            self.lg_dir.display()
        )?;
        writeln!(f, "  annotated files:       {}", self.files_annotated)?;
        writeln!(f, "  empty files:           {}", self.files_empty)?;
        writeln!(f, "  unreadable files:      {}", self.files_unreadable)?;
        writeln!(f, "  malformed lines:       {}", self.malformed_lines)?;
        writeln!(f, "  objects:               {}", self.objects)?;
        writeln!(f, "  objects without bbox:  {}", self.objects_without_bbox)?;
        writeln!(f, "  bboxes without object: {}", self.bboxes_without_object)?;
        writeln!(f, "  classes:               {}", self.classes)
    }
}
