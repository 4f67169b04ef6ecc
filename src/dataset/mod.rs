//! Dataset aggregation over a directory of label-graph files.
//!
//! [`aggregate_dir`] lists every `.lg` file directly inside a directory,
//! extracts each one with [`crate::lg::read_lg_file`], and collects:
//!
//! - one [`FileAnnotation`] per file that yields at least one object,
//! - the set of every label seen, turned into a [`ClassMapping`].
//!
//! Files are processed in file-name order so repeated runs over the same
//! directory produce identical output. Nothing is written to disk here; see
//! [`crate::emit`] for that.

mod model;
mod report;

pub use model::{ClassMapping, DatasetAnnotations, FileAnnotation, DEFAULT_SOURCE};
pub use report::ScanReport;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::error::LgboxError;
use crate::lg::{self, parser::log_read_failure};

/// Extension of label-graph files.
pub const LG_EXTENSION: &str = "lg";

/// Extension of the image paired with each label-graph file.
pub const IMAGE_EXTENSION: &str = "png";

/// Emit a progress line every this many files.
pub const PROGRESS_INTERVAL: usize = 1000;

/// Everything a conversion run produces, before it is written out.
#[derive(Clone, Debug)]
pub struct Aggregation {
    pub class_mapping: ClassMapping,
    pub annotations: DatasetAnnotations,
    pub report: ScanReport,
}

/// Aggregates every label-graph file directly inside `lg_dir`.
///
/// A missing or unlistable directory is not an error: it is logged and
/// yields an empty aggregation with [`ScanReport::directory_missing`] set.
pub fn aggregate_dir(lg_dir: &Path, source: &str) -> Aggregation {
    match collect_lg_files(lg_dir) {
        Ok(files) => {
            info!("Scanning {} files in {}...", files.len(), lg_dir.display());
            let mut aggregation = aggregate_files(&files, source);
            aggregation.report.lg_dir = lg_dir.to_path_buf();
            aggregation
        }
        Err(err) => {
            warn!("{}", err);
            let mut report = ScanReport::new(lg_dir);
            report.directory_missing = true;
            Aggregation {
                class_mapping: ClassMapping::default(),
                annotations: DatasetAnnotations::new(source),
                report,
            }
        }
    }
}

/// Aggregates an explicit list of label-graph files, in the given order.
pub fn aggregate_files(files: &[PathBuf], source: &str) -> Aggregation {
    let mut report = ScanReport::default();
    let mut annotations = DatasetAnnotations::new(source);
    let mut labels: BTreeSet<String> = BTreeSet::new();

    for (index, path) in files.iter().enumerate() {
        if index % PROGRESS_INTERVAL == 0 {
            info!("Processed {}/{} files...", index, files.len());
        }
        report.files_scanned += 1;

        let graph = match lg::read_lg_file(path) {
            Ok(graph) => graph,
            Err(err) => {
                log_read_failure(path, &err);
                report.files_unreadable += 1;
                continue;
            }
        };

        report.malformed_lines += graph.stats.malformed;
        report.objects_without_bbox += graph.objects_without_bbox();
        report.bboxes_without_object += graph.bboxes_without_object();

        let objects = graph.annotated_objects();
        if objects.is_empty() {
            report.files_empty += 1;
            continue;
        }

        let file_id = file_id_for(path);
        let image_name = image_name_for(&file_id);
        labels.extend(objects.iter().map(|obj| obj.label.clone()));
        report.files_annotated += 1;
        annotations
            .annotations
            .push(FileAnnotation::from_objects(file_id, image_name, &objects));
    }

    let class_mapping = ClassMapping::from_labels(labels);
    report.classes = class_mapping.len();
    report.objects = annotations.object_count();

    Aggregation {
        class_mapping,
        annotations,
        report,
    }
}

/// Lists the `.lg` files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. The extension match is exact
/// (`a.LG` is not a label-graph file). Only a failure to list `dir` itself is
/// an error. A broken `.lg` entry (such as a dangling symlink) is still
/// listed so the reader reports it as an unreadable file; any other broken
/// entry is logged and skipped.
pub fn collect_lg_files(dir: &Path) -> Result<Vec<PathBuf>, LgboxError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let broken = err
                    .path()
                    .filter(|_| err.depth() > 0)
                    .map(Path::to_path_buf);
                match broken {
                    Some(path) if has_extension(&path, LG_EXTENSION) => files.push(path),
                    Some(_) => warn!("Skipping unreadable entry in {}: {}", dir.display(), err),
                    None => {
                        return Err(LgboxError::DirectoryRead {
                            path: dir.to_path_buf(),
                            source: err,
                        })
                    }
                }
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), LG_EXTENSION) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// The file identifier of a label-graph path: its file name minus extension.
pub fn file_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The image filename paired with a file identifier.
pub fn image_name_for(file_id: &str) -> String {
    format!("{file_id}.{IMAGE_EXTENSION}")
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == wanted)
        .unwrap_or(false)
}
