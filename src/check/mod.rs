//! Quality checks for an annotations artifact.
//!
//! The converter never opens images. This module is the place that does, to
//! catch problems before training:
//!
//! - every record's image exists in the image directory and has readable
//!   dimensions,
//! - every box is finite, ordered, non-degenerate and inside the image,
//! - `boxes` and `labels` line up, and every label is in the class mapping.

mod report;

pub use report::{CheckIssue, CheckReport, IssueCode, IssueContext, Severity};

use std::collections::HashSet;
use std::path::Path;

use crate::dataset::{ClassMapping, DatasetAnnotations, FileAnnotation};
use crate::error::LgboxError;

/// Allowed overshoot past the image border, in pixels.
const BOUNDS_TOLERANCE: f64 = 0.5;

/// Options for check behavior.
#[derive(Clone, Debug, Default)]
pub struct CheckOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Checks every record of `annotations` against the images in `img_dir`.
///
/// When `class_mapping` is given, labels absent from it are reported.
pub fn check_annotations(
    annotations: &DatasetAnnotations,
    img_dir: &Path,
    class_mapping: Option<&ClassMapping>,
) -> CheckReport {
    let mut report = CheckReport::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for record in &annotations.annotations {
        report.files_checked += 1;
        let file_ctx = || IssueContext::File {
            file_id: record.file_id.clone(),
        };

        if !seen_ids.insert(record.file_id.as_str()) {
            report.add(CheckIssue::warning(
                IssueCode::DuplicateFileId,
                format!("file_id '{}' appears more than once", record.file_id),
                file_ctx(),
            ));
        }

        if record.boxes.len() != record.labels.len() {
            report.add(CheckIssue::error(
                IssueCode::LengthMismatch,
                format!(
                    "{} box(es) but {} label(s)",
                    record.boxes.len(),
                    record.labels.len()
                ),
                file_ctx(),
            ));
        }

        if let Some(mapping) = class_mapping {
            check_labels(record, mapping, &mut report);
        }

        let dims = match read_image_dimensions(&img_dir.join(&record.image_name)) {
            Ok(dims) => Some(dims),
            Err((code, message)) => {
                report.add(CheckIssue::error(code, message, file_ctx()));
                None
            }
        };
        check_boxes(record, dims, &mut report);
    }

    report
}

/// Turns a report into the command outcome under `opts`.
pub fn into_result(report: CheckReport, opts: &CheckOptions) -> Result<CheckReport, LgboxError> {
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(LgboxError::CheckFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(report)
    }
}

fn check_labels(record: &FileAnnotation, mapping: &ClassMapping, report: &mut CheckReport) {
    for (index, label) in record.labels.iter().enumerate() {
        if mapping.index_of(label).is_none() {
            report.add(CheckIssue::error(
                IssueCode::UnknownLabel,
                format!("label '{}' is not in the class mapping", label),
                IssueContext::Object {
                    file_id: record.file_id.clone(),
                    index,
                },
            ));
        }
    }
}

fn check_boxes(record: &FileAnnotation, dims: Option<(f64, f64)>, report: &mut CheckReport) {
    for (index, bbox) in record.boxes.iter().enumerate() {
        let ctx = || IssueContext::Object {
            file_id: record.file_id.clone(),
            index,
        };

        if !bbox.is_finite() {
            report.add(CheckIssue::error(
                IssueCode::BBoxNotFinite,
                format!("non-finite coordinates {:?}", bbox.to_array()),
                ctx(),
            ));
            continue;
        }

        if !bbox.is_ordered() {
            report.add(CheckIssue::error(
                IssueCode::InvalidBBoxOrdering,
                format!(
                    "min ({}, {}) should be <= max ({}, {})",
                    bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax
                ),
                ctx(),
            ));
        } else if bbox.area() <= 0.0 {
            report.add(CheckIssue::warning(
                IssueCode::InvalidBBoxArea,
                format!("zero area box {:?}", bbox.to_array()),
                ctx(),
            ));
        }

        if let Some((width, height)) = dims {
            if !bbox.fits_within(width, height, BOUNDS_TOLERANCE) {
                report.add(CheckIssue::warning(
                    IssueCode::BBoxOutOfBounds,
                    format!(
                        "box ({:.1}, {:.1}, {:.1}, {:.1}) extends outside image bounds (0, 0, {}, {})",
                        bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax, width, height
                    ),
                    ctx(),
                ));
            }
        }
    }
}

fn read_image_dimensions(path: &Path) -> Result<(f64, f64), (IssueCode, String)> {
    if !path.is_file() {
        return Err((
            IssueCode::ImageMissing,
            format!("image {} not found", path.display()),
        ));
    }

    imagesize::size(path)
        .map(|size| (size.width as f64, size.height as f64))
        .map_err(|err| {
            (
                IssueCode::ImageUnreadable,
                format!("cannot read dimensions of {}: {}", path.display(), err),
            )
        })
}
