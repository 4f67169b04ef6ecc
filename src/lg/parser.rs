//! Label-graph (`.lg`) line parser and file reader.
//!
//! Only two record kinds are consumed:
//!
//! ```text
//! # comment
//! O, <id>, <label>, <weight>, ...
//! BB, <id>, <x1>, <y1>, <x2>, <y2>
//! ```
//!
//! Relation (`R,` / `EO,`) and every other line kind are ignored. Fields are
//! comma-separated and trimmed of surrounding whitespace. Lines that look
//! like an object or box record but cannot be used are reported as a
//! [`LineError`] and dropped by the file-level reader; they never abort it.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use super::bbox::BBox;
use super::model::{AnnotatedObject, LabelGraph};
use crate::error::LgboxError;

const OBJECT_PREFIX: &str = "O,";
const BBOX_PREFIX: &str = "BB,";
const COMMENT_PREFIX: char = '#';

const OBJECT_MIN_FIELDS: usize = 3;
const BBOX_MIN_FIELDS: usize = 6;
const BBOX_FIELD_NAMES: [&str; 4] = ["xmin", "ymin", "xmax", "ymax"];

/// The record kinds this parser understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Object,
    BoundingBox,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Object => write!(f, "O"),
            RecordKind::BoundingBox => write!(f, "BB"),
        }
    }
}

/// A successfully parsed record, borrowing from the input line.
#[derive(Clone, Debug, PartialEq)]
pub enum LgRecord<'a> {
    Object { id: &'a str, label: &'a str },
    BoundingBox { id: &'a str, bbox: BBox },
}

/// Why an `O,` or `BB,` line was rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LineError {
    #[error("{record} record needs at least {expected} fields, found {found}")]
    TooFewFields {
        record: RecordKind,
        expected: usize,
        found: usize,
    },

    #[error("invalid {field} '{raw}'; expected a finite floating-point number")]
    InvalidCoordinate { field: &'static str, raw: String },
}

/// Parses a single label-graph line.
///
/// Returns `Ok(None)` for blank lines, comments and line kinds that are not
/// consumed. Prefixes are case-sensitive and must be followed directly by a
/// comma.
pub fn parse_line(line: &str) -> Result<Option<LgRecord<'_>>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
        return Ok(None);
    }

    if trimmed.starts_with(OBJECT_PREFIX) {
        let fields = split_fields(trimmed, OBJECT_MIN_FIELDS);
        if fields.len() < OBJECT_MIN_FIELDS {
            return Err(LineError::TooFewFields {
                record: RecordKind::Object,
                expected: OBJECT_MIN_FIELDS,
                found: fields.len(),
            });
        }
        return Ok(Some(LgRecord::Object {
            id: fields[1],
            label: fields[2],
        }));
    }

    if trimmed.starts_with(BBOX_PREFIX) {
        let fields = split_fields(trimmed, BBOX_MIN_FIELDS);
        if fields.len() < BBOX_MIN_FIELDS {
            return Err(LineError::TooFewFields {
                record: RecordKind::BoundingBox,
                expected: BBOX_MIN_FIELDS,
                found: fields.len(),
            });
        }

        let mut coords = [0.0f64; 4];
        for (slot, (raw, field)) in coords
            .iter_mut()
            .zip(fields[2..BBOX_MIN_FIELDS].iter().zip(BBOX_FIELD_NAMES))
        {
            *slot = parse_coordinate(raw, field)?;
        }
        let [x1, y1, x2, y2] = coords;

        return Ok(Some(LgRecord::BoundingBox {
            id: fields[1],
            bbox: BBox::from_corners(x1, y1, x2, y2),
        }));
    }

    Ok(None)
}

/// Splits a record into trimmed fields, keeping at most `limit` of them.
///
/// Trailing fields past `limit` are never used, so they are not allocated.
fn split_fields(line: &str, limit: usize) -> Vec<&str> {
    line.split(',').map(str::trim).take(limit).collect()
}

fn parse_coordinate(raw: &str, field: &'static str) -> Result<f64, LineError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LineError::InvalidCoordinate {
            field,
            raw: raw.to_string(),
        }),
    }
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_line(input: &str) -> Result<(), LineError> {
    let _ = parse_line(input)?;
    Ok(())
}

/// Parses the full text of a label-graph file.
///
/// Malformed records are counted in [`LabelGraph::stats`] and logged at
/// debug level; parsing continues with the next line.
pub fn parse_lg_str(content: &str) -> LabelGraph {
    let mut graph = LabelGraph::new();

    for (line_idx, line) in split_lines(content).enumerate() {
        graph.stats.lines += 1;
        match parse_line(line) {
            Ok(Some(LgRecord::Object { id, label })) => graph.insert_object(id, label),
            Ok(Some(LgRecord::BoundingBox { id, bbox })) => graph.insert_bbox(id, bbox),
            Ok(None) => graph.stats.skipped += 1,
            Err(err) => {
                graph.stats.malformed += 1;
                debug!("line {}: skipping malformed record: {}", line_idx + 1, err);
            }
        }
    }

    graph
}

/// Splits text on `\n`, `\r\n` and bare `\r` line endings.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().flat_map(|line| {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.split('\r')
    })
}

/// Reads and parses one label-graph file.
///
/// Invalid UTF-8 is replaced rather than rejected; only I/O failures are
/// returned as errors.
pub fn read_lg_file(path: &Path) -> Result<LabelGraph, LgboxError> {
    let bytes = fs::read(path).map_err(|source| LgboxError::LgRead {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_lg_str(&String::from_utf8_lossy(&bytes));

    if graph.stats.malformed > 0 {
        debug!(
            "{}: dropped {} malformed record(s)",
            path.display(),
            graph.stats.malformed
        );
    }

    Ok(graph)
}

/// Extracts the annotated objects of one label-graph file.
///
/// A missing or unreadable file is not an error: it is logged and yields no
/// objects, exactly like a file without records.
pub fn extract_objects(path: &Path) -> Vec<AnnotatedObject> {
    match read_lg_file(path) {
        Ok(graph) => graph.annotated_objects(),
        Err(err) => {
            log_read_failure(path, &err);
            Vec::new()
        }
    }
}

pub(crate) fn log_read_failure(path: &Path, err: &LgboxError) {
    match err {
        LgboxError::LgRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            warn!("LG file not found at {}", path.display());
        }
        other => warn!("{}", other),
    }
}
