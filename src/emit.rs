//! JSON output of the class mapping and annotations artifacts.
//!
//! Both artifacts are pretty-printed with a 4-space indent. [`emit`] writes
//! the pair: each artifact is first written in full to a hidden staging file
//! next to its destination, and only when both staging writes succeeded are
//! they renamed into place. The previous class mapping is kept aside until
//! the annotations are in place and is restored if that last step fails, so
//! a failed run never pairs a new mapping with old annotations.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::dataset::{ClassMapping, DatasetAnnotations};
use crate::error::LgboxError;

const INDENT: &[u8] = b"    ";

/// Writes the class mapping and annotations artifacts together.
///
/// Existing destination files are overwritten. Any failure is returned and
/// both destinations are left as they were before the call.
pub fn emit(
    class_mapping: &ClassMapping,
    annotations: &DatasetAnnotations,
    mapping_path: &Path,
    annotations_path: &Path,
) -> Result<(), LgboxError> {
    let staged_mapping = stage(mapping_path, class_mapping)?;
    let staged_annotations = match stage(annotations_path, annotations) {
        Ok(staged) => staged,
        Err(err) => {
            let _ = fs::remove_file(&staged_mapping);
            return Err(err);
        }
    };

    let backup = match set_aside(mapping_path) {
        Ok(backup) => backup,
        Err(err) => {
            let _ = fs::remove_file(&staged_mapping);
            let _ = fs::remove_file(&staged_annotations);
            return Err(err);
        }
    };

    if let Err(err) = rename(&staged_mapping, mapping_path) {
        let _ = fs::remove_file(&staged_mapping);
        let _ = fs::remove_file(&staged_annotations);
        restore(backup.as_deref(), mapping_path);
        return Err(err);
    }

    if let Err(err) = rename(&staged_annotations, annotations_path) {
        let _ = fs::remove_file(&staged_annotations);
        restore(backup.as_deref(), mapping_path);
        return Err(err);
    }

    if let Some(backup) = backup {
        let _ = fs::remove_file(backup);
    }
    info!(
        "Saved class mapping with {} classes to {}",
        class_mapping.len(),
        mapping_path.display()
    );
    info!(
        "Saved {} annotated samples to {}",
        annotations.annotations.len(),
        annotations_path.display()
    );

    Ok(())
}

/// Reads an annotations artifact back.
pub fn read_annotations(path: &Path) -> Result<DatasetAnnotations, LgboxError> {
    let file = File::open(path).map_err(|source| LgboxError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        LgboxError::JsonParse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads a class mapping artifact back.
pub fn read_class_mapping(path: &Path) -> Result<ClassMapping, LgboxError> {
    let file = File::open(path).map_err(|source| LgboxError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        LgboxError::JsonParse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Serializes a value as 4-space-indented JSON.
///
/// Useful for testing without file I/O.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    to_json_writer(&mut buf, value)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn to_json_writer<W: Write, T: Serialize>(writer: W, value: &T) -> Result<(), serde_json::Error> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), LgboxError> {
    let file = File::create(path).map_err(|source| LgboxError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    to_json_writer(&mut writer, value).map_err(|source| LgboxError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| LgboxError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` to a staging file beside `dest` and returns its path.
fn stage<T: Serialize>(dest: &Path, value: &T) -> Result<PathBuf, LgboxError> {
    let staged = staging_path(dest);
    if let Err(err) = write_json(&staged, value) {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    Ok(staged)
}

fn rename(from: &Path, to: &Path) -> Result<(), LgboxError> {
    fs::rename(from, to).map_err(|source| LgboxError::FileWrite {
        path: to.to_path_buf(),
        source,
    })
}

/// Moves an existing `dest` to a backup beside it. `None` if there was none.
fn set_aside(dest: &Path) -> Result<Option<PathBuf>, LgboxError> {
    if !dest.is_file() {
        return Ok(None);
    }
    let backup = sibling_path(dest, "bak");
    rename(dest, &backup)?;
    Ok(Some(backup))
}

/// Puts the state of `dest` back to what [`set_aside`] found.
fn restore(backup: Option<&Path>, dest: &Path) {
    let result = match backup {
        Some(backup) => fs::rename(backup, dest),
        None => match fs::remove_file(dest) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        },
    };
    if let Err(err) = result {
        warn!("Could not restore {}: {}", dest.display(), err);
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    sibling_path(dest, "tmp")
}

/// `dir/name` becomes `dir/.name.<suffix>`.
fn sibling_path(dest: &Path, suffix: &str) -> PathBuf {
    let name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.{suffix}"))
}
