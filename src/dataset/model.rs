//! Dataset-level annotation types.
//!
//! These are the two artifacts a conversion run produces: the
//! [`ClassMapping`] (label to dense class index) and the
//! [`DatasetAnnotations`] (one [`FileAnnotation`] per non-empty label-graph
//! file). Field order of the serde structs is the on-disk field order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::lg::{AnnotatedObject, BBox};

/// Default `source` tag written into the annotations artifact.
pub const DEFAULT_SOURCE: &str = "OffHME CROHME Training Set";

/// Dense mapping from label string to class index.
///
/// Indices start at 1 and follow lexicographic label order; index 0 is left
/// free for a detector's background class. Serialized as a JSON object with
/// sorted keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMapping {
    classes: BTreeMap<String, u32>,
}

impl ClassMapping {
    /// Builds the mapping from every label observed (duplicates allowed).
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let classes = unique
            .into_iter()
            .enumerate()
            .map(|(idx, label)| (label, (idx + 1) as u32))
            .collect();
        Self { classes }
    }

    /// Returns the class index of `label`, if it is known.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.classes.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates `(label, index)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.classes.iter().map(|(label, idx)| (label.as_str(), *idx))
    }
}

/// The annotations extracted from one label-graph file.
///
/// `boxes[i]` belongs to `labels[i]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileAnnotation {
    /// Label-graph filename without its extension.
    pub file_id: String,

    /// Expected image filename (`file_id` + `.png`).
    pub image_name: String,

    /// One `[xmin, ymin, xmax, ymax]` box per object.
    pub boxes: Vec<BBox>,

    /// One class label per object.
    pub labels: Vec<String>,
}

impl FileAnnotation {
    /// Builds a file annotation from extracted objects, keeping their order.
    pub fn from_objects(
        file_id: impl Into<String>,
        image_name: impl Into<String>,
        objects: &[AnnotatedObject],
    ) -> Self {
        let (boxes, labels): (Vec<BBox>, Vec<String>) = objects
            .iter()
            .map(|obj| (obj.bbox, obj.label.clone()))
            .unzip();
        Self {
            file_id: file_id.into(),
            image_name: image_name.into(),
            boxes,
            labels,
        }
    }

    /// Number of annotated objects.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Every non-empty file annotation of a dataset, in scan order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnnotations {
    /// Free-form tag naming the data source.
    pub source: String,

    pub annotations: Vec<FileAnnotation>,
}

impl DatasetAnnotations {
    /// Creates an empty collection with the given source tag.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            annotations: Vec::new(),
        }
    }

    /// Total number of objects over all files.
    pub fn object_count(&self) -> usize {
        self.annotations.iter().map(FileAnnotation::len).sum()
    }
}

impl Default for DatasetAnnotations {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}
