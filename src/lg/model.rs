//! In-memory model of one label-graph file.
//!
//! A label-graph file declares objects (`O,` lines) and their bounding boxes
//! (`BB,` lines) separately, keyed by an object identifier. [`LabelGraph`]
//! keeps the two declaration kinds in two explicit maps and joins them on
//! demand.

use std::collections::HashMap;

use super::bbox::BBox;

/// A recognized symbol with its class label and bounding box.
///
/// Produced only for identifiers that have both an object declaration and a
/// bounding-box declaration in the same file.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedObject {
    /// Object identifier as written in the file.
    pub id: String,

    /// Symbol class label (e.g. `"T_3"`, `"\\alpha"`).
    pub label: String,

    /// Bounding box in pixel coordinates, corners normalized.
    pub bbox: BBox,
}

/// Per-file line counters gathered while parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Total number of lines read.
    pub lines: usize,
    /// Blank, `#` comment and unrecognized lines.
    pub skipped: usize,
    /// `O,` / `BB,` lines dropped for too few fields or bad coordinates.
    pub malformed: usize,
}

/// The object and bounding-box declarations of a single label-graph file.
///
/// Both maps follow ordinary map-insert semantics: a later declaration for an
/// identifier replaces an earlier one. Object iteration order is the order in
/// which each identifier was *first* declared, so a redeclared object keeps
/// its original position.
#[derive(Clone, Debug, Default)]
pub struct LabelGraph {
    object_order: Vec<String>,
    objects: HashMap<String, String>,
    boxes: HashMap<String, BBox>,
    pub stats: ParseStats,
}

impl LabelGraph {
    /// Creates an empty label graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an object declaration (last declaration wins).
    pub fn insert_object(&mut self, id: impl Into<String>, label: impl Into<String>) {
        let id = id.into();
        if !self.objects.contains_key(&id) {
            self.object_order.push(id.clone());
        }
        self.objects.insert(id, label.into());
    }

    /// Records a bounding-box declaration (last declaration wins).
    pub fn insert_bbox(&mut self, id: impl Into<String>, bbox: BBox) {
        self.boxes.insert(id.into(), bbox);
    }

    /// Joins objects with their boxes, in object declaration order.
    ///
    /// Identifiers present in only one of the two maps are dropped.
    pub fn annotated_objects(&self) -> Vec<AnnotatedObject> {
        self.object_order
            .iter()
            .filter_map(|id| {
                let bbox = self.boxes.get(id)?;
                let label = self.objects.get(id)?;
                Some(AnnotatedObject {
                    id: id.clone(),
                    label: label.clone(),
                    bbox: *bbox,
                })
            })
            .collect()
    }

    /// Number of object identifiers with no bounding box.
    pub fn objects_without_bbox(&self) -> usize {
        self.object_order
            .iter()
            .filter(|id| !self.boxes.contains_key(id.as_str()))
            .count()
    }

    /// Number of bounding-box identifiers with no object declaration.
    pub fn bboxes_without_object(&self) -> usize {
        self.boxes
            .keys()
            .filter(|id| !self.objects.contains_key(id.as_str()))
            .count()
    }
}
