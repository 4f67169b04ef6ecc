//! Label-graph record extraction.
//!
//! A label-graph (`.lg`) file is the per-sample ground truth of a CROHME-style
//! handwritten-math dataset. This module reads one such file and produces the
//! [`AnnotatedObject`]s it describes: every identifier with both an `O,`
//! (object/label) and a `BB,` (bounding box) declaration.
//!
//! # Example
//!
//! ```
//! use lgbox::lg::parse_lg_str;
//!
//! let graph = parse_lg_str("O, 1, alpha, 1.0\nBB, 1, 10, 20, 30, 40\n");
//! let objects = graph.annotated_objects();
//!
//! assert_eq!(objects.len(), 1);
//! assert_eq!(objects[0].label, "alpha");
//! assert_eq!(objects[0].bbox.to_array(), [10.0, 20.0, 30.0, 40.0]);
//! ```

mod bbox;
mod model;
pub mod parser;

pub use bbox::BBox;
pub use model::{AnnotatedObject, LabelGraph, ParseStats};
pub use parser::{
    extract_objects, parse_line, parse_lg_str, read_lg_file, LgRecord, LineError, RecordKind,
};
