//! Bounding box type in XYXY pixel coordinates.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// Label-graph files do not agree on corner order: some write the top-left
/// corner first, some the bottom-right. [`BBox::from_corners`] is the single
/// place where that is resolved, so every consumer (annotation emission and
/// overlay rendering alike) sees `xmin <= xmax` and `ymin <= ymax`.
///
/// [`BBox::from_xyxy`] stores values as given and is meant for data that was
/// already normalized (for example an annotations file read back from disk).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBox {
    /// Creates a box from explicit coordinates, without reordering.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Creates a box from two opposite corners given in any order.
    #[inline]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_xyxy(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
    }

    /// Returns the width of the bounding box.
    ///
    /// May be negative if the box was built unordered via [`BBox::from_xyxy`].
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the height of the bounding box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.xmin.is_finite()
            && self.ymin.is_finite()
            && self.xmax.is_finite()
            && self.ymax.is_finite()
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Returns true if the box lies within `[0, width] x [0, height]`,
    /// allowing each edge to overshoot by `tolerance`.
    pub fn fits_within(&self, width: f64, height: f64, tolerance: f64) -> bool {
        self.xmin >= -tolerance
            && self.ymin >= -tolerance
            && self.xmax <= width + tolerance
            && self.ymax <= height + tolerance
    }

    /// Returns the coordinates as `[xmin, ymin, xmax, ymax]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Truncates every coordinate toward zero, giving integer pixel units.
    pub fn to_pixel_i32(&self) -> [i32; 4] {
        // `as` saturates on overflow.
        [
            self.xmin.trunc() as i32,
            self.ymin.trunc() as i32,
            self.xmax.trunc() as i32,
            self.ymax.trunc() as i32,
        ]
    }
}

// Serialized as a plain `[xmin, ymin, xmax, ymax]` list.
impl Serialize for BBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [xmin, ymin, xmax, ymax] = <[f64; 4]>::deserialize(deserializer)?;
        Ok(BBox::from_xyxy(xmin, ymin, xmax, ymax))
    }
}
