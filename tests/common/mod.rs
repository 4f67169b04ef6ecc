#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A small dataset laid out like a CROHME split: `lg/` and `img/` side by side.
pub struct Fixture {
    pub root: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(root.path().join("lg")).expect("create lg dir");
        fs::create_dir_all(root.path().join("img")).expect("create img dir");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn lg_dir(&self) -> PathBuf {
        self.path().join("lg")
    }

    pub fn img_dir(&self) -> PathBuf {
        self.path().join("img")
    }

    pub fn write_lg(&self, file_id: &str, content: &str) -> PathBuf {
        let path = self.lg_dir().join(format!("{file_id}.lg"));
        fs::write(&path, content).expect("write lg file");
        path
    }

    pub fn write_png(&self, file_id: &str, width: u32, height: u32) -> PathBuf {
        let path = self.img_dir().join(format!("{file_id}.png"));
        write_png(&path, width, height);
        path
    }

    /// Writes a JSON config pointing at this fixture, with outputs under `out/`.
    pub fn write_config(&self) -> PathBuf {
        let path = self.path().join("config.json");
        let config = serde_json::json!({
            "paths": {
                "train_lg_dir": self.lg_dir(),
                "train_img_dir": self.img_dir(),
            },
            "output": {
                "class_mapping": self.mapping_path(),
                "annotations": self.annotations_path(),
            }
        });
        fs::write(&path, config.to_string()).expect("write config");
        path
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.path().join("class_mapping.json")
    }

    pub fn annotations_path(&self) -> PathBuf {
        self.path().join("train_annotations.json")
    }
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]))
        .save(path)
        .expect("write png file");
}

/// Label-graph text for a simple expression with one relation edge.
pub const SAMPLE_LG: &str = "\
# IUD, sample
# Objects(3):
O, x_1, x, 1.0, 0
O, plus_1, +, 1.0, 1
O, 2_1, 2, 1.0, 2
BB, x_1, 10, 12, 30, 40
BB, plus_1, 40, 20, 55, 35
BB, 2_1, 70, 45, 60, 10

# Relations from SRT:
R, x_1, plus_1, Right, 1.0
";
