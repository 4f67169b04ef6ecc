//! Run configuration.
//!
//! The configuration file is required: a missing file aborts the run rather
//! than falling back to defaults. It may be JSON or YAML (chosen by the
//! `.yaml` / `.yml` extension):
//!
//! ```json
//! {
//!     "paths": {
//!         "train_lg_dir": "TC11_CROHME23/SymLG/train/OffHME",
//!         "train_img_dir": "TC11_CROHME23/IMG/train/OffHME"
//!     },
//!     "output": {
//!         "class_mapping": "class_mapping.json",
//!         "annotations": "train_annotations.json",
//!         "source": "OffHME CROHME Training Set"
//!     }
//! }
//! ```
//!
//! The `output` section and each of its keys are optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::DEFAULT_SOURCE;
use crate::error::LgboxError;

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Dataset input directories.
#[derive(Clone, Debug, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the `.lg` files.
    pub train_lg_dir: PathBuf,

    /// Directory holding the `.png` images, one per `.lg` file.
    pub train_img_dir: PathBuf,
}

/// Artifact destinations and the source tag.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub class_mapping: PathBuf,
    pub annotations: PathBuf,
    pub source: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            class_mapping: PathBuf::from("class_mapping.json"),
            annotations: PathBuf::from("train_annotations.json"),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// Loads the configuration from `path`.
///
/// # Errors
/// Returns [`LgboxError::ConfigNotFound`] if the file does not exist and
/// [`LgboxError::ConfigParse`] if it is not a valid configuration.
pub fn load_config(path: &Path) -> Result<Config, LgboxError> {
    if !path.is_file() {
        return Err(LgboxError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LgboxError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, is_yaml(path)).map_err(|message| LgboxError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_config(content: &str, yaml: bool) -> Result<Config, String> {
    if yaml {
        serde_yaml::from_str(content).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(content).map_err(|err| err.to_string())
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
