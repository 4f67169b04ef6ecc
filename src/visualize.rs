//! Bounding-box overlays for visual spot checks.
//!
//! Renders the objects of a label-graph file on top of its image and saves
//! the result as `<out_dir>/<file_id>_overlay.png`. Boxes come from the same
//! extractor the converter uses, so what is drawn is exactly what gets
//! emitted.
//!
//! Labels are not rasterized (no font is bundled); each drawn colour is
//! logged next to its label instead.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::{self, file_id_for, image_name_for};
use crate::error::LgboxError;
use crate::lg::{self, AnnotatedObject};

/// Height of the label tab drawn above each box.
const TAB_HEIGHT: i32 = 20;
/// Approximate width of one label character in the tab.
const TAB_CHAR_WIDTH: i32 = 8;
const BOX_THICKNESS: i32 = 2;
/// Upper bound for each random colour channel, keeps colours visible on white.
const MAX_CHANNEL: u8 = 200;

/// Options for the overlay renderer.
#[derive(Clone, Debug)]
pub struct VisualizeOptions {
    /// Number of random samples when no file is named.
    pub count: usize,
    /// Seed for sample selection and colours.
    pub seed: Option<u64>,
    /// Directory the overlay images are written to.
    pub out_dir: PathBuf,
}

impl Default for VisualizeOptions {
    fn default() -> Self {
        Self {
            count: 2,
            seed: None,
            out_dir: PathBuf::from("overlays"),
        }
    }
}

/// Renders overlays for `file` (a file id, with or without `.lg`) or for
/// randomly chosen samples of `lg_dir`.
///
/// Returns the overlay paths written. Samples whose image is missing or
/// cannot be decoded are logged and skipped.
pub fn visualize(
    lg_dir: &Path,
    img_dir: &Path,
    file: Option<&str>,
    opts: &VisualizeOptions,
) -> Result<Vec<PathBuf>, LgboxError> {
    if file.is_none() && opts.count == 0 {
        return Err(LgboxError::InvalidArgument(
            "sample count must be at least 1".to_string(),
        ));
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let file_ids = match file {
        Some(name) => vec![name.strip_suffix(".lg").unwrap_or(name).to_string()],
        None => pick_samples(lg_dir, opts.count, &mut rng)?,
    };

    fs::create_dir_all(&opts.out_dir).map_err(|source| LgboxError::FileWrite {
        path: opts.out_dir.clone(),
        source,
    })?;

    let mut written = Vec::new();
    for file_id in file_ids {
        if let Some(path) = visualize_sample(lg_dir, img_dir, &file_id, &opts.out_dir, &mut rng)? {
            written.push(path);
        }
    }
    Ok(written)
}

/// Picks up to `count` distinct file ids from `lg_dir` at random.
pub fn pick_samples<R: Rng + ?Sized>(
    lg_dir: &Path,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>, LgboxError> {
    let mut files = dataset::collect_lg_files(lg_dir)?;
    if files.is_empty() {
        return Err(LgboxError::NoLabelGraphFiles {
            dir: lg_dir.to_path_buf(),
        });
    }

    files.shuffle(rng);
    Ok(files.iter().take(count).map(|p| file_id_for(p)).collect())
}

/// Renders one sample. Returns `None` if its image is unavailable.
pub fn visualize_sample<R: Rng + ?Sized>(
    lg_dir: &Path,
    img_dir: &Path,
    file_id: &str,
    out_dir: &Path,
    rng: &mut R,
) -> Result<Option<PathBuf>, LgboxError> {
    let img_path = img_dir.join(image_name_for(file_id));
    if !img_path.is_file() {
        warn!("Could not find image for {} in {}", file_id, img_dir.display());
        return Ok(None);
    }

    let mut canvas = match image::open(&img_path) {
        Ok(img) => img.to_rgb8(),
        Err(err) => {
            warn!("Failed to open image {}: {}", img_path.display(), err);
            return Ok(None);
        }
    };

    let lg_path = lg_dir.join(format!("{file_id}.{}", dataset::LG_EXTENSION));
    let objects = lg::extract_objects(&lg_path);
    info!("Visualizing: {} ({} bounding boxes)", file_id, objects.len());

    draw_objects(&mut canvas, &objects, rng);

    let out_path = out_dir.join(format!("{file_id}_overlay.png"));
    canvas.save(&out_path).map_err(|source| LgboxError::Image {
        path: out_path.clone(),
        source,
    })?;
    Ok(Some(out_path))
}

/// Draws every object onto `canvas` with a random colour per object.
pub fn draw_objects<R: Rng + ?Sized>(canvas: &mut RgbImage, objects: &[AnnotatedObject], rng: &mut R) {
    for obj in objects {
        let color = Rgb([
            rng.random_range(0..=MAX_CHANNEL),
            rng.random_range(0..=MAX_CHANNEL),
            rng.random_range(0..=MAX_CHANNEL),
        ]);
        info!("  {} -> rgb{:?}", obj.label, color.0);
        draw_object(canvas, obj, color);
    }
}

fn draw_object(canvas: &mut RgbImage, obj: &AnnotatedObject, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let max_x = width as i32 - 1;
    let max_y = height as i32 - 1;

    let [x1, y1, x2, y2] = obj.bbox.to_pixel_i32();
    let (x1, x2) = (x1.clamp(0, max_x), x2.clamp(0, max_x));
    let (y1, y2) = (y1.clamp(0, max_y), y2.clamp(0, max_y));

    for inset in 0..BOX_THICKNESS {
        let w = x2 - x1 + 1 - 2 * inset;
        let h = y2 - y1 + 1 - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }

    let tab_width = TAB_CHAR_WIDTH * obj.label.chars().count().max(1) as i32;
    let tab = Rect::at(x1, y1 - TAB_HEIGHT).of_size(tab_width as u32, TAB_HEIGHT as u32);
    // imageproc clips rectangles to the canvas.
    draw_filled_rect_mut(canvas, tab, color);
}
