//! Upright tile detection.
//!
//! Gates the pipeline: the image must contain a dark-bordered component whose
//! bounding box stands upright and covers a meaningful part of the frame.
//! Candidates are scored on aspect ratio, occupancy and bounding-box size;
//! the best one is accepted when its score reaches `min_score`.

use crate::component::BoundingBox;
use crate::config::TileShapeConfig;
use crate::labeling::{Connectivity, LabelMap};
use crate::raster::{GrayImage, dark_mask, foreground_count, mean_intensity};

/// Best-scoring upright rectangle found in an image.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCandidate {
    pub bbox: BoundingBox,
    /// Bounding-box height over width.
    pub aspect_ratio: f64,
    /// Component area over bounding-box area.
    pub occupancy: f64,
    pub score: u32,
    /// Number of component pixels.
    pub area: usize,
    /// Component area over image area.
    pub area_fraction: f64,
}

/// Composite score of a candidate.
///
/// Aspect ratio adds 40 in `[1.5, 2.3]`, 20 in `[1.3, 2.8]`, 5 otherwise.
/// Occupancy adds 30 above 0.75, 20 above 0.5, 15 above 0.3, and 25 above
/// 0.08 for a hollow outline whose box covers more than 30% of the image.
/// Bounding-box coverage adds 30 above 0.5, 20 above 0.3, 10 above 0.2.
pub fn score_candidate(aspect_ratio: f64, occupancy: f64, bbox_fraction: f64) -> u32 {
    let aspect_score = if (1.5..=2.3).contains(&aspect_ratio) {
        40
    } else if (1.3..=2.8).contains(&aspect_ratio) {
        20
    } else {
        5
    };

    let occupancy_score = if occupancy > 0.75 {
        30
    } else if occupancy > 0.5 {
        20
    } else if occupancy > 0.3 {
        15
    } else if occupancy > 0.08 && bbox_fraction > 0.3 {
        25
    } else {
        0
    };

    let coverage_score = if bbox_fraction > 0.5 {
        30
    } else if bbox_fraction > 0.3 {
        20
    } else if bbox_fraction > 0.2 {
        10
    } else {
        0
    };

    aspect_score + occupancy_score + coverage_score
}

/// Binarization threshold for tile detection: a fraction of the global mean,
/// capped at `max_threshold`.
pub fn tile_threshold(gray: &GrayImage, config: &TileShapeConfig) -> f64 {
    config
        .max_threshold
        .min(mean_intensity(gray) * config.mean_threshold_factor)
}

/// Find the best-scoring candidate, accepted only if it reaches `min_score`.
pub fn find_tile(gray: &GrayImage, config: &TileShapeConfig) -> Option<TileCandidate> {
    let best = best_candidate(gray, config)?;
    if best.score >= config.min_score {
        tracing::debug!(
            "Tile accepted: score {} bbox {:?} aspect {:.2} occupancy {:.2}",
            best.score,
            best.bbox,
            best.aspect_ratio,
            best.occupancy
        );
        Some(best)
    } else {
        tracing::debug!(
            "Best tile candidate scored {} < {}",
            best.score,
            config.min_score
        );
        None
    }
}

/// Highest-scoring component passing the size and shape prefilters,
/// regardless of `min_score`. Ties keep the lowest label.
pub fn best_candidate(gray: &GrayImage, config: &TileShapeConfig) -> Option<TileCandidate> {
    let threshold = tile_threshold(gray, config);
    let mask = dark_mask(gray, threshold);

    let total = gray.len();
    let dark = foreground_count(&mask);
    if (dark as f64) < total as f64 * config.min_foreground_fraction {
        tracing::debug!(
            "Only {} of {} pixels below tile threshold {:.1}",
            dark,
            total,
            threshold
        );
        return None;
    }

    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);
    tracing::debug!(
        "Tile threshold {:.1}: {} dark pixels in {} components",
        threshold,
        dark,
        label_map.num_labels()
    );

    let mut best: Option<TileCandidate> = None;
    for pixels in label_map.component_pixels() {
        let area = pixels.len();
        if area < config.min_component_area {
            continue;
        }
        let Some(bbox) = BoundingBox::from_pixels(&pixels) else {
            continue;
        };
        if bbox.width() < config.min_width || bbox.height() < config.min_height {
            continue;
        }

        let aspect_ratio = bbox.aspect_ratio();
        if aspect_ratio < config.min_aspect_ratio {
            continue;
        }

        let occupancy = area as f64 / bbox.area() as f64;
        let area_fraction = area as f64 / total as f64;
        if area_fraction < config.min_area_fraction || area_fraction > config.max_area_fraction {
            continue;
        }

        let bbox_fraction = bbox.area() as f64 / total as f64;
        let score = score_candidate(aspect_ratio, occupancy, bbox_fraction);
        tracing::trace!("Tile candidate {:?} scored {}", bbox, score);

        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(TileCandidate {
                bbox,
                aspect_ratio,
                occupancy,
                score,
                area,
                area_fraction,
            });
        }
    }

    best
}
