//! Pip counter implementation and related types.
//!
//! [`PipCounter`] runs the full pipeline on a raster: tile gate, divider
//! search, binarization with the divider band cleared, component labeling,
//! circle validation and the per-half tally.


// =============================================================================
// Imports
// =============================================================================

use glam::UVec2;
use rayon::prelude::*;

use crate::circle::{CircleRejection, CircleValidator};
use crate::component::ComponentStats;
use crate::config::Config;
use crate::divider::{DividerLine, locate_divider};
use crate::labeling::{Connectivity, LabelMap};
use crate::raster::{Raster, dark_mask, foreground_count};
use crate::tile_shape::{TileCandidate, find_tile};

// =============================================================================
// Result types
// =============================================================================

/// Outcome of counting pips on one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipResult {
    /// No upright tile was found; pip analysis did not run.
    NoTile,
    Counted { upper: u32, lower: u32 },
}

impl PipResult {
    /// External `(upper, lower)` pair, `(-1, -1)` when no tile was found.
    pub fn as_pair(self) -> (i32, i32) {
        match self {
            PipResult::NoTile => (-1, -1),
            PipResult::Counted { upper, lower } => (upper as i32, lower as i32),
        }
    }

    pub fn is_tile(self) -> bool {
        matches!(self, PipResult::Counted { .. })
    }
}

/// Which half of the tile a pip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Upper,
    Lower,
    /// Centroid exactly on the divider row; counted in neither half.
    OnDivider,
}

impl Half {
    pub fn of(centroid_y: u32, divider_row: usize) -> Self {
        let y = centroid_y as usize;
        if y < divider_row {
            Half::Upper
        } else if y > divider_row {
            Half::Lower
        } else {
            Half::OnDivider
        }
    }
}

/// An accepted pip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pip {
    pub center: UVec2,
    pub mean_radius: f64,
    /// Number of pixels.
    pub area: usize,
    pub half: Half,
}

/// Diagnostic information from pip counting.
///
/// All counts are zero when no tile was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Pixels below the tier threshold after the divider band was cleared.
    pub foreground_pixels: usize,
    /// Number of connected components labeled.
    pub connected_components: usize,
    pub rejected_too_few_pixels: usize,
    pub rejected_radius: usize,
    pub rejected_area: usize,
    pub rejected_roundness: usize,
    pub rejected_aspect_ratio: usize,
    pub rejected_near_divider: usize,
    pub rejected_elongated: usize,
    /// Accepted pips whose centroid lies on the divider row.
    pub on_divider: usize,
}

impl Diagnostics {
    fn record(&mut self, rejection: CircleRejection) {
        let counter = match rejection {
            CircleRejection::TooFewPixels => &mut self.rejected_too_few_pixels,
            CircleRejection::RadiusOutOfRange => &mut self.rejected_radius,
            CircleRejection::AreaTooSmall => &mut self.rejected_area,
            CircleRejection::NotRound => &mut self.rejected_roundness,
            CircleRejection::AspectRatio => &mut self.rejected_aspect_ratio,
            CircleRejection::NearDivider => &mut self.rejected_near_divider,
            CircleRejection::Elongated => &mut self.rejected_elongated,
        };
        *counter += 1;
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected_too_few_pixels
            + self.rejected_radius
            + self.rejected_area
            + self.rejected_roundness
            + self.rejected_aspect_ratio
            + self.rejected_near_divider
            + self.rejected_elongated
    }
}

/// Full result of a pip counting run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipDetection {
    pub result: PipResult,
    /// Accepted tile, `None` exactly when `result` is [`PipResult::NoTile`].
    pub tile: Option<TileCandidate>,
    pub divider: Option<DividerLine>,
    /// Accepted pips in label order.
    pub pips: Vec<Pip>,
    pub diagnostics: Diagnostics,
}

impl PipDetection {
    fn no_tile() -> Self {
        Self {
            result: PipResult::NoTile,
            tile: None,
            divider: None,
            pips: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }
}

// =============================================================================
// PipCounter
// =============================================================================

/// Counts domino pips with a fixed configuration.
///
/// # Example
///
/// ```rust,ignore
/// use domino::{Config, PipCounter};
///
/// let counter = PipCounter::new();
/// let detection = counter.detect(&raster);
/// let (upper, lower) = detection.result.as_pair();
///
/// let mut config = Config::default();
/// config.circle.max_coefficient_of_variation = 0.35;
/// let strict = PipCounter::from_config(config);
/// ```
#[derive(Debug, Default)]
pub struct PipCounter {
    config: Config,
}

impl PipCounter {
    /// Create a pip counter with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline on a raster.
    pub fn detect(&self, raster: &Raster) -> PipDetection {
        self.config.validate();

        let gray = raster.intensity();
        let (width, height) = (gray.width(), gray.height());

        // Step 1: Gate on an upright tile
        let Some(tile) = find_tile(&gray, &self.config.tile) else {
            tracing::info!("No tile found in {}x{} image", width, height);
            return PipDetection::no_tile();
        };

        // Step 2: Divider row and size tier
        let divider = locate_divider(&gray, &self.config.divider);
        let size = width.max(height);
        let tier = self.config.tier_for(size);
        let bounds = tier.radius_bounds(size);
        tracing::debug!(
            "Divider row {} ({:?}), radius bounds [{}, {}], threshold {}",
            divider.row,
            divider.rule,
            bounds.min,
            bounds.max,
            tier.threshold
        );

        // Step 3: Binarize and clear the band around the divider
        let mut mask = dark_mask(&gray, tier.threshold);
        let margin = self.config.divider_margin(size);
        mask.fill_rows(divider.row.saturating_sub(margin), divider.row + margin, 0);

        // Step 4: Label and classify components (parallel, label order kept)
        let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);
        let validator = CircleValidator::new(&self.config.circle, bounds, divider.row);
        let components = label_map.component_pixels();
        let classified: Vec<Result<ComponentStats, CircleRejection>> = components
            .par_iter()
            .enumerate()
            .map(|(idx, pixels)| validator.classify(idx as u32 + 1, pixels))
            .collect();

        let mut diagnostics = Diagnostics {
            foreground_pixels: foreground_count(&mask),
            connected_components: label_map.num_labels(),
            ..Default::default()
        };

        // Step 5: Tally
        let mut pips = Vec::new();
        let (mut upper, mut lower) = (0u32, 0u32);
        for outcome in classified {
            match outcome {
                Ok(stats) => {
                    let half = Half::of(stats.centroid.y, divider.row);
                    match half {
                        Half::Upper => upper += 1,
                        Half::Lower => lower += 1,
                        Half::OnDivider => diagnostics.on_divider += 1,
                    }
                    tracing::trace!(
                        "Pip {} at {:?}, r={:.2}, {:?}",
                        stats.label,
                        stats.centroid,
                        stats.mean_radius,
                        half
                    );
                    pips.push(Pip {
                        center: stats.centroid,
                        mean_radius: stats.mean_radius,
                        area: stats.area,
                        half,
                    });
                }
                Err(rejection) => diagnostics.record(rejection),
            }
        }

        tracing::debug!(
            "{} components, {} pips, {} rejected, {} on divider",
            diagnostics.connected_components,
            pips.len(),
            diagnostics.total_rejected(),
            diagnostics.on_divider
        );
        tracing::info!("Counted {} + {} pips", upper, lower);

        PipDetection {
            result: PipResult::Counted { upper, lower },
            tile: Some(tile),
            divider: Some(divider),
            pips,
            diagnostics,
        }
    }
}

/// Count pips with the default configuration.
///
/// Returns `(upper, lower)`, or `(-1, -1)` when the image does not contain
/// an upright tile.
pub fn count_pips(raster: &Raster) -> (i32, i32) {
    PipCounter::new().detect(raster).result.as_pair()
}
