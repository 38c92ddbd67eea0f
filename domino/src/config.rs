//! Configuration types for pip counting.
//!
//! [`Config`] groups the parameters of every pipeline stage. The defaults are
//! the tuned constants of the detector; all fields can be overridden from
//! JSON via [`Config::from_json_str`].

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config JSON")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Tile shape
// ============================================================================

/// Parameters of the vertical-rectangle gate run before pip analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileShapeConfig {
    /// Upper bound for the binarization threshold.
    pub max_threshold: f64,
    /// Threshold as a fraction of the global mean intensity.
    pub mean_threshold_factor: f64,
    /// Minimum fraction of dark pixels for a tile to be possible at all.
    pub min_foreground_fraction: f64,
    /// Components smaller than this (pixels) are ignored.
    pub min_component_area: usize,
    /// Minimum bounding-box width in pixels.
    pub min_width: usize,
    /// Minimum bounding-box height in pixels.
    pub min_height: usize,
    /// Minimum height/width ratio. Tiles must stand upright.
    pub min_aspect_ratio: f64,
    /// Accepted range of component area as a fraction of the image.
    pub min_area_fraction: f64,
    pub max_area_fraction: f64,
    /// Minimum composite score for the best candidate to count as a tile.
    pub min_score: u32,
}

impl Default for TileShapeConfig {
    fn default() -> Self {
        Self {
            max_threshold: 150.0,
            mean_threshold_factor: 0.7,
            min_foreground_fraction: 0.05,
            min_component_area: 100,
            min_width: 20,
            min_height: 40,
            min_aspect_ratio: 1.2,
            min_area_fraction: 0.03,
            max_area_fraction: 0.98,
            min_score: 60,
        }
    }
}

impl TileShapeConfig {
    pub fn validate(&self) {
        assert!(
            self.max_threshold > 0.0 && self.max_threshold <= 255.0,
            "max_threshold must be in (0, 255], got {}",
            self.max_threshold
        );
        assert!(
            self.mean_threshold_factor > 0.0,
            "mean_threshold_factor must be positive, got {}",
            self.mean_threshold_factor
        );
        assert!(
            (0.0..=1.0).contains(&self.min_foreground_fraction),
            "min_foreground_fraction must be in [0, 1], got {}",
            self.min_foreground_fraction
        );
        assert!(
            self.min_area_fraction <= self.max_area_fraction,
            "min_area_fraction ({}) must be <= max_area_fraction ({})",
            self.min_area_fraction,
            self.max_area_fraction
        );
    }
}

// ============================================================================
// Divider line
// ============================================================================

/// Parameters of the horizontal divider search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerConfig {
    /// Search band as fractions of the image height, `[band_start, band_end)`.
    pub band_start: f64,
    pub band_end: f64,
    /// Pixels below this intensity count as dark.
    pub dark_threshold: u8,
    /// The darkest row is accepted when more than this fraction is dark.
    pub min_dark_fraction: f64,
    /// Mean intensity a 3-row window must stay below in the second scan.
    pub window_max_mean: f64,
    /// Dark fraction the window's center row must exceed in the second scan.
    pub window_min_dark_fraction: f64,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            band_start: 0.3,
            band_end: 0.7,
            dark_threshold: 128,
            min_dark_fraction: 0.5,
            window_max_mean: 100.0,
            window_min_dark_fraction: 0.4,
        }
    }
}

impl DividerConfig {
    pub fn validate(&self) {
        assert!(
            0.0 <= self.band_start && self.band_start <= self.band_end && self.band_end <= 1.0,
            "divider band must satisfy 0 <= start <= end <= 1, got [{}, {})",
            self.band_start,
            self.band_end
        );
        assert!(
            (0.0..=1.0).contains(&self.min_dark_fraction),
            "min_dark_fraction must be in [0, 1], got {}",
            self.min_dark_fraction
        );
        assert!(
            (0.0..=1.0).contains(&self.window_min_dark_fraction),
            "window_min_dark_fraction must be in [0, 1], got {}",
            self.window_min_dark_fraction
        );
    }
}

// ============================================================================
// Circle validation
// ============================================================================

/// Shape criteria a component must meet to count as a pip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleConfig {
    /// Components with fewer pixels are dropped before any statistics.
    pub min_pixels: usize,
    /// Maximum std/mean of pixel distances to the centroid.
    pub max_coefficient_of_variation: f64,
    /// Accepted bounding-box height/width range.
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Centroid must be further than `factor * radius_min` from the divider.
    pub divider_clearance_factor: f64,
    /// Minimum `area / mean_radius²`. A filled disk gives 9π/4.
    pub min_area_to_radius_sq: f64,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            min_pixels: 5,
            max_coefficient_of_variation: 0.45,
            min_aspect_ratio: 0.6,
            max_aspect_ratio: 1.7,
            divider_clearance_factor: 0.5,
            min_area_to_radius_sq: 1.5,
        }
    }
}

impl CircleConfig {
    pub fn validate(&self) {
        assert!(
            self.max_coefficient_of_variation > 0.0,
            "max_coefficient_of_variation must be positive, got {}",
            self.max_coefficient_of_variation
        );
        assert!(
            0.0 < self.min_aspect_ratio && self.min_aspect_ratio <= self.max_aspect_ratio,
            "aspect ratio range must satisfy 0 < min <= max, got [{}, {}]",
            self.min_aspect_ratio,
            self.max_aspect_ratio
        );
    }
}

// ============================================================================
// Size tiers
// ============================================================================

/// Radius bounds and binarization threshold for a range of image sizes.
///
/// `size` is `max(width, height)`. A tier applies when `size < max_size`;
/// `None` is the catch-all and must be last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    pub max_size: Option<usize>,
    pub radius_min: usize,
    /// `radius_max = floor(size * radius_max_fraction)`.
    pub radius_max_fraction: f64,
    pub threshold: f64,
}

impl SizeTier {
    pub fn applies_to(&self, size: usize) -> bool {
        self.max_size.is_none_or(|max| size < max)
    }

    pub fn radius_bounds(&self, size: usize) -> RadiusBounds {
        RadiusBounds {
            min: self.radius_min as f64,
            max: (size as f64 * self.radius_max_fraction).floor(),
        }
    }
}

/// Admissible mean radius range for a pip, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBounds {
    pub min: f64,
    pub max: f64,
}

impl RadiusBounds {
    #[inline]
    pub fn contains(&self, radius: f64) -> bool {
        self.min <= radius && radius <= self.max
    }
}

fn default_tiers() -> Vec<SizeTier> {
    vec![
        SizeTier {
            max_size: Some(200),
            radius_min: 2,
            radius_max_fraction: 0.3,
            threshold: 128.0,
        },
        SizeTier {
            max_size: Some(500),
            radius_min: 3,
            radius_max_fraction: 0.15,
            threshold: 128.0,
        },
        SizeTier {
            max_size: None,
            radius_min: 5,
            radius_max_fraction: 0.1,
            threshold: 128.0,
        },
    ]
}

// ============================================================================
// Pipeline configuration
// ============================================================================

/// Configuration for the pip counting pipeline.
///
/// # Example
///
/// ```rust
/// use domino::Config;
///
/// let mut config = Config::default();
/// config.circle.max_coefficient_of_variation = 0.35;
/// config.validate();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tile: TileShapeConfig,
    pub divider: DividerConfig,
    pub circle: CircleConfig,
    /// Size tiers, checked in order.
    pub tiers: Vec<SizeTier>,
    /// Half-height of the band cleared around the divider is
    /// `max(divider_margin_min, floor(size * divider_margin_fraction))`.
    pub divider_margin_min: usize,
    pub divider_margin_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile: TileShapeConfig::default(),
            divider: DividerConfig::default(),
            circle: CircleConfig::default(),
            tiers: default_tiers(),
            divider_margin_min: 2,
            divider_margin_fraction: 0.02,
        }
    }
}

impl Config {
    /// Parse a JSON config. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the configuration, panicking if invalid.
    pub fn validate(&self) {
        self.tile.validate();
        self.divider.validate();
        self.circle.validate();

        let Some((last, rest)) = self.tiers.split_last() else {
            panic!("at least one size tier is required");
        };
        assert!(
            last.max_size.is_none(),
            "the last size tier must be a catch-all (max_size = None)"
        );
        assert!(
            rest.iter().all(|tier| tier.max_size.is_some()),
            "only the last size tier may be a catch-all"
        );
        for tier in &self.tiers {
            assert!(
                tier.radius_min > 0,
                "radius_min must be positive, got {}",
                tier.radius_min
            );
            assert!(
                tier.radius_max_fraction > 0.0,
                "radius_max_fraction must be positive, got {}",
                tier.radius_max_fraction
            );
        }

        assert!(
            self.divider_margin_fraction >= 0.0,
            "divider_margin_fraction must be non-negative, got {}",
            self.divider_margin_fraction
        );
    }

    /// Tier for an image whose larger side is `size` pixels.
    ///
    /// Falls back to the last tier; [`Config::validate`] guarantees it is
    /// the catch-all.
    pub fn tier_for(&self, size: usize) -> &SizeTier {
        self.tiers
            .iter()
            .find(|tier| tier.applies_to(size))
            .or_else(|| self.tiers.last())
            .expect("Config::validate guarantees at least one tier")
    }

    /// Half-height of the band cleared around the divider row.
    pub fn divider_margin(&self, size: usize) -> usize {
        let scaled = (size as f64 * self.divider_margin_fraction).floor() as usize;
        self.divider_margin_min.max(scaled)
    }
}
