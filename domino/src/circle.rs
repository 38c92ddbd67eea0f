//! Pip circle validation.
//!
//! A component is a pip when the pixel distances to its centroid are
//! consistent (round shape), its mean radius fits the size tier, its bounding
//! box is roughly square and it does not sit on the divider line.

use std::f64::consts::PI;

use glam::UVec2;

use crate::component::ComponentStats;
use crate::config::{CircleConfig, RadiusBounds};

/// First criterion a component failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircleRejection {
    /// Fewer member pixels than `min_pixels`; no statistics computed.
    TooFewPixels,
    /// Mean radius outside the tier's radius bounds.
    RadiusOutOfRange,
    /// Area below `π × radius_min²`.
    AreaTooSmall,
    /// Coefficient of variation of centroid distances too high.
    NotRound,
    /// Bounding-box height/width outside the accepted range.
    AspectRatio,
    /// Centroid too close to the divider row.
    NearDivider,
    /// `area / mean_radius²` too low, typical of lines and slivers.
    Elongated,
}

/// Classifies components against fixed radius bounds and a divider row.
#[derive(Debug, Clone)]
pub struct CircleValidator<'a> {
    config: &'a CircleConfig,
    bounds: RadiusBounds,
    divider_row: usize,
}

impl<'a> CircleValidator<'a> {
    pub fn new(config: &'a CircleConfig, bounds: RadiusBounds, divider_row: usize) -> Self {
        Self {
            config,
            bounds,
            divider_row,
        }
    }

    #[inline]
    pub fn bounds(&self) -> RadiusBounds {
        self.bounds
    }

    /// Measure a component and accept it as a pip or name the first failed
    /// criterion.
    pub fn classify(
        &self,
        label: u32,
        pixels: &[UVec2],
    ) -> Result<ComponentStats, CircleRejection> {
        if pixels.len() < self.config.min_pixels.max(1) {
            return Err(CircleRejection::TooFewPixels);
        }
        let stats = ComponentStats::measure(label, pixels, self.divider_row)
            .ok_or(CircleRejection::TooFewPixels)?;
        self.check(&stats)?;
        Ok(stats)
    }

    /// Apply every shape criterion to measured statistics.
    pub fn check(&self, stats: &ComponentStats) -> Result<(), CircleRejection> {
        let config = self.config;
        let radius_min = self.bounds.min;

        if !self.bounds.contains(stats.mean_radius) {
            return Err(CircleRejection::RadiusOutOfRange);
        }
        if (stats.area as f64) < PI * radius_min * radius_min {
            return Err(CircleRejection::AreaTooSmall);
        }
        if stats.coefficient_of_variation() >= config.max_coefficient_of_variation {
            return Err(CircleRejection::NotRound);
        }
        let aspect = stats.aspect_ratio();
        if aspect < config.min_aspect_ratio || aspect > config.max_aspect_ratio {
            return Err(CircleRejection::AspectRatio);
        }
        if stats.divider_distance as f64 <= config.divider_clearance_factor * radius_min {
            return Err(CircleRejection::NearDivider);
        }
        if stats.mean_radius <= 0.0
            || stats.area as f64 / (stats.mean_radius * stats.mean_radius)
                <= config.min_area_to_radius_sq
        {
            return Err(CircleRejection::Elongated);
        }

        Ok(())
    }
}
