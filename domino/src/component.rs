//! Geometry of labeled components.

use glam::UVec2;

/// Inclusive pixel bounds of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: usize,
    pub y_min: usize,
    pub x_max: usize,
    pub y_max: usize,
}

impl BoundingBox {
    /// Bounds of a pixel set, `None` when empty.
    pub fn from_pixels(pixels: &[UVec2]) -> Option<Self> {
        let first = pixels.first()?;
        let mut bbox = Self {
            x_min: first.x as usize,
            y_min: first.y as usize,
            x_max: first.x as usize,
            y_max: first.y as usize,
        };
        for p in &pixels[1..] {
            let (x, y) = (p.x as usize, p.y as usize);
            bbox.x_min = bbox.x_min.min(x);
            bbox.x_max = bbox.x_max.max(x);
            bbox.y_min = bbox.y_min.min(y);
            bbox.y_max = bbox.y_max.max(y);
        }
        Some(bbox)
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.x_max - self.x_min + 1
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.y_max - self.y_min + 1
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Height over width.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.height() as f64 / self.width() as f64
    }
}

/// Geometric statistics of one labeled component.
///
/// The centroid is the integer-truncated mean of member coordinates, and
/// radius statistics are distances from that integer centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStats {
    pub label: u32,
    pub centroid: UVec2,
    /// Number of member pixels.
    pub area: usize,
    pub mean_radius: f64,
    /// Population standard deviation of member distances to the centroid.
    pub radius_std: f64,
    pub bbox: BoundingBox,
    /// Distance in rows between the centroid and the divider line.
    pub divider_distance: usize,
}

impl ComponentStats {
    /// Measure a component, `None` for an empty pixel set.
    pub fn measure(label: u32, pixels: &[UVec2], divider_row: usize) -> Option<Self> {
        let bbox = BoundingBox::from_pixels(pixels)?;
        let area = pixels.len();

        let (sum_x, sum_y) = pixels.iter().fold((0u64, 0u64), |(sx, sy), p| {
            (sx + u64::from(p.x), sy + u64::from(p.y))
        });
        let centroid = UVec2::new((sum_x / area as u64) as u32, (sum_y / area as u64) as u32);

        let distance = |p: &UVec2| {
            let dx = f64::from(p.x) - f64::from(centroid.x);
            let dy = f64::from(p.y) - f64::from(centroid.y);
            dx.hypot(dy)
        };
        let mean_radius = pixels.iter().map(distance).sum::<f64>() / area as f64;
        let variance = pixels
            .iter()
            .map(|p| {
                let d = distance(p) - mean_radius;
                d * d
            })
            .sum::<f64>()
            / area as f64;

        Some(Self {
            label,
            centroid,
            area,
            mean_radius,
            radius_std: variance.sqrt(),
            bbox,
            divider_distance: (centroid.y as usize).abs_diff(divider_row),
        })
    }

    /// Standard deviation over mean of centroid distances; 1.0 when the mean
    /// radius is zero.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean_radius > 0.0 {
            self.radius_std / self.mean_radius
        } else {
            1.0
        }
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.bbox.aspect_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: u32, y0: u32, side: u32) -> Vec<UVec2> {
        (y0..y0 + side)
            .flat_map(|y| (x0..x0 + side).map(move |x| UVec2::new(x, y)))
            .collect()
    }

    #[test]
    fn bbox_of_pixels() {
        let pixels = [UVec2::new(3, 7), UVec2::new(1, 9), UVec2::new(5, 8)];
        let bbox = BoundingBox::from_pixels(&pixels).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x_min: 1,
                y_min: 7,
                x_max: 5,
                y_max: 9
            }
        );
        assert_eq!(bbox.width(), 5);
        assert_eq!(bbox.height(), 3);
        assert_eq!(bbox.area(), 15);
        assert!((bbox.aspect_ratio() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_pixel_set_has_no_stats() {
        assert!(BoundingBox::from_pixels(&[]).is_none());
        assert!(ComponentStats::measure(1, &[], 0).is_none());
    }

    #[test]
    fn centroid_truncates_mean() {
        // Mean x = 10.5, mean y = 20.5 -> (10, 20).
        let stats = ComponentStats::measure(1, &square(10, 20, 2), 0).unwrap();
        assert_eq!(stats.centroid, UVec2::new(10, 20));
        assert_eq!(stats.area, 4);
        assert_eq!(stats.divider_distance, 20);
    }

    #[test]
    fn plus_shape_radius_statistics() {
        // Center plus four neighbors: distances 0, 1, 1, 1, 1.
        let pixels = [
            UVec2::new(5, 4),
            UVec2::new(4, 5),
            UVec2::new(5, 5),
            UVec2::new(6, 5),
            UVec2::new(5, 6),
        ];
        let stats = ComponentStats::measure(3, &pixels, 9).unwrap();

        assert_eq!(stats.centroid, UVec2::new(5, 5));
        assert!((stats.mean_radius - 0.8).abs() < 1e-12);
        assert!((stats.radius_std - 0.4).abs() < 1e-12);
        assert!((stats.coefficient_of_variation() - 0.5).abs() < 1e-12);
        assert_eq!(stats.divider_distance, 4);
    }

    #[test]
    fn single_pixel_has_unit_variation() {
        let stats = ComponentStats::measure(1, &[UVec2::new(2, 2)], 0).unwrap();
        assert_eq!(stats.mean_radius, 0.0);
        assert_eq!(stats.coefficient_of_variation(), 1.0);
    }
}
