//! Divider line search.
//!
//! Domino halves are separated by a dark horizontal bar. The search looks at
//! row intensity profiles inside a central band of the image and falls back
//! to the middle row when no row looks like a bar.

use crate::config::DividerConfig;
use crate::raster::GrayImage;

/// Which rule located the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerRule {
    /// Darkest row in the band, with enough dark pixels on its own.
    DarkestRow,
    /// First row whose 3-row window is dark and which is itself mostly dark.
    DarkWindow,
    /// No row qualified (or the band is empty); `height / 2`.
    Midpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerLine {
    pub row: usize,
    pub rule: DividerRule,
}

/// Per-row sums of intensity and counts of dark pixels.
struct RowProfile {
    sums: Vec<u64>,
    dark: Vec<usize>,
    width: usize,
}

impl RowProfile {
    fn new(gray: &GrayImage, dark_threshold: u8) -> Self {
        let (sums, dark) = gray
            .rows()
            .map(|row| {
                let sum = row.iter().map(|&v| u64::from(v)).sum::<u64>();
                let dark = row.iter().filter(|&&v| v < dark_threshold).count();
                (sum, dark)
            })
            .unzip();
        Self {
            sums,
            dark,
            width: gray.width(),
        }
    }

    #[inline]
    fn mean(&self, y: usize) -> f64 {
        self.sums[y] as f64 / self.width as f64
    }

    /// Mean intensity over rows `[y - 1, y + 1]`, clamped to the image.
    fn window_mean(&self, y: usize) -> f64 {
        let start = y.saturating_sub(1);
        let end = (y + 2).min(self.sums.len());
        let sum: u64 = self.sums[start..end].iter().sum();
        sum as f64 / ((end - start) * self.width) as f64
    }

    #[inline]
    fn dark_exceeds(&self, y: usize, fraction: f64) -> bool {
        self.dark[y] as f64 > self.width as f64 * fraction
    }
}

/// Locate the horizontal divider row. Always returns a row in `[0, height)`
/// for a non-empty image.
pub fn locate_divider(gray: &GrayImage, config: &DividerConfig) -> DividerLine {
    let height = gray.height();
    let midpoint = DividerLine {
        row: height / 2,
        rule: DividerRule::Midpoint,
    };

    let start = (height as f64 * config.band_start) as usize;
    let end = ((height as f64 * config.band_end) as usize).min(height);
    if start >= end || gray.width() == 0 {
        tracing::debug!("Divider search band is empty, using midpoint row {}", midpoint.row);
        return midpoint;
    }

    let profile = RowProfile::new(gray, config.dark_threshold);

    // First minimum wins on ties.
    let darkest = (start..end).fold(start, |best, y| {
        if profile.mean(y) < profile.mean(best) {
            y
        } else {
            best
        }
    });
    if profile.dark_exceeds(darkest, config.min_dark_fraction) {
        return DividerLine {
            row: darkest,
            rule: DividerRule::DarkestRow,
        };
    }

    let windowed = (start..end).find(|&y| {
        profile.window_mean(y) < config.window_max_mean
            && profile.dark_exceeds(y, config.window_min_dark_fraction)
    });
    if let Some(row) = windowed {
        return DividerLine {
            row,
            rule: DividerRule::DarkWindow,
        };
    }

    tracing::debug!(
        "No divider row in band [{}, {}), using midpoint row {}",
        start,
        end,
        midpoint.row
    );
    midpoint
}
