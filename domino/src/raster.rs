//! Input rasters and the two intensity primitives the pipeline builds on.
//!
//! A [`Raster`] holds interleaved 8-bit samples with one, three or four
//! channels. Pipeline stages work on the single-channel [`GrayImage`]
//! returned by [`Raster::intensity`] and on [`BinaryMask`]s produced by
//! [`dark_mask`].

use crate::grid::Grid;

/// Single-channel 8-bit intensity image.
pub type GrayImage = Grid<u8>;

/// Binary raster: 0 is background, any nonzero sample is foreground.
pub type BinaryMask = Grid<u8>;

/// Conventional foreground value for masks produced by this crate.
pub const FOREGROUND: u8 = 255;

/// Channel layout of a [`Raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray,
    Rgb,
    /// RGB plus a fourth (alpha) channel, ignored for intensity.
    Rgba,
}

impl Channels {
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    pub fn from_count(count: usize) -> Result<Self, RasterError> {
        match count {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(RasterError::UnsupportedChannels(other)),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Raster dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),
    #[error("Sample count {actual} does not match {width}x{height}x{channels} = {expected}")]
    SampleCount {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

/// Owned 8-bit raster, row-major with interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<u8>,
}

impl Raster {
    pub fn new(
        width: usize,
        height: usize,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }

        let expected = width * height * channels.count();
        if data.len() != expected {
            return Err(RasterError::SampleCount {
                width,
                height,
                channels: channels.count(),
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wrap a gray image as a single-channel raster.
    pub fn from_gray(gray: GrayImage) -> Result<Self, RasterError> {
        let (width, height) = (gray.width(), gray.height());
        Self::new(width, height, Channels::Gray, gray.into_vec())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Per-pixel intensity plane.
    ///
    /// Gray rasters are copied as-is. Color rasters use the rounded mean of
    /// the R, G and B samples; a fourth channel is ignored.
    pub fn intensity(&self) -> GrayImage {
        let cells = match self.channels {
            Channels::Gray => self.data.clone(),
            Channels::Rgb | Channels::Rgba => self
                .data
                .chunks_exact(self.channels.count())
                .map(|px| rgb_mean(px[0], px[1], px[2]))
                .collect(),
        };
        Grid::from_vec(self.width, self.height, cells)
    }
}

/// Rounded mean of three samples. A third never ties, so `(sum + 1) / 3`
/// rounds to nearest.
#[inline]
fn rgb_mean(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16 + 1) / 3) as u8
}

/// Grayscale conversion with channel layout preserved.
///
/// RGB rasters get `round(mean(R, G, B))` replicated across all three
/// channels. Any other layout is returned unchanged.
pub fn grayscale(raster: &Raster) -> Raster {
    if raster.channels != Channels::Rgb {
        return raster.clone();
    }

    let data = raster
        .data
        .chunks_exact(3)
        .flat_map(|px| {
            let v = rgb_mean(px[0], px[1], px[2]);
            [v, v, v]
        })
        .collect();

    Raster {
        width: raster.width,
        height: raster.height,
        channels: raster.channels,
        data,
    }
}

/// Global threshold: `max_value` where intensity >= `threshold`, else 0.
///
/// Multi-channel input is thresholded on its intensity and the binary result
/// is replicated across every channel of the output.
pub fn global_threshold(raster: &Raster, threshold: f64, max_value: u8) -> Raster {
    let intensity = raster.intensity();
    let channels = raster.channels.count();

    let data = intensity
        .cells()
        .iter()
        .flat_map(|&v| {
            let out = if f64::from(v) >= threshold { max_value } else { 0 };
            std::iter::repeat_n(out, channels)
        })
        .collect();

    Raster {
        width: raster.width,
        height: raster.height,
        channels: raster.channels,
        data,
    }
}

/// Inverted global threshold on a gray image: foreground where the
/// intensity is strictly below `threshold`.
pub fn dark_mask(gray: &GrayImage, threshold: f64) -> BinaryMask {
    let cells = gray
        .cells()
        .iter()
        .map(|&v| if f64::from(v) < threshold { FOREGROUND } else { 0 })
        .collect();
    Grid::from_vec(gray.width(), gray.height(), cells)
}

/// Mean intensity of every sample in the image (0.0 for an empty image).
pub fn mean_intensity(gray: &GrayImage) -> f64 {
    if gray.is_empty() {
        return 0.0;
    }
    let sum: u64 = gray.cells().iter().map(|&v| u64::from(v)).sum();
    sum as f64 / gray.len() as f64
}

/// Number of foreground samples in a mask.
pub fn foreground_count(mask: &BinaryMask) -> usize {
    mask.cells().iter().filter(|&&v| v != 0).count()
}
