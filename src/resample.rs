//! Size derivation from a master canvas.
//!
//! The renderer synthesizes one master raster and every other output size is
//! resampled from it. The filter is injected through [`Resampler`] so the
//! geometry code stays testable without committing to a particular image
//! backend.

use crate::error::IconError;
use image::{imageops, imageops::FilterType, RgbaImage};

/// An image-resizing capability. Implementations must use a smooth filter;
/// nearest-neighbor visibly degrades the gradient and disc edges and is not
/// an acceptable implementation of this trait.
pub trait Resampler {
    fn resample(&self, master: &RgbaImage, target_size: u32) -> Result<RgbaImage, IconError>;
}

/// Lanczos3 resampling, the same filter the platform writers always used.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lanczos;

impl Resampler for Lanczos {
    fn resample(&self, master: &RgbaImage, target_size: u32) -> Result<RgbaImage, IconError> {
        if target_size == 0 {
            return Err(IconError::ResampleFailure {
                size: target_size,
                reason: "target edge length must be positive".to_string(),
            });
        }
        Ok(imageops::resize(master, target_size, target_size, FilterType::Lanczos3))
    }
}

/// Owns the master canvas and hands out derived sizes.
///
/// Each derived raster is an independent allocation; the master itself is
/// never mutated after construction.
pub struct Generator<R: Resampler> {
    master: Option<RgbaImage>,
    resampler: R,
}

impl<R: Resampler> Generator<R> {
    pub fn new(master: RgbaImage, resampler: R) -> Self {
        Self {
            master: Some(master),
            resampler,
        }
    }

    /// A generator with no master yet; every derivation fails with
    /// [`IconError::MissingInput`] until one is supplied.
    #[allow(dead_code)]
    pub fn empty(resampler: R) -> Self {
        Self {
            master: None,
            resampler,
        }
    }

    pub fn master(&self) -> Option<&RgbaImage> {
        self.master.as_ref()
    }

    /// Produce a raster of the given edge length from the master canvas.
    pub fn raster(&self, size: u32) -> Result<RgbaImage, IconError> {
        let master = self
            .master
            .as_ref()
            .ok_or_else(|| IconError::MissingInput("no master canvas to resample".to_string()))?;
        if size == master.width() {
            return Ok(master.clone());
        }
        self.resampler.resample(master, size)
    }
}
