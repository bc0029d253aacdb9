//! Cover scaling followed by a centered crop.
//!
//! An image is scaled by the larger of its two per-axis ratios so it covers
//! the target on both axes, then the overflow is trimmed evenly from both
//! sides. The result always has exactly the target's dimensions.

use image::{DynamicImage, RgbaImage, imageops};
use serde::Deserialize;
use tracing::trace;

use crate::error::{Error, Result};

/// Largest scaled intermediate a fit will allocate, in pixels (1 GiB of RGBA).
pub const MAX_RESIZED_PIXELS: u64 = 1 << 28;

/// Interpolation used when scaling a source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for imageops::FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => Self::Nearest,
            ResizeFilter::Triangle => Self::Triangle,
            ResizeFilter::CatmullRom => Self::CatmullRom,
            ResizeFilter::Gaussian => Self::Gaussian,
            ResizeFilter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// The numeric part of a fit: how far to scale and where to crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitPlan {
    pub source: (u32, u32),
    pub target: (u32, u32),
    pub scale: f64,
    /// Dimensions after scaling, never smaller than `target` on either axis.
    pub resized: (u32, u32),
    /// Top-left corner of the crop inside the resized image.
    pub crop: (u32, u32),
}

impl FitPlan {
    pub fn new(source: (u32, u32), target: (u32, u32)) -> Result<Self> {
        let (src_w, src_h) = source;
        let (dst_w, dst_h) = target;
        if src_w == 0 || src_h == 0 {
            return Err(Error::ImageResize {
                reason: format!("source image is empty ({src_w}x{src_h})"),
            });
        }
        if dst_w == 0 || dst_h == 0 {
            return Err(Error::ImageResize {
                reason: format!("target rectangle is empty ({dst_w}x{dst_h})"),
            });
        }

        let scale_w = f64::from(dst_w) / f64::from(src_w);
        let scale_h = f64::from(dst_h) / f64::from(src_h);
        let scale = scale_w.max(scale_h);

        // Ceil keeps rounding from leaving a one-pixel gap; max keeps the
        // cover guarantee even if the float product lands just below target.
        let resized = (
            scaled_len(src_w, scale)?.max(dst_w),
            scaled_len(src_h, scale)?.max(dst_h),
        );
        let pixels = u64::from(resized.0) * u64::from(resized.1);
        if pixels > MAX_RESIZED_PIXELS {
            return Err(Error::ImageResize {
                reason: format!(
                    "{src_w}x{src_h} scaled to {}x{} exceeds the {MAX_RESIZED_PIXELS} pixel limit",
                    resized.0, resized.1
                ),
            });
        }
        let crop = ((resized.0 - dst_w) / 2, (resized.1 - dst_h) / 2);

        Ok(Self {
            source,
            target,
            scale,
            resized,
            crop,
        })
    }

    pub fn needs_resize(&self) -> bool {
        self.resized != self.source
    }

    pub fn needs_crop(&self) -> bool {
        self.resized != self.target
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

fn scaled_len(len: u32, scale: f64) -> Result<u32> {
    let scaled = (f64::from(len) * scale).ceil();
    if !scaled.is_finite() || scaled > f64::from(u32::MAX) {
        return Err(Error::ImageResize {
            reason: format!("{len}px scaled by {scale} does not fit in an image"),
        });
    }
    Ok(scaled as u32)
}

/// Produces images with exactly a target rectangle's dimensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFitter {
    pub filter: ResizeFilter,
}

impl ImageFitter {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }

    pub fn fit(&self, image: &DynamicImage, target: (u32, u32)) -> Result<RgbaImage> {
        let plan = FitPlan::new((image.width(), image.height()), target)?;
        trace!(?plan, "fitting image");

        let rgba = image.to_rgba8();
        if plan.is_identity() {
            return Ok(rgba);
        }

        let resized = if plan.needs_resize() {
            imageops::resize(&rgba, plan.resized.0, plan.resized.1, self.filter.into())
        } else {
            rgba
        };

        if !plan.needs_crop() {
            return Ok(resized);
        }

        let (x, y) = plan.crop;
        Ok(imageops::crop_imm(&resized, x, y, target.0, target.1).to_image())
    }
}
