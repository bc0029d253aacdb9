use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage, imageops};
use rayon::prelude::*;
use tracing::{debug, info, trace_span};

use crate::{
    color::BackgroundColor,
    error::{Error, Result},
    fit::ImageFitter,
    screen::{ScreenInfo, any_overlap, bounding_size},
};

/// The single bitmap spanning every screen.
#[derive(Clone, Debug)]
pub struct Canvas {
    background: BackgroundColor,
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: BackgroundColor) -> Self {
        Self {
            background,
            pixels: RgbaImage::from_pixel(width, height, background.rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn background(&self) -> BackgroundColor {
        self.background
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Copies `image` onto the canvas with its top-left corner at `(x, y)`.
    /// Destination pixels are replaced, not blended; anything outside the
    /// canvas is clipped.
    pub fn composite(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::replace(&mut self.pixels, image, x, y);
    }
}

/// Fits each source image to its screen and lays the results out on one
/// canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasComposer {
    pub fitter: ImageFitter,
    pub background: BackgroundColor,
}

impl CanvasComposer {
    pub fn new(fitter: ImageFitter, background: BackgroundColor) -> Self {
        Self { fitter, background }
    }

    /// Screens and images pair up by position. When the lists differ in
    /// length only the common prefix is drawn; the extra screens keep the
    /// background color and extra images are ignored.
    pub fn compose(&self, screens: &[ScreenInfo], images: &[DynamicImage]) -> Result<Canvas> {
        if screens.is_empty() {
            return Err(Error::EmptyLayout);
        }

        let (width, height) = bounding_size(screens);
        let _span_guard = trace_span!("compose", width, height).entered();

        if screens.len() != images.len() {
            debug!(
                screens = screens.len(),
                images = images.len(),
                "screen and image counts differ, pairing the first {}",
                screens.len().min(images.len())
            );
        }
        if any_overlap(screens) {
            debug!("screens overlap, later screens are drawn on top");
        }

        // Zip truncates to the shorter side and keeps index order on collect.
        let fitted = screens
            .par_iter()
            .zip(images.par_iter())
            .map(|(screen, image)| {
                let _span_guard = trace_span!("fit", screen = screen.index).entered();
                self.fitter.fit(image, screen.size()).map(|fitted| (screen, fitted))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut canvas = Canvas::new(width, height, self.background);
        for (screen, image) in &fitted {
            debug!(
                screen = screen.index,
                "placing {}x{} image at {}",
                image.width(),
                image.height(),
                screen
            );
            canvas.composite(image, screen.x_origin.into(), screen.y_origin.into());
        }

        info!(
            "Composed {}x{} canvas from {} screen(s)",
            width,
            height,
            fitted.len()
        );
        Ok(canvas)
    }
}

/// Decodes every image, in parallel, keeping the input order.
pub fn load_images<P>(paths: &[P]) -> Result<Vec<DynamicImage>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let image = open_image(path)?;
            debug!(
                "Loaded {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            Ok(image)
        })
        .collect()
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source| Error::ImageDecode {
        path: PathBuf::from(path),
        source,
    };
    image::ImageReader::open(path)
        .map_err(|err| decode_error(image::ImageError::IoError(err)))?
        .with_guessed_format()
        .map_err(|err| decode_error(image::ImageError::IoError(err)))?
        .decode()
        .map_err(decode_error)
}
