// src/capture.rs
// Screen snapshot (xcap) and clipboard (arboard).

use std::sync::Arc;

use arboard::{Clipboard, ImageData};
//  image v0.24.9
use image::{DynamicImage, GenericImageView, ImageBuffer};
use log::debug;
use xcap::Monitor;

use crate::actions::RgbaImage;
use crate::error::CaptureError;
use crate::selection::{Bounds, CaptureRegion};

/// Full-monitor image taken before the overlay is shown. Regions are cropped
/// from it, so the overlay itself never ends up in a capture.
#[derive(Clone)]
pub struct FrozenScreen {
    image: Arc<DynamicImage>,
}

impl FrozenScreen {
    pub fn capture_primary() -> Result<Self, CaptureError> {
        let mons = Monitor::all()?;
        let mon = mons.first().ok_or(CaptureError::NoMonitor)?;
        let img = mon.capture_image()?;
        let (w, h) = (img.width(), img.height());
        // xcap links its own image version, go through the raw buffer
        let raw = img.into_raw();
        let buf = ImageBuffer::from_raw(w, h, raw)
            .ok_or_else(|| CaptureError::Screen("pixel buffer does not match size".into()))?;
        debug!("captured {}x{} snapshot", w, h);
        Ok(Self::from_image(DynamicImage::ImageRgba8(buf)))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        FrozenScreen { image: Arc::new(image) }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Crops `region`, given in `surface` coordinates. The surface may be
    /// smaller than the image on HiDPI screens.
    pub fn crop(&self, region: CaptureRegion, surface: Bounds) -> Result<RgbaImage, CaptureError> {
        if surface.width <= 0.0 || surface.height <= 0.0 {
            return Err(CaptureError::OutOfBounds(region));
        }
        let (w, h) = self.dimensions();
        let px = region
            .to_pixels(w as f64 / surface.width, h as f64 / surface.height, (w, h))
            .ok_or(CaptureError::OutOfBounds(region))?;
        Ok(self.image.crop_imm(px.x, px.y, px.width, px.height).to_rgba8())
    }
}

/// Lives as long as the app: on X11 the clipboard content goes away with
/// the `Clipboard` that set it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn set_image(&mut self, image: &RgbaImage) -> Result<(), CaptureError> {
        let mut clipboard = match self.inner.take() {
            Some(c) => c,
            None => Clipboard::new()?,
        };
        let image_data = ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: image.as_raw().into(),
        };
        let result = clipboard.set_image(image_data);
        self.inner = Some(clipboard);
        result.map_err(CaptureError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 40x20 image, left half red, right half blue.
    fn halves() -> FrozenScreen {
        let img = ImageBuffer::from_fn(40, 20, |x, _| {
            if x < 20 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        FrozenScreen::from_image(DynamicImage::ImageRgba8(img))
    }

    #[test]
    fn crop_at_unit_scale() {
        let shot = halves();
        let region = CaptureRegion { x: 15, y: 5, width: 10, height: 10 };
        let out = shot.crop(region, Bounds::new(40.0, 20.0)).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(9, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn crop_scales_surface_to_pixels() {
        let shot = halves();
        // surface is half the pixel size, like a 2x display
        let region = CaptureRegion { x: 10, y: 0, width: 10, height: 10 };
        let out = shot.crop(region, Bounds::new(20.0, 10.0)).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn crop_outside_image_fails() {
        let shot = halves();
        let region = CaptureRegion { x: 50, y: 0, width: 10, height: 10 };
        let err = shot.crop(region, Bounds::new(40.0, 20.0)).unwrap_err();
        assert!(matches!(err, CaptureError::OutOfBounds(r) if r == region));
    }
}
