//! Display capture seam.
//!
//! `FrameSource` is the only OS dependency of the pipeline: capture a
//! rectangular region of the display into an in-memory image. Everything
//! downstream reads pixels out of that image; the sampler never touches
//! the display more than once per cycle.

use crate::error::CaptureError;
use image::RgbaImage;
use pxwatch_types::Color;

/// A display-space rectangle to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One captured frame of the reserved swatch region.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at a pixel of the captured image, or `None` outside it.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let px = self.image.get_pixel(x, y);
        Some(Color::new(px[0], px[1], px[2]))
    }

    pub(crate) fn raw(&self) -> &RgbaImage {
        &self.image
    }
}

/// Capture a region of the primary display.
pub trait FrameSource: Send {
    fn capture_region(&mut self, rect: ScreenRect) -> Result<Frame, CaptureError>;
}

/// Primary-monitor source backed by `xcap`.
///
/// The backend grabs the whole monitor in one call; the requested
/// region is cropped out of the returned image in memory, so there is
/// still exactly one display round trip per cycle.
pub struct XcapSource {
    monitor: xcap::Monitor,
}

impl XcapSource {
    /// Grab the primary monitor, falling back to the first one reported.
    pub fn primary() -> Result<Self, CaptureError> {
        let monitors =
            xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;

        let monitor = monitors
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| xcap::Monitor::all().ok()?.into_iter().next())
            .ok_or(CaptureError::NoMonitor)?;

        Ok(Self { monitor })
    }
}

impl FrameSource for XcapSource {
    fn capture_region(&mut self, rect: ScreenRect) -> Result<Frame, CaptureError> {
        let full = self
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        if rect.x < 0 || rect.y < 0 {
            return Err(CaptureError::Backend(format!(
                "capture region origin ({}, {}) is off-screen",
                rect.x, rect.y
            )));
        }
        let (x, y) = (rect.x as u32, rect.y as u32);
        if x + rect.width > full.width() || y + rect.height > full.height() {
            return Err(CaptureError::Backend(format!(
                "capture region {}x{} at ({x}, {y}) exceeds monitor {}x{}",
                rect.width,
                rect.height,
                full.width(),
                full.height()
            )));
        }

        let region = image::imageops::crop_imm(&full, x, y, rect.width, rect.height).to_image();
        Ok(Frame::new(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_at_bounds() {
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
        let frame = Frame::new(img);

        assert_eq!(frame.color_at(3, 1), Some(Color::new(10, 20, 30)));
        assert_eq!(frame.color_at(4, 0), None);
        assert_eq!(frame.color_at(0, 2), None);
        assert_eq!(frame.color_at(-1, 0), None);
    }
}
