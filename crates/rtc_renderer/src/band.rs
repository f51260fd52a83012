//! Horizontal bands of the image, one per render worker.

use crate::integrator::{render_pixel, Frame};
use crate::{RenderError, RenderResult};

/// A contiguous range of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band in the partition
    pub index: usize,
    /// First row
    pub y: u32,
    /// Number of rows
    pub height: u32,
}

impl Band {
    pub fn new(index: usize, y: u32, height: u32) -> Self {
        Self { index, y, height }
    }

    /// One past the last row.
    pub fn end(&self) -> u32 {
        self.y + self.height
    }

    pub fn pixel_count(&self, width: u32) -> usize {
        self.height as usize * width as usize
    }
}

/// Split `height` rows into `count` bands of `height / count` rows.
///
/// The last band absorbs the remainder, so the bands cover every row exactly
/// once. Bands may be empty when `count > height`.
pub fn partition_rows(height: u32, count: usize) -> Vec<Band> {
    let count = count.max(1);
    let rows = height / count as u32;

    (0..count)
        .map(|index| {
            let y = rows * index as u32;
            let band_height = if index + 1 == count { height - y } else { rows };
            Band::new(index, y, band_height)
        })
        .collect()
}

/// Render `band` of `frame` into `pixels`, the band's rows in row-major
/// order.
pub fn render_band(frame: &Frame, band: &Band, pixels: &mut [u32]) -> RenderResult<()> {
    let expected = band.pixel_count(frame.width);
    if pixels.len() != expected {
        return Err(RenderError::FramebufferMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let format = frame.settings.pixel_format;
    let width = frame.width as usize;
    for (row, y) in pixels.chunks_exact_mut(width).zip(band.y..band.end()) {
        for (x, pixel) in row.iter_mut().enumerate() {
            let color = render_pixel(frame, x as u32, y)?;
            *pixel = format.pack(color.extend(1.0));
        }
    }

    Ok(())
}
