use crate::PixelFormat;

/// Packed output image, one `u32` per pixel in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Create a framebuffer filled with zeroes.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub(crate) fn set_format(&mut self, format: PixelFormat) {
        self.format = format;
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * self.format.bytes_per_pixel()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Packed pixel at `(x, y)`, if inside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = self.index(x, y);
        self.pixels[index] = pixel;
        true
    }

    /// Rows `y..y + rows` as one contiguous slice.
    pub fn rows_mut(&mut self, y: u32, rows: u32) -> Option<&mut [u32]> {
        let width = self.width as usize;
        let start = y as usize * width;
        let end = start + rows as usize * width;
        self.pixels.get_mut(start..end)
    }

    /// Convert to 8-bit sRGB RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &pixel in &self.pixels {
            let srgba = match self.format {
                PixelFormat::Srgba8 => pixel,
                format => PixelFormat::Srgba8.pack(format.unpack(pixel)),
            };
            bytes.extend_from_slice(&srgba.to_le_bytes());
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut fb = Framebuffer::new(4, 3, PixelFormat::Srgba8);
        assert_eq!(fb.pixels().len(), 12);
        assert_eq!(fb.byte_len(), 48);

        assert!(fb.set(3, 2, 0xDEAD_BEEF));
        assert_eq!(fb.get(3, 2), Some(0xDEAD_BEEF));
        assert_eq!(fb.pixels()[11], 0xDEAD_BEEF);

        assert!(!fb.set(4, 0, 1));
        assert_eq!(fb.get(0, 3), None);
    }

    #[test]
    fn test_rows_mut() {
        let mut fb = Framebuffer::new(5, 4, PixelFormat::Srgba8);
        fb.rows_mut(1, 2).unwrap().fill(7);

        assert_eq!(fb.get(0, 0), Some(0));
        assert_eq!(fb.get(0, 1), Some(7));
        assert_eq!(fb.get(4, 2), Some(7));
        assert_eq!(fb.get(0, 3), Some(0));
        assert!(fb.rows_mut(3, 2).is_none());
    }

    #[test]
    fn test_to_rgba8_byte_order() {
        let mut fb = Framebuffer::new(1, 1, PixelFormat::Srgba8);
        fb.set(0, 0, 0xFF80_4020);
        assert_eq!(fb.to_rgba8(), vec![0x20, 0x40, 0x80, 0xFF]);
    }

    #[test]
    fn test_to_rgba8_converts_rgb10a2() {
        let mut fb = Framebuffer::new(1, 1, PixelFormat::Rgb10a2);
        fb.set(0, 0, PixelFormat::Rgb10a2.pack(rtc_math::Vec4::new(1.0, 0.0, 1.0, 1.0)));
        assert_eq!(fb.to_rgba8(), vec![255, 0, 255, 255]);
    }
}
