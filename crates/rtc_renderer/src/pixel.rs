//! Packing linear radiance into 32-bit framebuffer pixels.

use rtc_math::Vec4;
use serde::{Deserialize, Serialize};

/// Target pixel encoding. Every format packs into one `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit sRGB colour and linear alpha, R in the lowest byte
    #[default]
    Srgba8,
    /// 10-bit linear RGB and 2-bit alpha, R in the lowest bits
    Rgb10a2,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }

    /// Encode a linear colour, clamping each channel to `[0, 1]`.
    pub fn pack(self, color: Vec4) -> u32 {
        let c = color.clamp(Vec4::ZERO, Vec4::ONE);
        match self {
            PixelFormat::Srgba8 => {
                let r = quantize(linear_to_srgb(c.x), 255.0);
                let g = quantize(linear_to_srgb(c.y), 255.0);
                let b = quantize(linear_to_srgb(c.z), 255.0);
                let a = quantize(c.w, 255.0);
                r | g << 8 | b << 16 | a << 24
            }
            PixelFormat::Rgb10a2 => {
                let r = quantize(c.x, 1023.0);
                let g = quantize(c.y, 1023.0);
                let b = quantize(c.z, 1023.0);
                let a = quantize(c.w, 3.0);
                r | g << 10 | b << 20 | a << 30
            }
        }
    }

    /// Decode back to linear colour.
    pub fn unpack(self, pixel: u32) -> Vec4 {
        match self {
            PixelFormat::Srgba8 => unpack_srgba8(pixel),
            PixelFormat::Rgb10a2 => Vec4::new(
                (pixel & 0x3FF) as f32 / 1023.0,
                ((pixel >> 10) & 0x3FF) as f32 / 1023.0,
                ((pixel >> 20) & 0x3FF) as f32 / 1023.0,
                (pixel >> 30) as f32 / 3.0,
            ),
        }
    }
}

#[inline]
fn quantize(x: f32, max: f32) -> u32 {
    (x * max + 0.5) as u32
}

/// Decode an 8-bit sRGB pixel (R in the lowest byte) to linear colour.
pub fn unpack_srgba8(pixel: u32) -> Vec4 {
    let channel = |shift: u32| ((pixel >> shift) & 0xFF) as f32 / 255.0;
    Vec4::new(
        srgb_to_linear(channel(0)),
        srgb_to_linear(channel(8)),
        srgb_to_linear(channel(16)),
        channel(24),
    )
}

/// sRGB transfer function.
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Inverse sRGB transfer function.
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.040_45 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}
