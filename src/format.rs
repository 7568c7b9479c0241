//! GX2 surface format codes and their sizes.
use crate::SwizzleError;

// Bits per element for each hardware format indexed by the low 6 bits of the format code.
// Block compressed formats use the size of a 4x4 block.
const FORMAT_BITS_PER_PIXEL: [u8; 64] = [
    0, 8, 8, 0, 0, 16, 16, 16, 16, 16, 16, 16, 16, 32, 32, 32, 32, 32, 0, 32, 0, 0, 32, 0, 0, 32,
    32, 32, 64, 64, 64, 64, 64, 0, 128, 128, 0, 0, 0, 16, 16, 32, 32, 32, 0, 0, 0, 96, 96, 64, 128,
    128, 64, 128, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Returns the bits per element for the GX2 surface `format` code
/// or [None] if the hardware format has no table entry.
/// Flags like sRGB in the upper bits of the code do not affect the size.
///
/// # Examples
/**
```rust
use gx2_swizzle::bits_per_pixel;

// GX2_SURFACE_FORMAT_TCS_R8_G8_B8_A8_UNORM
assert_eq!(Some(32), bits_per_pixel(0x1a));
// GX2_SURFACE_FORMAT_TCS_R8_G8_B8_A8_SRGB
assert_eq!(Some(32), bits_per_pixel(0x41a));
// GX2_SURFACE_FORMAT_T_BC1_UNORM uses 64 bits for each 4x4 block.
assert_eq!(Some(64), bits_per_pixel(0x31));
assert_eq!(None, bits_per_pixel(0x0));
```
 */
pub fn bits_per_pixel(format: u32) -> Option<u32> {
    match FORMAT_BITS_PER_PIXEL[(format & 0x3F) as usize] {
        0 => None,
        bpp => Some(bpp as u32),
    }
}

/// Returns `true` if the hardware format stores 4x4 pixel blocks.
pub fn is_block_compressed(format: u32) -> bool {
    matches!(format & 0x3F, 0x31..=0x35)
}

/// The GX2 surface formats with a pixel conversion to and from RGBA8.
///
/// The discriminant is the hardware format code without the upper flag bits.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum SurfaceFormat {
    R8 = 0x01,
    R4G4 = 0x02,
    R8G8 = 0x07,
    R5G6B5 = 0x08,
    R5G5B5A1 = 0x0a,
    R4G4B4A4 = 0x0b,
    A1B5G5R5 = 0x0c,
    R10G10B10A2 = 0x19,
    R8G8B8A8 = 0x1a,
    Bc1 = 0x31,
    Bc2 = 0x32,
    Bc3 = 0x33,
}

impl SurfaceFormat {
    /// Attempts to construct a format from a GX2 surface format code.
    /// Flag bits like sRGB are ignored.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::SurfaceFormat;

    assert_eq!(Some(SurfaceFormat::Bc1), SurfaceFormat::new(0x431));
    assert_eq!(None, SurfaceFormat::new(0x35));
    ```
    */
    pub fn new(format: u32) -> Option<Self> {
        match format & 0x3F {
            0x01 => Some(SurfaceFormat::R8),
            0x02 => Some(SurfaceFormat::R4G4),
            0x07 => Some(SurfaceFormat::R8G8),
            0x08 => Some(SurfaceFormat::R5G6B5),
            0x0a => Some(SurfaceFormat::R5G5B5A1),
            0x0b => Some(SurfaceFormat::R4G4B4A4),
            0x0c => Some(SurfaceFormat::A1B5G5R5),
            0x19 => Some(SurfaceFormat::R10G10B10A2),
            0x1a => Some(SurfaceFormat::R8G8B8A8),
            0x31 => Some(SurfaceFormat::Bc1),
            0x32 => Some(SurfaceFormat::Bc2),
            0x33 => Some(SurfaceFormat::Bc3),
            _ => None,
        }
    }

    /// The hardware format code without any flag bits.
    pub const fn code(&self) -> u32 {
        *self as u32
    }

    /// The size in bytes of a pixel or of a 4x4 block for compressed formats.
    pub const fn element_size_in_bytes(&self) -> usize {
        match self {
            SurfaceFormat::R8 | SurfaceFormat::R4G4 => 1,
            SurfaceFormat::R8G8
            | SurfaceFormat::R5G6B5
            | SurfaceFormat::R5G5B5A1
            | SurfaceFormat::R4G4B4A4
            | SurfaceFormat::A1B5G5R5 => 2,
            SurfaceFormat::R10G10B10A2 | SurfaceFormat::R8G8B8A8 => 4,
            SurfaceFormat::Bc1 => 8,
            SurfaceFormat::Bc2 | SurfaceFormat::Bc3 => 16,
        }
    }

    /// The width and height of a block in pixels.
    /// Uncompressed formats have 1x1 pixel blocks.
    pub const fn block_dimension(&self) -> u32 {
        if self.is_compressed() {
            4
        } else {
            1
        }
    }

    pub const fn is_compressed(&self) -> bool {
        matches!(
            self,
            SurfaceFormat::Bc1 | SurfaceFormat::Bc2 | SurfaceFormat::Bc3
        )
    }
}

impl core::convert::TryFrom<u32> for SurfaceFormat {
    type Error = SwizzleError;

    fn try_from(format: u32) -> Result<Self, Self::Error> {
        SurfaceFormat::new(format).ok_or(SwizzleError::UnsupportedFormat { format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes_match_table() {
        // The pixel conversions must agree with the hardware table.
        for code in 0..64 {
            if let Some(format) = SurfaceFormat::new(code) {
                assert_eq!(
                    Some(format.element_size_in_bytes() as u32 * 8),
                    bits_per_pixel(code),
                    "{:?}",
                    format
                );
            }
        }
    }

    #[test]
    fn bits_per_pixel_table() {
        assert_eq!(Some(8), bits_per_pixel(0x01));
        assert_eq!(Some(16), bits_per_pixel(0x08));
        assert_eq!(Some(96), bits_per_pixel(0x2f));
        assert_eq!(Some(128), bits_per_pixel(0x22));
        assert_eq!(Some(128), bits_per_pixel(0x33));
        assert_eq!(None, bits_per_pixel(0x03));
        assert_eq!(None, bits_per_pixel(0x3f));
    }

    #[test]
    fn compressed_formats() {
        assert!(is_block_compressed(0x31));
        assert!(is_block_compressed(0x433));
        assert!(is_block_compressed(0x35));
        assert!(!is_block_compressed(0x1a));
        assert_eq!(4, SurfaceFormat::Bc2.block_dimension());
        assert_eq!(1, SurfaceFormat::R5G6B5.block_dimension());
    }

    #[test]
    fn try_from_unsupported() {
        use core::convert::TryFrom;
        assert_eq!(
            Err(SwizzleError::UnsupportedFormat { format: 0x22 }),
            SurfaceFormat::try_from(0x22)
        );
        assert_eq!(Ok(SurfaceFormat::R8G8B8A8), SurfaceFormat::try_from(0x41a));
    }
}
