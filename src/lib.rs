//! # gx2_swizzle
//! gx2_swizzle is an unofficial CPU implementation of Wii U GX2 surface tiling
//! and BC1, BC2, and BC3 block decoding.
//!
//! # Getting Started
//! The following example untiles a 2D tiled BC1 surface and decodes it to RGBA8.
//! BC1 has 4x4 pixel blocks that each take up 8 bytes.
/*!
```rust
use gx2_swizzle::{
    bcn::{decode_image, BlockFormat},
    deswizzle_surface, SurfaceDescriptor, TileMode,
};
# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
let surface = SurfaceDescriptor::new(0x31, 64, 64, TileMode::Tiled2DThin1)?;
# let tiled = vec![0u8; surface.surface_size()];
let blocks = deswizzle_surface(&surface, &tiled)?;
let rgba = decode_image(64, 64, &blocks, BlockFormat::Bc1)?;
assert_eq!(64 * 64 * 4, rgba.len());
# Ok(())
# }
```
*/
//! # Tiled Surfaces
//! The GX2 addressing scheme arranges elements into 8x8 micro tiles.
//! Macro tiled modes additionally spread micro tiles across memory pipes and banks
//! and XOR the pipe and bank bits with the surface swizzle.
//! Tiled surfaces are padded to the tile dimensions,
//! so tiled surfaces may be larger than the corresponding linear data.
//!
//! Block compressed formats are addressed in 4x4 blocks rather than pixels.
//! The surface dimensions are always specified in pixels.
//!
//! # Limitations
//! Only single slice surfaces are supported.
//! Thick tile modes still pad the surface to the micro tile thickness.
//! Depth surfaces and compression masks are not supported.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod addrlib;
pub mod bcn;
pub mod channels;
pub mod format;
pub mod surface;
pub mod swizzle;
pub mod tilemode;

// Avoid making this module public to prevent people importing it accidentally.
#[cfg(feature = "ffi")]
mod ffi;

pub use addrlib::{address_of, PipeConfig, SurfaceAddress, SurfaceAddresser};
pub use format::{bits_per_pixel, SurfaceFormat};
pub use surface::{SurfaceBuilder, SurfaceDescriptor};
pub use swizzle::{deswizzle_surface, swizzle_surface};
pub use tilemode::{SwizzlePattern, TileMode};

/// Errors than can occur while tiling, untiling, or decoding surfaces.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SwizzleError {
    /// The source data does not contain enough bytes.
    /// The input length should be at least [SurfaceDescriptor::surface_size] many bytes for untiling
    /// and at least [SurfaceDescriptor::linear_size] many bytes for tiling.
    NotEnoughData {
        expected_size: usize,
        actual_size: usize,
    },
    /// The format code has no entry in the format table
    /// or has no supported pixel conversion.
    UnsupportedFormat { format: u32 },
    /// Volume textures with a depth other than 1 are not supported.
    UnsupportedDepth { depth: u32 },
    /// The sample count is not one of 1, 2, 4, or 8.
    UnsupportedSampleCount { num_samples: u32 },
    /// The tile mode is not one of the defined modes
    /// or a packed swizzle value is invalid.
    InvalidTileMode { value: u32 },
    /// The pipe and bank configuration is not supported.
    InvalidPipeConfig { num_pipes: u32, num_banks: u32 },
    /// The padded surface dimensions or sizes would overflow.
    InvalidSurface { format: u32, width: u32, height: u32 },
    /// The coordinate is outside the surface.
    /// This indicates a bug in the calling code.
    IndexOutOfRange {
        x: u32,
        y: u32,
        slice: u32,
        sample: u32,
    },
}

impl core::fmt::Display for SwizzleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SwizzleError::NotEnoughData {
                expected_size,
                actual_size,
            } => write!(
                f,
                "Not enough data. Expected {} bytes but found {} bytes.",
                expected_size, actual_size
            ),
            SwizzleError::UnsupportedFormat { format } => {
                write!(f, "Unsupported surface format 0x{:x}.", format)
            }
            SwizzleError::UnsupportedDepth { depth } => {
                write!(f, "Unsupported depth {}. Only a depth of 1 is supported.", depth)
            }
            SwizzleError::UnsupportedSampleCount { num_samples } => {
                write!(f, "Unsupported sample count {}.", num_samples)
            }
            SwizzleError::InvalidTileMode { value } => {
                write!(f, "Invalid tile mode or swizzle value 0x{:x}.", value)
            }
            SwizzleError::InvalidPipeConfig {
                num_pipes,
                num_banks,
            } => write!(
                f,
                "Unsupported configuration of {} pipes and {} banks.",
                num_pipes, num_banks
            ),
            SwizzleError::InvalidSurface {
                format,
                width,
                height,
            } => write!(
                f,
                "Invalid surface dimensions {}x{} for format 0x{:x}. The padded size would overflow.",
                width, height, format
            ),
            SwizzleError::IndexOutOfRange {
                x,
                y,
                slice,
                sample,
            } => write!(
                f,
                "Coordinate ({}, {}, slice {}, sample {}) is outside the surface.",
                x, y, slice, sample
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SwizzleError {}

/// Calculates the division of `x` by `d` but rounds up rather than truncating.
///
/// # Examples
/// Use this function when calculating dimensions for block compressed formats like BC1.
/**
```rust
# use gx2_swizzle::div_round_up;
assert_eq!(2, div_round_up(8, 4));
assert_eq!(3, div_round_up(10, 4));
```
 */
#[inline]
pub const fn div_round_up(x: u32, d: u32) -> u32 {
    x / d + (x % d != 0) as u32
}
