//! Functions for tiling and untiling entire surfaces.
//!
//! The untiled data is tightly packed without any padding.
//! Elements are ordered by sample, then slice, then row, and then column.
//! Tiled surfaces use [SurfaceDescriptor::surface_size] many bytes,
//! and the bytes for padding elements are zero after tiling.
use alloc::vec;
use alloc::vec::Vec;

use crate::{addrlib::SurfaceAddresser, surface::SurfaceDescriptor, SwizzleError};

/// Tiles the bytes from `source` using the tile mode of `surface`.
///
/// The `source` should have at least [SurfaceDescriptor::linear_size] many bytes.
/// # Examples
/// Uncompressed formats like R8G8B8A8 use one element per pixel.
/**
```rust
use gx2_swizzle::{swizzle_surface, SurfaceDescriptor, TileMode};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
let surface = SurfaceDescriptor::new(0x1a, 256, 256, TileMode::Tiled2DThin1)?;
# let input = vec![0u8; surface.linear_size()];
let output = swizzle_surface(&surface, &input)?;
assert_eq!(surface.surface_size(), output.len());
# Ok(())
# }
```
 */
/// Block compressed formats use the width and height in pixels.
/// The elements are the 4x4 pixel blocks.
/**
```rust
use gx2_swizzle::{swizzle_surface, SurfaceDescriptor, TileMode};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
// BC3 has 4x4 pixel blocks that each take up 16 bytes.
let surface = SurfaceDescriptor::new(0x33, 256, 256, TileMode::Tiled2DThin1)?;
# let input = vec![0u8; surface.linear_size()];
assert_eq!(64 * 64 * 16, input.len());
let output = swizzle_surface(&surface, &input)?;
# Ok(())
# }
```
 */
pub fn swizzle_surface(
    surface: &SurfaceDescriptor,
    source: &[u8],
) -> Result<Vec<u8>, SwizzleError> {
    let expected_size = surface.linear_size();
    if source.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: source.len(),
        });
    }

    let mut destination = vec![0u8; surface.surface_size()];
    swizzle_surface_inner::<false>(surface, source, &mut destination)?;
    Ok(destination)
}

/// Untiles the bytes from `source` using the tile mode of `surface`.
///
/// The `source` should have at least [SurfaceDescriptor::surface_size] many bytes.
/// The result has [SurfaceDescriptor::linear_size] many bytes.
/// # Examples
/**
```rust
use gx2_swizzle::{deswizzle_surface, SurfaceDescriptor, TileMode};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
let surface = SurfaceDescriptor::new(0x1a, 256, 256, TileMode::Tiled2DThin1)?;
# let input = vec![0u8; surface.surface_size()];
let output = deswizzle_surface(&surface, &input)?;
assert_eq!(256 * 256 * 4, output.len());
# Ok(())
# }
```
 */
pub fn deswizzle_surface(
    surface: &SurfaceDescriptor,
    source: &[u8],
) -> Result<Vec<u8>, SwizzleError> {
    let expected_size = surface.surface_size();
    if source.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: source.len(),
        });
    }

    let mut destination = vec![0u8; surface.linear_size()];
    swizzle_surface_inner::<true>(surface, source, &mut destination)?;
    Ok(destination)
}

pub(crate) fn swizzle_surface_inner<const DESWIZZLE: bool>(
    surface: &SurfaceDescriptor,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), SwizzleError> {
    let addresser = SurfaceAddresser::new(surface)?;

    // 96-bit pixels are copied as three 32-bit elements.
    let width = surface.tiled_width_in_elements();
    let height = surface.height_in_elements();
    let element_size = surface.tiled_bits_per_element() as usize / 8;
    let tiled_size = if DESWIZZLE {
        source.len()
    } else {
        destination.len()
    };

    let mut linear_offset = 0;
    for sample in 0..surface.num_samples {
        for slice in 0..surface.depth {
            for y in 0..height {
                for x in 0..width {
                    let tiled_offset =
                        addresser.address_unchecked(x, y, slice, sample).byte_offset as usize;

                    // A descriptor with inconsistent padding can address past the end.
                    if tiled_offset + element_size > tiled_size {
                        return Err(SwizzleError::IndexOutOfRange {
                            x,
                            y,
                            slice,
                            sample,
                        });
                    }

                    // Swap the offsets for tiling vs untiling.
                    if DESWIZZLE {
                        destination[linear_offset..linear_offset + element_size]
                            .copy_from_slice(&source[tiled_offset..tiled_offset + element_size]);
                    } else {
                        destination[tiled_offset..tiled_offset + element_size]
                            .copy_from_slice(&source[linear_offset..linear_offset + element_size]);
                    }

                    linear_offset += element_size;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{surface::SurfaceBuilder, tilemode::SwizzlePattern, PipeConfig, TileMode};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_bytes(size: usize) -> Vec<u8> {
        // Generate mostly unique input data.
        let seed = [13u8; 32];
        let mut rng: StdRng = SeedableRng::from_seed(seed);
        (0..size).map(|_| rng.gen_range::<u8, _>(0..=255)).collect()
    }

    // Use the padded dimensions for the logical dimensions
    // so that every byte of the tiled surface is part of the image.
    fn unpadded_surface(builder: SurfaceBuilder) -> SurfaceDescriptor {
        let surface = builder.build().unwrap();
        let block_dim = surface.block_dimension();
        SurfaceDescriptor {
            width: surface.pitch * block_dim,
            height: surface.padded_height * block_dim,
            ..surface
        }
    }

    fn assert_tiled_round_trip(surface: &SurfaceDescriptor) {
        let tiled = random_bytes(surface.surface_size());
        let linear = deswizzle_surface(surface, &tiled).unwrap();
        assert_eq!(surface.linear_size(), linear.len());

        let retiled = swizzle_surface(surface, &linear).unwrap();
        assert!(tiled == retiled, "{:?}", surface);
    }

    fn assert_linear_round_trip(surface: &SurfaceDescriptor) {
        let linear = random_bytes(surface.linear_size());
        let tiled = swizzle_surface(surface, &linear).unwrap();
        assert_eq!(surface.surface_size(), tiled.len());

        let untiled = deswizzle_surface(surface, &tiled).unwrap();
        assert!(linear == untiled, "{:?}", surface);
    }

    #[test]
    fn swizzle_deswizzle_thin_tile_modes() {
        // 8, 16, 32, 64, and 128 bits per pixel.
        for format in [0x01, 0x08, 0x1a, 0x1c, 0x22] {
            for tile_mode in TileMode::ALL.iter().filter(|m| m.thickness() == 1) {
                let surface = unpadded_surface(
                    SurfaceBuilder::new(format, 70, 33, *tile_mode)
                        .swizzle(SwizzlePattern::new(5).unwrap()),
                );
                assert_tiled_round_trip(&surface);
            }
        }
    }

    #[test]
    fn swizzle_deswizzle_thick_tile_modes() {
        for tile_mode in TileMode::ALL.iter().filter(|m| m.thickness() == 4) {
            let surface = SurfaceDescriptor::new(0x1a, 70, 33, *tile_mode).unwrap();
            assert_linear_round_trip(&surface);
        }
    }

    #[test]
    fn swizzle_deswizzle_96_bits_per_pixel() {
        for tile_mode in TileMode::ALL {
            let surface = SurfaceDescriptor::new(0x2f, 70, 33, tile_mode).unwrap();
            assert_linear_round_trip(&surface);
        }

        // The tiled surface is fully covered if the pitch is a multiple of 3.
        let surface = SurfaceDescriptor::new(0x2f, 32, 16, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(96, surface.pitch);
        assert_tiled_round_trip(&surface);
    }

    #[test]
    fn swizzle_deswizzle_block_compressed() {
        for format in [0x31, 0x32, 0x33] {
            for tile_mode in [
                TileMode::LinearAligned,
                TileMode::Tiled1DThin1,
                TileMode::Tiled2DThin1,
                TileMode::Tiled2BThin2,
                TileMode::Tiled3BThin1,
            ] {
                let surface = unpadded_surface(SurfaceBuilder::new(format, 100, 60, tile_mode));
                assert_tiled_round_trip(&surface);

                let surface = SurfaceDescriptor::new(format, 98, 62, tile_mode).unwrap();
                assert_linear_round_trip(&surface);
            }
        }
    }

    #[test]
    fn swizzle_deswizzle_pipe_configs() {
        for (num_pipes, num_banks) in [(1, 4), (1, 8), (2, 4), (2, 8)] {
            for tile_mode in [
                TileMode::Tiled2DThin1,
                TileMode::Tiled2DThin4,
                TileMode::Tiled2BThin1,
                TileMode::Tiled3DThin1,
                TileMode::Tiled3BThin1,
            ] {
                let surface = unpadded_surface(
                    SurfaceBuilder::new(0x1a, 200, 50, tile_mode)
                        .pipe_config(PipeConfig::new(num_pipes, num_banks).unwrap())
                        .swizzle(SwizzlePattern::new(7).unwrap()),
                );
                assert_tiled_round_trip(&surface);
            }
        }
    }

    #[test]
    fn swizzle_deswizzle_multisampled() {
        // 128 bits per pixel with 4 samples splits samples into separate slices.
        for (format, num_samples) in [(0x1a, 2), (0x1a, 8), (0x1c, 8), (0x22, 4)] {
            for tile_mode in [
                TileMode::Tiled2DThin1,
                TileMode::Tiled2BThin1,
                TileMode::Tiled3BThin1,
            ] {
                let surface = unpadded_surface(
                    SurfaceBuilder::new(format, 40, 20, tile_mode).num_samples(num_samples),
                );
                assert_tiled_round_trip(&surface);
            }
        }
    }

    #[test]
    fn linear_general_is_row_major() {
        let surface = SurfaceDescriptor::new(0x1a, 5, 3, TileMode::LinearGeneral).unwrap();
        let input = random_bytes(surface.linear_size());
        assert_eq!(input, swizzle_surface(&surface, &input).unwrap());
        assert_eq!(input, deswizzle_surface(&surface, &input).unwrap());
    }

    #[test]
    fn swizzle_padding_is_zero() {
        let surface = SurfaceDescriptor::new(0x1a, 1, 1, TileMode::Tiled2DThin1).unwrap();
        let tiled = swizzle_surface(&surface, &[1, 2, 3, 4]).unwrap();
        assert_eq!(surface.surface_size(), tiled.len());
        assert_eq!(&[1, 2, 3, 4], &tiled[..4]);
        assert!(tiled[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn swizzle_empty() {
        let surface = SurfaceDescriptor::new(0x1a, 32, 32, TileMode::Tiled2DThin1).unwrap();
        let result = swizzle_surface(&surface, &[]);
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                actual_size: 0,
                expected_size: 4096
            }),
            result
        );
    }

    #[test]
    fn deswizzle_empty() {
        let surface = SurfaceDescriptor::new(0x1a, 32, 32, TileMode::Tiled2DThin1).unwrap();
        let result = deswizzle_surface(&surface, &[]);
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                actual_size: 0,
                expected_size: 4096
            }),
            result
        );
    }

    #[test]
    fn zero_size_surface() {
        let surface = SurfaceDescriptor::new(0x1a, 0, 0, TileMode::Tiled2DThin1).unwrap();
        assert!(swizzle_surface(&surface, &[]).unwrap().is_empty());
        assert!(deswizzle_surface(&surface, &[]).unwrap().is_empty());
    }

    #[test]
    fn deswizzle_inconsistent_padding() {
        let surface = SurfaceDescriptor {
            pitch: 8,
            ..SurfaceDescriptor::new(0x1a, 64, 16, TileMode::Tiled2DThin1).unwrap()
        };
        let result = deswizzle_surface(&surface, &vec![0u8; surface.surface_size()]);
        assert!(matches!(result, Err(SwizzleError::IndexOutOfRange { .. })));
    }
}
