//! BC1, BC2, and BC3 block compression.
//!
//! Each block stores a 4x4 tile of pixels.
//! The color data uses two RGB565 endpoints and a 2-bit index per pixel.
//! BC2 adds an explicit 4-bit alpha for each pixel,
//! and BC3 adds two alpha endpoints and a 3-bit alpha index per pixel.
//!
//! Decoding is bit exact, so the integer divisions always truncate.
//! Encoding fits endpoints to the range of the block's colors
//! and is lossy like any other BCN encoder.
use alloc::vec;
use alloc::vec::Vec;

use crate::{div_round_up, SwizzleError};

const BLOCK_WIDTH: usize = 4;
const BLOCK_HEIGHT: usize = 4;
const PIXELS_PER_BLOCK: usize = BLOCK_WIDTH * BLOCK_HEIGHT;

/// The size in bytes of a decoded 4x4 block of RGBA8 pixels.
pub const DECODED_BLOCK_SIZE: usize = PIXELS_PER_BLOCK * 4;

/// The supported block compressed formats.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum BlockFormat {
    /// BC1 where the three color mode decodes index 3 to transparent black.
    Bc1,
    /// BC1 where the three color mode decodes index 3 to opaque black.
    Bc1Opaque,
    Bc2,
    Bc3,
}

impl BlockFormat {
    /// Returns the block format for a GX2 surface format code.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::bcn::BlockFormat;

    // GX2_SURFACE_FORMAT_T_BC1_SRGB
    assert_eq!(Some(BlockFormat::Bc1), BlockFormat::from_surface_format(0x431));
    assert_eq!(None, BlockFormat::from_surface_format(0x1a));
    ```
    */
    pub fn from_surface_format(format: u32) -> Option<Self> {
        match format & 0x3F {
            0x31 => Some(BlockFormat::Bc1),
            0x32 => Some(BlockFormat::Bc2),
            0x33 => Some(BlockFormat::Bc3),
            _ => None,
        }
    }

    pub const fn block_size_in_bytes(&self) -> usize {
        match self {
            BlockFormat::Bc1 | BlockFormat::Bc1Opaque => 8,
            BlockFormat::Bc2 | BlockFormat::Bc3 => 16,
        }
    }
}

// Expand 5 and 6 bit channels by replicating the high bits into the low bits.
fn expand_rgb565(color: u16) -> [u8; 3] {
    let r = ((color >> 8) & 0xF8) | ((color >> 13) & 0x7);
    let g = ((color >> 3) & 0xFC) | ((color >> 9) & 0x3);
    let b = ((color << 3) & 0xF8) | ((color >> 2) & 0x7);
    [r as u8, g as u8, b as u8]
}

fn pack_rgb565(rgb: [u8; 3]) -> u16 {
    let r = (rgb[0] as u16 * 31 + 127) / 255;
    let g = (rgb[1] as u16 * 63 + 127) / 255;
    let b = (rgb[2] as u16 * 31 + 127) / 255;
    (r << 11) | (g << 5) | b
}

fn color_palette(color0: u16, color1: u16, format: BlockFormat) -> [[u8; 4]; 4] {
    let c0 = expand_rgb565(color0);
    let c1 = expand_rgb565(color1);

    let mut palette = [[0u8; 4]; 4];
    palette[0] = [c0[0], c0[1], c0[2], 255];
    palette[1] = [c1[0], c1[1], c1[2], 255];

    // BC2 and BC3 always use the four color mode.
    let four_color = matches!(format, BlockFormat::Bc2 | BlockFormat::Bc3) || color0 > color1;
    for c in 0..3 {
        let (a, b) = (c0[c] as u32, c1[c] as u32);
        if four_color {
            palette[2][c] = ((a * 2 + b) / 3) as u8;
            palette[3][c] = ((a + b * 2) / 3) as u8;
        } else {
            palette[2][c] = ((a + b) / 2) as u8;
        }
    }
    palette[2][3] = 255;
    palette[3][3] = match (four_color, format) {
        (false, BlockFormat::Bc1) => 0,
        _ => 255,
    };

    palette
}

fn decode_color_block(
    block: &[u8],
    format: BlockFormat,
    pixels: &mut [[u8; 4]; PIXELS_PER_BLOCK],
) {
    let color0 = u16::from_le_bytes([block[0], block[1]]);
    let color1 = u16::from_le_bytes([block[2], block[3]]);
    let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);

    let palette = color_palette(color0, color1, format);
    for (i, pixel) in pixels.iter_mut().enumerate() {
        let index = (indices >> (2 * i)) & 0x3;
        *pixel = palette[index as usize];
    }
}

fn alpha_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let (a0, a1) = (alpha0 as u32, alpha1 as u32);

    let mut palette = [0u8; 8];
    palette[0] = alpha0;
    palette[1] = alpha1;
    for code in 2..8 {
        palette[code as usize] = if a0 > a1 {
            ((a0 * (8 - code) + a1 * (code - 1)) / 7) as u8
        } else if code < 6 {
            ((a0 * (6 - code) + a1 * (code - 1)) / 5) as u8
        } else if code == 6 {
            0
        } else {
            255
        };
    }
    palette
}

/// Decodes a single block to 4x4 RGBA8 pixels in row-major order.
///
/// The `block` should have at least [BlockFormat::block_size_in_bytes] many bytes.
/// # Examples
/**
```rust
use gx2_swizzle::bcn::{decode_block, BlockFormat};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
// A solid white BC1 block.
let block = [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
let rgba = decode_block(&block, BlockFormat::Bc1)?;
assert_eq!([255u8; 64], rgba);
# Ok(())
# }
```
 */
pub fn decode_block(
    block: &[u8],
    format: BlockFormat,
) -> Result<[u8; DECODED_BLOCK_SIZE], SwizzleError> {
    let expected_size = format.block_size_in_bytes();
    if block.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: block.len(),
        });
    }

    let mut pixels = [[0u8; 4]; PIXELS_PER_BLOCK];
    match format {
        BlockFormat::Bc1 | BlockFormat::Bc1Opaque => {
            decode_color_block(&block[..8], format, &mut pixels);
        }
        BlockFormat::Bc2 => {
            decode_color_block(&block[8..16], format, &mut pixels);
            for (i, pixel) in pixels.iter_mut().enumerate() {
                let nibble = (block[i / 2] >> (4 * (i & 1))) & 0xF;
                pixel[3] = nibble | (nibble << 4);
            }
        }
        BlockFormat::Bc3 => {
            decode_color_block(&block[8..16], format, &mut pixels);

            let palette = alpha_palette(block[0], block[1]);
            let indices = alpha_indices(block);
            for (i, pixel) in pixels.iter_mut().enumerate() {
                let code = (indices >> (3 * i)) & 0x7;
                pixel[3] = palette[code as usize];
            }
        }
    }

    let mut rgba = [0u8; DECODED_BLOCK_SIZE];
    for (dst, pixel) in rgba.chunks_exact_mut(4).zip(pixels.iter()) {
        dst.copy_from_slice(pixel);
    }
    Ok(rgba)
}

// The 48 bits of alpha indices after the two endpoints.
fn alpha_indices(block: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes[..6].copy_from_slice(&block[2..8]);
    u64::from_le_bytes(bytes)
}

fn distance_squared(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(a, b)| {
            let d = *a as i32 - *b as i32;
            (d * d) as u32
        })
        .sum()
}

fn nearest_index<'a>(value: &[u8], palette: impl Iterator<Item = &'a [u8]>) -> usize {
    palette
        .enumerate()
        .min_by_key(|(_, entry)| distance_squared(value, entry))
        .map(|(i, _)| i)
        .unwrap_or_default()
}

// Fits the endpoints to the bounding box of the colors.
fn encode_color_block(
    pixels: &[[u8; 4]; PIXELS_PER_BLOCK],
    format: BlockFormat,
    block: &mut [u8],
) {
    // Only BC1 can store transparent pixels in the color block.
    let is_transparent = |p: &[u8; 4]| format == BlockFormat::Bc1 && p[3] < 128;
    let has_transparency = pixels.iter().any(|p| is_transparent(p));

    let mut min = [255u8; 3];
    let mut max = [0u8; 3];
    for pixel in pixels.iter().filter(|p| !is_transparent(*p)) {
        for c in 0..3 {
            min[c] = min[c].min(pixel[c]);
            max[c] = max[c].max(pixel[c]);
        }
    }
    if min[0] > max[0] {
        // Every pixel is transparent.
        min = [0u8; 3];
        max = [0u8; 3];
    }

    let high = pack_rgb565(max);
    let low = pack_rgb565(min);

    // The endpoint order selects the three or four color mode.
    let (color0, color1) = if has_transparency {
        (low.min(high), low.max(high))
    } else {
        (low.max(high), low.min(high))
    };

    let mut indices = 0u32;
    if color0 != color1 || has_transparency {
        let palette = color_palette(color0, color1, format);
        // The transparent entry is only used for transparent pixels.
        let opaque_entries = if has_transparency { 3 } else { 4 };

        for (i, pixel) in pixels.iter().enumerate() {
            let index = if is_transparent(pixel) {
                3
            } else {
                nearest_index(
                    &pixel[..3],
                    palette[..opaque_entries].iter().map(|p| &p[..3]),
                )
            };
            indices |= (index as u32) << (2 * i);
        }
    }

    block[0..2].copy_from_slice(&color0.to_le_bytes());
    block[2..4].copy_from_slice(&color1.to_le_bytes());
    block[4..8].copy_from_slice(&indices.to_le_bytes());
}

fn encode_explicit_alpha(pixels: &[[u8; 4]; PIXELS_PER_BLOCK], block: &mut [u8]) {
    for (i, pixel) in pixels.iter().enumerate() {
        let nibble = ((pixel[3] as u32 + 8) / 17) as u8;
        block[i / 2] |= nibble << (4 * (i & 1));
    }
}

fn encode_interpolated_alpha(pixels: &[[u8; 4]; PIXELS_PER_BLOCK], block: &mut [u8]) {
    let alpha0 = pixels.iter().map(|p| p[3]).max().unwrap_or(255);
    let alpha1 = pixels.iter().map(|p| p[3]).min().unwrap_or(255);

    let mut indices = 0u64;
    if alpha0 != alpha1 {
        let palette = alpha_palette(alpha0, alpha1);
        for (i, pixel) in pixels.iter().enumerate() {
            let index = nearest_index(&pixel[3..4], palette.chunks_exact(1));
            indices |= (index as u64) << (3 * i);
        }
    }

    block[0] = alpha0;
    block[1] = alpha1;
    block[2..8].copy_from_slice(&indices.to_le_bytes()[..6]);
}

fn encode_block_inner(
    pixels: &[[u8; 4]; PIXELS_PER_BLOCK],
    format: BlockFormat,
    block: &mut [u8],
) {
    match format {
        BlockFormat::Bc1 | BlockFormat::Bc1Opaque => encode_color_block(pixels, format, block),
        BlockFormat::Bc2 => {
            encode_explicit_alpha(pixels, &mut block[..8]);
            encode_color_block(pixels, format, &mut block[8..16]);
        }
        BlockFormat::Bc3 => {
            encode_interpolated_alpha(pixels, &mut block[..8]);
            encode_color_block(pixels, format, &mut block[8..16]);
        }
    }
}

/// Encodes 4x4 RGBA8 pixels in row-major order to a single block.
///
/// The `rgba` should have at least [DECODED_BLOCK_SIZE] many bytes.
/// The result has [BlockFormat::block_size_in_bytes] many bytes.
pub fn encode_block(rgba: &[u8], format: BlockFormat) -> Result<Vec<u8>, SwizzleError> {
    if rgba.len() < DECODED_BLOCK_SIZE {
        return Err(SwizzleError::NotEnoughData {
            expected_size: DECODED_BLOCK_SIZE,
            actual_size: rgba.len(),
        });
    }

    let mut pixels = [[0u8; 4]; PIXELS_PER_BLOCK];
    for (pixel, src) in pixels.iter_mut().zip(rgba.chunks_exact(4)) {
        pixel.copy_from_slice(src);
    }

    let mut block = vec![0u8; format.block_size_in_bytes()];
    encode_block_inner(&pixels, format, &mut block);
    Ok(block)
}

/// Decodes the blocks in `data` to a tightly packed RGBA8 image.
///
/// The blocks are in row-major order like the output of [deswizzle_surface](crate::deswizzle_surface).
/// Blocks along the right and bottom edge may be partially outside the image.
pub fn decode_image(
    width: u32,
    height: u32,
    data: &[u8],
    format: BlockFormat,
) -> Result<Vec<u8>, SwizzleError> {
    let width_in_blocks = div_round_up(width, BLOCK_WIDTH as u32) as usize;
    let height_in_blocks = div_round_up(height, BLOCK_HEIGHT as u32) as usize;
    let block_size = format.block_size_in_bytes();

    let expected_size = width_in_blocks
        .saturating_mul(height_in_blocks)
        .saturating_mul(block_size);
    if data.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: data.len(),
        });
    }

    let (width, height) = (width as usize, height as usize);
    let mut rgba = vec![0u8; width * height * 4];

    for (i, block) in data[..expected_size].chunks_exact(block_size).enumerate() {
        let decoded = decode_block(block, format)?;

        let block_x = (i % width_in_blocks) * BLOCK_WIDTH;
        let block_y = (i / width_in_blocks) * BLOCK_HEIGHT;
        for y in 0..BLOCK_HEIGHT.min(height - block_y) {
            let pixels_in_row = BLOCK_WIDTH.min(width - block_x);
            let src = y * BLOCK_WIDTH * 4;
            let dst = ((block_y + y) * width + block_x) * 4;
            rgba[dst..dst + pixels_in_row * 4]
                .copy_from_slice(&decoded[src..src + pixels_in_row * 4]);
        }
    }

    Ok(rgba)
}

/// Encodes a tightly packed RGBA8 image to blocks in row-major order.
///
/// Pixels outside the image in edge blocks repeat the last row or column.
pub fn encode_image(
    width: u32,
    height: u32,
    rgba: &[u8],
    format: BlockFormat,
) -> Result<Vec<u8>, SwizzleError> {
    let (width, height) = (width as usize, height as usize);
    let expected_size = width.saturating_mul(height).saturating_mul(4);
    if rgba.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: rgba.len(),
        });
    }

    let width_in_blocks = div_round_up(width as u32, BLOCK_WIDTH as u32) as usize;
    let height_in_blocks = div_round_up(height as u32, BLOCK_HEIGHT as u32) as usize;
    let block_size = format.block_size_in_bytes();

    let mut data = vec![0u8; width_in_blocks * height_in_blocks * block_size];
    for (i, block) in data.chunks_exact_mut(block_size).enumerate() {
        let block_x = (i % width_in_blocks) * BLOCK_WIDTH;
        let block_y = (i / width_in_blocks) * BLOCK_HEIGHT;

        let mut pixels = [[0u8; 4]; PIXELS_PER_BLOCK];
        for (j, pixel) in pixels.iter_mut().enumerate() {
            let x = (block_x + j % BLOCK_WIDTH).min(width - 1);
            let y = (block_y + j / BLOCK_WIDTH).min(height - 1);
            let offset = (y * width + x) * 4;
            pixel.copy_from_slice(&rgba[offset..offset + 4]);
        }

        encode_block_inner(&pixels, format, block);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc1_block(color0: u16, color1: u16, indices: u32) -> [u8; 8] {
        let mut block = [0u8; 8];
        block[0..2].copy_from_slice(&color0.to_le_bytes());
        block[2..4].copy_from_slice(&color1.to_le_bytes());
        block[4..8].copy_from_slice(&indices.to_le_bytes());
        block
    }

    fn pixel(rgba: &[u8; DECODED_BLOCK_SIZE], i: usize) -> [u8; 4] {
        [rgba[i * 4], rgba[i * 4 + 1], rgba[i * 4 + 2], rgba[i * 4 + 3]]
    }

    #[test]
    fn expand_endpoints() {
        assert_eq!([255, 255, 255], expand_rgb565(0xFFFF));
        assert_eq!([0, 0, 0], expand_rgb565(0x0000));
        // 10000 100000 10000
        assert_eq!([132, 130, 132], expand_rgb565(0x8410));
    }

    #[test]
    fn decode_bc1_four_color() {
        // Every index is 2.
        let block = bc1_block(0xFFFF, 0x0000, 0xAAAA_AAAA);
        let rgba = decode_block(&block, BlockFormat::Bc1).unwrap();
        for i in 0..16 {
            assert_eq!([170, 170, 170, 255], pixel(&rgba, i));
        }
    }

    #[test]
    fn decode_bc1_index_3_four_color() {
        let block = bc1_block(0xFFFF, 0x0000, 0xFFFF_FFFF);
        let rgba = decode_block(&block, BlockFormat::Bc1).unwrap();
        assert_eq!([85, 85, 85, 255], pixel(&rgba, 0));
    }

    #[test]
    fn decode_bc1_punch_through() {
        let block = bc1_block(0x0000, 0xFFFF, 0xFFFF_FFFF);
        let rgba = decode_block(&block, BlockFormat::Bc1).unwrap();
        for i in 0..16 {
            assert_eq!([0, 0, 0, 0], pixel(&rgba, i));
        }

        let rgba = decode_block(&block, BlockFormat::Bc1Opaque).unwrap();
        assert_eq!([0, 0, 0, 255], pixel(&rgba, 0));
    }

    #[test]
    fn decode_bc1_three_color_average() {
        let block = bc1_block(0x0000, 0xFFFF, 0xAAAA_AAAA);
        let rgba = decode_block(&block, BlockFormat::Bc1).unwrap();
        assert_eq!([127, 127, 127, 255], pixel(&rgba, 5));
    }

    #[test]
    fn decode_bc1_index_order() {
        // Only the last pixel uses color1.
        let block = bc1_block(0xFFFF, 0x0000, 0x4000_0000);
        let rgba = decode_block(&block, BlockFormat::Bc1).unwrap();
        assert_eq!([255, 255, 255, 255], pixel(&rgba, 0));
        assert_eq!([0, 0, 0, 255], pixel(&rgba, 15));
    }

    #[test]
    fn decode_bc2_alpha_nibbles() {
        let mut block = [0u8; 16];
        // Pixel 0 uses the low nibble and pixel 1 uses the high nibble.
        block[0] = 0x5A;
        // Three color endpoint order is still decoded as four color.
        block[8..16].copy_from_slice(&bc1_block(0x0000, 0xFFFF, 0xFFFF_FFFF));

        let rgba = decode_block(&block, BlockFormat::Bc2).unwrap();
        assert_eq!([170, 170, 170, 0xAA], pixel(&rgba, 0));
        assert_eq!([170, 170, 170, 0x55], pixel(&rgba, 1));
        assert_eq!(0, pixel(&rgba, 2)[3]);
    }

    #[test]
    fn decode_bc3_eight_alpha() {
        let mut block = [0u8; 16];
        block[0] = 255;
        block[1] = 0;
        // Codes 0 to 7 for the first 8 pixels.
        let indices: u64 = (0..8).fold(0, |acc, i| acc | (i << (3 * i)));
        block[2..8].copy_from_slice(&indices.to_le_bytes()[..6]);
        block[8..16].copy_from_slice(&bc1_block(0xFFFF, 0xFFFF, 0));

        let rgba = decode_block(&block, BlockFormat::Bc3).unwrap();
        let alpha: Vec<_> = (0..8).map(|i| pixel(&rgba, i)[3]).collect();
        assert_eq!(vec![255, 0, 218, 182, 145, 109, 72, 36], alpha);
    }

    #[test]
    fn decode_bc3_six_alpha() {
        let mut block = [0u8; 16];
        block[0] = 0;
        block[1] = 255;
        let indices: u64 = (0..8).fold(0, |acc, i| acc | (i << (3 * i)));
        block[2..8].copy_from_slice(&indices.to_le_bytes()[..6]);

        let rgba = decode_block(&block, BlockFormat::Bc3).unwrap();
        let alpha: Vec<_> = (0..8).map(|i| pixel(&rgba, i)[3]).collect();
        assert_eq!(vec![0, 255, 51, 102, 153, 204, 0, 255], alpha);
    }

    #[test]
    fn decode_block_not_enough_data() {
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                expected_size: 16,
                actual_size: 8
            }),
            decode_block(&[0u8; 8], BlockFormat::Bc3)
        );
    }

    #[test]
    fn encode_solid_color() {
        let rgba = [255u8, 0, 0, 255].repeat(16);
        let block = encode_block(&rgba, BlockFormat::Bc1).unwrap();
        assert_eq!(vec![0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0], block);
        assert_eq!(&rgba[..], &decode_block(&block, BlockFormat::Bc1).unwrap()[..]);
    }

    #[test]
    fn encode_bc1_transparency() {
        let mut rgba = [255u8; DECODED_BLOCK_SIZE];
        rgba[3] = 0;
        let block = encode_block(&rgba, BlockFormat::Bc1).unwrap();

        let decoded = decode_block(&block, BlockFormat::Bc1).unwrap();
        assert_eq!([0, 0, 0, 0], pixel(&decoded, 0));
        assert_eq!([255, 255, 255, 255], pixel(&decoded, 1));
    }

    #[test]
    fn encode_endpoints_exact() {
        // Colors exactly representable by the endpoints decode losslessly.
        let mut rgba = [0u8; DECODED_BLOCK_SIZE];
        for (i, p) in rgba.chunks_exact_mut(4).enumerate() {
            let value = if i % 2 == 0 { 255 } else { 0 };
            p.copy_from_slice(&[value, value, value, 255]);
        }

        for format in [BlockFormat::Bc1, BlockFormat::Bc2, BlockFormat::Bc3] {
            let block = encode_block(&rgba, format).unwrap();
            assert_eq!(&rgba[..], &decode_block(&block, format).unwrap()[..]);
        }
    }

    #[test]
    fn encode_alpha_exact() {
        let mut rgba = [0u8; DECODED_BLOCK_SIZE];
        for (i, p) in rgba.chunks_exact_mut(4).enumerate() {
            p[3] = (i * 17) as u8;
        }

        // Multiples of 17 are exact for 4-bit alpha.
        let block = encode_block(&rgba, BlockFormat::Bc2).unwrap();
        let decoded = decode_block(&block, BlockFormat::Bc2).unwrap();
        for i in 0..16 {
            assert_eq!((i * 17) as u8, pixel(&decoded, i)[3]);
        }

        // The endpoints are exact for interpolated alpha.
        let block = encode_block(&rgba, BlockFormat::Bc3).unwrap();
        let decoded = decode_block(&block, BlockFormat::Bc3).unwrap();
        assert_eq!(0, pixel(&decoded, 0)[3]);
        assert_eq!(255, pixel(&decoded, 15)[3]);
    }

    #[test]
    fn encode_decode_error_bounds() {
        // A smooth gradient like most texture blocks.
        let rgba: Vec<_> = (0..16u8)
            .flat_map(|i| [40 + 2 * i, 100 + 2 * i, 150 + 2 * i, 60 + 8 * i])
            .collect();

        for format in [BlockFormat::Bc1Opaque, BlockFormat::Bc2, BlockFormat::Bc3] {
            let block = encode_block(&rgba, format).unwrap();
            let decoded = decode_block(&block, format).unwrap();
            for (i, (a, b)) in rgba.iter().zip(decoded.iter()).enumerate() {
                if format == BlockFormat::Bc1Opaque && i % 4 == 3 {
                    assert_eq!(255, *b);
                } else {
                    assert!(
                        (*a as i32 - *b as i32).abs() <= 8,
                        "{:?} {} {} {}",
                        format,
                        i,
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn decode_image_partial_blocks() {
        // A 5x5 image uses 2x2 blocks.
        let mut data = Vec::new();
        data.extend_from_slice(&bc1_block(0xFFFF, 0xFFFF, 0));
        data.extend_from_slice(&bc1_block(0x0000, 0x0000, 0));
        data.extend_from_slice(&bc1_block(0xF800, 0xF800, 0));
        data.extend_from_slice(&bc1_block(0x001F, 0x001F, 0));

        let rgba = decode_image(5, 5, &data, BlockFormat::Bc1).unwrap();
        assert_eq!(5 * 5 * 4, rgba.len());
        assert_eq!(&[255, 255, 255, 255], &rgba[0..4]);
        assert_eq!(&[0, 0, 0, 255], &rgba[4 * 4..5 * 4]);
        assert_eq!(&[255, 0, 0, 255], &rgba[(4 * 5) * 4..(4 * 5 + 1) * 4]);
        assert_eq!(&[0, 0, 255, 255], &rgba[(4 * 5 + 4) * 4..]);
    }

    #[test]
    fn encode_decode_image() {
        let rgba = [0u8, 255, 0, 255].repeat(6 * 3);
        let data = encode_image(6, 3, &rgba, BlockFormat::Bc3).unwrap();
        assert_eq!(2 * 16, data.len());
        assert_eq!(rgba, decode_image(6, 3, &data, BlockFormat::Bc3).unwrap());
    }

    #[test]
    fn decode_image_not_enough_data() {
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                expected_size: 32,
                actual_size: 8
            }),
            decode_image(8, 8, &[0u8; 8], BlockFormat::Bc1)
        );
    }

    #[test]
    fn empty_image() {
        assert!(decode_image(0, 0, &[], BlockFormat::Bc2).unwrap().is_empty());
        assert!(encode_image(0, 0, &[], BlockFormat::Bc2).unwrap().is_empty());
    }
}
