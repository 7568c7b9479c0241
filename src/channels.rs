//! Conversions between GX2 pixel formats and RGBA8.
//!
//! Packed 16-bit formats store big endian words
//! with the first channel in the most significant bits.
//! Channels with fewer than 8 bits are expanded by replicating the high bits into the low bits.
//! Missing color channels are zero and missing alpha is 255.
use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::{
    bcn::{decode_image, encode_image, BlockFormat},
    div_round_up,
    format::SurfaceFormat,
    SwizzleError,
};

/// The source of a single output channel.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
    Zero = 4,
    One = 5,
}

impl Channel {
    pub fn new(value: u8) -> Option<Self> {
        match value {
            0 => Some(Channel::Red),
            1 => Some(Channel::Green),
            2 => Some(Channel::Blue),
            3 => Some(Channel::Alpha),
            4 => Some(Channel::Zero),
            5 => Some(Channel::One),
            _ => None,
        }
    }
}

/// The source channels for the red, green, blue, and alpha outputs.
///
/// This corresponds to the `compSel` of a GX2 texture.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ChannelSelector(pub [Channel; 4]);

impl Default for ChannelSelector {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ChannelSelector {
    pub const IDENTITY: Self = ChannelSelector([
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::Alpha,
    ]);

    /// Attempts to construct a selector from one value for each output channel.
    /// Returns [None] if any value is not a valid [Channel].
    pub fn from_array(values: [u8; 4]) -> Option<Self> {
        Some(ChannelSelector([
            Channel::new(values[0])?,
            Channel::new(values[1])?,
            Channel::new(values[2])?,
            Channel::new(values[3])?,
        ]))
    }

    /// Decodes the packed `compSel` value with red in the most significant byte.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::channels::{Channel, ChannelSelector};

    // Luminance textures use red for all color channels.
    let selector = ChannelSelector::from_comp_sel(0x00000005).unwrap();
    assert_eq!(
        [Channel::Red, Channel::Red, Channel::Red, Channel::One],
        selector.0
    );
    ```
    */
    pub fn from_comp_sel(comp_sel: u32) -> Option<Self> {
        Self::from_array(comp_sel.to_be_bytes())
    }

    pub fn to_comp_sel(&self) -> u32 {
        u32::from_be_bytes([
            self.0[0] as u8,
            self.0[1] as u8,
            self.0[2] as u8,
            self.0[3] as u8,
        ])
    }

    /// The selector that moves remapped channels back to where they are stored.
    ///
    /// Stored channels that no output reads from are zero or 255 for alpha.
    pub fn inverse(&self) -> Self {
        let source = |stored: Channel, unused: Channel| {
            self.0
                .iter()
                .position(|c| *c == stored)
                .and_then(|i| Channel::new(i as u8))
                .unwrap_or(unused)
        };
        ChannelSelector([
            source(Channel::Red, Channel::Zero),
            source(Channel::Green, Channel::Zero),
            source(Channel::Blue, Channel::Zero),
            source(Channel::Alpha, Channel::One),
        ])
    }

    /// Remaps the channels of each pixel in the RGBA8 `rgba` in place.
    pub fn apply(&self, rgba: &mut [u8]) {
        if *self == Self::IDENTITY {
            return;
        }

        for pixel in rgba.chunks_exact_mut(4) {
            let source = [pixel[0], pixel[1], pixel[2], pixel[3]];
            for (dst, channel) in pixel.iter_mut().zip(self.0.iter()) {
                *dst = match channel {
                    Channel::Red => source[0],
                    Channel::Green => source[1],
                    Channel::Blue => source[2],
                    Channel::Alpha => source[3],
                    Channel::Zero => 0,
                    Channel::One => 255,
                };
            }
        }
    }
}

/// Uncompressed formats with one element for each pixel.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum PackedFormat {
    R8,
    R4G4,
    R8G8,
    R5G6B5,
    R5G5B5A1,
    R4G4B4A4,
    A1B5G5R5,
    R10G10B10A2,
    R8G8B8A8,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Conversion {
    Packed(PackedFormat),
    Block(BlockFormat),
}

impl From<SurfaceFormat> for Conversion {
    fn from(format: SurfaceFormat) -> Self {
        match format {
            SurfaceFormat::R8 => Conversion::Packed(PackedFormat::R8),
            SurfaceFormat::R4G4 => Conversion::Packed(PackedFormat::R4G4),
            SurfaceFormat::R8G8 => Conversion::Packed(PackedFormat::R8G8),
            SurfaceFormat::R5G6B5 => Conversion::Packed(PackedFormat::R5G6B5),
            SurfaceFormat::R5G5B5A1 => Conversion::Packed(PackedFormat::R5G5B5A1),
            SurfaceFormat::R4G4B4A4 => Conversion::Packed(PackedFormat::R4G4B4A4),
            SurfaceFormat::A1B5G5R5 => Conversion::Packed(PackedFormat::A1B5G5R5),
            SurfaceFormat::R10G10B10A2 => Conversion::Packed(PackedFormat::R10G10B10A2),
            SurfaceFormat::R8G8B8A8 => Conversion::Packed(PackedFormat::R8G8B8A8),
            SurfaceFormat::Bc1 => Conversion::Block(BlockFormat::Bc1),
            SurfaceFormat::Bc2 => Conversion::Block(BlockFormat::Bc2),
            SurfaceFormat::Bc3 => Conversion::Block(BlockFormat::Bc3),
        }
    }
}

fn expand_bits(value: u16, bits: u32) -> u8 {
    match bits {
        1 => value as u8 * 255,
        2 => value as u8 * 85,
        4 => value as u8 * 17,
        _ => ((value << (8 - bits)) | (value >> (2 * bits - 8))) as u8,
    }
}

fn quantize(value: u8, bits: u32) -> u16 {
    let max = (1u32 << bits) - 1;
    ((value as u32 * max + 127) / 255) as u16
}

fn unpack_pixel(format: PackedFormat, bytes: &[u8]) -> [u8; 4] {
    let word = || u16::from_be_bytes([bytes[0], bytes[1]]);
    match format {
        PackedFormat::R8 => [bytes[0], 0, 0, 255],
        PackedFormat::R4G4 => [
            expand_bits((bytes[0] >> 4) as u16, 4),
            expand_bits((bytes[0] & 0xF) as u16, 4),
            0,
            255,
        ],
        PackedFormat::R8G8 => [bytes[0], bytes[1], 0, 255],
        PackedFormat::R5G6B5 => {
            let w = word();
            [
                expand_bits(w >> 11, 5),
                expand_bits((w >> 5) & 0x3F, 6),
                expand_bits(w & 0x1F, 5),
                255,
            ]
        }
        PackedFormat::R5G5B5A1 => {
            let w = word();
            [
                expand_bits(w >> 11, 5),
                expand_bits((w >> 6) & 0x1F, 5),
                expand_bits((w >> 1) & 0x1F, 5),
                expand_bits(w & 1, 1),
            ]
        }
        PackedFormat::R4G4B4A4 => {
            let w = word();
            [
                expand_bits(w >> 12, 4),
                expand_bits((w >> 8) & 0xF, 4),
                expand_bits((w >> 4) & 0xF, 4),
                expand_bits(w & 0xF, 4),
            ]
        }
        PackedFormat::A1B5G5R5 => {
            let w = word();
            [
                expand_bits(w & 0x1F, 5),
                expand_bits((w >> 5) & 0x1F, 5),
                expand_bits((w >> 10) & 0x1F, 5),
                expand_bits(w >> 15, 1),
            ]
        }
        PackedFormat::R10G10B10A2 => {
            let v = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            [
                ((v >> 2) & 0xFF) as u8,
                ((v >> 12) & 0xFF) as u8,
                ((v >> 22) & 0xFF) as u8,
                expand_bits((v >> 30) as u16, 2),
            ]
        }
        PackedFormat::R8G8B8A8 => [bytes[0], bytes[1], bytes[2], bytes[3]],
    }
}

fn write_word(bytes: &mut [u8], word: u16) {
    bytes[..2].copy_from_slice(&word.to_be_bytes());
}

fn pack_pixel(format: PackedFormat, rgba: &[u8], bytes: &mut [u8]) {
    let [r, g, b, a] = [rgba[0], rgba[1], rgba[2], rgba[3]];
    match format {
        PackedFormat::R8 => bytes[0] = r,
        PackedFormat::R4G4 => bytes[0] = ((quantize(r, 4) << 4) | quantize(g, 4)) as u8,
        PackedFormat::R8G8 => bytes[..2].copy_from_slice(&[r, g]),
        PackedFormat::R5G6B5 => write_word(
            bytes,
            (quantize(r, 5) << 11) | (quantize(g, 6) << 5) | quantize(b, 5),
        ),
        PackedFormat::R5G5B5A1 => write_word(
            bytes,
            (quantize(r, 5) << 11)
                | (quantize(g, 5) << 6)
                | (quantize(b, 5) << 1)
                | quantize(a, 1),
        ),
        PackedFormat::R4G4B4A4 => write_word(
            bytes,
            (quantize(r, 4) << 12)
                | (quantize(g, 4) << 8)
                | (quantize(b, 4) << 4)
                | quantize(a, 4),
        ),
        PackedFormat::A1B5G5R5 => write_word(
            bytes,
            (quantize(a, 1) << 15)
                | (quantize(b, 5) << 10)
                | (quantize(g, 5) << 5)
                | quantize(r, 5),
        ),
        PackedFormat::R10G10B10A2 => {
            // Replicate the high bits to fill each 10-bit channel.
            let expand = |c: u8| ((c as u32) << 2) | ((c as u32) >> 6);
            let v = expand(r)
                | (expand(g) << 10)
                | (expand(b) << 20)
                | ((quantize(a, 2) as u32) << 30);
            bytes[..4].copy_from_slice(&v.to_le_bytes());
        }
        PackedFormat::R8G8B8A8 => bytes[..4].copy_from_slice(&[r, g, b, a]),
    }
}

/// Converts the untiled `data` for the GX2 surface `format` to RGBA8.
///
/// Block compressed formats are decoded with [decode_image].
/// Returns [SwizzleError::UnsupportedFormat] for formats without a conversion.
/// # Examples
/**
```rust
use gx2_swizzle::channels::to_rgba8;

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
// GX2_SURFACE_FORMAT_TCS_R5_G6_B5_UNORM
let rgba = to_rgba8(0x08, 1, 1, &[0xF8, 0x00])?;
assert_eq!(vec![255, 0, 0, 255], rgba);
# Ok(())
# }
```
 */
pub fn to_rgba8(
    format: u32,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<Vec<u8>, SwizzleError> {
    let format = SurfaceFormat::try_from(format)?;
    let packed = match Conversion::from(format) {
        Conversion::Packed(packed) => packed,
        Conversion::Block(block_format) => return decode_image(width, height, data, block_format),
    };

    let pixel_count = (width as usize).saturating_mul(height as usize);
    let element_size = format.element_size_in_bytes();
    let expected_size = pixel_count.saturating_mul(element_size);
    if data.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: data.len(),
        });
    }

    Ok(data[..expected_size]
        .chunks_exact(element_size)
        .flat_map(|bytes| unpack_pixel(packed, bytes))
        .collect())
}

/// Converts the RGBA8 pixels in `rgba` to untiled data for the GX2 surface `format`.
///
/// Block compressed formats are encoded with [encode_image].
/// Returns [SwizzleError::UnsupportedFormat] for formats without a conversion.
pub fn from_rgba8(
    format: u32,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, SwizzleError> {
    let format = SurfaceFormat::try_from(format)?;
    let packed = match Conversion::from(format) {
        Conversion::Packed(packed) => packed,
        Conversion::Block(block_format) => return encode_image(width, height, rgba, block_format),
    };

    let pixel_count = (width as usize).saturating_mul(height as usize);
    let expected_size = pixel_count.saturating_mul(4);
    if rgba.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: rgba.len(),
        });
    }

    let element_size = format.element_size_in_bytes();
    let mut data = alloc::vec![0u8; pixel_count * element_size];
    for (bytes, pixel) in data
        .chunks_exact_mut(element_size)
        .zip(rgba.chunks_exact(4))
    {
        pack_pixel(packed, pixel, bytes);
    }
    Ok(data)
}

/// The size in bytes of the untiled data for `format`.
pub fn image_size(format: SurfaceFormat, width: u32, height: u32) -> usize {
    let block_dim = format.block_dimension();
    div_round_up(width, block_dim) as usize
        * div_round_up(height, block_dim) as usize
        * format.element_size_in_bytes()
}
