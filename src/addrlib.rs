//! Surface address calculations for the GX2 tiling modes.
//!
//! The calculations follow the R600 family address library used by the Wii U GPU.
//! Surfaces are divided into 8x8 micro tiles.
//! The element order within a micro tile depends on the bits per pixel.
//! Macro tiled modes also distribute micro tiles across memory pipes and banks.
//! The pipe and bank bits are interleaved into the final address above the pipe interleave bits.
//!
//! Use [SurfaceAddresser] when calculating many addresses for the same surface.
use crate::{
    surface::SurfaceDescriptor,
    tilemode::{TileClass, TileMode},
    SwizzleError,
};

const MICRO_TILE_WIDTH: u64 = 8;
const MICRO_TILE_HEIGHT: u64 = 8;
const MICRO_TILE_PIXELS: u64 = MICRO_TILE_WIDTH * MICRO_TILE_HEIGHT;

// The first 4 entries apply to 4 bank configurations.
const BANK_SWAP_ORDER: [u32; 8] = [0, 1, 3, 2, 6, 7, 5, 4];

/// The memory channel configuration of the GPU.
///
/// The [Default] is the configuration of the Wii U.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PipeConfig {
    /// The number of memory pipes. Supported values are 1 and 2.
    pub num_pipes: u32,
    /// The number of memory banks. Supported values are 4 and 8.
    pub num_banks: u32,
    /// The number of bytes stored contiguously in a pipe before switching pipes.
    pub pipe_interleave_bytes: u32,
    /// The size of a DRAM row in bytes.
    pub row_size: u32,
    /// The swap size in bytes used for bank swapped tile modes.
    pub swap_size: u32,
    /// The micro tile size in bytes above which samples are split into separate slices.
    pub split_size: u32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        PipeConfig {
            num_pipes: 2,
            num_banks: 4,
            pipe_interleave_bytes: 256,
            row_size: 2048,
            swap_size: 256,
            split_size: 2048,
        }
    }
}

impl PipeConfig {
    /// Creates a configuration with the given pipe and bank counts
    /// and the default sizes for everything else.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::PipeConfig;

    assert!(PipeConfig::new(2, 8).is_ok());
    assert!(PipeConfig::new(3, 4).is_err());
    ```
    */
    pub fn new(num_pipes: u32, num_banks: u32) -> Result<Self, SwizzleError> {
        let config = PipeConfig {
            num_pipes,
            num_banks,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), SwizzleError> {
        let sizes_valid = self.pipe_interleave_bytes.is_power_of_two()
            && self.row_size != 0
            && self.swap_size != 0
            && self.split_size != 0;

        if matches!(self.num_pipes, 1 | 2) && matches!(self.num_banks, 4 | 8) && sizes_valid {
            Ok(())
        } else {
            Err(SwizzleError::InvalidPipeConfig {
                num_pipes: self.num_pipes,
                num_banks: self.num_banks,
            })
        }
    }

    fn pipe_bits(&self) -> u32 {
        self.num_pipes.trailing_zeros()
    }

    fn bank_bits(&self) -> u32 {
        self.num_banks.trailing_zeros()
    }

    fn group_bits(&self) -> u32 {
        self.pipe_interleave_bytes.trailing_zeros()
    }
}

/// The location of an element in a tiled surface.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SurfaceAddress {
    pub byte_offset: u64,
    /// The offset within the byte for formats with less than 8 bits per element.
    pub bit_offset: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

// The source coordinate bit for each of the 6 bits of a pixel index within a micro tile.
type MicroTileOrder = [(Axis, u32); 6];

const MICRO_TILE_ORDER_8: MicroTileOrder = [
    (Axis::X, 0),
    (Axis::X, 1),
    (Axis::X, 2),
    (Axis::Y, 1),
    (Axis::Y, 0),
    (Axis::Y, 2),
];

const MICRO_TILE_ORDER_16: MicroTileOrder = [
    (Axis::X, 0),
    (Axis::X, 1),
    (Axis::X, 2),
    (Axis::Y, 0),
    (Axis::Y, 1),
    (Axis::Y, 2),
];

// Also used for any other size.
const MICRO_TILE_ORDER_32: MicroTileOrder = [
    (Axis::X, 0),
    (Axis::X, 1),
    (Axis::Y, 0),
    (Axis::X, 2),
    (Axis::Y, 1),
    (Axis::Y, 2),
];

const MICRO_TILE_ORDER_64: MicroTileOrder = [
    (Axis::X, 0),
    (Axis::Y, 0),
    (Axis::X, 1),
    (Axis::X, 2),
    (Axis::Y, 1),
    (Axis::Y, 2),
];

const MICRO_TILE_ORDER_128: MicroTileOrder = [
    (Axis::Y, 0),
    (Axis::X, 0),
    (Axis::X, 1),
    (Axis::X, 2),
    (Axis::Y, 1),
    (Axis::Y, 2),
];

const MICRO_TILE_ORDERS: [(u32, &MicroTileOrder); 4] = [
    (8, &MICRO_TILE_ORDER_8),
    (16, &MICRO_TILE_ORDER_16),
    (64, &MICRO_TILE_ORDER_64),
    (128, &MICRO_TILE_ORDER_128),
];

fn micro_tile_order(bits_per_pixel: u32) -> &'static MicroTileOrder {
    MICRO_TILE_ORDERS
        .iter()
        .find(|(bpp, _)| *bpp == bits_per_pixel)
        .map(|(_, order)| *order)
        .unwrap_or(&MICRO_TILE_ORDER_32)
}

fn pixel_index_within_micro_tile(
    order: &MicroTileOrder,
    x: u32,
    y: u32,
    z: u32,
    thickness: u32,
) -> u64 {
    let mut index = 0;
    for (i, (axis, bit)) in order.iter().enumerate() {
        let value = match axis {
            Axis::X => x,
            Axis::Y => y,
        };
        index |= ((value >> bit) & 1) << i;
    }

    // Thick micro tiles store 4 slices in the upper bits.
    if thickness > 1 {
        index |= (z & 1) << 6;
        index |= ((z >> 1) & 1) << 7;
    }

    index as u64
}

fn pipe_from_coord(x: u32, y: u32, config: &PipeConfig) -> u32 {
    match config.num_pipes {
        2 => ((y >> 3) ^ (x >> 3)) & 1,
        _ => 0,
    }
}

fn bank_from_coord(x: u32, y: u32, config: &PipeConfig) -> u32 {
    let num_pipes = config.num_pipes;
    match config.num_banks {
        4 => {
            let bank_bit0 = ((y / (16 * num_pipes)) ^ (x >> 3)) & 1;
            let bank_bit1 = ((y / (8 * num_pipes)) ^ (x >> 4)) & 1;
            bank_bit0 | (bank_bit1 << 1)
        }
        8 => {
            let bank_bit0 = ((y / (32 * num_pipes)) ^ (x >> 3)) & 1;
            let bank_bit1 = ((y / (32 * num_pipes)) ^ (y / (16 * num_pipes)) ^ (x >> 4)) & 1;
            let bank_bit2 = ((y / (8 * num_pipes)) ^ (x >> 5)) & 1;
            bank_bit0 | (bank_bit1 << 1) | (bank_bit2 << 2)
        }
        _ => 0,
    }
}

// Rotates the pipe and bank for each slice to avoid the same channels for every slice.
fn surface_rotation(tile_mode: TileMode, config: &PipeConfig) -> u32 {
    match tile_mode.tile_class() {
        TileClass::MacroTiled if tile_mode.is_3d_tiled() => {
            if config.num_pipes >= 4 {
                (config.num_pipes >> 1) - 1
            } else {
                1
            }
        }
        TileClass::MacroTiled => config.num_pipes * ((config.num_banks >> 1) - 1),
        _ => 0,
    }
}

fn bank_swapped_width(
    tile_mode: TileMode,
    bits_per_pixel: u64,
    num_samples: u64,
    pitch: u64,
    config: &PipeConfig,
) -> u64 {
    if !tile_mode.is_bank_swapped() {
        return 0;
    }

    let num_pipes = config.num_pipes as u64;
    let num_banks = config.num_banks as u64;

    let bytes_per_sample = 8 * bits_per_pixel;
    let samples_per_tile = config.split_size as u64 / bytes_per_sample;
    let slices_per_tile = if samples_per_tile != 0 {
        (num_samples / samples_per_tile).max(1)
    } else {
        1
    };

    let num_samples = if tile_mode.is_thick_macro_tiled() {
        4
    } else {
        num_samples
    };
    let bytes_per_tile_slice = num_samples * bytes_per_sample / slices_per_tile;

    let factor = tile_mode.macro_tile_aspect_ratio() as u64;
    let swap_tiles = ((config.swap_size as u64 >> 1) / bits_per_pixel).max(1);
    let swap_width = swap_tiles * 8 * num_banks;
    let height_bytes = num_samples * factor * num_pipes * bits_per_pixel / slices_per_tile;
    let swap_max = num_pipes * num_banks * config.row_size as u64 / height_bytes;
    let swap_min = config.pipe_interleave_bytes as u64 * 8 * num_banks / bytes_per_tile_slice;

    let mut width = if swap_max >= swap_width {
        swap_min.max(swap_width)
    } else {
        swap_max
    };

    while width >= 2 * pitch && width > 1 {
        width >>= 1;
    }

    width.max(1)
}

/// Calculates addresses for a single surface.
///
/// The constants shared by every element of the surface are only calculated once.
/// Coordinates are in elements, so block compressed formats use block coordinates.
#[derive(Debug, Clone)]
pub struct SurfaceAddresser {
    tile_mode: TileMode,
    tile_class: TileClass,
    config: PipeConfig,
    bits_per_pixel: u64,
    pitch: u64,
    padded_height: u64,
    thickness: u64,
    width_in_elements: u32,
    height_in_elements: u32,
    depth: u32,
    num_samples: u32,
    pipe_swizzle: u32,
    bank_swizzle: u32,
    order: &'static MicroTileOrder,
    // Macro tiling.
    rotation: u32,
    macro_tile_pitch: u64,
    macro_tile_height: u64,
    samples_per_slice: u64,
    num_sample_splits: u64,
    bank_swap_width: u64,
}

impl SurfaceAddresser {
    /// Precomputes the addressing constants for `surface`.
    ///
    /// Returns an error if the surface has no bits per pixel or an unsupported [PipeConfig].
    pub fn new(surface: &SurfaceDescriptor) -> Result<Self, SwizzleError> {
        surface.pipe_config.validate()?;
        if surface.tiled_bits_per_element() == 0 {
            return Err(SwizzleError::UnsupportedFormat {
                format: surface.format,
            });
        }
        if !matches!(surface.num_samples, 1 | 2 | 4 | 8) {
            return Err(SwizzleError::UnsupportedSampleCount {
                num_samples: surface.num_samples,
            });
        }

        let config = surface.pipe_config;
        let tile_mode = surface.tile_mode;
        let bits_per_pixel = surface.tiled_bits_per_element() as u64;
        let thickness = tile_mode.thickness() as u64;
        let num_samples = surface.num_samples as u64;

        // Samples are split into separate slices if a micro tile is too large.
        let micro_tile_bytes = num_samples * bits_per_pixel * thickness * MICRO_TILE_PIXELS / 8;
        let (samples_per_slice, num_sample_splits) =
            if num_samples <= 1 || micro_tile_bytes <= config.split_size as u64 {
                (num_samples, 1)
            } else {
                let bytes_per_sample = micro_tile_bytes / num_samples;
                let samples_per_slice = (config.split_size as u64 / bytes_per_sample).max(1);
                (samples_per_slice, num_samples / samples_per_slice)
            };

        let aspect_ratio = tile_mode.macro_tile_aspect_ratio() as u64;
        let macro_tile_pitch = MICRO_TILE_WIDTH * config.num_banks as u64 / aspect_ratio;
        let macro_tile_height = MICRO_TILE_HEIGHT * config.num_pipes as u64 * aspect_ratio;

        let pitch = surface.pitch as u64;

        Ok(SurfaceAddresser {
            tile_mode,
            tile_class: tile_mode.tile_class(),
            config,
            bits_per_pixel,
            pitch,
            padded_height: surface.padded_height as u64,
            thickness,
            width_in_elements: surface.tiled_width_in_elements(),
            height_in_elements: surface.height_in_elements(),
            depth: surface.depth,
            num_samples: surface.num_samples,
            pipe_swizzle: surface.swizzle.pipe_swizzle(),
            bank_swizzle: surface.swizzle.bank_swizzle(),
            order: micro_tile_order(bits_per_pixel as u32),
            rotation: surface_rotation(tile_mode, &config),
            macro_tile_pitch,
            macro_tile_height,
            samples_per_slice,
            num_sample_splits,
            bank_swap_width: bank_swapped_width(
                tile_mode,
                bits_per_pixel,
                samples_per_slice,
                pitch,
                &config,
            ),
        })
    }

    /// Calculates the location of the element at `x`, `y` for the given `slice` and `sample`.
    ///
    /// Returns [SwizzleError::IndexOutOfRange] if the coordinate is outside the surface.
    pub fn address(
        &self,
        x: u32,
        y: u32,
        slice: u32,
        sample: u32,
    ) -> Result<SurfaceAddress, SwizzleError> {
        if x >= self.width_in_elements
            || y >= self.height_in_elements
            || slice >= self.depth
            || sample >= self.num_samples
        {
            return Err(SwizzleError::IndexOutOfRange {
                x,
                y,
                slice,
                sample,
            });
        }

        Ok(self.address_unchecked(x, y, slice, sample))
    }

    pub(crate) fn address_unchecked(
        &self,
        x: u32,
        y: u32,
        slice: u32,
        sample: u32,
    ) -> SurfaceAddress {
        match self.tile_class {
            TileClass::Linear => self.address_linear(x, y, slice, sample),
            TileClass::MicroTiled => self.address_micro_tiled(x, y, slice),
            TileClass::MacroTiled => self.address_macro_tiled(x, y, slice, sample),
        }
    }

    fn address_linear(&self, x: u32, y: u32, slice: u32, sample: u32) -> SurfaceAddress {
        let slice_index = slice as u64 + self.depth as u64 * sample as u64;
        let element = x as u64
            + self.pitch * y as u64
            + slice_index * self.padded_height * self.pitch;

        let bit_address = element * self.bits_per_pixel;
        SurfaceAddress {
            byte_offset: bit_address / 8,
            bit_offset: (bit_address % 8) as u8,
        }
    }

    fn address_micro_tiled(&self, x: u32, y: u32, slice: u32) -> SurfaceAddress {
        let micro_tile_bytes = self.thickness * MICRO_TILE_PIXELS * self.bits_per_pixel / 8;
        let micro_tiles_per_row = self.pitch / MICRO_TILE_WIDTH;
        let micro_tile_index_x = x as u64 / MICRO_TILE_WIDTH;
        let micro_tile_index_y = y as u64 / MICRO_TILE_HEIGHT;
        let micro_tile_offset =
            micro_tile_bytes * (micro_tile_index_x + micro_tile_index_y * micro_tiles_per_row);

        let slice_bytes =
            (self.padded_height * self.pitch * self.thickness * self.bits_per_pixel + 7) / 8;
        let slice_offset = slice_bytes * (slice as u64 / self.thickness);

        let pixel_index =
            pixel_index_within_micro_tile(self.order, x, y, slice, self.thickness as u32);
        let pixel_offset = self.bits_per_pixel * pixel_index;

        SurfaceAddress {
            byte_offset: pixel_offset / 8 + micro_tile_offset + slice_offset,
            bit_offset: (pixel_offset % 8) as u8,
        }
    }

    fn address_macro_tiled(&self, x: u32, y: u32, slice: u32, sample: u32) -> SurfaceAddress {
        let config = &self.config;
        let num_pipes = config.num_pipes;
        let num_banks = config.num_banks;
        let num_samples = self.num_samples as u64;

        let micro_tile_bits =
            num_samples * self.bits_per_pixel * self.thickness * MICRO_TILE_PIXELS;

        let pixel_index =
            pixel_index_within_micro_tile(self.order, x, y, slice, self.thickness as u32);
        let sample_offset = sample as u64 * (micro_tile_bits / num_samples);
        let pixel_offset = self.bits_per_pixel * pixel_index;

        let mut element_offset = pixel_offset + sample_offset;
        let bit_offset = (element_offset % 8) as u8;

        // Split samples stay in the same position but in a different slice.
        let sample_slice = if self.num_sample_splits > 1 {
            let tile_slice_bits = micro_tile_bits / self.num_sample_splits;
            let sample_slice = element_offset / tile_slice_bits;
            element_offset %= tile_slice_bits;
            sample_slice
        } else {
            0
        };
        element_offset /= 8;

        let pipe = pipe_from_coord(x, y, config);
        let bank = bank_from_coord(x, y, config);
        let mut bank_pipe = pipe + num_pipes * bank;

        let swizzle = self.pipe_swizzle + num_pipes * self.bank_swizzle;
        let slice_in = if self.tile_mode.is_thick_macro_tiled() {
            slice >> 2
        } else {
            slice
        };
        let sample_slice_rotation = num_pipes * sample_slice as u32 * ((num_banks >> 1) + 1);
        bank_pipe ^= sample_slice_rotation ^ (swizzle + slice_in * self.rotation);
        bank_pipe %= num_pipes * num_banks;

        let pipe = bank_pipe % num_pipes;
        let mut bank = bank_pipe / num_pipes;

        let slice_bytes = (self.padded_height
            * self.pitch
            * self.thickness
            * self.bits_per_pixel
            * self.samples_per_slice
            + 7)
            / 8;
        let slice_offset =
            slice_bytes * ((sample_slice + self.num_sample_splits * slice as u64) / self.thickness);

        let macro_tile_bytes = (self.samples_per_slice
            * self.thickness
            * self.bits_per_pixel
            * self.macro_tile_height
            * self.macro_tile_pitch
            + 7)
            / 8;
        let macro_tiles_per_row = self.pitch / self.macro_tile_pitch;
        let macro_tile_index_x = x as u64 / self.macro_tile_pitch;
        let macro_tile_index_y = y as u64 / self.macro_tile_height;
        let macro_tile_offset =
            (macro_tile_index_x + macro_tiles_per_row * macro_tile_index_y) * macro_tile_bytes;

        if self.tile_mode.is_bank_swapped() {
            let swap_index = self.macro_tile_pitch * macro_tile_index_x / self.bank_swap_width;
            bank ^= BANK_SWAP_ORDER[(swap_index & (num_banks as u64 - 1)) as usize];
        }

        // Interleave the pipe and bank bits above the group bits.
        let group_bits = config.group_bits();
        let pipe_bits = config.pipe_bits();
        let num_swizzle_bits = pipe_bits + config.bank_bits();
        let group_mask = (1u64 << group_bits) - 1;

        let offset = element_offset + ((macro_tile_offset + slice_offset) >> num_swizzle_bits);
        let byte_offset = ((offset & !group_mask) << num_swizzle_bits)
            | (offset & group_mask)
            | ((pipe as u64) << group_bits)
            | ((bank as u64) << (pipe_bits + group_bits));

        SurfaceAddress {
            byte_offset,
            bit_offset,
        }
    }
}

/// Calculates the location of the element at `x`, `y` in the tiled `surface`.
///
/// Block compressed formats use block coordinates, so the pixel at `(x, y)` is in the block at `(x / 4, y / 4)`.
/// 96-bit formats use three 32-bit elements for each pixel, so `x` ranges over three times the width.
/// Returns [SwizzleError::IndexOutOfRange] if the coordinate is outside the surface.
/// # Examples
/**
```rust
use gx2_swizzle::{address_of, SurfaceDescriptor, TileMode};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
let surface = SurfaceDescriptor::new(0x1a, 64, 64, TileMode::Tiled2DThin1)?;
let address = address_of(&surface, 8, 0, 0, 0)?;
assert_eq!(768, address.byte_offset);
# Ok(())
# }
```
 */
pub fn address_of(
    surface: &SurfaceDescriptor,
    x: u32,
    y: u32,
    slice: u32,
    sample: u32,
) -> Result<SurfaceAddress, SwizzleError> {
    SurfaceAddresser::new(surface)?.address(x, y, slice, sample)
}
