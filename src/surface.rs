//! Surface dimensions and the padding required by each tile mode.
use crate::{
    addrlib::PipeConfig,
    div_round_up,
    format::{bits_per_pixel, is_block_compressed},
    tilemode::{SwizzlePattern, TileClass, TileMode},
    SwizzleError,
};
use core::convert::TryFrom;

/// The dimensions and layout of a single GX2 surface.
///
/// The `width` and `height` are in pixels without any padding.
/// The `pitch` and `padded_height` are in elements,
/// which are 4x4 pixel blocks for block compressed formats.
/// 96-bit formats are tiled as three 32-bit elements for each pixel,
/// so the `pitch` for these formats counts 32-bit elements.
///
/// Use [SurfaceDescriptor::new] or [SurfaceBuilder] to calculate the padded dimensions.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SurfaceDescriptor {
    pub(crate) format: u32,
    pub(crate) bits_per_pixel: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) depth: u32,
    pub(crate) pitch: u32,
    pub(crate) padded_height: u32,
    pub(crate) tile_mode: TileMode,
    pub(crate) swizzle: SwizzlePattern,
    pub(crate) num_samples: u32,
    pub(crate) pipe_config: PipeConfig,
}

impl SurfaceDescriptor {
    /// Calculates the layout of a single sample surface with a depth of 1
    /// using the default [PipeConfig] and swizzle pattern.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::{SurfaceDescriptor, TileMode};

    # fn main() -> Result<(), gx2_swizzle::SwizzleError> {
    // GX2_SURFACE_FORMAT_TCS_R8_G8_B8_A8_UNORM
    let surface = SurfaceDescriptor::new(0x1a, 100, 20, TileMode::Tiled2DThin1)?;
    assert_eq!(128, surface.pitch());
    assert_eq!(32, surface.padded_height());
    assert_eq!(128 * 32 * 4, surface.surface_size());
    # Ok(())
    # }
    ```
    */
    pub fn new(
        format: u32,
        width: u32,
        height: u32,
        tile_mode: TileMode,
    ) -> Result<Self, SwizzleError> {
        SurfaceBuilder::new(format, width, height, tile_mode).build()
    }

    /// The GX2 surface format code including any flag bits.
    pub fn format(&self) -> u32 {
        self.format
    }

    /// The bits per pixel or block from the format table.
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The width of a row in elements including padding.
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    /// The height in elements including padding.
    pub fn padded_height(&self) -> u32 {
        self.padded_height
    }

    /// The tile mode used for addressing.
    /// Multisampled surfaces use the thin version of the requested mode.
    pub fn tile_mode(&self) -> TileMode {
        self.tile_mode
    }

    pub fn swizzle(&self) -> SwizzlePattern {
        self.swizzle
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }

    pub fn pipe_config(&self) -> PipeConfig {
        self.pipe_config
    }

    /// The width and height of an element in pixels.
    pub fn block_dimension(&self) -> u32 {
        if is_block_compressed(self.format) {
            4
        } else {
            1
        }
    }

    pub fn width_in_elements(&self) -> u32 {
        div_round_up(self.width, self.block_dimension())
    }

    pub fn height_in_elements(&self) -> u32 {
        div_round_up(self.height, self.block_dimension())
    }

    /// The size of a pixel or block in bytes.
    pub fn element_size_in_bytes(&self) -> usize {
        div_round_up(self.bits_per_pixel, 8) as usize
    }

    pub(crate) fn expansion_factor(&self) -> u32 {
        expansion_factor(self.bits_per_pixel)
    }

    /// The bits of each element in the tiled layout.
    pub(crate) fn tiled_bits_per_element(&self) -> u32 {
        self.bits_per_pixel / self.expansion_factor()
    }

    pub(crate) fn tiled_width_in_elements(&self) -> u32 {
        self.width_in_elements() * self.expansion_factor()
    }

    /// The size in bytes of the tiled surface including padding.
    pub fn surface_size(&self) -> usize {
        tiled_size_in_bits(self).map_or(0, |bits| (bits / 8) as usize)
    }

    /// The size in bytes of the tightly packed linear data for all samples.
    pub fn linear_size(&self) -> usize {
        linear_size_in_bytes(self).map_or(0, |size| size as usize)
    }
}

/// Builds a [SurfaceDescriptor] with optional settings.
/// # Examples
/**
```rust
use gx2_swizzle::{PipeConfig, SurfaceBuilder, SwizzlePattern, TileMode};

# fn main() -> Result<(), gx2_swizzle::SwizzleError> {
let surface = SurfaceBuilder::new(0x1a, 64, 64, TileMode::Tiled2DThick)
    .num_samples(4)
    .swizzle(SwizzlePattern::new(3).unwrap())
    .pipe_config(PipeConfig::new(2, 8)?)
    .build()?;

// Multisampled surfaces use thin tiling.
assert_eq!(TileMode::Tiled2DThin1, surface.tile_mode());
# Ok(())
# }
```
 */
#[derive(Debug, Clone, Copy)]
pub struct SurfaceBuilder {
    format: u32,
    width: u32,
    height: u32,
    depth: u32,
    tile_mode: TileMode,
    swizzle: SwizzlePattern,
    num_samples: u32,
    pipe_config: PipeConfig,
}

impl SurfaceBuilder {
    pub fn new(format: u32, width: u32, height: u32, tile_mode: TileMode) -> Self {
        SurfaceBuilder {
            format,
            width,
            height,
            depth: 1,
            tile_mode,
            swizzle: SwizzlePattern::default(),
            num_samples: 1,
            pipe_config: PipeConfig::default(),
        }
    }

    /// Only a depth of 1 is currently supported.
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn num_samples(mut self, num_samples: u32) -> Self {
        self.num_samples = num_samples;
        self
    }

    pub fn swizzle(mut self, swizzle: SwizzlePattern) -> Self {
        self.swizzle = swizzle;
        self
    }

    pub fn pipe_config(mut self, pipe_config: PipeConfig) -> Self {
        self.pipe_config = pipe_config;
        self
    }

    /// Calculates the padded dimensions for the surface.
    ///
    /// Returns [SwizzleError::InvalidSurface] if the padded dimensions
    /// or the tiled or linear size in bytes do not fit.
    pub fn build(self) -> Result<SurfaceDescriptor, SwizzleError> {
        let bits_per_pixel = bits_per_pixel(self.format).ok_or(SwizzleError::UnsupportedFormat {
            format: self.format,
        })?;

        if self.depth != 1 {
            return Err(SwizzleError::UnsupportedDepth { depth: self.depth });
        }

        self.pipe_config.validate()?;

        let tile_mode = if self.num_samples > 1 {
            self.tile_mode.to_thin()
        } else {
            self.tile_mode
        };

        // Micro tiled addressing has no sample coordinate.
        let samples_supported = match tile_mode.tile_class() {
            TileClass::MicroTiled => self.num_samples == 1,
            _ => matches!(self.num_samples, 1 | 2 | 4 | 8),
        };
        if !samples_supported {
            return Err(SwizzleError::UnsupportedSampleCount {
                num_samples: self.num_samples,
            });
        }

        let invalid_surface = SwizzleError::InvalidSurface {
            format: self.format,
            width: self.width,
            height: self.height,
        };

        let block_dim = if is_block_compressed(self.format) { 4 } else { 1 };
        let width_in_elements = div_round_up(self.width, block_dim) as u64;
        let height_in_elements = div_round_up(self.height, block_dim) as u64;

        let expansion = expansion_factor(bits_per_pixel);
        let (pitch_alignment, height_alignment) = alignments(
            tile_mode,
            (bits_per_pixel / expansion) as u64,
            self.num_samples as u64,
            &self.pipe_config,
        );

        // Pitches and heights that do not fit in a u32 are rejected below.
        let pitch = round_up(width_in_elements * expansion as u64, pitch_alignment);
        let padded_height = round_up(height_in_elements, height_alignment);

        let surface = SurfaceDescriptor {
            format: self.format,
            bits_per_pixel,
            width: self.width,
            height: self.height,
            depth: self.depth,
            pitch: u32::try_from(pitch).map_err(|_| invalid_surface)?,
            padded_height: u32::try_from(padded_height).map_err(|_| invalid_surface)?,
            tile_mode,
            swizzle: self.swizzle,
            num_samples: self.num_samples,
            pipe_config: self.pipe_config,
        };

        // Both sizes must be addressable on this platform.
        let tiled_size = tiled_size_in_bits(&surface).map(|bits| bits / 8);
        let linear_size = linear_size_in_bytes(&surface);
        match (tiled_size, linear_size) {
            (Some(tiled), Some(linear))
                if usize::try_from(tiled).is_ok() && usize::try_from(linear).is_ok() =>
            {
                Ok(surface)
            }
            _ => Err(invalid_surface),
        }
    }
}

fn tiled_size_in_bits(surface: &SurfaceDescriptor) -> Option<u64> {
    (surface.pitch as u64)
        .checked_mul(surface.padded_height as u64)?
        .checked_mul(surface.tile_mode.thickness() as u64)?
        .checked_mul(surface.tiled_bits_per_element() as u64)?
        .checked_mul(surface.num_samples as u64)
}

fn linear_size_in_bytes(surface: &SurfaceDescriptor) -> Option<u64> {
    (surface.width_in_elements() as u64)
        .checked_mul(surface.height_in_elements() as u64)?
        .checked_mul(surface.depth as u64)?
        .checked_mul(surface.num_samples as u64)?
        .checked_mul(surface.element_size_in_bytes() as u64)
}

fn round_up(x: u64, n: u64) -> u64 {
    (x + n - 1) / n * n
}

// The hardware has no 96-bit tiling.
fn expansion_factor(bits_per_pixel: u32) -> u32 {
    if bits_per_pixel == 96 {
        3
    } else {
        1
    }
}

// The pitch and height alignment in elements.
fn alignments(
    tile_mode: TileMode,
    bits_per_pixel: u64,
    num_samples: u64,
    config: &PipeConfig,
) -> (u64, u64) {
    let interleave = config.pipe_interleave_bytes as u64;
    let thickness = tile_mode.thickness() as u64;

    match tile_mode.tile_class() {
        TileClass::Linear => match tile_mode {
            TileMode::LinearAligned => ((8 * interleave / bits_per_pixel).max(64), 1),
            _ if bits_per_pixel < 8 => (8, 1),
            _ => (1, 1),
        },
        TileClass::MicroTiled => {
            let pitch = (interleave / (bits_per_pixel * thickness * num_samples)).max(8);
            (pitch, 8)
        }
        TileClass::MacroTiled => {
            let aspect_ratio = tile_mode.macro_tile_aspect_ratio() as u64;
            let macro_tile_width = 8 * config.num_banks as u64 / aspect_ratio;
            let macro_tile_height = 8 * config.num_pipes as u64 * aspect_ratio;

            let micro_tile_bytes = 8 * bits_per_pixel * thickness * num_samples;
            let pitch = macro_tile_width * (interleave / micro_tile_bytes).max(1);
            (pitch, macro_tile_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_general_no_padding() {
        let surface = SurfaceDescriptor::new(0x1a, 13, 7, TileMode::LinearGeneral).unwrap();
        assert_eq!(13, surface.pitch);
        assert_eq!(7, surface.padded_height);
        assert_eq!(13 * 7 * 4, surface.surface_size());
        assert_eq!(surface.linear_size(), surface.surface_size());
    }

    #[test]
    fn linear_aligned_pitch() {
        // 8 * 256 / 32 = 64
        let surface = SurfaceDescriptor::new(0x1a, 4, 4, TileMode::LinearAligned).unwrap();
        assert_eq!(64, surface.pitch);
        assert_eq!(4, surface.padded_height);

        // 8 * 256 / 8 = 256
        let surface = SurfaceDescriptor::new(0x01, 4, 4, TileMode::LinearAligned).unwrap();
        assert_eq!(256, surface.pitch);
    }

    #[test]
    fn micro_tiled_padding() {
        let surface = SurfaceDescriptor::new(0x1a, 9, 9, TileMode::Tiled1DThin1).unwrap();
        assert_eq!(16, surface.pitch);
        assert_eq!(16, surface.padded_height);

        // 256 / 8 = 32 pixels per row of micro tiles.
        let surface = SurfaceDescriptor::new(0x01, 9, 9, TileMode::Tiled1DThin1).unwrap();
        assert_eq!(32, surface.pitch);

        let surface = SurfaceDescriptor::new(0x1a, 8, 8, TileMode::Tiled1DThick).unwrap();
        assert_eq!(8 * 8 * 4 * 4, surface.surface_size());
    }

    #[test]
    fn macro_tiled_padding() {
        let surface = SurfaceDescriptor::new(0x1a, 1, 1, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(32, surface.pitch);
        assert_eq!(16, surface.padded_height);

        let surface = SurfaceDescriptor::new(0x1a, 1, 1, TileMode::Tiled2DThin2).unwrap();
        assert_eq!(16, surface.pitch);
        assert_eq!(32, surface.padded_height);

        let surface = SurfaceDescriptor::new(0x1a, 1, 1, TileMode::Tiled2BThin4).unwrap();
        assert_eq!(8, surface.pitch);
        assert_eq!(64, surface.padded_height);

        // The micro tile of 64 bytes is smaller than the pipe interleave.
        let surface = SurfaceDescriptor::new(0x01, 1, 1, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(128, surface.pitch);
    }

    #[test]
    fn block_compressed_elements() {
        let surface = SurfaceDescriptor::new(0x31, 18, 6, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(4, surface.block_dimension());
        assert_eq!(5, surface.width_in_elements());
        assert_eq!(2, surface.height_in_elements());
        assert_eq!(8, surface.element_size_in_bytes());
        assert_eq!(5 * 2 * 8, surface.linear_size());
        assert_eq!(32, surface.pitch);
        assert_eq!(16, surface.padded_height);
        assert_eq!(32 * 16 * 8, surface.surface_size());
    }

    #[test]
    fn expanded_96_bit_format() {
        // GX2_SURFACE_FORMAT_TCS_R32_G32_B32_FLOAT
        let surface = SurfaceDescriptor::new(0x2f, 10, 2, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(12, surface.element_size_in_bytes());
        assert_eq!(30, surface.tiled_width_in_elements());
        assert_eq!(32, surface.pitch);
        assert_eq!(32 * 16 * 4, surface.surface_size());
        assert_eq!(10 * 2 * 12, surface.linear_size());
    }

    #[test]
    fn empty_surface() {
        let surface = SurfaceDescriptor::new(0x1a, 0, 0, TileMode::Tiled2DThin1).unwrap();
        assert_eq!(0, surface.surface_size());
        assert_eq!(0, surface.linear_size());
    }

    #[test]
    fn unsupported_format() {
        assert_eq!(
            Err(SwizzleError::UnsupportedFormat { format: 0x3 }),
            SurfaceDescriptor::new(0x3, 4, 4, TileMode::LinearGeneral)
        );
    }

    #[test]
    fn unsupported_depth() {
        assert_eq!(
            Err(SwizzleError::UnsupportedDepth { depth: 2 }),
            SurfaceBuilder::new(0x1a, 4, 4, TileMode::Tiled2DThin1)
                .depth(2)
                .build()
        );
    }

    #[test]
    fn unsupported_sample_count() {
        assert_eq!(
            Err(SwizzleError::UnsupportedSampleCount { num_samples: 3 }),
            SurfaceBuilder::new(0x1a, 4, 4, TileMode::Tiled2DThin1)
                .num_samples(3)
                .build()
        );
        assert_eq!(
            Err(SwizzleError::UnsupportedSampleCount { num_samples: 2 }),
            SurfaceBuilder::new(0x1a, 4, 4, TileMode::Tiled1DThin1)
                .num_samples(2)
                .build()
        );
    }

    #[test]
    fn invalid_pipe_config() {
        let config = PipeConfig {
            num_pipes: 4,
            ..Default::default()
        };
        assert_eq!(
            Err(SwizzleError::InvalidPipeConfig {
                num_pipes: 4,
                num_banks: 4
            }),
            SurfaceBuilder::new(0x1a, 4, 4, TileMode::Tiled2DThin1)
                .pipe_config(config)
                .build()
        );
    }

    #[test]
    fn surface_potential_overflow_dimensions() {
        let invalid = |format, width, height| SwizzleError::InvalidSurface {
            format,
            width,
            height,
        };

        assert_eq!(
            Err(invalid(0x1a, u32::MAX, 1)),
            SurfaceDescriptor::new(0x1a, u32::MAX, 1, TileMode::LinearAligned)
        );
        assert_eq!(
            Err(invalid(0x1a, 1, u32::MAX)),
            SurfaceDescriptor::new(0x1a, 1, u32::MAX, TileMode::Tiled2DThin1)
        );
        assert_eq!(
            Err(invalid(0x1a, u32::MAX, u32::MAX)),
            SurfaceDescriptor::new(0x1a, u32::MAX, u32::MAX, TileMode::Tiled1DThick)
        );
        // Three 32-bit elements per pixel exceed the maximum pitch.
        assert_eq!(
            Err(invalid(0x2f, 0x6000_0000, 1)),
            SurfaceDescriptor::new(0x2f, 0x6000_0000, 1, TileMode::LinearGeneral)
        );
        assert_eq!(
            Err(invalid(0x22, u32::MAX, u32::MAX)),
            SurfaceBuilder::new(0x22, u32::MAX, u32::MAX, TileMode::LinearGeneral)
                .num_samples(8)
                .build()
        );
    }

    #[test]
    fn surface_potential_overflow_pipe_interleave() {
        let config = PipeConfig {
            pipe_interleave_bytes: 1 << 31,
            ..Default::default()
        };
        let surface = SurfaceBuilder::new(0x01, 1, 1, TileMode::LinearAligned)
            .pipe_config(config)
            .build()
            .unwrap();
        assert_eq!(1 << 31, surface.pitch());

        assert_eq!(
            Err(SwizzleError::InvalidSurface {
                format: 0x01,
                width: 0x8000_0001,
                height: 1
            }),
            SurfaceBuilder::new(0x01, 0x8000_0001, 1, TileMode::LinearAligned)
                .pipe_config(config)
                .build()
        );
    }

    #[test]
    fn large_block_compressed_surface() {
        let surface = SurfaceDescriptor::new(0x31, u32::MAX - 1, 4, TileMode::LinearGeneral);

        #[cfg(target_pointer_width = "64")]
        {
            let surface = surface.unwrap();
            assert_eq!(0x4000_0000, surface.pitch());
            assert_eq!(0x2_0000_0000, surface.surface_size());
            assert_eq!(0x2_0000_0000, surface.linear_size());
        }
        #[cfg(not(target_pointer_width = "64"))]
        assert!(surface.is_err());
    }

    #[test]
    fn descriptor_accessors() {
        let surface = SurfaceBuilder::new(0x31, 18, 6, TileMode::Tiled2DThick)
            .num_samples(2)
            .swizzle(SwizzlePattern::new(6).unwrap())
            .build()
            .unwrap();
        assert_eq!(0x31, surface.format());
        assert_eq!(64, surface.bits_per_pixel());
        assert_eq!(18, surface.width());
        assert_eq!(6, surface.height());
        assert_eq!(1, surface.depth());
        assert_eq!(TileMode::Tiled2DThin1, surface.tile_mode());
        assert_eq!(6, surface.swizzle().value());
        assert_eq!(2, surface.num_samples());
        assert_eq!(PipeConfig::default(), surface.pipe_config());
    }

    #[test]
    fn multisampled_size() {
        let surface = SurfaceBuilder::new(0x1a, 32, 16, TileMode::Tiled2DThin1)
            .num_samples(4)
            .build()
            .unwrap();
        assert_eq!(32 * 16 * 4 * 4, surface.surface_size());
        assert_eq!(32 * 16 * 4 * 4, surface.linear_size());
    }
}
