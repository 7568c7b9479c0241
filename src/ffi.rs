//! Documentation for the C API.
//!
//! For easier integration, none of the FFI methods allocate memory.
//! When tiling or untiling, make sure to allocate
//! the appropriate amount of memory for the destination array
//! by calling [swizzled_surface_size] and [deswizzled_surface_size].
//!
//! Functions that can fail return `false` and leave the destination unchanged
//! or partially written instead of panicking across the FFI boundary.
//! Invalid surface parameters result in a size of 0.
use crate::{
    surface::{SurfaceBuilder, SurfaceDescriptor},
    tilemode::{SwizzlePattern, TileMode},
    PipeConfig, SwizzleError,
};

/// The parameters of a surface for the C API.
///
/// The `tile_mode` and `swizzle` use the values from the `GX2Surface` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SurfaceParams {
    pub format: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub tile_mode: u32,
    pub swizzle: u32,
    pub num_samples: u32,
    pub num_pipes: u32,
    pub num_banks: u32,
}

impl SurfaceParams {
    fn descriptor(&self) -> Result<SurfaceDescriptor, SwizzleError> {
        let tile_mode = TileMode::new(self.tile_mode).ok_or(SwizzleError::InvalidTileMode {
            value: self.tile_mode,
        })?;
        SurfaceBuilder::new(self.format, self.width, self.height, tile_mode)
            .depth(self.depth)
            .num_samples(self.num_samples)
            .swizzle(SwizzlePattern::from_surface_swizzle(self.swizzle)?)
            .pipe_config(PipeConfig::new(self.num_pipes, self.num_banks)?)
            .build()
    }
}

/// See [crate::swizzle_surface].
///
/// # Safety
/// `source` and `source_len` should refer to an array with at least as many bytes as the result of [deswizzled_surface_size].
/// Similarly, `destination` and `destination_len` should refer to an array with at least as many bytes as as the result of [swizzled_surface_size].
#[no_mangle]
pub unsafe extern "C" fn swizzle_surface(
    params: SurfaceParams,
    source: *const u8,
    source_len: usize,
    destination: *mut u8,
    destination_len: usize,
) -> bool {
    let source = core::slice::from_raw_parts(source, source_len);
    let destination = core::slice::from_raw_parts_mut(destination, destination_len);

    swizzle_inner::<false>(params, source, destination).is_ok()
}

/// See [crate::deswizzle_surface].
///
/// # Safety
/// `source` and `source_len` should refer to an array with at least as many bytes as the result of [swizzled_surface_size].
/// Similarly, `destination` and `destination_len` should refer to an array with at least as many bytes as as the result of [deswizzled_surface_size].
#[no_mangle]
pub unsafe extern "C" fn deswizzle_surface(
    params: SurfaceParams,
    source: *const u8,
    source_len: usize,
    destination: *mut u8,
    destination_len: usize,
) -> bool {
    let source = core::slice::from_raw_parts(source, source_len);
    let destination = core::slice::from_raw_parts_mut(destination, destination_len);

    swizzle_inner::<true>(params, source, destination).is_ok()
}

fn swizzle_inner<const DESWIZZLE: bool>(
    params: SurfaceParams,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), SwizzleError> {
    let surface = params.descriptor()?;
    let (source_size, destination_size) = if DESWIZZLE {
        (surface.surface_size(), surface.linear_size())
    } else {
        (surface.linear_size(), surface.surface_size())
    };

    if source.len() < source_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size: source_size,
            actual_size: source.len(),
        });
    }
    if destination.len() < destination_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size: destination_size,
            actual_size: destination.len(),
        });
    }

    crate::swizzle::swizzle_surface_inner::<DESWIZZLE>(
        &surface,
        &source[..source_size],
        &mut destination[..destination_size],
    )
}

/// See [crate::SurfaceDescriptor::surface_size].
#[no_mangle]
pub extern "C" fn swizzled_surface_size(params: SurfaceParams) -> usize {
    params
        .descriptor()
        .map(|surface| surface.surface_size())
        .unwrap_or(0)
}

/// See [crate::SurfaceDescriptor::linear_size].
#[no_mangle]
pub extern "C" fn deswizzled_surface_size(params: SurfaceParams) -> usize {
    params
        .descriptor()
        .map(|surface| surface.linear_size())
        .unwrap_or(0)
}

/// See [crate::address_of].
///
/// Returns `u64::MAX` if the parameters or coordinates are invalid.
#[no_mangle]
pub extern "C" fn surface_address(
    params: SurfaceParams,
    x: u32,
    y: u32,
    slice: u32,
    sample: u32,
) -> u64 {
    params
        .descriptor()
        .and_then(|surface| crate::address_of(&surface, x, y, slice, sample))
        .map(|address| address.byte_offset)
        .unwrap_or(u64::MAX)
}
