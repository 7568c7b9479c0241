#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

use gx2_swizzle::{PipeConfig, SurfaceBuilder, SwizzlePattern, TileMode};

#[derive(Debug)]
struct Input {
    format: u32,
    width: u32,
    height: u32,
    tile_mode: TileMode,
    swizzle: u32,
    num_samples: u32,
    num_pipes: u32,
    num_banks: u32,
    input_size: usize,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            format: u.int_in_range(0..=0x3f)?,
            width: u.int_in_range(0..=1024)?,
            height: u.int_in_range(0..=1024)?,
            tile_mode: u.arbitrary()?,
            swizzle: u.int_in_range(0..=7)?,
            num_samples: u.int_in_range(0..=8)?,
            num_pipes: u.int_in_range(0..=8)?,
            num_banks: u.int_in_range(0..=8)?,
            input_size: u.int_in_range(0..=4194304)?,
        })
    }
}

fuzz_target!(|input: Input| {
    let pipe_config = match PipeConfig::new(input.num_pipes, input.num_banks) {
        Ok(config) => config,
        Err(_) => return,
    };

    let surface = SurfaceBuilder::new(input.format, input.width, input.height, input.tile_mode)
        .num_samples(input.num_samples)
        .swizzle(SwizzlePattern::new(input.swizzle).unwrap())
        .pipe_config(pipe_config)
        .build();

    if let Ok(surface) = surface {
        let swizzled = vec![0u8; input.input_size];

        // This should never panic even if the input size is incorrect.
        let _ = gx2_swizzle::deswizzle_surface(&surface, &swizzled);
    }
});
