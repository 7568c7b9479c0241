#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

extern crate rand;
use rand::{rngs::StdRng, Rng, SeedableRng};

use gx2_swizzle::{SurfaceBuilder, SwizzlePattern, TileMode};

#[derive(Debug)]
struct Input {
    format: u32,
    width: u32,
    height: u32,
    tile_mode: TileMode,
    swizzle: SwizzlePattern,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            format: u.int_in_range(0..=0x3f)?,
            width: u.int_in_range(0..=256)?,
            height: u.int_in_range(0..=256)?,
            tile_mode: u.arbitrary()?,
            swizzle: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: Input| {
    let builder = SurfaceBuilder::new(input.format, input.width, input.height, input.tile_mode)
        .swizzle(input.swizzle);
    let surface = match builder.build() {
        Ok(surface) => surface,
        Err(_) => return,
    };

    let seed = [13u8; 32];
    let mut rng: StdRng = SeedableRng::from_seed(seed);
    let deswizzled: Vec<_> = (0..surface.linear_size())
        .map(|_| rng.gen_range::<u8, _>(0..=255))
        .collect();

    let swizzled = gx2_swizzle::swizzle_surface(&surface, &deswizzled).unwrap();
    let new_deswizzled = gx2_swizzle::deswizzle_surface(&surface, &swizzled).unwrap();

    if deswizzled != new_deswizzled {
        panic!("Swizzle deswizzle is not 1:1");
    }
});
