#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

use gx2_swizzle::bcn::{decode_image, encode_image, BlockFormat};

#[derive(Debug)]
struct Input {
    width: u32,
    height: u32,
    format: BlockFormat,
    data: Vec<u8>,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            width: u.int_in_range(0..=64)?,
            height: u.int_in_range(0..=64)?,
            format: u.arbitrary()?,
            data: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: Input| {
    // Any block data should decode without panicking.
    if let Ok(rgba) = decode_image(input.width, input.height, &input.data, input.format) {
        let encoded = encode_image(input.width, input.height, &rgba, input.format).unwrap();
        decode_image(input.width, input.height, &encoded, input.format).unwrap();
    }
});
