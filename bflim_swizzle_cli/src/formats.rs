use gx2_swizzle::channels::ChannelSelector;

/// The GX2 surface format and channel selector for a FLIM image format.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FlimFormat {
    pub name: &'static str,
    pub gx2_format: u32,
    pub channels: ChannelSelector,
}

const fn flim(name: &'static str, gx2_format: u32, channels: [u8; 4]) -> Option<FlimFormat> {
    Some(FlimFormat {
        name,
        gx2_format,
        channels: selector(channels),
    })
}

const fn selector(channels: [u8; 4]) -> ChannelSelector {
    use gx2_swizzle::channels::Channel;
    const fn channel(value: u8) -> Channel {
        match value {
            0 => Channel::Red,
            1 => Channel::Green,
            2 => Channel::Blue,
            3 => Channel::Alpha,
            4 => Channel::Zero,
            _ => Channel::One,
        }
    }
    ChannelSelector([
        channel(channels[0]),
        channel(channels[1]),
        channel(channels[2]),
        channel(channels[3]),
    ])
}

const RGBA: [u8; 4] = [0, 1, 2, 3];
const RGB: [u8; 4] = [0, 1, 2, 5];

/// Looks up the surface format for the `format` byte of the `imag` block.
/// Returns [None] for formats without a supported GX2 equivalent.
pub fn flim_format(format: u8) -> Option<FlimFormat> {
    match format {
        0x00 => flim("L8_UNORM", 0x01, [0, 0, 0, 5]),
        0x01 => flim("A8_UNORM", 0x01, [5, 5, 5, 0]),
        0x02 => flim("LA4_UNORM", 0x02, [0, 0, 0, 1]),
        0x03 => flim("LA8_UNORM", 0x07, [0, 0, 0, 1]),
        0x04 => flim("HILO8", 0x07, [0, 1, 4, 5]),
        0x05 => flim("RGB565_UNORM", 0x08, RGB),
        0x06 => flim("RGBX8_UNORM", 0x1a, RGB),
        0x07 => flim("RGB5A1_UNORM", 0x0a, RGBA),
        0x08 => flim("RGBA4_UNORM", 0x0b, RGBA),
        0x09 => flim("RGBA8_UNORM", 0x1a, RGBA),
        0x0C => flim("BC1_UNORM", 0x31, RGBA),
        0x0D => flim("BC2_UNORM", 0x32, RGBA),
        0x0E => flim("BC3_UNORM", 0x33, RGBA),
        0x14 => flim("RGBA8_SRGB", 0x41a, RGBA),
        0x15 => flim("BC1_SRGB", 0x431, RGBA),
        0x16 => flim("BC2_SRGB", 0x432, RGBA),
        0x17 => flim("BC3_SRGB", 0x433, RGBA),
        0x18 => flim("RGB10A2_UNORM", 0x19, RGBA),
        _ => None,
    }
}
