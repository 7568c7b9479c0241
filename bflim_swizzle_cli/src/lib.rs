use anyhow::{anyhow, Context, Result};
use bflim::{Bflim, FlimFooter};
use formats::{flim_format, FlimFormat};
use gx2_swizzle::{
    channels::{from_rgba8, to_rgba8},
    deswizzle_surface, swizzle_surface, SurfaceBuilder, SurfaceDescriptor,
};
use image::RgbaImage;
use std::{
    convert::TryFrom,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub mod bflim;
pub mod formats;

/// Calculates the tiled surface layout described by the `imag` block.
pub fn surface_descriptor(
    footer: &FlimFooter,
    width: u32,
    height: u32,
) -> Result<(SurfaceDescriptor, FlimFormat)> {
    let info = &footer.image;
    let format = flim_format(info.format)
        .ok_or_else(|| anyhow!("Unsupported FLIM image format 0x{:02X}", info.format))?;
    let (tile_mode, swizzle) = info.tile_mode()?;

    let surface = SurfaceBuilder::new(format.gx2_format, width, height, tile_mode)
        .swizzle(swizzle)
        .build()?;
    Ok((surface, format))
}

/// Untiles and decodes the image data to RGBA8.
pub fn decode_bflim(bflim: &Bflim) -> Result<RgbaImage> {
    let width = bflim.footer.image.width as u32;
    let height = bflim.footer.image.height as u32;
    let (surface, format) = surface_descriptor(&bflim.footer, width, height)?;
    debug!(?surface, format = format.name, "Decoding FLIM");

    let linear = if bflim.data.len() < surface.surface_size() {
        // Some files omit padding at the end of the last macro tile.
        warn!(
            "Image data size {} is smaller than the surface size {}",
            bflim.data.len(),
            surface.surface_size()
        );
        let mut data = bflim.data.clone();
        data.resize(surface.surface_size(), 0);
        deswizzle_surface(&surface, &data)?
    } else {
        deswizzle_surface(&surface, &bflim.data)?
    };

    let mut rgba = to_rgba8(format.gx2_format, width, height, &linear)?;
    format.channels.apply(&mut rgba);

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| anyhow!("Decoded data does not match the {}x{} image", width, height))
}

/// Encodes and tiles `image` using the format and tile mode of `template`.
pub fn encode_bflim(template: &Bflim, image: &RgbaImage) -> Result<Bflim> {
    let (width, height) = image.dimensions();
    let flim_width = u16::try_from(width).context("Image width does not fit in a FLIM")?;
    let flim_height = u16::try_from(height).context("Image height does not fit in a FLIM")?;

    let (surface, format) = surface_descriptor(&template.footer, width, height)?;
    debug!(?surface, format = format.name, "Encoding FLIM");

    // Move the displayed channels back to where the format stores them.
    let mut rgba = image.as_raw().clone();
    format.channels.inverse().apply(&mut rgba);

    let linear = from_rgba8(format.gx2_format, width, height, &rgba)?;
    let mut tiled = swizzle_surface(&surface, &linear)?;

    let alignment = template.footer.image.alignment as usize;
    if alignment > 1 {
        let aligned_size = (tiled.len() + alignment - 1) / alignment * alignment;
        tiled.resize(aligned_size, 0);
    }

    Ok(template.with_data(tiled, flim_width, flim_height))
}

pub fn read_bflim<P: AsRef<Path>>(path: P) -> Result<Bflim> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Bflim::from_bytes(&bytes).with_context(|| format!("Failed to parse {:?}", path))
}

/// Converts the FLIM at `input` to a PNG file at `output`.
pub fn extract<P: AsRef<Path>>(input: P, output: P) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let bflim = read_bflim(input)?;
    let image = decode_bflim(&bflim).with_context(|| format!("Failed to decode {:?}", input))?;
    image
        .save(output)
        .with_context(|| format!("Failed to save {:?}", output))?;

    info!("Extracted {:?} to {:?}", input, output);
    Ok(())
}

/// Replaces the image data of the FLIM at `bflim` with the image at `image`.
/// The result is saved to `output`.
pub fn inject<P: AsRef<Path>>(image: P, bflim: P, output: P) -> Result<()> {
    let image_path = image.as_ref();
    let output = output.as_ref();

    let template = read_bflim(bflim)?;
    let image = image::open(image_path)
        .with_context(|| format!("Failed to open {:?}", image_path))?
        .to_rgba8();

    let new_bflim = encode_bflim(&template, &image)
        .with_context(|| format!("Failed to encode {:?}", image_path))?;

    let file = File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    write_bflim(&new_bflim, file).with_context(|| format!("Failed to write {:?}", output))?;

    info!("Injected {:?} into {:?}", image_path, output);
    Ok(())
}

/// Writes the image data and footer and flushes any buffered bytes.
pub fn write_bflim<W: Write>(bflim: &Bflim, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    bflim.write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// A human readable summary of the footer and calculated surface.
pub fn describe(bflim: &Bflim) -> String {
    let info = &bflim.footer.image;
    let mut text = format!(
        "width: {}\nheight: {}\nformat: 0x{:02X}\nalignment: 0x{:X}\nimage size: 0x{:X}\n",
        info.width, info.height, info.format, info.alignment, info.image_size
    );

    match surface_descriptor(&bflim.footer, info.width as u32, info.height as u32) {
        Ok((surface, format)) => {
            text.push_str(&format!("format name: {}\n", format.name));
            text.push_str(&format!("gx2 format: 0x{:X}\n", format.gx2_format));
            text.push_str(&format!("tile mode: {:?}\n", surface.tile_mode()));
            text.push_str(&format!("swizzle: {}\n", surface.swizzle().value()));
            text.push_str(&format!("pitch: {}\n", surface.pitch()));
            text.push_str(&format!("surface size: 0x{:X}\n", surface.surface_size()));
        }
        Err(e) => text.push_str(&format!("surface: {}\n", e)),
    }
    text
}

/// The default output path with the extension replaced by `extension`.
pub fn default_output<P: AsRef<Path>>(input: P, extension: &str) -> PathBuf {
    input.as_ref().with_extension(extension)
}
