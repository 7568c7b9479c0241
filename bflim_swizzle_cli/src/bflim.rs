//! Reading and writing the FLIM container used for Wii U layout images.
//!
//! The tiled image data comes first followed by a fixed size big endian footer.
use binread::{BinRead, BinReaderExt};
use binwrite::BinWrite;
use gx2_swizzle::{SwizzleError, SwizzlePattern, TileMode};
use std::io::{Cursor, Write};

/// The size in bytes of the `FLIM` header and `imag` block at the end of the file.
pub const FOOTER_SIZE: usize = 0x28;

const FLIM_MAGIC: [u8; 4] = *b"FLIM";
const IMAG_MAGIC: [u8; 4] = *b"imag";

#[derive(Debug)]
pub enum FlimError {
    /// The file is too small to contain the footer.
    FileTooSmall { size: usize },
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },
    /// The image size in the footer is larger than the image data.
    InvalidImageSize { image_size: u32, data_size: usize },
    Read(String),
}

impl std::fmt::Display for FlimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlimError::FileTooSmall { size } => write!(
                f,
                "File size {} is smaller than the footer size {}",
                size, FOOTER_SIZE
            ),
            FlimError::InvalidMagic { expected, actual } => write!(
                f,
                "Expected magic {:?} but found {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(actual)
            ),
            FlimError::InvalidImageSize {
                image_size,
                data_size,
            } => write!(
                f,
                "Image size {} exceeds the available data size {}",
                image_size, data_size
            ),
            FlimError::Read(e) => write!(f, "Error reading footer: {}", e),
        }
    }
}

impl std::error::Error for FlimError {}

impl From<binread::Error> for FlimError {
    fn from(e: binread::Error) -> Self {
        FlimError::Read(format!("{:?}", e))
    }
}

#[derive(Debug, BinRead, BinWrite, PartialEq, Eq, Clone)]
#[br(big)]
#[binwrite(big)]
pub struct FlimHeader {
    pub magic: [u8; 4],
    pub bom: u16,
    pub header_size: u16,
    pub version: u32,
    pub file_size: u32,
    pub block_count: u16,
    pub padding: u16,
}

#[derive(Debug, BinRead, BinWrite, PartialEq, Eq, Clone)]
#[br(big)]
#[binwrite(big)]
pub struct ImageInfo {
    pub magic: [u8; 4],
    pub info_size: u32,
    pub width: u16,
    pub height: u16,
    pub alignment: u16,
    pub format: u8,
    /// The tile mode in the low 5 bits and the swizzle pattern in the high 3 bits.
    pub swizzle_tile_mode: u8,
    pub image_size: u32,
}

impl ImageInfo {
    pub fn tile_mode(&self) -> Result<(TileMode, SwizzlePattern), SwizzleError> {
        TileMode::from_packed(self.swizzle_tile_mode)
    }
}

#[derive(Debug, BinRead, BinWrite, PartialEq, Eq, Clone)]
#[br(big)]
#[binwrite(big)]
pub struct FlimFooter {
    pub header: FlimHeader,
    pub image: ImageInfo,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bflim {
    /// The tiled surface data including any padding.
    pub data: Vec<u8>,
    pub footer: FlimFooter,
}

impl Bflim {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlimError> {
        if bytes.len() < FOOTER_SIZE {
            return Err(FlimError::FileTooSmall { size: bytes.len() });
        }

        let (data, footer) = bytes.split_at(bytes.len() - FOOTER_SIZE);
        let footer: FlimFooter = Cursor::new(footer).read_be()?;

        check_magic(FLIM_MAGIC, footer.header.magic)?;
        check_magic(IMAG_MAGIC, footer.image.magic)?;

        if footer.image.image_size as usize > data.len() {
            return Err(FlimError::InvalidImageSize {
                image_size: footer.image.image_size,
                data_size: data.len(),
            });
        }

        Ok(Bflim {
            data: data.to_vec(),
            footer,
        })
    }

    /// Replaces the image data and updates the sizes in the footer.
    pub fn with_data(&self, data: Vec<u8>, width: u16, height: u16) -> Self {
        let mut footer = self.footer.clone();
        footer.image.width = width;
        footer.image.height = height;
        footer.image.image_size = data.len() as u32;
        footer.header.file_size = (data.len() + FOOTER_SIZE) as u32;
        Bflim { data, footer }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        self.footer.write(writer)
    }
}

fn check_magic(expected: [u8; 4], actual: [u8; 4]) -> Result<(), FlimError> {
    if expected == actual {
        Ok(())
    } else {
        Err(FlimError::InvalidMagic { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer() -> FlimFooter {
        FlimFooter {
            header: FlimHeader {
                magic: *b"FLIM",
                bom: 0xFEFF,
                header_size: 0x14,
                version: 0x02020000,
                file_size: 0x428,
                block_count: 1,
                padding: 0,
            },
            image: ImageInfo {
                magic: *b"imag",
                info_size: 0x10,
                width: 16,
                height: 16,
                alignment: 0x200,
                format: 0x09,
                swizzle_tile_mode: 0xA4,
                image_size: 0x400,
            },
        }
    }

    fn write_bytes(bflim: &Bflim) -> Vec<u8> {
        let mut bytes = Vec::new();
        bflim.write(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn footer_layout() {
        let bflim = Bflim {
            data: Vec::new(),
            footer: footer(),
        };
        let bytes = write_bytes(&bflim);
        assert_eq!(FOOTER_SIZE, bytes.len());
        assert_eq!(b"FLIM", &bytes[0..4]);
        assert_eq!(&[0xFEu8, 0xFF, 0x00, 0x14], &bytes[4..8]);
        assert_eq!(b"imag", &bytes[0x14..0x18]);
        assert_eq!(&[0x00u8, 0x10, 0x00, 0x10], &bytes[0x1C..0x20]);
        assert_eq!(&[0x09u8, 0xA4], &bytes[0x22..0x24]);
        assert_eq!(&[0x00u8, 0x00, 0x04, 0x00], &bytes[0x24..0x28]);
    }

    #[test]
    fn read_write_round_trip() {
        let bflim = Bflim {
            data: (0..0x400).map(|i| i as u8).collect(),
            footer: footer(),
        };
        let bytes = write_bytes(&bflim);
        assert_eq!(0x428, bytes.len());
        assert_eq!(bflim, Bflim::from_bytes(&bytes).unwrap());
    }

    #[test]
    fn packed_tile_mode() {
        let (tile_mode, swizzle) = footer().image.tile_mode().unwrap();
        assert_eq!(TileMode::Tiled2DThin1, tile_mode);
        assert_eq!(5, swizzle.value());
    }

    #[test]
    fn with_data_updates_sizes() {
        let bflim = Bflim {
            data: vec![0u8; 0x400],
            footer: footer(),
        };
        let new = bflim.with_data(vec![0u8; 0x800], 32, 16);
        assert_eq!(0x800, new.footer.image.image_size);
        assert_eq!(0x828, new.footer.header.file_size);
        assert_eq!(32, new.footer.image.width);
        assert_eq!(bflim.footer.image.format, new.footer.image.format);
    }

    #[test]
    fn file_too_small() {
        assert!(matches!(
            Bflim::from_bytes(&[0u8; 0x27]),
            Err(FlimError::FileTooSmall { size: 0x27 })
        ));
    }

    #[test]
    fn invalid_magic() {
        let mut bytes = write_bytes(&Bflim {
            data: vec![0u8; 0x400],
            footer: footer(),
        });
        bytes[0x400 + 0x14] = b'x';
        assert!(matches!(
            Bflim::from_bytes(&bytes),
            Err(FlimError::InvalidMagic {
                expected: IMAG_MAGIC,
                ..
            })
        ));
    }

    #[test]
    fn image_size_exceeds_data() {
        let bytes = write_bytes(&Bflim {
            data: vec![0u8; 0x100],
            footer: footer(),
        });
        assert!(matches!(
            Bflim::from_bytes(&bytes),
            Err(FlimError::InvalidImageSize {
                image_size: 0x400,
                data_size: 0x100
            })
        ));
    }
}
