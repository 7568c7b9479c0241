//! Tile modes and surface swizzle patterns.
use crate::SwizzleError;

/// An enumeration of the GX2 tile modes.
///
/// The discriminant matches the `GX2TileMode` value stored in texture files.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TileMode {
    LinearGeneral = 0,
    LinearAligned = 1,
    Tiled1DThin1 = 2,
    Tiled1DThick = 3,
    Tiled2DThin1 = 4,
    Tiled2DThin2 = 5,
    Tiled2DThin4 = 6,
    Tiled2DThick = 7,
    Tiled2BThin1 = 8,
    Tiled2BThin2 = 9,
    Tiled2BThin4 = 10,
    Tiled2BThick = 11,
    Tiled3DThin1 = 12,
    Tiled3DThick = 13,
    Tiled3BThin1 = 14,
    Tiled3BThick = 15,
    LinearSpecial = 16,
}

/// The addressing algorithm used for a [TileMode].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TileClass {
    Linear,
    MicroTiled,
    MacroTiled,
}

impl TileMode {
    /// All tile modes ordered by their discriminant.
    pub const ALL: [TileMode; 17] = [
        TileMode::LinearGeneral,
        TileMode::LinearAligned,
        TileMode::Tiled1DThin1,
        TileMode::Tiled1DThick,
        TileMode::Tiled2DThin1,
        TileMode::Tiled2DThin2,
        TileMode::Tiled2DThin4,
        TileMode::Tiled2DThick,
        TileMode::Tiled2BThin1,
        TileMode::Tiled2BThin2,
        TileMode::Tiled2BThin4,
        TileMode::Tiled2BThick,
        TileMode::Tiled3DThin1,
        TileMode::Tiled3DThick,
        TileMode::Tiled3BThin1,
        TileMode::Tiled3BThick,
        TileMode::LinearSpecial,
    ];

    /// Attempts to construct a tile mode from `value`.
    /// Returns [None] if `value` is not a defined tile mode.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::TileMode;

    assert_eq!(Some(TileMode::Tiled2DThin1), TileMode::new(4));
    assert_eq!(None, TileMode::new(17));
    ```
    */
    pub fn new(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Decodes the tile mode and swizzle pattern packed into a single byte
    /// as `tile_mode | swizzle << 5` like in FLIM image headers.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::{SwizzlePattern, TileMode};

    let (tile_mode, swizzle) = TileMode::from_packed(0x44).unwrap();
    assert_eq!(TileMode::Tiled2DThin1, tile_mode);
    assert_eq!(2, swizzle.value());
    ```
    */
    pub fn from_packed(value: u8) -> Result<(Self, SwizzlePattern), SwizzleError> {
        let tile_mode = TileMode::new((value & 0x1F) as u32).ok_or(SwizzleError::InvalidTileMode {
            value: value as u32,
        })?;
        let swizzle = SwizzlePattern((value >> 5) as u32);
        Ok((tile_mode, swizzle))
    }

    /// Packs the tile mode and swizzle pattern into a single byte.
    /// This is the inverse of [TileMode::from_packed].
    pub fn to_packed(&self, swizzle: SwizzlePattern) -> u8 {
        (*self as u8) | ((swizzle.value() as u8) << 5)
    }

    pub fn tile_class(&self) -> TileClass {
        match self {
            TileMode::LinearGeneral | TileMode::LinearAligned | TileMode::LinearSpecial => {
                TileClass::Linear
            }
            TileMode::Tiled1DThin1 | TileMode::Tiled1DThick => TileClass::MicroTiled,
            _ => TileClass::MacroTiled,
        }
    }

    /// The number of slices stored in each micro tile.
    pub fn thickness(&self) -> u32 {
        match self {
            TileMode::Tiled1DThick
            | TileMode::Tiled2DThick
            | TileMode::Tiled2BThick
            | TileMode::Tiled3DThick
            | TileMode::Tiled3BThick => 4,
            _ => 1,
        }
    }

    pub fn is_thick_macro_tiled(&self) -> bool {
        matches!(
            self,
            TileMode::Tiled2DThick
                | TileMode::Tiled2BThick
                | TileMode::Tiled3DThick
                | TileMode::Tiled3BThick
        )
    }

    /// Returns `true` for the 2B and 3B modes that swap banks for wide surfaces.
    pub fn is_bank_swapped(&self) -> bool {
        matches!(
            self,
            TileMode::Tiled2BThin1
                | TileMode::Tiled2BThin2
                | TileMode::Tiled2BThin4
                | TileMode::Tiled2BThick
                | TileMode::Tiled3BThin1
                | TileMode::Tiled3BThick
        )
    }

    /// The factor that narrows the macro tile width and extends its height.
    pub fn macro_tile_aspect_ratio(&self) -> u32 {
        match self {
            TileMode::Tiled2DThin2 | TileMode::Tiled2BThin2 => 2,
            TileMode::Tiled2DThin4 | TileMode::Tiled2BThin4 => 4,
            _ => 1,
        }
    }

    /// The thin tile mode of the same family.
    /// Multisampled surfaces can't use thick tiling.
    pub fn to_thin(&self) -> Self {
        match self {
            TileMode::Tiled1DThick => TileMode::Tiled1DThin1,
            TileMode::Tiled2DThick => TileMode::Tiled2DThin1,
            TileMode::Tiled2BThick => TileMode::Tiled2BThin1,
            TileMode::Tiled3DThick => TileMode::Tiled3DThin1,
            TileMode::Tiled3BThick => TileMode::Tiled3BThin1,
            other => *other,
        }
    }

    pub(crate) fn is_3d_tiled(&self) -> bool {
        matches!(
            self,
            TileMode::Tiled3DThin1
                | TileMode::Tiled3DThick
                | TileMode::Tiled3BThin1
                | TileMode::Tiled3BThick
        )
    }
}

/// The initial pipe and bank XOR seed for macro tiled surfaces.
///
/// Bit 0 selects the pipe swizzle and bits 1 and 2 select the bank swizzle.
/// This corresponds to bits 8 to 10 of the `swizzle` field of a `GX2Surface`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct SwizzlePattern(u32);

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for SwizzlePattern {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(SwizzlePattern(u.int_in_range(0..=7)?))
    }
}

impl SwizzlePattern {
    /// Attempts to construct a swizzle pattern from a value in the range `0..=7`.
    pub fn new(value: u32) -> Option<Self> {
        if value <= 7 {
            Some(SwizzlePattern(value))
        } else {
            None
        }
    }

    /// Extracts the pattern from a `GX2Surface` swizzle word.
    /// The low byte stores the base mip level and is ignored.
    ///
    /// Returns [SwizzleError::InvalidTileMode] if bits above the pattern are set.
    /// # Examples
    /**
    ```rust
    use gx2_swizzle::SwizzlePattern;

    assert_eq!(5, SwizzlePattern::from_surface_swizzle(0x0000_0500).unwrap().value());
    assert!(SwizzlePattern::from_surface_swizzle(0x0001_0000).is_err());
    ```
    */
    pub fn from_surface_swizzle(swizzle: u32) -> Result<Self, SwizzleError> {
        if swizzle >> 11 != 0 {
            return Err(SwizzleError::InvalidTileMode { value: swizzle });
        }
        Ok(SwizzlePattern((swizzle >> 8) & 7))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn pipe_swizzle(&self) -> u32 {
        self.0 & 1
    }

    pub fn bank_swizzle(&self) -> u32 {
        (self.0 >> 1) & 3
    }
}
