use std::fmt::Display;

pub type ColorValue = u8; // Color channel value (0-31)
pub type ColorIdx = u8; // Index into a 16-color palette row (0-15)
pub type PaletteIdx = usize; // Flat index into the 256-color palette
pub type PixelCoord = usize; // Pixel coordinate within the whole tile sheet
pub type TileCoord = usize; // Tile coordinate within the tile sheet

pub const TILE_SIZE: usize = 8;
pub const ROW_WIDTH: usize = 16; // Tiles per tile-sheet row
pub const ROW_WIDTH_PIXELS: usize = TILE_SIZE * ROW_WIDTH;

pub const PALETTE_ROWS: usize = 16;
pub const PALETTE_COLUMNS: usize = 16;
pub const PALETTE_SIZE: usize = PALETTE_ROWS * PALETTE_COLUMNS;

/// Raised when an index, coordinate or value falls outside the range a model accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeError {
    pub what: &'static str,
    pub value: i64,
    pub limit: i64,
}

impl RangeError {
    pub fn new(what: &'static str, value: impl TryInto<i64>, limit: impl TryInto<i64>) -> Self {
        RangeError {
            what,
            value: value.try_into().unwrap_or(i64::MAX),
            limit: limit.try_into().unwrap_or(i64::MAX),
        }
    }
}

impl Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} out of range (limit {})",
            self.what, self.value, self.limit
        )
    }
}

impl std::error::Error for RangeError {}
