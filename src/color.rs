// Packed 2-byte colors and their conversion to and from 8-bit RGB.
//
// Byte 0: -RRRRRGG
// Byte 1: GGGBBBBB
use crate::common::ColorValue;

pub type ColorRGB = [u8; 3];

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct Color(pub [u8; 2]);

impl Color {
    pub const BLACK: Color = Color([0, 0]);

    pub fn new(byte0: u8, byte1: u8) -> Self {
        Color([byte0, byte1])
    }

    /// Builds a color from 5-bit channel values. Bits above the low five are dropped.
    pub fn from_components(red: ColorValue, green: ColorValue, blue: ColorValue) -> Self {
        Color::from_rgb555(
            ((red as u16 & 0x1F) << 10) | ((green as u16 & 0x1F) << 5) | (blue as u16 & 0x1F),
        )
    }

    pub fn from_rgb555(value: u16) -> Self {
        Color((value & 0x7FFF).to_be_bytes())
    }

    /// The color as a 15-bit `0RRRRRGGGGGBBBBB` value.
    pub fn to_rgb555(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// Bytes in the order a little-endian RGB555 bitmap stores them.
    pub fn to_render_bytes(self) -> [u8; 2] {
        [self.0[1], self.0[0]]
    }

    pub fn bytes(self) -> [u8; 2] {
        self.0
    }

    pub fn red(self) -> ColorValue {
        ((self.to_rgb555() >> 10) & 0x1F) as ColorValue
    }

    pub fn green(self) -> ColorValue {
        ((self.to_rgb555() >> 5) & 0x1F) as ColorValue
    }

    pub fn blue(self) -> ColorValue {
        (self.to_rgb555() & 0x1F) as ColorValue
    }

    pub fn with_red(self, red: ColorValue) -> Self {
        Color::from_components(red, self.green(), self.blue())
    }

    pub fn with_green(self, green: ColorValue) -> Self {
        Color::from_components(self.red(), green, self.blue())
    }

    pub fn with_blue(self, blue: ColorValue) -> Self {
        Color::from_components(self.red(), self.green(), blue)
    }
}

pub fn expand(color: Color) -> ColorRGB {
    let [b0, b1] = color.0;
    [
        (b0 & 0b1111100) << 1,
        ((b1 & 0b11100000) >> 2) | ((b0 & 0b11) << 6),
        (b1 & 0b11111) << 3,
    ]
}

/// Packs 8-bit channels down to a 2-byte color, keeping the top five bits of each.
pub fn contract(r: u8, g: u8, b: u8) -> Color {
    Color([
        ((r >> 1) & 0b1111100) | ((g >> 6) & 0b11),
        ((g << 2) & 0b11100000) | ((b >> 3) & 0b11111),
    ])
}

/// Same as `contract` but with red and blue swapped, for BGR555 consumers.
pub fn contract_for_render(r: u8, g: u8, b: u8) -> Color {
    contract(b, g, r)
}
