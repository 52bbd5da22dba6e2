use crate::{
    color::Color,
    common::{ColorIdx, ColorValue, PaletteIdx, PixelCoord},
    selection::GridPoint,
};

#[derive(Debug, Clone)]
pub enum Message {
    SaveConfig,
    SelectColor(ColorIdx, ColorIdx),
    SetColor { index: PaletteIdx, color: Color },
    ChangeRed(ColorValue),
    ChangeGreen(ColorValue),
    ChangeBlue(ColorValue),
    SetPixel {
        x: PixelCoord,
        y: PixelCoord,
        value: ColorIdx,
    },
    Fill(ColorIdx),
    StartTileSelection(GridPoint),
    ProgressTileSelection(GridPoint),
    EndTileSelection(GridPoint),
    ClearTileSelection,
}
