use anyhow::{ensure, Result};
use log::{debug, error};

use crate::{
    color::Color,
    common::{ColorValue, RangeError},
    message::Message,
    persist,
    state::EditorState,
    tiles::TileRect,
};

pub fn update(state: &mut EditorState, message: Message) {
    if let Err(e) = try_update(state, &message) {
        error!("Error handling {:?}: {}", message, e);
    }
}

fn change_selected_color(
    state: &EditorState,
    value: ColorValue,
    change: impl Fn(Color, ColorValue) -> Color,
) -> Result<()> {
    ensure!(value <= 31, RangeError::new("color channel", value, 32));
    let index = state.palette.selection().index();
    let color = change(state.palette.color(index)?, value);
    state.palette.set_color(index, color)
}

fn try_update(state: &mut EditorState, message: &Message) -> Result<()> {
    match *message {
        Message::SaveConfig => persist::save_config(state)?,
        Message::SelectColor(row, col) => state.palette.select(row, col)?,
        Message::SetColor { index, color } => state.palette.set_color(index, color)?,
        Message::ChangeRed(c) => change_selected_color(state, c, Color::with_red)?,
        Message::ChangeGreen(c) => change_selected_color(state, c, Color::with_green)?,
        Message::ChangeBlue(c) => change_selected_color(state, c, Color::with_blue)?,
        Message::SetPixel { x, y, value } => state.tile_data.set_pixel(x, y, value)?,
        Message::Fill(value) => state.tile_data.fill(value)?,
        Message::StartTileSelection(p) => {
            state.drag.press(p);
            state.redraw_tile_sheet();
        }
        Message::ProgressTileSelection(p) => {
            if state.drag.progress(p).is_some() {
                state.redraw_tile_sheet();
            }
        }
        Message::EndTileSelection(p) => match state.drag.release(p) {
            Some(rect) => state.tile_data.set_selection(rect)?,
            None => {
                debug!("Tile selection without area discarded.");
                state.redraw_tile_sheet();
            }
        },
        Message::ClearTileSelection => {
            state.drag.cancel();
            state.tile_data.set_selection(TileRect::NONE)?;
        }
    }
    Ok(())
}
