// Drag-to-select over the tile sheet. Points are tile grid lines, so a drag from
// (1, 1) to (3, 2) covers the 2x1 block of tiles starting at tile (1, 1).
use crate::{common::ROW_WIDTH, tiles::TileRect};

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        GridPoint { x, y }
    }
}

/// Nearest tile grid line to a cursor position given in view pixels, clamped to the sheet.
pub fn clamped_grid_point(px: f32, py: f32, rows: usize, tile_pixels: f32) -> GridPoint {
    let x = (f32::max(px, 0.0) / tile_pixels).round() as i32;
    let y = (f32::max(py, 0.0) / tile_pixels).round() as i32;
    GridPoint {
        x: x.min(ROW_WIDTH as i32),
        y: y.min(rows as i32),
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
enum DragAction {
    #[default]
    None,
    Selecting,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct SelectionDrag {
    action: DragAction,
    start: GridPoint,
    end: GridPoint,
}

fn span(a: GridPoint, b: GridPoint) -> TileRect {
    TileRect::new(
        a.x.min(b.x),
        a.y.min(b.y),
        (a.x - b.x).abs(),
        (a.y - b.y).abs(),
    )
}

impl SelectionDrag {
    pub fn press(&mut self, p: GridPoint) {
        self.action = DragAction::Selecting;
        self.start = p;
        self.end = p;
    }

    /// Moves the free corner and returns the rect to preview, if a drag is in progress.
    pub fn progress(&mut self, p: GridPoint) -> Option<TileRect> {
        if self.action != DragAction::Selecting {
            return None;
        }
        self.end = p;
        Some(span(self.start, self.end))
    }

    /// Ends the drag. Returns the rect to commit, which is only produced when it has area.
    pub fn release(&mut self, p: GridPoint) -> Option<TileRect> {
        if self.action != DragAction::Selecting {
            return None;
        }
        self.action = DragAction::None;
        self.end = p;
        Some(span(self.start, self.end)).filter(TileRect::is_active)
    }

    pub fn cancel(&mut self) {
        self.action = DragAction::None;
    }

    pub fn is_selecting(&self) -> bool {
        self.action == DragAction::Selecting
    }

    /// Rect currently being dragged out, for drawing the selection outline.
    pub fn preview(&self) -> Option<TileRect> {
        self.is_selecting().then(|| span(self.start, self.end))
    }
}
