// Module for the indexed pixels of the tile sheet: 16 tiles per row, each 8x8.
use std::cell::{Cell, RefCell};

use anyhow::{bail, ensure, Result};
use log::debug;
use rand::Rng;

use crate::{
    common::{
        ColorIdx, PixelCoord, RangeError, TileCoord, PALETTE_COLUMNS, ROW_WIDTH, ROW_WIDTH_PIXELS,
        TILE_SIZE,
    },
    signal::Signal,
};

pub type TilePixels = [[ColorIdx; TILE_SIZE]; TILE_SIZE];

const PIXELS_PER_ROW: usize = ROW_WIDTH_PIXELS * TILE_SIZE;
// Largest row count whose pixel buffer still fits in one allocation.
const MAX_ROWS: usize = isize::MAX as usize / PIXELS_PER_ROW;

/// A rectangle measured in tiles. A rect with no area means "no selection".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileRect {
    pub const NONE: TileRect = TileRect {
        x: -1,
        y: -1,
        width: -1,
        height: -1,
    };

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        TileRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_active(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn contains(&self, x: TileCoord, y: TileCoord) -> bool {
        let (x, y) = (x as i64, y as i64);
        self.is_active()
            && x >= self.x as i64
            && x < self.x as i64 + self.width as i64
            && y >= self.y as i64
            && y < self.y as i64 + self.height as i64
    }

    /// Tile coordinates covered by the rect, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, TileCoord)> {
        let rect = if self.is_active() && self.x >= 0 && self.y >= 0 {
            *self
        } else {
            TileRect::new(0, 0, 0, 0)
        };
        let right = rect.x as i64 + rect.width as i64;
        let bottom = rect.y as i64 + rect.height as i64;
        let xs = rect.x as usize..right as usize;
        let ys = rect.y as usize..bottom as usize;
        ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
    }
}

impl Default for TileRect {
    fn default() -> Self {
        TileRect::new(0, 0, 2, 2)
    }
}

pub struct TileData {
    pixels: RefCell<Vec<ColorIdx>>,
    rows: usize,
    selection: Cell<TileRect>,
    /// Fired after a single pixel write, with the coordinates of the tile containing it.
    pub tile_changed: Signal<(TileCoord, TileCoord)>,
    /// Fired after a write that may touch every tile.
    pub changed: Signal<()>,
    pub selection_changed: Signal<()>,
}

impl TileData {
    pub fn new(rows: usize, rng: &mut impl Rng) -> Result<Self> {
        let tile_data = TileData::blank(rows)?;
        for p in tile_data.pixels.borrow_mut().iter_mut() {
            *p = rng.random_range(0..PALETTE_COLUMNS as ColorIdx);
        }
        Ok(tile_data)
    }

    pub fn blank(rows: usize) -> Result<Self> {
        ensure!(rows > 0, RangeError::new("tile row count", rows, 1));
        let pixel_count = rows.checked_mul(PIXELS_PER_ROW).filter(|_| rows <= MAX_ROWS);
        let Some(pixel_count) = pixel_count else {
            bail!(RangeError::new("tile row count", rows, MAX_ROWS + 1));
        };
        Ok(TileData {
            pixels: RefCell::new(vec![0; pixel_count]),
            rows,
            selection: Cell::new(TileRect::default()),
            tile_changed: Signal::new(),
            changed: Signal::new(),
            selection_changed: Signal::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn height_pixels(&self) -> usize {
        self.rows * TILE_SIZE
    }

    fn offset(&self, x: PixelCoord, y: PixelCoord) -> Result<usize> {
        ensure!(
            x < ROW_WIDTH_PIXELS,
            RangeError::new("pixel x", x, ROW_WIDTH_PIXELS)
        );
        ensure!(
            y < self.height_pixels(),
            RangeError::new("pixel y", y, self.height_pixels())
        );
        Ok(y * ROW_WIDTH_PIXELS + x)
    }

    fn check_value(value: ColorIdx) -> Result<()> {
        ensure!(
            (value as usize) < PALETTE_COLUMNS,
            RangeError::new("pixel value", value, PALETTE_COLUMNS)
        );
        Ok(())
    }

    pub fn pixel(&self, x: PixelCoord, y: PixelCoord) -> Result<ColorIdx> {
        let offset = self.offset(x, y)?;
        Ok(self.pixels.borrow()[offset])
    }

    pub fn set_pixel(&self, x: PixelCoord, y: PixelCoord, value: ColorIdx) -> Result<()> {
        let offset = self.offset(x, y)?;
        TileData::check_value(value)?;
        self.pixels.borrow_mut()[offset] = value;
        self.tile_changed.emit(&(x / TILE_SIZE, y / TILE_SIZE));
        Ok(())
    }

    pub fn fill(&self, value: ColorIdx) -> Result<()> {
        TileData::check_value(value)?;
        self.pixels.borrow_mut().fill(value);
        debug!("Filled tile data with {}", value);
        self.changed.emit(&());
        Ok(())
    }

    pub fn tile(&self, tile_x: TileCoord, tile_y: TileCoord) -> Result<TilePixels> {
        ensure!(tile_x < ROW_WIDTH, RangeError::new("tile x", tile_x, ROW_WIDTH));
        ensure!(tile_y < self.rows, RangeError::new("tile y", tile_y, self.rows));
        let pixels = self.pixels.borrow();
        let mut out = [[0; TILE_SIZE]; TILE_SIZE];
        for (iy, row) in out.iter_mut().enumerate() {
            let start = (tile_y * TILE_SIZE + iy) * ROW_WIDTH_PIXELS + tile_x * TILE_SIZE;
            row.copy_from_slice(&pixels[start..start + TILE_SIZE]);
        }
        Ok(out)
    }

    pub fn set_selection(&self, rect: TileRect) -> Result<()> {
        if rect.is_active() {
            ensure!(rect.x >= 0, RangeError::new("selection x", rect.x, 0));
            ensure!(rect.y >= 0, RangeError::new("selection y", rect.y, 0));
            let right = rect.x as i64 + rect.width as i64;
            let bottom = rect.y as i64 + rect.height as i64;
            ensure!(
                right <= ROW_WIDTH as i64,
                RangeError::new("selection right edge", right, ROW_WIDTH)
            );
            ensure!(
                bottom <= self.rows as i64,
                RangeError::new("selection bottom edge", bottom, self.rows)
            );
        }
        self.selection.set(rect);
        debug!("Tile selection set to {:?}", rect);
        self.selection_changed.emit(&());
        Ok(())
    }

    pub fn selection(&self) -> TileRect {
        self.selection.get()
    }
}
