// Rendered 8x8 tile images, kept consistent with the palette and tile data.
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use anyhow::{ensure, Result};
use itertools::iproduct;
use log::{debug, error};

use crate::{
    common::{RangeError, TileCoord, PALETTE_COLUMNS, ROW_WIDTH, TILE_SIZE},
    palette::{Palette, PaletteSelection},
    signal::{ListenerId, Signal},
    tiles::{TileData, TilePixels},
};

const BYTES_PER_PIXEL: usize = 2;
const TILE_IMAGE_BYTES: usize = TILE_SIZE * TILE_SIZE * BYTES_PER_PIXEL;

/// One rendered tile: 8x8 RGB555 pixels, little-endian, rows top to bottom.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TileImage(pub [u8; TILE_IMAGE_BYTES]);

impl Default for TileImage {
    fn default() -> Self {
        TileImage([0; TILE_IMAGE_BYTES])
    }
}

impl TileImage {
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 2] {
        let loc = (y * TILE_SIZE + x) * BYTES_PER_PIXEL;
        [self.0[loc], self.0[loc + 1]]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CacheChange {
    Tile(TileCoord, TileCoord),
    All,
}

fn render_tile(pixels: &TilePixels, colors: &[[u8; 2]; PALETTE_COLUMNS]) -> TileImage {
    let mut image = TileImage::default();
    for (iy, ix) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
        let color = colors[pixels[iy][ix] as usize];
        let loc = (iy * TILE_SIZE + ix) * BYTES_PER_PIXEL;
        image.0[loc..loc + BYTES_PER_PIXEL].copy_from_slice(&color);
    }
    image
}

struct Subscriptions {
    tile_changed: ListenerId,
    data_changed: ListenerId,
    palette_changed: ListenerId,
    selection_changed: ListenerId,
}

pub struct TileImageCache {
    palette: Rc<Palette>,
    tile_data: Rc<TileData>,
    // Indexed [x][y]; every column is its own allocation.
    images: RefCell<Vec<Vec<TileImage>>>,
    render_count: Cell<u64>,
    subscriptions: Cell<Option<Subscriptions>>,
    /// Fired once the cache is consistent with the change that triggered it.
    pub changed: Signal<CacheChange>,
}

impl TileImageCache {
    pub fn new(palette: Rc<Palette>, tile_data: Rc<TileData>) -> Rc<Self> {
        let rows = tile_data.rows();
        let images = (0..ROW_WIDTH)
            .map(|_| vec![TileImage::default(); rows])
            .collect();
        let cache = Rc::new(TileImageCache {
            palette,
            tile_data,
            images: RefCell::new(images),
            render_count: Cell::new(0),
            subscriptions: Cell::new(None),
            changed: Signal::new(),
        });
        cache.render_all();
        cache.subscribe();
        cache
    }

    fn subscribe(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let tile_changed = self.tile_data.tile_changed.connect(listener(
            &weak,
            |cache: &TileImageCache, &(x, y): &(TileCoord, TileCoord)| cache.on_tile_changed(x, y),
        ));
        let data_changed = self.tile_data.changed.connect(listener(
            &weak,
            |cache: &TileImageCache, _: &()| cache.refresh_all(),
        ));
        let palette_changed = self.palette.changed.connect(listener(
            &weak,
            |cache: &TileImageCache, _: &()| cache.refresh_all(),
        ));
        let selection_changed = self.palette.selection_changed.connect(listener(
            &weak,
            |cache: &TileImageCache, prev: &PaletteSelection| cache.on_palette_selection(*prev),
        ));
        self.subscriptions.set(Some(Subscriptions {
            tile_changed,
            data_changed,
            palette_changed,
            selection_changed,
        }));
    }

    fn on_tile_changed(&self, x: TileCoord, y: TileCoord) {
        let pixels = match self.tile_data.tile(x, y) {
            Ok(p) => p,
            Err(e) => {
                error!("Unable to refresh tile ({}, {}): {}", x, y, e);
                return;
            }
        };
        let image = render_tile(&pixels, &self.palette.active_colors());
        self.images.borrow_mut()[x][y] = image;
        self.render_count.set(self.render_count.get() + 1);
        self.changed.emit(&CacheChange::Tile(x, y));
    }

    fn on_palette_selection(&self, previous: PaletteSelection) {
        // Only the row feeds into rendering; a column change within the row is a no-op.
        if previous.row != self.palette.active_row() {
            self.refresh_all();
        }
    }

    fn refresh_all(&self) {
        self.render_all();
        self.changed.emit(&CacheChange::All);
    }

    fn render_all(&self) {
        let colors = self.palette.active_colors();
        let mut images = self.images.borrow_mut();
        for (x, column) in images.iter_mut().enumerate() {
            for (y, image) in column.iter_mut().enumerate() {
                match self.tile_data.tile(x, y) {
                    Ok(pixels) => *image = render_tile(&pixels, &colors),
                    Err(e) => error!("Unable to render tile ({}, {}): {}", x, y, e),
                }
            }
        }
        let count = (ROW_WIDTH * self.tile_data.rows()) as u64;
        self.render_count.set(self.render_count.get() + count);
        debug!(
            "Rendered all {} tiles with palette row {}",
            count,
            self.palette.active_row()
        );
    }

    pub fn tile(&self, x: TileCoord, y: TileCoord) -> Result<TileImage> {
        ensure!(x < ROW_WIDTH, RangeError::new("tile x", x, ROW_WIDTH));
        let rows = self.tile_data.rows();
        ensure!(y < rows, RangeError::new("tile y", y, rows));
        Ok(self.images.borrow()[x][y])
    }

    pub fn rows(&self) -> usize {
        self.tile_data.rows()
    }

    /// Total number of tile images rendered since construction.
    pub fn render_count(&self) -> u64 {
        self.render_count.get()
    }

    /// Rendered color of one pixel of the sheet, in render byte order.
    pub fn sheet_pixel(&self, x: usize, y: usize) -> Result<[u8; 2]> {
        let tile = self.tile(x / TILE_SIZE, y / TILE_SIZE)?;
        Ok(tile.pixel(x % TILE_SIZE, y % TILE_SIZE))
    }
}

impl Drop for TileImageCache {
    fn drop(&mut self) {
        if let Some(s) = self.subscriptions.take() {
            self.tile_data.tile_changed.disconnect(s.tile_changed);
            self.tile_data.changed.disconnect(s.data_changed);
            self.palette.changed.disconnect(s.palette_changed);
            self.palette.selection_changed.disconnect(s.selection_changed);
        }
    }
}

fn listener<E: 'static>(
    weak: &Weak<TileImageCache>,
    f: impl Fn(&TileImageCache, &E) + 'static,
) -> impl Fn(&E) + 'static {
    let weak = weak.clone();
    move |event| {
        if let Some(cache) = weak.upgrade() {
            f(cache.as_ref(), event);
        }
    }
}
