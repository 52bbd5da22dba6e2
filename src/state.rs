use anyhow::{Context, Result};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    cell::Cell,
    path::PathBuf,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};

use crate::{
    cache::{CacheChange, TileImageCache},
    common::{TileCoord, TILE_SIZE},
    geometry::{fit_inside, Rect},
    palette::Palette,
    selection::{clamped_grid_point, GridPoint, SelectionDrag},
    tiles::TileData,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub rows: usize,
    pub seed: Option<u64>,
    pub sheet_scale: f32, // View pixels per tile-sheet pixel
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            modified: false,
            rows: 32,
            seed: None,
            sheet_scale: 2.0,
        }
    }
}

/// Which views need repainting since the last `take_redraw`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct RedrawFlags {
    pub palette: bool,
    pub tile_sheet: bool,
    pub editor: bool,
}

impl RedrawFlags {
    fn merge(self, other: RedrawFlags) -> RedrawFlags {
        RedrawFlags {
            palette: self.palette || other.palette,
            tile_sheet: self.tile_sheet || other.tile_sheet,
            editor: self.editor || other.editor,
        }
    }
}

fn flag(redraw: &Rc<Cell<RedrawFlags>>, flags: RedrawFlags) {
    redraw.set(redraw.get().merge(flags));
}

pub struct EditorState {
    pub config_path: PathBuf,
    pub config: EditorConfig,

    // Project data:
    pub palette: Rc<Palette>,
    pub tile_data: Rc<TileData>,
    pub cache: Rc<TileImageCache>,

    // Temporary editor state:
    pub drag: SelectionDrag,
    redraw: Rc<Cell<RedrawFlags>>,
}

impl EditorState {
    pub fn new(config_path: PathBuf, config: EditorConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let palette = Rc::new(Palette::random(&mut rng));
        let tile_data = Rc::new(
            TileData::new(config.rows, &mut rng).context("Unable to create tile data.")?,
        );
        let cache = TileImageCache::new(palette.clone(), tile_data.clone());
        info!(
            "Created {} tile rows ({} tiles)",
            tile_data.rows(),
            cache.render_count()
        );
        let state = EditorState {
            config_path,
            config,
            palette,
            tile_data,
            cache,
            drag: SelectionDrag::default(),
            redraw: Rc::new(Cell::new(RedrawFlags::default())),
        };
        state.connect_views();
        Ok(state)
    }

    fn connect_views(&self) {
        let redraw = self.redraw.clone();
        self.palette.changed.connect(move |_| {
            flag(
                &redraw,
                RedrawFlags {
                    palette: true,
                    ..Default::default()
                },
            )
        });

        let redraw = self.redraw.clone();
        self.palette.selection_changed.connect(move |_| {
            flag(
                &redraw,
                RedrawFlags {
                    palette: true,
                    ..Default::default()
                },
            )
        });

        let redraw = self.redraw.clone();
        let tile_data: Weak<TileData> = Rc::downgrade(&self.tile_data);
        self.cache.changed.connect(move |change| {
            // The editor only shows the selected tiles.
            let editor = match (change, tile_data.upgrade()) {
                (CacheChange::All, _) => true,
                (&CacheChange::Tile(x, y), Some(t)) => t.selection().contains(x, y),
                (CacheChange::Tile(..), None) => false,
            };
            flag(
                &redraw,
                RedrawFlags {
                    tile_sheet: true,
                    editor,
                    ..Default::default()
                },
            )
        });

        let redraw = self.redraw.clone();
        self.tile_data.selection_changed.connect(move |_| {
            flag(
                &redraw,
                RedrawFlags {
                    tile_sheet: true,
                    editor: true,
                    ..Default::default()
                },
            )
        });
    }

    /// Returns the views flagged for repainting and clears the flags.
    pub fn take_redraw(&self) -> RedrawFlags {
        self.redraw.take()
    }

    pub fn redraw_tile_sheet(&self) {
        flag(
            &self.redraw,
            RedrawFlags {
                tile_sheet: true,
                ..Default::default()
            },
        );
    }

    /// Tiles shown in the zoomed editor, row by row.
    pub fn editor_tiles(&self) -> Vec<(TileCoord, TileCoord)> {
        self.tile_data.selection().tiles().collect()
    }

    /// Where the zoomed editor draws the selected tiles within its `bounds`.
    pub fn editor_rect(&self, bounds: Rect) -> Option<Rect> {
        let selection = self.tile_data.selection();
        if !selection.is_active() {
            return None;
        }
        let size = Rect::with_size(
            (selection.width as usize * TILE_SIZE) as f32,
            (selection.height as usize * TILE_SIZE) as f32,
        );
        fit_inside(size, bounds)
    }

    /// Grid line nearest to a cursor position over the tile sheet view.
    pub fn sheet_grid_point(&self, px: f32, py: f32) -> GridPoint {
        clamped_grid_point(
            px,
            py,
            self.tile_data.rows(),
            TILE_SIZE as f32 * self.config.sheet_scale,
        )
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "SuperSpider")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}
