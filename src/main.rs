use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use super_spider::{
    color::expand,
    common::{ColorIdx, PALETTE_ROWS, TILE_SIZE},
    persist,
    state::{get_config_path, EditorState},
};

#[derive(Parser, Debug)]
#[command(about = "Headless driver for the Super Spider tile editor core")]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of 8x8 tile rows, overriding the config
    #[arg(long)]
    rows: Option<usize>,

    /// Seed for the initial random palette and pixels, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Print the rendered bytes of the tile at X,Y
    #[arg(long, value_name = "X,Y")]
    dump_tile: Option<String>,

    /// Print the palette as expanded RGB
    #[arg(long)]
    dump_palette: bool,
}

fn parse_coords(s: &str) -> Result<(usize, usize)> {
    let (x, y) = s.split_once(',').context("expected X,Y")?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn dump_palette(state: &EditorState) -> Result<()> {
    for row in 0..PALETTE_ROWS {
        let colors = state.palette.row_colors(row as ColorIdx)?;
        let line: Vec<String> = colors
            .iter()
            .map(|&c| {
                let [r, g, b] = expand(c);
                format!("{:02X}{:02X}{:02X}", r, g, b)
            })
            .collect();
        let marker = if row as ColorIdx == state.palette.active_row() { '*' } else { ' ' };
        println!("{}{:2}: {}", marker, row, line.join(" "));
    }
    Ok(())
}

fn dump_tile(state: &EditorState, x: usize, y: usize) -> Result<()> {
    let image = state.cache.tile(x, y)?;
    for line in image.bytes().chunks(TILE_SIZE * 2) {
        let words: Vec<String> = line
            .chunks(2)
            .map(|p| format!("{:02X}{:02X}", p[0], p[1]))
            .collect();
        println!("{}", words.join(" "));
    }
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(p) => p,
        None => get_config_path()?,
    };
    let mut config = persist::load_config(&config_path)?;
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    let state = EditorState::new(config_path, config)?;
    info!(
        "Tile sheet: {} rows, palette row {}",
        state.tile_data.rows(),
        state.palette.active_row()
    );

    if args.dump_palette {
        dump_palette(&state)?;
    }
    if let Some(coords) = args.dump_tile {
        let (x, y) = parse_coords(&coords)?;
        dump_tile(&state, x, y)?;
    }
    Ok(())
}
