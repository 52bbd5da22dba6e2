use std::{cell::RefCell, path::PathBuf, rc::Rc};

use rand::{rngs::StdRng, SeedableRng};
use super_spider::{
    cache::{CacheChange, TileImageCache},
    color::{contract, expand, Color},
    common::{RangeError, ROW_WIDTH},
    message::Message,
    palette::Palette,
    selection::GridPoint,
    state::{EditorConfig, EditorState},
    tiles::{TileData, TileRect},
    update::update,
};

fn models(rows: usize, seed: u64) -> (Rc<Palette>, Rc<TileData>, Rc<TileImageCache>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let palette = Rc::new(Palette::random(&mut rng));
    let tile_data = Rc::new(TileData::new(rows, &mut rng).unwrap());
    let cache = TileImageCache::new(palette.clone(), tile_data.clone());
    (palette, tile_data, cache)
}

fn all_tiles(cache: &TileImageCache) -> Vec<Vec<[u8; 128]>> {
    (0..ROW_WIDTH)
        .map(|x| (0..cache.rows()).map(|y| cache.tile(x, y).unwrap().0).collect())
        .collect()
}

#[test_log::test]
fn red_color_scenario() {
    let (palette, _tile_data, _cache) = models(1, 1);
    let red = contract(255, 0, 0);
    palette.set_color(0, red).unwrap();
    assert_eq!(palette.color(0).unwrap().bytes(), red.bytes());
    assert_eq!(expand(red), [248, 0, 0]);
    palette.select(0, 0).unwrap();
    let [b0, b1] = red.bytes();
    assert_eq!(palette.active_color(0).unwrap(), [b1, b0]);
}

#[test_log::test]
fn pixel_write_scenario() {
    let (palette, tile_data, cache) = models(2, 2);
    let before = all_tiles(&cache);
    let events = Rc::new(RefCell::new(vec![]));
    let e = events.clone();
    cache.changed.connect(move |c| e.borrow_mut().push(*c));

    tile_data.set_pixel(0, 0, 5).unwrap();

    assert_eq!(
        cache.tile(0, 0).unwrap().pixel(0, 0),
        palette.active_color(5).unwrap()
    );
    let after = all_tiles(&cache);
    for x in 0..ROW_WIDTH {
        for y in 0..2 {
            if (x, y) != (0, 0) {
                assert_eq!(before[x][y], after[x][y]);
            }
        }
    }
    assert_eq!(*events.borrow(), vec![CacheChange::Tile(0, 0)]);
}

#[test]
fn palette_row_isolation() {
    let (palette, _tile_data, cache) = models(3, 3);
    for i in 0..16 {
        palette.set_color(i, Color::from_rgb555(i as u16)).unwrap();
        palette.set_color(16 + i, Color::from_rgb555(0x7FFF - i as u16)).unwrap();
    }
    palette.select(0, 2).unwrap();
    let row0 = all_tiles(&cache);
    palette.select(0, 14).unwrap();
    assert_eq!(all_tiles(&cache), row0);

    let count = cache.render_count();
    palette.select(1, 14).unwrap();
    assert_eq!(cache.render_count(), count + 16 * 3);
    let row1 = all_tiles(&cache);
    for x in 0..ROW_WIDTH {
        for y in 0..3 {
            assert_ne!(row0[x][y], row1[x][y]);
        }
    }
}

#[test]
fn pixel_writes_are_cheap() {
    let (_palette, tile_data, cache) = models(32, 4);
    let count = cache.render_count();
    for i in 0..100 {
        tile_data.set_pixel(i, i, (i % 16) as u8).unwrap();
    }
    assert_eq!(cache.render_count(), count + 100);
}

#[test]
fn range_errors_are_typed() {
    let (palette, tile_data, cache) = models(1, 5);
    let errors = [
        palette.set_color(256, Color::BLACK).unwrap_err(),
        palette.select(0, 16).unwrap_err(),
        tile_data.set_pixel(128, 0, 0).unwrap_err(),
        tile_data.pixel(0, 8).unwrap_err(),
        cache.tile(0, 1).unwrap_err(),
    ];
    for e in errors {
        assert!(e.downcast_ref::<RangeError>().is_some(), "{e}");
    }
}

#[test]
fn selection_commit_rule() {
    let config = EditorConfig {
        rows: 8,
        seed: Some(6),
        ..Default::default()
    };
    let mut state = EditorState::new(PathBuf::from("unused.json"), config).unwrap();
    update(&mut state, Message::StartTileSelection(GridPoint::new(2, 2)));
    update(&mut state, Message::EndTileSelection(GridPoint::new(5, 6)));
    assert_eq!(state.tile_data.selection(), TileRect::new(2, 2, 3, 4));
    state.take_redraw();

    for end in [GridPoint::new(2, 2), GridPoint::new(9, 2), GridPoint::new(2, 0)] {
        update(&mut state, Message::StartTileSelection(GridPoint::new(2, 2)));
        update(&mut state, Message::EndTileSelection(end));
        assert_eq!(state.tile_data.selection(), TileRect::new(2, 2, 3, 4));
    }
    assert!(!state.take_redraw().editor);

    let p = state.sheet_grid_point(16.0 * 10.0, 16.0 * 7.0);
    update(&mut state, Message::StartTileSelection(GridPoint::new(8, 5)));
    update(&mut state, Message::EndTileSelection(p));
    assert_eq!(state.tile_data.selection(), TileRect::new(8, 5, 2, 2));
    assert_eq!(state.editor_tiles(), vec![(8, 5), (9, 5), (8, 6), (9, 6)]);
}

#[test]
fn editing_through_messages_keeps_cache_consistent() {
    let config = EditorConfig {
        rows: 2,
        seed: Some(7),
        ..Default::default()
    };
    let mut state = EditorState::new(PathBuf::from("unused.json"), config).unwrap();
    update(&mut state, Message::SelectColor(4, 1));
    update(&mut state, Message::ChangeGreen(31));
    update(&mut state, Message::SetPixel { x: 12, y: 3, value: 1 });
    update(&mut state, Message::Fill(2));
    update(&mut state, Message::SetPixel { x: 127, y: 15, value: 1 });

    let green = state.palette.color(4 * 16 + 1).unwrap().to_render_bytes();
    let other = state.palette.active_color(2).unwrap();
    let tile = state.cache.tile(15, 1).unwrap();
    assert_eq!(tile.pixel(7, 7), green);
    assert_eq!(tile.pixel(0, 0), other);
    assert_eq!(state.cache.sheet_pixel(12, 3).unwrap(), other);
}
