// The 256-color palette: 16 rows of 16 colors, one selected cell.
use std::cell::{Cell, RefCell};

use anyhow::{ensure, Result};
use log::debug;
use rand::Rng;

use crate::{
    color::Color,
    common::{ColorIdx, PaletteIdx, RangeError, PALETTE_COLUMNS, PALETTE_ROWS, PALETTE_SIZE},
    signal::Signal,
};

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct PaletteSelection {
    pub row: ColorIdx,
    pub col: ColorIdx,
}

impl PaletteSelection {
    pub fn index(self) -> PaletteIdx {
        self.row as usize * PALETTE_COLUMNS + self.col as usize
    }
}

pub struct Palette {
    colors: RefCell<[Color; PALETTE_SIZE]>,
    selection: Cell<PaletteSelection>,
    /// Fired after any color changes.
    pub changed: Signal<()>,
    /// Fired after `select`, carrying the selection it replaced.
    pub selection_changed: Signal<PaletteSelection>,
}

impl Palette {
    pub fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Palette {
            colors: RefCell::new(colors),
            selection: Cell::new(PaletteSelection::default()),
            changed: Signal::new(),
            selection_changed: Signal::new(),
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let mut colors = [Color::BLACK; PALETTE_SIZE];
        for c in colors.iter_mut() {
            *c = Color::from_rgb555(rng.random::<u16>());
        }
        Palette::new(colors)
    }

    fn check_index(index: PaletteIdx) -> Result<()> {
        ensure!(
            index < PALETTE_SIZE,
            RangeError::new("palette index", index, PALETTE_SIZE)
        );
        Ok(())
    }

    pub fn set_color(&self, index: PaletteIdx, value: Color) -> Result<()> {
        Palette::check_index(index)?;
        self.colors.borrow_mut()[index] = value;
        debug!("Palette color {} set to {:04X}", index, value.to_rgb555());
        self.changed.emit(&());
        Ok(())
    }

    pub fn color(&self, index: PaletteIdx) -> Result<Color> {
        Palette::check_index(index)?;
        Ok(self.colors.borrow()[index])
    }

    pub fn select(&self, row: ColorIdx, col: ColorIdx) -> Result<()> {
        ensure!(
            (row as usize) < PALETTE_ROWS,
            RangeError::new("palette row", row, PALETTE_ROWS)
        );
        ensure!(
            (col as usize) < PALETTE_COLUMNS,
            RangeError::new("palette column", col, PALETTE_COLUMNS)
        );
        let previous = self.selection.replace(PaletteSelection { row, col });
        self.selection_changed.emit(&previous);
        Ok(())
    }

    pub fn selection(&self) -> PaletteSelection {
        self.selection.get()
    }

    /// The row colors are currently rendered with. The selected column plays no part in rendering.
    pub fn active_row(&self) -> ColorIdx {
        self.selection.get().row
    }

    pub fn selected_color(&self) -> Color {
        self.colors.borrow()[self.selection.get().index()]
    }

    /// Color `index` of the active row, in render byte order (see `Color::to_render_bytes`).
    pub fn active_color(&self, index: ColorIdx) -> Result<[u8; 2]> {
        ensure!(
            (index as usize) < PALETTE_COLUMNS,
            RangeError::new("color index", index, PALETTE_COLUMNS)
        );
        let base = self.active_row() as usize * PALETTE_COLUMNS;
        Ok(self.colors.borrow()[base + index as usize].to_render_bytes())
    }

    /// All 16 colors of the active row, in render byte order.
    pub fn active_colors(&self) -> [[u8; 2]; PALETTE_COLUMNS] {
        let base = self.active_row() as usize * PALETTE_COLUMNS;
        let colors = self.colors.borrow();
        let mut out = [[0; 2]; PALETTE_COLUMNS];
        for (i, c) in out.iter_mut().enumerate() {
            *c = colors[base + i].to_render_bytes();
        }
        out
    }

    pub fn row_colors(&self, row: ColorIdx) -> Result<[Color; PALETTE_COLUMNS]> {
        ensure!(
            (row as usize) < PALETTE_ROWS,
            RangeError::new("palette row", row, PALETTE_ROWS)
        );
        let base = row as usize * PALETTE_COLUMNS;
        let mut out = [Color::BLACK; PALETTE_COLUMNS];
        out.copy_from_slice(&self.colors.borrow()[base..base + PALETTE_COLUMNS]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::color::contract;

    #[test_log::test]
    fn set_color_then_color_returns_same_bytes() {
        let palette = Palette::random(&mut StdRng::seed_from_u64(1));
        let red = contract(255, 0, 0);
        palette.set_color(0, red).unwrap();
        assert_eq!(palette.color(0).unwrap(), red);
        palette.select(0, 0).unwrap();
        assert_eq!(palette.active_color(0).unwrap(), [0x00, 0x7C]);
    }

    #[test]
    fn random_colors_are_15_bit() {
        let palette = Palette::random(&mut StdRng::seed_from_u64(9));
        for i in 0..PALETTE_SIZE {
            assert_eq!(palette.color(i).unwrap().bytes()[0] & 0x80, 0);
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let palette = Palette::new([Color::BLACK; PALETTE_SIZE]);
        let err = palette.set_color(256, Color::BLACK).unwrap_err();
        assert!(err.downcast_ref::<RangeError>().is_some());
        assert!(palette.color(256).is_err());
        assert!(palette.select(16, 0).is_err());
        assert!(palette.select(0, 16).is_err());
        assert!(palette.active_color(16).is_err());
        assert_eq!(palette.selection(), PaletteSelection::default());
    }

    #[test]
    fn active_color_uses_selected_row_only() {
        let palette = Palette::new([Color::BLACK; PALETTE_SIZE]);
        palette.set_color(3 * 16 + 5, Color::new(0x12, 0x34)).unwrap();
        palette.select(3, 0).unwrap();
        assert_eq!(palette.active_color(5).unwrap(), [0x34, 0x12]);
        palette.select(3, 15).unwrap();
        assert_eq!(palette.active_color(5).unwrap(), [0x34, 0x12]);
        assert_eq!(palette.active_colors()[5], [0x34, 0x12]);
        assert_eq!(palette.row_colors(3).unwrap()[5], Color::new(0x12, 0x34));
    }

    #[test]
    fn select_reports_previous_selection() {
        let palette = Palette::new([Color::BLACK; PALETTE_SIZE]);
        let seen = Rc::new(RefCell::new(vec![]));
        let s = seen.clone();
        palette
            .selection_changed
            .connect(move |prev| s.borrow_mut().push(*prev));
        palette.select(2, 3).unwrap();
        palette.select(4, 5).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                PaletteSelection { row: 0, col: 0 },
                PaletteSelection { row: 2, col: 3 }
            ]
        );
        assert_eq!(palette.selection().index(), 4 * 16 + 5);
    }

    #[test]
    fn set_color_notifies() {
        let palette = Palette::new([Color::BLACK; PALETTE_SIZE]);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        palette.changed.connect(move |_| c.set(c.get() + 1));
        palette.set_color(10, Color::new(1, 2)).unwrap();
        assert!(palette.set_color(300, Color::new(1, 2)).is_err());
        assert_eq!(count.get(), 1);
    }
}
