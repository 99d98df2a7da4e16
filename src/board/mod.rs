//! Board rendering.
//!
//! Renderers never touch the DOM directly: they write cell classes through a
//! [`RenderTarget`], which the browser build backs with `<div class="cell">`
//! elements (see `crate::dom`) and tests back with a [`CellBuffer`].

use crate::error::ClientError;
use crate::state::{BOARD_HEIGHT, BOARD_WIDTH, CellValue, PieceView};

pub mod preview;

pub use preview::{PREVIEW_COLUMNS, draw_preview};

/// Visual class of a single cell: either empty or exactly one color tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellClass {
    #[default]
    Empty,
    Color(String),
}

impl CellClass {
    pub fn as_str(&self) -> &str {
        match self {
            CellClass::Empty => "empty",
            CellClass::Color(tag) => tag,
        }
    }

    fn from_value(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => CellClass::Empty,
            CellValue::Block(tag) => CellClass::Color(tag.clone()),
        }
    }
}

/// A grid of cells addressed by row-major index.
pub trait RenderTarget {
    /// Clears the target and rebuilds `len` empty cells laid out in `columns` columns.
    fn reset(&mut self, columns: usize, len: usize) -> Result<(), ClientError>;
    /// Number of cells currently in the grid.
    fn len(&self) -> usize;
    /// Replaces the visual class of the cell at `index`. Out-of-range indices are ignored.
    fn set_cell(&mut self, index: usize, class: &CellClass);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory render target; used for headless rendering and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellBuffer {
    pub columns: usize,
    pub cells: Vec<CellClass>,
}

impl CellBuffer {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellClass> {
        self.cells.get(row * self.columns + col)
    }

    /// Indices of every non-empty cell.
    pub fn colored(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != CellClass::Empty)
            .map(|(i, _)| i)
            .collect()
    }
}

impl RenderTarget for CellBuffer {
    fn reset(&mut self, columns: usize, len: usize) -> Result<(), ClientError> {
        self.columns = columns;
        self.cells.clear();
        self.cells.resize(len, CellClass::Empty);
        Ok(())
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn set_cell(&mut self, index: usize, class: &CellClass) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = class.clone();
        }
    }
}

/// Builds the empty `BOARD_WIDTH` x `BOARD_HEIGHT` grid once at startup.
pub fn create_board(target: &mut dyn RenderTarget) -> Result<(), ClientError> {
    target.reset(BOARD_WIDTH, BOARD_WIDTH * BOARD_HEIGHT)
}

/// Rewrites every board cell from `board`, then overlays the falling piece.
///
/// Piece cells that land outside the board are skipped, and the piece wins
/// over any settled block it overlaps. Board entries missing from a short
/// matrix render as empty.
pub fn draw_board(
    target: &mut dyn RenderTarget,
    board: &[Vec<CellValue>],
    piece: Option<&PieceView>,
    piece_x: i32,
    piece_y: i32,
) {
    for r in 0..BOARD_HEIGHT {
        for c in 0..BOARD_WIDTH {
            let class = board
                .get(r)
                .and_then(|row| row.get(c))
                .map(CellClass::from_value)
                .unwrap_or_default();
            target.set_cell(r * BOARD_WIDTH + c, &class);
        }
    }

    let Some(piece) = piece else {
        return;
    };
    let class = CellClass::Color(piece.color.clone());
    for (r_off, c_off) in piece.occupied() {
        if let Some(index) = board_index(piece_y as i64 + r_off as i64, piece_x as i64 + c_off as i64) {
            target.set_cell(index, &class);
        }
    }
}

fn board_index(row: i64, col: i64) -> Option<usize> {
    let in_rows = (0..BOARD_HEIGHT as i64).contains(&row);
    let in_cols = (0..BOARD_WIDTH as i64).contains(&col);
    (in_rows && in_cols).then(|| row as usize * BOARD_WIDTH + col as usize)
}
