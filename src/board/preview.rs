//! Next-piece preview: a small grid rebuilt from scratch on every call.

use super::{CellClass, RenderTarget};
use crate::error::ClientError;
use crate::state::PieceView;

/// Width of the preview grid; wide enough for every tetromino.
pub const PREVIEW_COLUMNS: usize = 4;

pub fn draw_preview(target: &mut dyn RenderTarget, next: Option<&PieceView>) -> Result<(), ClientError> {
    let Some(next) = next else {
        return target.reset(PREVIEW_COLUMNS, 0);
    };
    target.reset(PREVIEW_COLUMNS, next.shape.len() * PREVIEW_COLUMNS)?;
    let color = CellClass::Color(next.color.clone());
    for (r, row) in next.shape.iter().enumerate() {
        for (c, value) in row.iter().take(PREVIEW_COLUMNS).enumerate() {
            if *value != 0 {
                target.set_cell(r * PREVIEW_COLUMNS + c, &color);
            }
        }
    }
    Ok(())
}
