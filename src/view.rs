//! Display surface driven by the poll loop.

use crate::board::{CellBuffer, RenderTarget};
use crate::error::ClientError;

/// Everything the poll loop needs to show a snapshot. The browser build
/// implements this over the page's elements (`crate::dom::DomView`).
pub trait GameView {
    fn board(&mut self) -> &mut dyn RenderTarget;
    /// `None` when the page has no preview container.
    fn preview(&mut self) -> Option<&mut dyn RenderTarget>;
    fn set_score(&mut self, score: u64);
    fn set_level(&mut self, level: u32);
    fn set_game_over(&mut self, visible: bool);
    /// Presents a "play again" control that invokes `on_restart` when activated.
    fn offer_restart(&mut self, on_restart: Box<dyn Fn()>) -> Result<(), ClientError>;
    /// Reloads the client from scratch.
    fn reload(&self) -> Result<(), ClientError>;
}

/// A [`GameView`] that keeps everything in memory, for running the client
/// without a page (headless embedders, host-side tests).
#[derive(Default)]
pub struct HeadlessView {
    pub board: CellBuffer,
    pub preview: CellBuffer,
    pub score: u64,
    pub level: u32,
    pub game_over_visible: bool,
    pub restart: Option<Box<dyn Fn()>>,
    pub reloads: std::cell::Cell<u32>,
}

impl GameView for HeadlessView {
    fn board(&mut self) -> &mut dyn RenderTarget {
        &mut self.board
    }

    fn preview(&mut self) -> Option<&mut dyn RenderTarget> {
        Some(&mut self.preview)
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    fn set_game_over(&mut self, visible: bool) {
        self.game_over_visible = visible;
    }

    fn offer_restart(&mut self, on_restart: Box<dyn Fn()>) -> Result<(), ClientError> {
        self.restart = Some(on_restart);
        Ok(())
    }

    fn reload(&self) -> Result<(), ClientError> {
        self.reloads.set(self.reloads.get() + 1);
        Ok(())
    }
}
