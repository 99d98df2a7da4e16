//! Blockfall web client.
//!
//! Thin browser front end for a server-authoritative falling-block game: it
//! polls `GET /game_state`, paints the board and next-piece preview into the
//! page, and forwards player input as `POST /action`. Rules, gravity, scoring
//! and piece generation all live on the server.
//!
//! The rendering and loop logic is plain Rust behind small traits
//! ([`board::RenderTarget`], [`view::GameView`], [`api::GameApi`],
//! [`poll::Ticker`]) so it runs on the host under `cargo test`; the DOM and
//! `fetch` implementations are only exercised in the browser.

use wasm_bindgen::prelude::*;

pub mod api;
pub mod board;
pub mod config;
pub mod dom;
pub mod error;
pub mod input;
pub mod poll;
pub mod state;
pub mod view;

mod app;

pub use config::ClientConfig;
pub use error::ClientError;
pub use state::{Action, BOARD_HEIGHT, BOARD_WIDTH, GameState, PieceView};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

/// Starts the client with config from `window.__BLOCKFALL_CONFIG`, or defaults.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::launch(ClientConfig::from_window())?;
    Ok(())
}

/// Starts the client with an explicit JSON config (see [`ClientConfig`]).
#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = ClientConfig::from_json(config_json)?;
    app::launch(config)?;
    Ok(())
}
