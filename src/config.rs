use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::ClientError;
use crate::state::Action;

/// Name of the optional page global holding a JSON-compatible config object.
pub const CONFIG_GLOBAL: &str = "__BLOCKFALL_CONFIG";

/// Runtime configuration of the client. Every field has a default matching the
/// stock page and server, so an empty `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix prepended to every endpoint path; empty means same origin.
    pub base_url: String,
    pub poll_interval_ms: u32,
    /// Send `{"action":"start"}` before the first poll.
    pub send_start_on_load: bool,
    pub endpoints: Endpoints,
    pub elements: ElementIds,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval_ms: 200,
            send_start_on_load: true,
            endpoints: Endpoints::default(),
            elements: ElementIds::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub game_state: String,
    pub action: String,
    pub restart: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            game_state: "/game_state".into(),
            action: "/action".into(),
            restart: "/restart_game".into(),
        }
    }
}

/// DOM element ids the client binds to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub board: String,
    pub score: String,
    pub level: String,
    pub next_piece: String,
    pub game_over: String,
    pub btn_left: String,
    pub btn_right: String,
    pub btn_down: String,
    pub btn_rotate: String,
    pub btn_drop: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            board: "game-board".into(),
            score: "score".into(),
            level: "level".into(),
            next_piece: "next-piece-preview".into(),
            game_over: "game-over-message".into(),
            btn_left: "btn-left".into(),
            btn_right: "btn-right".into(),
            btn_down: "btn-down".into(),
            btn_rotate: "btn-rotate".into(),
            btn_drop: "btn-drop".into(),
        }
    }
}

impl ElementIds {
    /// `(button id, action)` pairs for the optional on-screen controls.
    pub fn buttons(&self) -> [(&str, Action); 5] {
        [
            (self.btn_left.as_str(), Action::Left),
            (self.btn_right.as_str(), Action::Right),
            (self.btn_rotate.as_str(), Action::Rotate),
            (self.btn_down.as_str(), Action::Down),
            (self.btn_drop.as_str(), Action::Drop),
        ]
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `window.__BLOCKFALL_CONFIG`, falling back to defaults when it is
    /// absent or unusable.
    pub fn from_window() -> Self {
        match Self::read_global() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("ignoring {CONFIG_GLOBAL}: {err}");
                Self::default()
            }
        }
    }

    fn read_global() -> Result<Option<Self>, ClientError> {
        let window = web_sys::window().ok_or(ClientError::NoWindow)?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
            .map_err(|e| ClientError::Config(crate::error::describe_js(&e)))?;
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        let json = js_sys::JSON::stringify(&value)
            .map_err(|e| ClientError::Config(crate::error::describe_js(&e)))?;
        Self::from_json(&String::from(json)).map(Some)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.poll_interval_ms == 0 {
            return Err(ClientError::Config("poll_interval_ms must be positive".into()));
        }
        if self.elements.board.is_empty() {
            return Err(ClientError::Config("elements.board must name an element".into()));
        }
        Ok(())
    }

    /// Joins `base_url` and an endpoint path without doubling the slash.
    pub fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
