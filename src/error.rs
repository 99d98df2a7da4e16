use wasm_bindgen::JsValue;

/// Everything that can go wrong between the page, the DOM and the game server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("no global window (not running in a browser?)")]
    NoWindow,
    #[error("missing or invalid DOM element: {0}")]
    Dom(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("JSON encoding or decoding failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid client config: {0}")]
    Config(String),
}

impl ClientError {
    /// Wraps a rejected promise or thrown JS exception as a transport failure.
    pub fn transport(value: JsValue) -> Self {
        Self::Transport(describe_js(&value))
    }

    pub fn dom(value: JsValue) -> Self {
        Self::Dom(describe_js(&value))
    }
}

impl From<ClientError> for JsValue {
    fn from(err: ClientError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
