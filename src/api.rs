//! HTTP seam to the game server.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::config::{ClientConfig, Endpoints};
use crate::error::ClientError;
use crate::state::{Action, ActionRequest, GameState};

/// Everything the client asks of the server. Implementations must be usable
/// from a single-threaded executor; nothing here is `Send`.
#[allow(async_fn_in_trait)]
pub trait GameApi {
    async fn fetch_state(&self) -> Result<GameState, ClientError>;
    async fn send_action(&self, action: Action) -> Result<(), ClientError>;
    async fn restart(&self) -> Result<(), ClientError>;
}

/// [`GameApi`] over the browser's `fetch`.
#[derive(Clone, Debug)]
pub struct HttpApi {
    game_state_url: String,
    action_url: String,
    restart_url: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Self {
        let Endpoints {
            game_state,
            action,
            restart,
        } = &config.endpoints;
        Self {
            game_state_url: config.url(game_state),
            action_url: config.url(action),
            restart_url: config.url(restart),
        }
    }

    async fn request(&self, method: &str, url: &str, json: Option<String>) -> Result<Response, ClientError> {
        let window = web_sys::window().ok_or(ClientError::NoWindow)?;
        let init = RequestInit::new();
        init.set_method(method);
        if let Some(body) = json {
            let headers = Headers::new().map_err(ClientError::transport)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(ClientError::transport)?;
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));
        }
        let request = Request::new_with_str_and_init(url, &init).map_err(ClientError::transport)?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(ClientError::transport)?;
        let response: Response = value.dyn_into().map_err(ClientError::transport)?;
        if !response.ok() {
            return Err(ClientError::Status {
                endpoint: url.to_string(),
                status: response.status(),
            });
        }
        Ok(response)
    }
}

impl GameApi for HttpApi {
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        let response = self.request("GET", &self.game_state_url, None).await?;
        let text = JsFuture::from(response.text().map_err(ClientError::transport)?)
            .await
            .map_err(ClientError::transport)?;
        let body = text
            .as_string()
            .ok_or_else(|| ClientError::Transport("response body is not text".into()))?;
        Ok(GameState::from_json(&body)?)
    }

    async fn send_action(&self, action: Action) -> Result<(), ClientError> {
        let body = ActionRequest { action }.to_json()?;
        self.request("POST", &self.action_url, Some(body)).await?;
        Ok(())
    }

    async fn restart(&self) -> Result<(), ClientError> {
        self.request("POST", &self.restart_url, None).await?;
        Ok(())
    }
}
