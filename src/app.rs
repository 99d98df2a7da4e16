//! Wires config, DOM, HTTP and the controllers together in the browser.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::config::ClientConfig;
use crate::dom::DomView;
use crate::error::ClientError;
use crate::input::InputDispatcher;
use crate::poll::PollLoop;

// Controllers live for the whole page; listeners and the timer hold weak refs.
#[allow(dead_code)]
struct Client {
    poll: Rc<PollLoop<HttpApi, DomView>>,
    input: Rc<InputDispatcher<HttpApi, DomView>>,
}

thread_local! {
    static CLIENT: RefCell<Option<Client>> = const { RefCell::new(None) };
}

pub(crate) fn launch(config: ClientConfig) -> Result<(), ClientError> {
    if CLIENT.with(|slot| slot.borrow().is_some()) {
        log::warn!("client already running; ignoring repeated start");
        return Ok(());
    }
    let window = web_sys::window().ok_or(ClientError::NoWindow)?;
    let document = window
        .document()
        .ok_or_else(|| ClientError::Dom("no document".into()))?;

    let view = DomView::bind(&document, &config.elements)?;
    let poll: Rc<PollLoop<HttpApi, DomView>> = PollLoop::new(HttpApi::new(&config), view, &config);
    poll.init()?;

    let input = InputDispatcher::new(poll.clone());
    input.attach(&document, &config.elements);
    log::info!(
        "blockfall client started (polling {} every {}ms)",
        config.url(&config.endpoints.game_state),
        config.poll_interval_ms
    );

    {
        let poll = poll.clone();
        spawn_local(async move { poll.start().await });
    }
    CLIENT.with(|slot| *slot.borrow_mut() = Some(Client { poll, input }));
    Ok(())
}
