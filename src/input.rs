//! Keyboard and on-screen button input.
//!
//! Each accepted event becomes exactly one `POST /action`; a successful send is
//! followed by one forced refresh so the move shows up before the next tick.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, KeyboardEvent};

use crate::api::GameApi;
use crate::config::ElementIds;
use crate::poll::{PollLoop, Ticker};
use crate::state::Action;
use crate::view::GameView;

/// Maps a `KeyboardEvent.key` value to a player action.
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        "ArrowLeft" => Some(Action::Left),
        "ArrowRight" => Some(Action::Right),
        "ArrowDown" => Some(Action::Down),
        "ArrowUp" => Some(Action::Rotate),
        " " => Some(Action::Drop),
        _ => None,
    }
}

/// Whether the browser's default handling of the triggering key must be
/// suppressed (space would otherwise scroll the page).
pub fn suppresses_default(action: Action) -> bool {
    action == Action::Drop
}

pub struct InputDispatcher<A, V, T = Interval> {
    this: Weak<Self>,
    poll: Rc<PollLoop<A, V, T>>,
    listeners: RefCell<Vec<EventListener>>,
    enabled: Cell<bool>,
}

impl<A, V, T> InputDispatcher<A, V, T>
where
    A: GameApi + 'static,
    V: GameView + 'static,
    T: Ticker + 'static,
{
    /// Creates a dispatcher that detaches itself when `poll` reports game over.
    pub fn new(poll: Rc<PollLoop<A, V, T>>) -> Rc<Self> {
        let dispatcher = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            poll,
            listeners: RefCell::new(Vec::new()),
            enabled: Cell::new(true),
        });
        let weak = Rc::downgrade(&dispatcher);
        dispatcher.poll.on_game_over(move || {
            if let Some(dispatcher) = weak.upgrade() {
                dispatcher.detach();
            }
        });
        dispatcher
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Number of live DOM subscriptions; zero after `detach`.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// The action a key press should trigger right now, if any. Always `None`
    /// once input is detached or the loop has halted.
    pub fn key_action(&self, key: &str) -> Option<Action> {
        if !self.accepts_input() {
            return None;
        }
        action_for_key(key)
    }

    fn accepts_input(&self) -> bool {
        self.enabled.get() && self.poll.is_live()
    }

    /// Sends `action`, then forces one refresh on success. Returns whether the
    /// server accepted the action.
    pub async fn dispatch(&self, action: Action) -> bool {
        if !self.accepts_input() {
            log::debug!("ignoring {} after input was detached", action.as_str());
            return false;
        }
        match self.poll.api().send_action(action).await {
            Ok(()) => {
                self.poll.refresh().await;
                true
            }
            Err(err) => {
                log::error!("error sending action {}: {err}", action.as_str());
                false
            }
        }
    }

    fn spawn_dispatch(&self, action: Action) {
        if let Some(this) = self.this.upgrade() {
            spawn_local(async move {
                this.dispatch(action).await;
            });
        }
    }

    /// Subscribes to `keydown` on `document` and to clicks on whichever
    /// control buttons exist.
    pub fn attach(&self, document: &Document, ids: &ElementIds) {
        let mut listeners = self.listeners.borrow_mut();

        let this = self.this.clone();
        listeners.push(EventListener::new_with_options(
            document,
            "keydown",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Some(this) = this.upgrade() else {
                    return;
                };
                let Some(action) = this.key_action(&event.key()) else {
                    return;
                };
                if suppresses_default(action) {
                    event.prevent_default();
                }
                this.spawn_dispatch(action);
            },
        ));

        for (id, action) in ids.buttons() {
            let Some(button) = document.get_element_by_id(id) else {
                log::debug!("no #{id} button; skipping {} control", action.as_str());
                continue;
            };
            let this = self.this.clone();
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                if let Some(this) = this.upgrade() {
                    this.spawn_dispatch(action);
                }
            }));
        }
        log::debug!("input attached ({} listeners)", listeners.len());
    }

    /// Drops every subscription and ignores input from now on.
    pub fn detach(&self) {
        self.enabled.set(false);
        let dropped = self.listeners.take();
        log::debug!("input detached ({} listeners)", dropped.len());
    }
}
