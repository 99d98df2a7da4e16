//! Poll loop: fetches the server snapshot on a fixed cadence and drives the view.
//!
//! Lifecycle: `Initializing -> Polling -> (GameOver | Stopped)`. Both terminal
//! phases drop the timer; only a page reload leaves them.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;

use crate::api::GameApi;
use crate::board::{create_board, draw_board, draw_preview};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::state::{Action, GameState};
use crate::view::GameView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Polling,
    GameOver,
    /// Halted after a failed fetch or an explicit `stop()`.
    Stopped,
}

/// A repeating timer. Dropping the handle cancels it.
pub trait Ticker: Sized {
    fn every(period_ms: u32, tick: Box<dyn FnMut()>) -> Self;
}

impl Ticker for Interval {
    fn every(period_ms: u32, tick: Box<dyn FnMut()>) -> Self {
        Interval::new(period_ms, tick)
    }
}

type Hook = Box<dyn FnOnce()>;

pub struct PollLoop<A, V, T = Interval> {
    this: Weak<Self>,
    api: A,
    view: RefCell<V>,
    phase: Cell<Phase>,
    timer: RefCell<Option<T>>,
    period_ms: u32,
    send_start: bool,
    game_over_hooks: RefCell<Vec<Hook>>,
}

impl<A, V, T> PollLoop<A, V, T>
where
    A: GameApi + 'static,
    V: GameView + 'static,
    T: Ticker + 'static,
{
    pub fn new(api: A, view: V, config: &ClientConfig) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            api,
            view: RefCell::new(view),
            phase: Cell::new(Phase::Initializing),
            timer: RefCell::new(None),
            period_ms: config.poll_interval_ms,
            send_start: config.send_start_on_load,
            game_over_hooks: RefCell::new(Vec::new()),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// True until the loop reaches a terminal phase.
    pub fn is_live(&self) -> bool {
        matches!(self.phase.get(), Phase::Initializing | Phase::Polling)
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.borrow().is_some()
    }

    /// Read access to the view, for headless embedders and inspection.
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.view.borrow())
    }

    /// Registers a callback run once when the server reports game over.
    pub fn on_game_over(&self, hook: impl FnOnce() + 'static) {
        self.game_over_hooks.borrow_mut().push(Box::new(hook));
    }

    /// Builds the empty board grid.
    pub fn init(&self) -> Result<(), ClientError> {
        create_board(self.view.borrow_mut().board())
    }

    /// Announces the session, renders the first snapshot and starts the timer.
    pub async fn start(&self) {
        if self.phase.get() != Phase::Initializing {
            log::warn!("poll loop already started ({:?})", self.phase.get());
            return;
        }
        if self.send_start {
            match self.api.send_action(Action::Start).await {
                Ok(()) => {}
                Err(err @ ClientError::Status { .. }) => {
                    log::warn!("start action rejected, polling anyway: {err}");
                }
                Err(err) => {
                    log::error!("error sending start action: {err}");
                    self.halt(Phase::Stopped);
                    return;
                }
            }
        }
        if !self.is_live() {
            return;
        }
        self.phase.set(Phase::Polling);
        self.refresh().await;
        self.start_timer();
    }

    /// Schedules a refresh every `poll_interval_ms`. No-op once halted or
    /// when a timer is already running.
    pub fn start_timer(&self) {
        if !self.is_live() || self.is_ticking() {
            return;
        }
        let this = self.this.clone();
        let timer = T::every(
            self.period_ms,
            Box::new(move || {
                if let Some(this) = this.upgrade() {
                    spawn_local(async move { this.refresh().await });
                }
            }),
        );
        *self.timer.borrow_mut() = Some(timer);
        log::debug!("polling every {}ms", self.period_ms);
    }

    pub fn stop(&self) {
        if self.is_live() {
            self.halt(Phase::Stopped);
        }
    }

    /// One fetch-and-render cycle. Used by the timer and for forced refreshes.
    pub async fn refresh(&self) {
        if !self.is_live() {
            return;
        }
        let fetched = self.api.fetch_state().await;
        if !self.is_live() {
            log::debug!("discarding snapshot that arrived after the loop halted");
            return;
        }
        let state = match fetched {
            Ok(state) => state,
            Err(err) => {
                log::error!("error fetching game state: {err}");
                self.halt(Phase::Stopped);
                return;
            }
        };
        if let Err(err) = self.render(&state) {
            log::error!("error rendering game state: {err}");
            self.halt(Phase::Stopped);
            return;
        }
        if state.game_over {
            self.enter_game_over();
        }
    }

    /// Asks the server for a new game, then reloads the page.
    pub async fn restart(&self) {
        match self.api.restart().await {
            Ok(()) => {}
            Err(err @ ClientError::Status { .. }) => log::warn!("restart request rejected: {err}"),
            Err(err) => {
                log::error!("error requesting restart: {err}");
                return;
            }
        }
        if let Err(err) = self.view.borrow().reload() {
            log::error!("reload failed: {err}");
        }
    }

    fn render(&self, state: &GameState) -> Result<(), ClientError> {
        if !state.has_expected_dimensions() {
            log::warn!(
                "board is {} rows, expected {}x{}; rendering the overlap",
                state.board.len(),
                crate::state::BOARD_WIDTH,
                crate::state::BOARD_HEIGHT
            );
        }
        let mut view = self.view.borrow_mut();
        draw_board(
            view.board(),
            &state.board,
            state.current_piece.as_ref(),
            state.piece_x,
            state.piece_y,
        );
        view.set_score(state.score);
        view.set_level(state.level);
        if let Some(preview) = view.preview() {
            draw_preview(preview, state.next_piece.as_ref())?;
        }
        view.set_game_over(state.game_over);
        Ok(())
    }

    fn enter_game_over(&self) {
        log::info!("game over");
        self.halt(Phase::GameOver);
        for hook in self.game_over_hooks.take() {
            hook();
        }
        let this = self.this.clone();
        let offered = self.view.borrow_mut().offer_restart(Box::new(move || {
            if let Some(this) = this.upgrade() {
                spawn_local(async move { this.restart().await });
            }
        }));
        if let Err(err) = offered {
            log::warn!("could not show restart control: {err}");
        }
    }

    fn halt(&self, phase: Phase) {
        self.phase.set(phase);
        if self.timer.borrow_mut().take().is_some() {
            log::debug!("poll timer cleared ({phase:?})");
        }
    }
}
