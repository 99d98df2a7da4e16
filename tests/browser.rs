#![cfg(target_arch = "wasm32")]

// Browser tests for the DOM-backed render targets and input wiring
// (`wasm-pack test --headless --chrome`).

use std::cell::RefCell;
use std::rc::Rc;

use blockfall_web::api::GameApi;
use blockfall_web::board::{CellClass, RenderTarget, create_board, draw_board, draw_preview};
use blockfall_web::config::ElementIds;
use blockfall_web::dom::{DomGrid, DomView};
use blockfall_web::input::InputDispatcher;
use blockfall_web::poll::PollLoop;
use blockfall_web::state::CellValue;
use blockfall_web::view::{GameView, HeadlessView};
use blockfall_web::{Action, BOARD_HEIGHT, BOARD_WIDTH, ClientConfig, ClientError, GameState, PieceView};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement, KeyboardEvent, KeyboardEventInit, window};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    window().unwrap().document().unwrap()
}

fn mount(id: &str) {
    let doc = document();
    if doc.get_element_by_id(id).is_none() {
        let div = doc.create_element("div").unwrap();
        div.set_id(id);
        doc.body().unwrap().append_child(&div).unwrap();
    }
}

#[wasm_bindgen_test]
fn board_grid_builds_cells_with_single_color_class() {
    mount("test-board");
    let mut grid = DomGrid::bind(&document(), "test-board").unwrap();
    create_board(&mut grid).unwrap();
    assert_eq!(grid.len(), BOARD_WIDTH * BOARD_HEIGHT);

    let board = vec![vec![CellValue::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    let piece = PieceView {
        shape: vec![vec![1]],
        color: "blue".into(),
    };
    draw_board(&mut grid, &board, Some(&piece), 4, 0);

    let container = document().get_element_by_id("test-board").unwrap();
    let cells = container.children();
    assert_eq!(cells.length() as usize, BOARD_WIDTH * BOARD_HEIGHT);
    assert_eq!(cells.item(4).unwrap().class_name(), "cell blue");
    assert_eq!(cells.item(5).unwrap().class_name(), "cell empty");
}

#[wasm_bindgen_test]
fn preview_grid_is_rebuilt_each_time() {
    mount("test-preview");
    let mut grid = DomGrid::bind(&document(), "test-preview").unwrap();
    let i = PieceView {
        shape: vec![vec![1, 1, 1, 1]],
        color: "I".into(),
    };
    draw_preview(&mut grid, Some(&i)).unwrap();
    draw_preview(&mut grid, Some(&i)).unwrap();
    let container = document().get_element_by_id("test-preview").unwrap();
    assert_eq!(container.children().length(), 4);
    grid.set_cell(0, &CellClass::Empty);
    assert_eq!(container.children().item(0).unwrap().class_name(), "cell empty");
}

#[wasm_bindgen_test]
fn missing_board_container_is_an_error() {
    let ids = ElementIds {
        board: "no-such-board".into(),
        ..ElementIds::default()
    };
    assert!(DomView::bind(&document(), &ids).is_err());
}

#[wasm_bindgen_test]
fn view_tolerates_missing_optional_elements() {
    mount("only-board");
    let ids = ElementIds {
        board: "only-board".into(),
        score: "absent-score".into(),
        level: "absent-level".into(),
        next_piece: "absent-preview".into(),
        game_over: "absent-game-over".into(),
        ..ElementIds::default()
    };
    let mut view = DomView::bind(&document(), &ids).unwrap();
    assert!(view.preview().is_none());
    view.set_score(10);
    view.set_level(3);
    view.set_game_over(true);
    assert!(view.offer_restart(Box::new(|| {})).is_ok());
}

// --- Input wiring ------------------------------------------------------------

#[derive(Default)]
struct RecordingApi {
    actions: RefCell<Vec<Action>>,
}

impl GameApi for RecordingApi {
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        Ok(GameState {
            board: vec![vec![CellValue::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
            level: 1,
            ..GameState::default()
        })
    }

    async fn send_action(&self, action: Action) -> Result<(), ClientError> {
        self.actions.borrow_mut().push(action);
        Ok(())
    }

    async fn restart(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

type BrowserInput = InputDispatcher<RecordingApi, HeadlessView>;

fn attached_input() -> (Rc<PollLoop<RecordingApi, HeadlessView>>, Rc<BrowserInput>) {
    mount_button("btn-left");
    let poll: Rc<PollLoop<RecordingApi, HeadlessView>> =
        PollLoop::new(RecordingApi::default(), HeadlessView::default(), &ClientConfig::default());
    poll.init().unwrap();
    let input = InputDispatcher::new(poll.clone());
    input.attach(&document(), &ElementIds::default());
    (poll, input)
}

fn mount_button(id: &str) {
    let doc = document();
    if doc.get_element_by_id(id).is_none() {
        let button = doc.create_element("button").unwrap();
        button.set_id(id);
        doc.body().unwrap().append_child(&button).unwrap();
    }
}

fn press(key: &str) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    document().dispatch_event(&event).unwrap();
    event
}

fn click(id: &str) {
    document()
        .get_element_by_id(id)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

/// Lets queued `spawn_local` sends and refreshes run to completion.
async fn settle() {
    TimeoutFuture::new(0).await;
}

#[wasm_bindgen_test]
async fn space_prevents_scroll_and_sends_drop() {
    let (poll, input) = attached_input();

    let event = press(" ");
    assert!(event.default_prevented());
    settle().await;
    assert_eq!(*poll.api().actions.borrow(), vec![Action::Drop]);
    input.detach();
}

#[wasm_bindgen_test]
async fn arrow_keys_send_without_preventing_default() {
    let (poll, input) = attached_input();

    let event = press("ArrowUp");
    assert!(!event.default_prevented());
    settle().await;
    assert_eq!(*poll.api().actions.borrow(), vec![Action::Rotate]);
    input.detach();
}

#[wasm_bindgen_test]
async fn control_button_click_sends_its_action() {
    let (poll, input) = attached_input();
    assert!(input.listener_count() >= 2);

    click("btn-left");
    settle().await;
    assert_eq!(*poll.api().actions.borrow(), vec![Action::Left]);
    input.detach();
}

#[wasm_bindgen_test]
async fn detached_input_neither_prevents_nor_sends() {
    let (poll, input) = attached_input();
    input.detach();
    assert_eq!(input.listener_count(), 0);

    let event = press(" ");
    click("btn-left");
    settle().await;

    assert!(!event.default_prevented());
    assert!(poll.api().actions.borrow().is_empty());
}
