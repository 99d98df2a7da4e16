//! Browser-backed render targets and view.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::board::{CellClass, RenderTarget};
use crate::config::ElementIds;
use crate::error::ClientError;
use crate::view::GameView;

const RESTART_LABEL: &str = "Play Again";

/// A CSS grid container whose children are `<div class="cell ...">` elements.
pub struct DomGrid {
    document: Document,
    container: HtmlElement,
    cells: Vec<Element>,
}

impl DomGrid {
    pub fn bind(document: &Document, id: &str) -> Result<Self, ClientError> {
        let container = find_html(document, id)?.ok_or_else(|| ClientError::Dom(format!("#{id} not found")))?;
        Ok(Self {
            document: document.clone(),
            container,
            cells: Vec::new(),
        })
    }
}

impl RenderTarget for DomGrid {
    fn reset(&mut self, columns: usize, len: usize) -> Result<(), ClientError> {
        self.container.set_inner_html("");
        self.cells.clear();
        self.container
            .style()
            .set_property("grid-template-columns", &format!("repeat({columns}, 1fr)"))
            .map_err(ClientError::dom)?;
        for _ in 0..len {
            let cell = self.document.create_element("div").map_err(ClientError::dom)?;
            cell.set_class_name("cell empty");
            self.container.append_child(&cell).map_err(ClientError::dom)?;
            self.cells.push(cell);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn set_cell(&mut self, index: usize, class: &CellClass) {
        if let Some(cell) = self.cells.get(index) {
            cell.set_class_name(&format!("cell {}", class.as_str()));
        }
    }
}

/// The page's game elements. Only the board container is mandatory.
pub struct DomView {
    document: Document,
    board: DomGrid,
    preview: Option<DomGrid>,
    score: Option<Element>,
    level: Option<Element>,
    game_over: Option<HtmlElement>,
    restart_listener: Option<EventListener>,
}

impl DomView {
    pub fn bind(document: &Document, ids: &ElementIds) -> Result<Self, ClientError> {
        let board = DomGrid::bind(document, &ids.board)?;
        let preview = match find_html(document, &ids.next_piece)? {
            Some(_) => Some(DomGrid::bind(document, &ids.next_piece)?),
            None => None,
        };
        let view = Self {
            document: document.clone(),
            board,
            preview,
            score: document.get_element_by_id(&ids.score),
            level: document.get_element_by_id(&ids.level),
            game_over: find_html(document, &ids.game_over)?,
            restart_listener: None,
        };
        for (id, present) in [
            (&ids.next_piece, view.preview.is_some()),
            (&ids.score, view.score.is_some()),
            (&ids.level, view.level.is_some()),
            (&ids.game_over, view.game_over.is_some()),
        ] {
            if !present {
                log::warn!("#{id} not found; that display is disabled");
            }
        }
        Ok(view)
    }
}

impl GameView for DomView {
    fn board(&mut self) -> &mut dyn RenderTarget {
        &mut self.board
    }

    fn preview(&mut self) -> Option<&mut dyn RenderTarget> {
        self.preview.as_mut().map(|p| p as &mut dyn RenderTarget)
    }

    fn set_score(&mut self, score: u64) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn set_level(&mut self, level: u32) {
        if let Some(el) = &self.level {
            el.set_text_content(Some(&level.to_string()));
        }
    }

    fn set_game_over(&mut self, visible: bool) {
        if let Some(el) = &self.game_over {
            el.style()
                .set_property("display", if visible { "block" } else { "none" })
                .ok();
        }
    }

    fn offer_restart(&mut self, on_restart: Box<dyn Fn()>) -> Result<(), ClientError> {
        let Some(container) = &self.game_over else {
            log::warn!("no game-over container; restart control not shown");
            return Ok(());
        };
        let button = self.document.create_element("button").map_err(ClientError::dom)?;
        button.set_text_content(Some(RESTART_LABEL));
        container.append_child(&button).map_err(ClientError::dom)?;
        self.restart_listener = Some(EventListener::new(&button, "click", move |_event: &Event| on_restart()));
        Ok(())
    }

    fn reload(&self) -> Result<(), ClientError> {
        let window = web_sys::window().ok_or(ClientError::NoWindow)?;
        window.location().reload().map_err(ClientError::dom)
    }
}

fn find_html(document: &Document, id: &str) -> Result<Option<HtmlElement>, ClientError> {
    document
        .get_element_by_id(id)
        .map(|el| {
            el.dyn_into::<HtmlElement>()
                .map_err(|_| ClientError::Dom(format!("#{id} is not an HTML element")))
        })
        .transpose()
}
