//! Wire types exchanged with the game server.
//!
//! The client never owns an authoritative copy of any of this: every poll tick
//! decodes a fresh [`GameState`] and the renderers re-derive everything from it.

use serde::{Deserialize, Serialize};

/// Board width in cells; fixed for the whole session.
pub const BOARD_WIDTH: usize = 10;
/// Board height in cells; fixed for the whole session.
pub const BOARD_HEIGHT: usize = 20;

/// One entry of the serialized board matrix.
///
/// The server writes the integer `0` for free cells and the color tag of the
/// piece that settled there (e.g. `"T"`) for occupied ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCell")]
pub enum CellValue {
    #[default]
    Empty,
    Block(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(i64),
    Tag(String),
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Number(0) => CellValue::Empty,
            RawCell::Number(n) => CellValue::Block(n.to_string()),
            RawCell::Tag(tag) => CellValue::Block(tag),
        }
    }
}

impl CellValue {
    pub fn tag(&self) -> Option<&str> {
        match self {
            CellValue::Empty => None,
            CellValue::Block(tag) => Some(tag),
        }
    }
}

/// A piece as the server describes it: an occupancy matrix plus a color tag.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PieceView {
    pub shape: Vec<Vec<i32>>,
    pub color: String,
}

impl PieceView {
    /// Offsets `(row, col)` of every occupied shape cell.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(c, _)| (r, c))
        })
    }
}

/// Snapshot returned by `GET /game_state`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GameState {
    pub board: Vec<Vec<CellValue>>,
    #[serde(default)]
    pub current_piece: Option<PieceView>,
    #[serde(default)]
    pub piece_x: i32,
    #[serde(default)]
    pub piece_y: i32,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub next_piece: Option<PieceView>,
    #[serde(default)]
    pub game_over: bool,
}

impl GameState {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// True when the board matrix is exactly `BOARD_HEIGHT` rows of `BOARD_WIDTH`.
    pub fn has_expected_dimensions(&self) -> bool {
        self.board.len() == BOARD_HEIGHT && self.board.iter().all(|row| row.len() == BOARD_WIDTH)
    }
}

/// The fixed action vocabulary accepted by `POST /action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Down,
    Rotate,
    Drop,
    Start,
}

impl Action {
    /// Actions a player can trigger; `Start` is only sent by the client at load.
    pub const PLAYER: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Rotate,
        Action::Drop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Rotate => "rotate",
            Action::Drop => "drop",
            Action::Start => "start",
        }
    }
}

/// Body of `POST /action`.
#[derive(Debug, Serialize)]
pub struct ActionRequest {
    pub action: Action,
}

impl ActionRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_snapshot() {
        let mut rows = vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT - 1]
            .into_iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect::<Vec<_>>();
        rows.push(serde_json::json!([0, 0, "T", "T", "T", 0, 0, 0, 0, 0]));
        let body = serde_json::json!({
            "board": rows,
            "current_piece": { "shape": [[1, 1, 1, 1]], "color": "I" },
            "piece_x": 3,
            "piece_y": 0,
            "score": 120,
            "level": 1,
            "next_piece": { "shape": [[1, 1], [1, 1]], "color": "O" },
            "game_over": false
        })
        .to_string();

        let state = GameState::from_json(&body).unwrap();
        assert!(state.has_expected_dimensions());
        assert_eq!(state.board[BOARD_HEIGHT - 1][2], CellValue::Block("T".into()));
        assert_eq!(state.board[0][0], CellValue::Empty);
        assert_eq!(state.current_piece.as_ref().unwrap().color, "I");
        assert_eq!(state.piece_x, 3);
        assert_eq!(state.score, 120);
        assert_eq!(state.next_piece.unwrap().occupied().count(), 4);
    }

    #[test]
    fn null_pieces_decode_as_none() {
        let body = r#"{"board":[],"current_piece":null,"piece_x":0,"piece_y":0,
            "score":0,"level":1,"next_piece":null,"game_over":true}"#;
        let state = GameState::from_json(body).unwrap();
        assert!(state.current_piece.is_none());
        assert!(state.next_piece.is_none());
        assert!(state.game_over);
        assert!(!state.has_expected_dimensions());
    }

    #[test]
    fn nonzero_numeric_cell_is_a_tag() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[0, 3, "Z"]"#).unwrap();
        assert_eq!(cells[0].tag(), None);
        assert_eq!(cells[1].tag(), Some("3"));
        assert_eq!(cells[2].tag(), Some("Z"));
    }

    #[test]
    fn occupied_skips_zero_cells() {
        let piece = PieceView {
            shape: vec![vec![0, 1, 0], vec![1, 1, 1]],
            color: "T".into(),
        };
        let cells: Vec<_> = piece.occupied().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn action_body_uses_lowercase_names() {
        let body = ActionRequest { action: Action::Rotate }.to_json().unwrap();
        assert_eq!(body, r#"{"action":"rotate"}"#);
        for action in Action::PLAYER {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }
}
