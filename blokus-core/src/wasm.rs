//! WASM bindings for blokus-core
//!
//! Provides a JavaScript-friendly API over a board with the standard pieces.
//! Players are numbered 1-4 on the JS side.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::{standard, Board, PieceId, Player, Pos, VariantId};

/// WASM-friendly wrapper around Board
#[wasm_bindgen]
pub struct WasmGame {
    inner: Board,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create an empty `size` x `size` board with the standard pieces
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize) -> Result<WasmGame, JsError> {
        let catalog = standard::catalog(size, size)?;
        Ok(WasmGame {
            inner: Board::new(Arc::new(catalog)),
        })
    }

    pub fn width(&self) -> u8 {
        self.inner.width()
    }

    pub fn height(&self) -> u8 {
        self.inner.height()
    }

    /// Get legal moves as JSON array
    /// Each move is { piece, variant, x, y, cells: [[x, y], ...] }
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, player: u8) -> Result<JsValue, JsValue> {
        let Some(player) = js_player(player) else {
            return Ok(JsValue::NULL);
        };
        let moves: Vec<WasmMove> = self
            .inner
            .moves(player)
            .map(|mov| WasmMove {
                piece: mov.variant.piece.0,
                variant: mov.variant.index,
                x: mov.at.x,
                y: mov.at.y,
                cells: self
                    .inner
                    .footprint(mov.variant, mov.at)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| [c.x, c.y])
                    .collect(),
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// True if the player can still place a piece
    #[wasm_bindgen(js_name = hasMoves)]
    pub fn has_moves(&self, player: u8) -> bool {
        js_player(player).is_some_and(|p| self.inner.has_moves(p))
    }

    /// Apply a move. Returns true if successful.
    pub fn place(&mut self, player: u8, piece: u16, variant: u8, x: u8, y: u8) -> bool {
        let Some(player) = js_player(player) else {
            return false;
        };
        let id = VariantId {
            piece: PieceId(piece),
            index: variant,
        };
        self.inner.place(player, id, Pos::new(x, y)).is_ok()
    }

    /// Board as text, one line per row
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    /// Full board state as a JS object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}

fn js_player(player: u8) -> Option<Player> {
    Player::from_index((player as usize).checked_sub(1)?)
}

/// Serializable move for JavaScript
#[derive(serde::Serialize)]
struct WasmMove {
    piece: u16,
    variant: u8,
    x: u8,
    y: u8,
    cells: Vec<[u8; 2]>,
}
