//! WASM bindings for gridduel-core
//!
//! Lets a browser client run the same rules locally, e.g. to grey out moves
//! the server would refuse.

use wasm_bindgen::prelude::*;

use crate::wire::{LegalMoveModel, StateModel};
use crate::{Direction, DirectionPolicy, GameState, PieceId, Ruleset};

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
    rules: Ruleset,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game. `restrictDirections` enables the per-kind direction sets.
    #[wasm_bindgen(constructor)]
    pub fn new(restrict_directions: bool) -> WasmGame {
        let directions = if restrict_directions {
            DirectionPolicy::ByKind
        } else {
            DirectionPolicy::Unrestricted
        };
        WasmGame {
            inner: GameState::new(),
            rules: Ruleset::new(directions),
        }
    }

    /// Current player ("A" or "B")
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> String {
        self.inner.current_player().to_string()
    }

    /// Winner ("A" or "B"), or undefined while the game is running
    pub fn winner(&self) -> Option<String> {
        self.inner.winner().map(|p| p.to_string())
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Full state in the server's JSON shape
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&StateModel::from(&self.inner))?)
    }

    /// Legal moves as [{ piece: "A-P1", direction: "F" }, ...]
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves: Vec<LegalMoveModel> = self
            .rules
            .legal_moves(&self.inner)
            .into_iter()
            .map(LegalMoveModel::from)
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// Apply a move such as ("A-H1", "F"). Throws with the rejection reason.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, piece: &str, direction: &str) -> Result<JsValue, JsValue> {
        let piece: PieceId = piece
            .parse()
            .map_err(|e: crate::WireError| JsValue::from_str(&e.to_string()))?;
        let direction: Direction = direction
            .parse()
            .map_err(|e: crate::WireError| JsValue::from_str(&e.to_string()))?;

        let snapshot = self
            .rules
            .apply_move(&mut self.inner, piece, direction)
            .map_err(|e| JsValue::from_str(e.reason()))?;
        Ok(serde_wasm_bindgen::to_value(&StateModel::from(&snapshot))?)
    }

    pub fn reset(&mut self) {
        self.inner = crate::reset();
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new(false)
    }
}
