//! WebAssembly bindings for the map engine.
//!
//! This module exposes the engine to JavaScript through wasm-bindgen. The
//! host owns persistence: it reads `serialize()` after changes and hands
//! saved data back through `deserialize()`.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::MapAction;
#[cfg(feature = "wasm")]
use crate::engine::MapEngine;
#[cfg(feature = "wasm")]
use crate::hex::{LogicalCoordinate, PhysicalCoordinate};
#[cfg(feature = "wasm")]
use crate::storage::NullStorage;
#[cfg(feature = "wasm")]
use crate::tile::TileType;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed map wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmMap {
    engine: MapEngine,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmMap {
    /// Create a map for a viewport of the given size
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<WasmMap, JsValue> {
        let mut engine = MapEngine::new(NullStorage);
        engine.set_window_size(PhysicalCoordinate::new(width, height));
        engine
            .reset()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmMap { engine })
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: MapAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.engine.apply_action(action) {
            Ok(events) => {
                Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Placed tiles as JSON
    #[wasm_bindgen(js_name = getTiles)]
    pub fn get_tiles(&self) -> String {
        serde_json::to_string(&self.engine.tiles()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Frontier cells with their match quality as JSON
    #[wasm_bindgen(js_name = getEdges)]
    pub fn get_edges(&self) -> String {
        serde_json::to_string(&self.engine.edges()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = getMarks)]
    pub fn get_marks(&self) -> String {
        serde_json::to_string(&self.engine.marks()).unwrap_or_else(|_| "[]".to_string())
    }

    /// The candidate's six sides as JSON
    #[wasm_bindgen(js_name = getCandidate)]
    pub fn get_candidate(&self) -> String {
        serde_json::to_string(&self.engine.candidate()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self) -> String {
        serde_json::to_string(&self.engine.view()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Screen corners of the visible tiles as JSON, for drawing
    #[wasm_bindgen(js_name = getTileOutlines)]
    pub fn get_tile_outlines(&self) -> String {
        serde_json::to_string(&self.engine.tile_outlines()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Types offered for side-by-side construction, as JSON
    #[wasm_bindgen(js_name = getNormalTypes)]
    pub fn get_normal_types(&self) -> String {
        let types: Vec<TileType> = TileType::normal_types().collect();
        serde_json::to_string(&types).unwrap_or_else(|_| "[]".to_string())
    }

    /// Types offered for filling the remaining sides, as JSON
    #[wasm_bindgen(js_name = getFillTypes)]
    pub fn get_fill_types(&self) -> String {
        let types: Vec<TileType> = TileType::fill_types().collect();
        serde_json::to_string(&types).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = canUndoPlacement)]
    pub fn can_undo_placement(&self) -> bool {
        self.engine.can_undo_placement()
    }

    #[wasm_bindgen(js_name = canUndoTile)]
    pub fn can_undo_tile(&self) -> bool {
        self.engine.can_undo_tile()
    }

    #[wasm_bindgen(js_name = canAddCandidate)]
    pub fn can_add_candidate(&self, x: i32, y: i32) -> bool {
        self.engine
            .can_add_candidate(&LogicalCoordinate::new(x, y))
    }

    /// Cell under a screen position, as `[x, y]`
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64) -> Vec<i32> {
        let cell = self.engine.hit_test(PhysicalCoordinate::new(x, y));
        vec![cell.x, cell.y]
    }

    #[wasm_bindgen]
    pub fn serialize(&self) -> Result<String, JsValue> {
        self.engine
            .serialize()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn deserialize(&mut self, data: &str) -> Result<(), JsValue> {
        self.engine
            .deserialize(data)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
