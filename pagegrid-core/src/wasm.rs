//! WebAssembly bindings for pagegrid-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Events and layouts cross the boundary as JSON.

use wasm_bindgen::prelude::*;

use uuid::Uuid;

use crate::{ContentKind, Editor, EditorConfig, EditorError, InputEvent, Layout, Rect, SectionId};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor for a canvas of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            editor: Editor::new(
                Rect::from_xywh(0.0, 0.0, width, height),
                EditorConfig::default(),
            ),
        }
    }

    /// Create an editor with a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is invalid.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Result<WasmEditor, String> {
        let config = EditorConfig::from_json(config_json).map_err(|e| e.to_string())?;
        let editor = Editor::try_new(Rect::from_xywh(0.0, 0.0, width, height), config)
            .map_err(|e| e.to_string())?;
        Ok(Self { editor })
    }

    /// Resume a layout saved with `getLayoutJson`, using the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the layout cannot be parsed.
    #[wasm_bindgen(js_name = fromLayoutJson)]
    pub fn from_layout_json(layout_json: &str) -> Result<WasmEditor, String> {
        let layout = Layout::from_json(layout_json).map_err(|e| e.to_string())?;
        let editor =
            Editor::from_layout(layout, EditorConfig::default()).map_err(|e| e.to_string())?;
        Ok(Self { editor })
    }

    /// Process an input event serialized as JSON and return the outcome
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed.
    #[wasm_bindgen(js_name = handleEventJson)]
    pub fn handle_event_json(&mut self, json: &str) -> Result<String, String> {
        let event: InputEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let outcome = self.editor.handle(&event);
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }

    /// Get the current layout as JSON.
    #[wasm_bindgen(js_name = getLayoutJson)]
    #[must_use]
    pub fn get_layout_json(&self) -> String {
        self.editor.layout().to_json().unwrap_or_default()
    }

    /// Get the transient interaction state (phase, hover, drop target,
    /// guideline) as JSON.
    #[wasm_bindgen(js_name = getInteractionJson)]
    #[must_use]
    pub fn get_interaction_json(&self) -> String {
        serde_json::json!({
            "phase": self.editor.phase(),
            "canvas_mode": self.editor.canvas_mode(),
            "hovered": self.editor.hovered(),
            "drop_target": self.editor.drop_target(),
            "guideline": self.editor.guideline(),
        })
        .to_string()
    }

    /// Attach a selected media file (object URL) to a section.
    ///
    /// # Errors
    ///
    /// Returns an error string if the section id does not name a section
    /// or the kind cannot be parsed.
    #[wasm_bindgen(js_name = attachMedia)]
    pub fn attach_media(
        &mut self,
        section: &str,
        kind: &str,
        reference: &str,
    ) -> Result<bool, String> {
        let id = Uuid::parse_str(section)
            .map(SectionId::from_uuid)
            .map_err(|_| EditorError::SectionNotFound(section.to_string()).to_string())?;
        self.editor.layout().require(id).map_err(|e| e.to_string())?;
        let kind: ContentKind = serde_json::from_value(serde_json::Value::String(kind.to_string()))
            .map_err(|e| e.to_string())?;
        Ok(self.editor.attach_media(id, kind, reference) != crate::Outcome::Ignored)
    }

    /// Toggle the split tool.
    #[wasm_bindgen(js_name = toggleCanvasMode)]
    pub fn toggle_canvas_mode(&mut self) -> bool {
        self.editor.toggle_canvas_mode();
        self.editor.canvas_mode()
    }

    /// Resize the canvas, keeping content.
    #[wasm_bindgen(js_name = setBounds)]
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.editor.set_bounds(Rect::from_xywh(0.0, 0.0, width, height));
    }

    /// Undo the last edit.
    pub fn undo(&mut self) {
        self.editor.undo();
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) {
        self.editor.redo();
    }

    /// Check if there is anything to undo.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    /// Check if there is anything to redo.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }
}
