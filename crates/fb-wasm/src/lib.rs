//! WASM bridge for the form builder: exposes an editing session to a
//! JavaScript UI shell.
//!
//! Compiled via `wasm-pack build --target web`. Every call takes and returns
//! JSON strings; results use the envelope `{"ok":true,...}` or
//! `{"ok":false,"error":"..."}`.

use fb_core::render::RenderMode;
use fb_core::{ComponentType, import_template, validate_template};
use fb_editor::{EditorConfig, EditorSession, FormAction};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

/// One editing session, owned by the UI shell.
#[wasm_bindgen]
pub struct FormBuilder {
    session: EditorSession,
}

#[wasm_bindgen]
impl FormBuilder {
    /// Create a session. `config_json` may be empty for defaults, or a
    /// partial `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            serde_json::from_str(config_json).unwrap_or_else(|e| {
                log::warn!("invalid editor config, using defaults: {e}");
                EditorConfig::default()
            })
        };
        Self {
            session: EditorSession::new(config),
        }
    }

    /// Apply one JSON action.
    pub fn dispatch(&mut self, action_json: &str) -> String {
        match self.session.dispatch_json(action_json) {
            Ok(()) => ok(),
            Err(e) => error(e),
        }
    }

    /// Apply a JSON array of actions as a single undo step.
    pub fn dispatch_batch(&mut self, actions_json: &str) -> String {
        let actions = match FormAction::batch_from_json(actions_json) {
            Ok(actions) => actions,
            Err(e) => return error(e),
        };
        match self.session.dispatch_batch(&actions) {
            Ok(()) => ok(),
            Err(e) => error(e),
        }
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Full editing state: `{"ok":true,"state":{pages,currentPageId,selectedComponentId}}`.
    pub fn state_json(&self) -> String {
        match serde_json::to_value(self.session.state()) {
            Ok(state) => ok_with("state", state),
            Err(e) => error(format!("serialization error: {e}")),
        }
    }

    /// Id of the selected component, or an empty string.
    pub fn selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    pub fn template_name(&self) -> String {
        self.session.template_name().to_string()
    }

    pub fn set_template_name(&mut self, name: &str) {
        self.session.set_template_name(name);
    }

    /// `{"ok":true,"template":{...}}`.
    pub fn export_json(&self) -> String {
        match serde_json::to_value(self.session.template()) {
            Ok(template) => ok_with("template", template),
            Err(e) => error(format!("serialization error: {e}")),
        }
    }

    /// Replace the form with an imported template. The current form is
    /// kept if the import fails.
    pub fn import_json(&mut self, json: &str) -> String {
        match self.session.import_json(json) {
            Ok(()) => ok(),
            Err(e) => error(e),
        }
    }

    /// `{"ok":true,"valid":bool,"errors":[...]}` for the whole form.
    pub fn validate(&self) -> String {
        let report = self.session.validate();
        json!({
            "ok": true,
            "valid": report.is_valid(),
            "errors": report.errors(),
        })
        .to_string()
    }

    /// Plain-text outline of the current page.
    pub fn outline(&self, preview: bool) -> String {
        let mode = if preview {
            RenderMode::Preview
        } else {
            RenderMode::Builder
        };
        self.session.outline(mode)
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("form builder panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no session needed) ───────────────────────────

/// Check a template without loading it.
/// Returns `{"ok":true,"valid":bool,"errors":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_template_json(json: &str) -> String {
    match import_template(json) {
        Ok(template) => {
            let report = validate_template(&template);
            json!({
                "ok": true,
                "valid": report.is_valid(),
                "errors": report.errors(),
            })
            .to_string()
        }
        Err(e) => error(e),
    }
}

/// The component palette: `[{"type","label","container"}]`.
#[wasm_bindgen]
pub fn component_types() -> String {
    let palette: Vec<Value> = ComponentType::ALL
        .iter()
        .map(|kind| {
            json!({
                "type": kind.tag(),
                "label": kind.display_name(),
                "container": kind.is_container(),
            })
        })
        .collect();
    Value::Array(palette).to_string()
}

fn ok() -> String {
    r#"{"ok":true}"#.to_string()
}

fn ok_with(key: &str, value: Value) -> String {
    let mut envelope = serde_json::Map::new();
    envelope.insert("ok".to_string(), Value::Bool(true));
    envelope.insert(key.to_string(), value);
    Value::Object(envelope).to_string()
}

fn error(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}
