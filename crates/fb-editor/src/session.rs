//! Editing session: the one writer over a form.
//!
//! The session owns the authoritative `FormState`, its undo history, and the
//! component factory. The UI shell sends actions in and re-renders from
//! `state()` afterwards.

use crate::actions::FormAction;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::history::History;
use crate::state::{ActionContext, FormState, execute_action};
use fb_core::render::{RenderMode, outline};
use fb_core::{
    ComponentFactory, FormPage, FormTemplate, ImportError, NodeId, ValidationReport, ensure_well_formed,
    export_template, import_template_with, validate_template,
};

pub const DEFAULT_TEMPLATE_NAME: &str = "Untitled Form";

pub struct EditorSession {
    state: FormState,
    history: History,
    factory: ComponentFactory,
    config: EditorConfig,
    template_name: String,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// A session over a single empty page.
    pub fn new(config: EditorConfig) -> Self {
        let mut factory = ComponentFactory::new();
        let page_id = factory.next_id("page");
        Self {
            state: FormState::new(page_id),
            history: History::new(config.history_limit),
            factory,
            config,
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
        }
    }

    /// A session over an existing template.
    ///
    /// # Errors
    /// `MalformedImport` if the template has no pages or a malformed tree.
    pub fn from_template(template: FormTemplate, config: EditorConfig) -> Result<Self, EditorError> {
        ensure_well_formed(&template.pages, &config.drag_drop)?;
        let factory = ComponentFactory::for_pages(&template.pages);
        let state = FormState::with_pages(template.pages).ok_or_else(|| {
            EditorError::Import(ImportError::MalformedImport(
                "template has no pages".to_string(),
            ))
        })?;
        Ok(Self {
            state,
            history: History::new(config.history_limit),
            factory,
            config,
            template_name: template.template_name,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// # Errors
    /// `PageNotFound` if the current page id is dangling.
    pub fn current_page(&self) -> Result<&FormPage, EditorError> {
        self.state.current_page()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.state.selected_component_id
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn set_template_name(&mut self, name: impl Into<String>) {
        self.template_name = name.into();
    }

    /// The exportable form (selection is not part of it).
    pub fn template(&self) -> FormTemplate {
        FormTemplate {
            template_name: self.template_name.clone(),
            pages: self.state.pages.clone(),
        }
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Apply one action. Recorded actions push the prior state for undo.
    ///
    /// # Errors
    /// Whatever the reducer rejects; the session is unchanged in that case.
    pub fn dispatch(&mut self, action: &FormAction) -> Result<(), EditorError> {
        let next = reduce(&mut self.factory, &self.config, &self.state, action)?;
        if action.is_recorded() {
            let prior = std::mem::replace(&mut self.state, next);
            self.history.record(prior);
        } else {
            self.state = next;
        }
        log::debug!("dispatched {}", action.name());
        Ok(())
    }

    /// Parse and apply a JSON action.
    ///
    /// # Errors
    /// `UnknownAction` for an unparseable action, otherwise as `dispatch`.
    pub fn dispatch_json(&mut self, json: &str) -> Result<(), EditorError> {
        let action = FormAction::from_json(json)?;
        self.dispatch(&action)
    }

    /// Apply several actions as one undo step. Either all of them apply or
    /// none do.
    ///
    /// # Errors
    /// The first rejection; earlier actions of the batch are discarded.
    pub fn dispatch_batch(&mut self, actions: &[FormAction]) -> Result<(), EditorError> {
        let mut working = self.state.clone();
        for action in actions {
            working = reduce(&mut self.factory, &self.config, &working, action)?;
        }
        if actions.iter().any(FormAction::is_recorded) {
            let prior = std::mem::replace(&mut self.state, working);
            self.history.record(prior);
        } else {
            self.state = working;
        }
        log::debug!("dispatched batch of {}", actions.len());
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.state) {
            Some(prior) => {
                self.state = prior;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.state) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ─── Import / export ─────────────────────────────────────────────────

    /// # Errors
    /// `Export` if serialization fails.
    pub fn export_json(&self) -> Result<String, EditorError> {
        export_template(&self.template()).map_err(|e| EditorError::Export(e.to_string()))
    }

    /// Replace the whole form with an imported template. On failure the
    /// current form is kept as it was. On success history is cleared.
    ///
    /// # Errors
    /// `MalformedImport` for invalid JSON or a malformed tree.
    pub fn import_json(&mut self, json: &str) -> Result<(), EditorError> {
        let template = import_template_with(json, &self.config.drag_drop).inspect_err(|e| {
            log::error!("import failed, keeping current form: {e}");
        })?;
        self.factory.observe_pages(&template.pages);
        let Some(state) = FormState::with_pages(template.pages) else {
            return Err(ImportError::MalformedImport("template has no pages".to_string()).into());
        };
        self.state = state;
        self.template_name = template.template_name;
        self.history.clear();
        log::info!(
            "imported \"{}\" with {} page(s)",
            self.template_name,
            self.state.pages.len()
        );
        Ok(())
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    pub fn validate(&self) -> ValidationReport {
        validate_template(&self.template())
    }

    /// Text outline of the current page.
    pub fn outline(&self, mode: RenderMode) -> String {
        outline(self.state.current_components(), mode)
    }
}

fn reduce(
    factory: &mut ComponentFactory,
    config: &EditorConfig,
    state: &FormState,
    action: &FormAction,
) -> Result<FormState, EditorError> {
    let mut ctx = ActionContext {
        factory,
        config: &config.drag_drop,
    };
    execute_action(state, action, &mut ctx).inspect_err(|e| {
        log::warn!("{} rejected: {e}", action.name());
    })
}
