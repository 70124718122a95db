//! JSON import / export of form templates.
//!
//! Wire format: `{ "templateName": ..., "pages": [{ "id", "title", "components" }] }`.

use crate::config::DragDropConfig;
use crate::error::ImportError;
use crate::model::{FormPage, FormTemplate};
use crate::structure::check_structure;

/// Serialize a template as pretty-printed JSON.
///
/// # Errors
/// Only if serialization itself fails, which plain data never does.
pub fn export_template(template: &FormTemplate) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(template)
}

/// Parse and shape-check a template against the default drag-drop limits.
///
/// # Errors
/// See [`import_template_with`].
pub fn import_template(json: &str) -> Result<FormTemplate, ImportError> {
    import_template_with(json, &DragDropConfig::default())
}

/// Parse and shape-check a template.
///
/// # Errors
/// `MalformedImport` for invalid JSON, a template without pages, or any
/// structural issue (duplicate ids, cycles, children on leaves, horizontal
/// layouts over `config.max_horizontal_children`).
pub fn import_template_with(json: &str, config: &DragDropConfig) -> Result<FormTemplate, ImportError> {
    let template: FormTemplate = serde_json::from_str(json)?;
    ensure_well_formed(&template.pages, config)?;
    Ok(template)
}

/// Reject pages the editor could not safely operate on.
///
/// # Errors
/// `MalformedImport` listing every issue found.
pub fn ensure_well_formed(pages: &[FormPage], config: &DragDropConfig) -> Result<(), ImportError> {
    if pages.is_empty() {
        return Err(ImportError::MalformedImport(
            "template has no pages".to_string(),
        ));
    }

    let issues = check_structure(pages, config.max_horizontal_children);
    if !issues.is_empty() {
        let detail = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ImportError::MalformedImport(detail));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            import_template("{ not json"),
            Err(ImportError::MalformedImport(_))
        ));
    }

    #[test]
    fn rejects_template_without_pages() {
        assert_eq!(
            import_template(r#"{"templateName": "Empty", "pages": []}"#),
            Err(ImportError::MalformedImport("template has no pages".into()))
        );
    }

    #[test]
    fn rejects_unknown_component_type() {
        let json = r#"{
            "templateName": "Bad",
            "pages": [{"id": "p1", "title": "One", "components": [
                {"id": "x", "type": "hologram", "label": "X", "fieldId": "hologram_1"}
            ]}]
        }"#;
        assert!(matches!(import_template(json), Err(ImportError::MalformedImport(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{
            "templateName": "Dup",
            "pages": [{"id": "p1", "title": "One", "components": [
                {"id": "imp_dup", "type": "text_input", "label": "A"},
                {"id": "imp_dup", "type": "text_input", "label": "B"}
            ]}]
        }"#;
        assert_eq!(
            import_template(json),
            Err(ImportError::MalformedImport(
                "component id imp_dup is used more than once".into()
            ))
        );
    }

    fn row_of(children: usize) -> String {
        let checkboxes = (0..children)
            .map(|i| format!(r#"{{"id": "cap_{children}_{i}", "type": "checkbox", "label": "C{i}"}}"#))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"{{"templateName": "Wide", "pages": [{{"id": "p1", "title": "One", "components": [
                {{"id": "cap_row_{children}", "type": "horizontal_layout", "label": "Row", "children": [{checkboxes}]}}
            ]}}]}}"#
        )
    }

    #[test]
    fn rejects_row_over_capacity() {
        assert_eq!(
            import_template(&row_of(6)),
            Err(ImportError::MalformedImport(
                "layout cap_row_6 holds 6 children, more than 4".into()
            ))
        );
        assert!(import_template(&row_of(4)).is_ok());
    }

    #[test]
    fn capacity_follows_config() {
        let narrow = DragDropConfig {
            max_horizontal_children: 2,
            ..Default::default()
        };
        assert!(matches!(
            import_template_with(&row_of(3), &narrow),
            Err(ImportError::MalformedImport(_))
        ));
        assert!(import_template_with(&row_of(2), &narrow).is_ok());
    }
}
