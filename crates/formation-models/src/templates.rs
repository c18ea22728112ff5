//! Document templates and `{{placeholder}}` rendering.
//!
//! Rendering is a naive string substitution: `{{key}}` tokens are replaced by
//! the provided values, occurrences are counted, and anything left between
//! braces is reported as unresolved. No escaping, no nesting, no grammar.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A reusable document template.
///
/// At most one template per (document type, global flag) pair carries
/// `is_default = true`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentTemplate {
    pub id: Uuid,
    pub name: String,
    pub document_type_id: Option<Uuid>,
    pub content: String,
    #[schema(value_type = Object)]
    pub default_metadata: Value,
    pub is_default: bool,
    pub is_global: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for a duplicate of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCopy {
    pub name: String,
    pub document_type_id: Option<Uuid>,
    pub content: String,
    pub default_metadata: Value,
    pub is_global: bool,
    pub is_default: bool,
}

impl DocumentTemplate {
    /// Values for a copy of this template: a "(copie)" name suffix, the same
    /// content and scope, and `is_default` off regardless of the source.
    #[must_use]
    pub fn copy_fields(&self) -> TemplateCopy {
        TemplateCopy {
            name: format!("{} (copie)", self.name),
            document_type_id: self.document_type_id,
            content: self.content.clone(),
            default_metadata: self.default_metadata.clone(),
            is_global: self.is_global,
            is_default: false,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateDto {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub document_type_id: Option<Uuid>,
    pub content: String,
    #[schema(value_type = Object)]
    pub default_metadata: Option<Value>,
    #[serde(default)]
    pub is_global: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTemplateDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub content: Option<String>,
    #[schema(value_type = Object)]
    pub default_metadata: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderTemplateDto {
    pub values: HashMap<String, String>,
}

/// Result of rendering a template against a set of values.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct RenderedTemplate {
    pub content: String,
    /// Total number of `{{key}}` occurrences replaced.
    pub replaced: usize,
    /// Placeholder names present in the template but absent from the values.
    pub unresolved: Vec<String>,
}

/// Replaces every `{{key}}` occurrence with its value.
#[must_use]
pub fn render_placeholders(
    template: &str,
    values: &HashMap<String, String>,
) -> RenderedTemplate {
    let mut content = template.to_string();
    let mut replaced = 0;

    for (key, value) in values {
        let token = format!("{{{{{}}}}}", key);
        let count = content.matches(&token).count();
        if count > 0 {
            content = content.replace(&token, value);
            replaced += count;
        }
    }

    let mut unresolved = scan_placeholders(&content);
    unresolved.sort();
    unresolved.dedup();

    RenderedTemplate {
        content,
        replaced,
        unresolved,
    }
}

/// Lists the `{{name}}` tokens present in `template`, in order of appearance.
#[must_use]
pub fn scan_placeholders(template: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() && !name.contains('{') && !name.contains('\n') {
                    found.push(name.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_substitution() {
        let out = render_placeholders(
            "Bonjour {{first_name}} {{last_name}},",
            &values(&[("first_name", "Camille"), ("last_name", "Durand")]),
        );
        assert_eq!(out.content, "Bonjour Camille Durand,");
        assert_eq!(out.replaced, 2);
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn test_render_counts_repeated_occurrences() {
        let out = render_placeholders(
            "{{org}} - {{org}} - {{org}}",
            &values(&[("org", "Formation")]),
        );
        assert_eq!(out.content, "Formation - Formation - Formation");
        assert_eq!(out.replaced, 3);
    }

    #[test]
    fn test_render_reports_unresolved() {
        let out = render_placeholders(
            "{{known}} and {{unknown}} and {{unknown}}",
            &values(&[("known", "ok")]),
        );
        assert_eq!(out.content, "ok and {{unknown}} and {{unknown}}");
        assert_eq!(out.replaced, 1);
        assert_eq!(out.unresolved, vec!["unknown".to_string()]);
    }

    #[test]
    fn test_render_no_escaping() {
        // Substitution is naive by design: values are inserted verbatim.
        let out = render_placeholders(
            "<p>{{body}}</p>",
            &values(&[("body", "<b>gras</b>")]),
        );
        assert_eq!(out.content, "<p><b>gras</b></p>");
    }

    #[test]
    fn test_render_unused_values_ignored() {
        let out = render_placeholders("static text", &values(&[("key", "value")]));
        assert_eq!(out.content, "static text");
        assert_eq!(out.replaced, 0);
    }

    #[test]
    fn test_scan_placeholders_in_order() {
        assert_eq!(
            scan_placeholders("{{b}} then {{a}} then {{b}}"),
            vec!["b", "a", "b"]
        );
    }

    #[test]
    fn test_scan_ignores_unterminated() {
        assert!(scan_placeholders("oops {{never closed").is_empty());
        assert!(scan_placeholders("empty {{}} token").is_empty());
    }

    fn template(name: &str, is_default: bool) -> DocumentTemplate {
        DocumentTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            document_type_id: Some(Uuid::new_v4()),
            content: "Attestation pour {{first_name}}".to_string(),
            default_metadata: serde_json::json!({"org": "Formation"}),
            is_default,
            is_global: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_copy_never_keeps_default_flag() {
        let source = template("Attestation", true);
        let copy = source.copy_fields();

        assert!(!copy.is_default);
        assert!(source.is_default);
    }

    #[test]
    fn test_copy_renames_and_preserves_content() {
        let source = template("Attestation", false);
        let copy = source.copy_fields();

        assert_eq!(copy.name, "Attestation (copie)");
        assert_eq!(copy.content, source.content);
        assert_eq!(copy.document_type_id, source.document_type_id);
        assert_eq!(copy.default_metadata, source.default_metadata);
        assert_eq!(copy.is_global, source.is_global);
    }
}
