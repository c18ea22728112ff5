//! Zoned UI templates: HTML/CSS components assembled per zone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Layout zone a component belongs to. Zones render in the fixed order
/// header, body, sidebar, footer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "ui_zone", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UiZone {
    Header,
    Body,
    Sidebar,
    Footer,
}

impl UiZone {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UiZone::Header => "header",
            UiZone::Body => "body",
            UiZone::Sidebar => "sidebar",
            UiZone::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentUiTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub document_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentUiComponent {
    pub id: Uuid,
    pub template_id: Uuid,
    pub zone: UiZone,
    pub html: String,
    pub css: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUiTemplateDto {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub document_type_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUiTemplateDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUiComponentDto {
    pub zone: UiZone,
    pub html: String,
    pub css: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderComponentsDto {
    /// Component ids in their new display order.
    #[validate(length(min = 1))]
    pub ordered_ids: Vec<Uuid>,
}

/// UI template together with its components.
#[derive(Debug, Serialize, ToSchema)]
pub struct UiTemplateWithComponents {
    #[serde(flatten)]
    pub template: DocumentUiTemplate,
    pub components: Vec<DocumentUiComponent>,
}

/// Assembles components into one HTML string: a collected `<style>` block,
/// then per zone (header, body, sidebar, footer) the component markup in
/// `sort_order`.
#[must_use]
pub fn assemble_html(components: &[DocumentUiComponent]) -> String {
    let mut ordered: Vec<&DocumentUiComponent> = components.iter().collect();
    ordered.sort_by_key(|c| (c.zone, c.sort_order));

    let css: Vec<&str> = ordered
        .iter()
        .filter_map(|c| c.css.as_deref())
        .filter(|css| !css.trim().is_empty())
        .collect();

    let mut html = String::new();
    if !css.is_empty() {
        html.push_str("<style>\n");
        for block in css {
            html.push_str(block);
            html.push('\n');
        }
        html.push_str("</style>\n");
    }

    let mut current_zone: Option<UiZone> = None;
    for component in &ordered {
        if current_zone != Some(component.zone) {
            if current_zone.is_some() {
                html.push_str("</div>\n");
            }
            html.push_str(&format!(
                "<div class=\"zone zone-{}\">\n",
                component.zone.as_str()
            ));
            current_zone = Some(component.zone);
        }
        html.push_str(&component.html);
        html.push('\n');
    }
    if current_zone.is_some() {
        html.push_str("</div>\n");
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(zone: UiZone, sort_order: i32, html: &str, css: Option<&str>) -> DocumentUiComponent {
        DocumentUiComponent {
            id: Uuid::new_v4(),
            template_id: Uuid::nil(),
            zone,
            html: html.to_string(),
            css: css.map(str::to_string),
            sort_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_orders_zones_and_components() {
        let components = vec![
            component(UiZone::Footer, 0, "<footer/>", None),
            component(UiZone::Header, 1, "<h2/>", None),
            component(UiZone::Header, 0, "<h1/>", None),
            component(UiZone::Body, 0, "<main/>", None),
        ];
        let html = assemble_html(&components);

        let h1 = html.find("<h1/>").unwrap();
        let h2 = html.find("<h2/>").unwrap();
        let main = html.find("<main/>").unwrap();
        let footer = html.find("<footer/>").unwrap();
        assert!(h1 < h2 && h2 < main && main < footer);
    }

    #[test]
    fn test_assemble_collects_css_once() {
        let components = vec![
            component(UiZone::Body, 0, "<main/>", Some("main { color: red; }")),
            component(UiZone::Header, 0, "<h1/>", Some("h1 { margin: 0; }")),
        ];
        let html = assemble_html(&components);
        assert!(html.starts_with("<style>\n"));
        assert!(html.contains("h1 { margin: 0; }"));
        assert!(html.contains("main { color: red; }"));
        assert_eq!(html.matches("<style>").count(), 1);
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble_html(&[]), "");
    }

    #[test]
    fn test_assemble_skips_style_without_css() {
        let html = assemble_html(&[component(UiZone::Body, 0, "<main/>", None)]);
        assert!(!html.contains("<style>"));
    }
}
