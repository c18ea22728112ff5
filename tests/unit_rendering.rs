use std::collections::HashMap;

use chrono::Utc;
use formation::formation_models::templates::{render_placeholders, scan_placeholders};
use formation::formation_models::ui_templates::{DocumentUiComponent, UiZone, assemble_html};
use uuid::Uuid;

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_render_attestation_template() {
    let template = "Attestation de formation\n\
         Je soussigné(e) certifie que {{first_name}} {{last_name}} a suivi la \
         formation « {{session_title}} » du {{start_date}} au {{end_date}}.";

    let out = render_placeholders(
        template,
        &values(&[
            ("first_name", "Camille"),
            ("last_name", "Durand"),
            ("session_title", "Rust avancé"),
            ("start_date", "2026-01-05"),
            ("end_date", "2026-03-27"),
        ]),
    );

    assert_eq!(out.replaced, 5);
    assert!(out.unresolved.is_empty());
    assert!(out.content.contains("Camille Durand"));
    assert!(out.content.contains("« Rust avancé »"));
    assert!(!out.content.contains("{{"));
}

#[test]
fn test_render_reports_missing_values() {
    let out = render_placeholders(
        "{{present}} {{missing_one}} {{missing_two}} {{missing_one}}",
        &values(&[("present", "ok")]),
    );

    assert_eq!(out.replaced, 1);
    assert_eq!(
        out.unresolved,
        vec!["missing_one".to_string(), "missing_two".to_string()]
    );
}

#[test]
fn test_scan_placeholders_finds_tokens() {
    let found = scan_placeholders("Bonjour {{name}}, session {{session}} ({{name}})");
    assert_eq!(found, vec!["name", "session", "name"]);
}

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
fn test_assemble_html_zone_order() {
    let components = vec![
        component(UiZone::Sidebar, 0, "<nav>liens</nav>", None),
        component(UiZone::Footer, 0, "<small>mentions</small>", None),
        component(UiZone::Header, 0, "<h1>Organisme</h1>", None),
        component(UiZone::Body, 0, "<p>contenu</p>", None),
    ];
    let html = assemble_html(&components);

    let header = html.find("zone-header").unwrap();
    let body = html.find("zone-body").unwrap();
    let sidebar = html.find("zone-sidebar").unwrap();
    let footer = html.find("zone-footer").unwrap();
    assert!(header < body && body < sidebar && sidebar < footer);
}

#[test]
fn test_assemble_html_single_style_block() {
    let components = vec![
        component(UiZone::Header, 0, "<h1/>", Some("h1 { margin: 0; }")),
        component(UiZone::Footer, 0, "<small/>", Some("small { color: grey; }")),
    ];
    let html = assemble_html(&components);

    assert_eq!(html.matches("<style>").count(), 1);
    assert!(html.contains("h1 { margin: 0; }"));
    assert!(html.contains("small { color: grey; }"));
    assert!(html.find("</style>").unwrap() < html.find("zone-header").unwrap());
}
