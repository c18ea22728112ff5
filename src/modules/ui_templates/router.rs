use crate::modules::ui_templates::controller::{
    add_ui_component, create_ui_template, delete_ui_component, delete_ui_template,
    get_ui_template, get_ui_templates, render_ui_template, reorder_ui_components,
    update_ui_template,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn init_ui_templates_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_ui_templates).post(create_ui_template))
        .route(
            "/{id}",
            get(get_ui_template)
                .put(update_ui_template)
                .delete(delete_ui_template),
        )
        .route("/{id}/components", post(add_ui_component))
        .route("/{id}/components/order", put(reorder_ui_components))
        .route(
            "/{id}/components/{component_id}",
            delete(delete_ui_component),
        )
        .route("/{id}/render", get(render_ui_template))
}
