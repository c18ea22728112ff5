use crate::modules::templates::controller::{
    create_template, delete_template, duplicate_template, get_template, get_templates,
    render_template, set_default_template, update_template,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_templates_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_templates).post(create_template))
        .route(
            "/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/{id}/default", post(set_default_template))
        .route("/{id}/duplicate", post(duplicate_template))
        .route("/{id}/render", post(render_template))
}
