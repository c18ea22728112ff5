use dotenvy::dotenv;
use formation::logging;
use formation::metrics;
use formation::router::init_router;
use formation::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    logging::init_tracing();
    let metrics_handle = metrics::init_metrics();

    let state = init_app_state().await;
    let app = init_router(state);

    if let Some(handle) = metrics_handle {
        let metrics_addr = std::env::var("METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9090".into());
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&metrics_addr)
                .await
                .expect("Failed to bind metrics listener");
            axum::serve(listener, metrics::metrics_app(handle))
                .await
                .expect("Metrics server failed");
        });
    }

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{addr}");
    tracing::info!("Swagger UI available at http://{addr}/swagger-ui");

    axum::serve(listener, app).await.expect("Server failed");

    logging::shutdown_tracer().await;
}
