#[tokio::main]
async fn main() {
    clinistock_observability::init();

    let addr = std::env::var("CLINISTOCK_ADDR").unwrap_or_else(|_| {
        tracing::warn!("CLINISTOCK_ADDR not set; using dev default 0.0.0.0:8080");
        "0.0.0.0:8080".to_string()
    });

    let app = clinistock_api::app::build_app().await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
