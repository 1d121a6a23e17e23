use std::{net::SocketAddr, time::Duration};

use axum::{routing::get, Router};

use crate::{
    model::{Document, Post, Project},
    storage::DocumentStore,
};

mod error;
mod handlers;
mod models;
mod stream;

use handlers::{
    create_document, delete_document, get_document, health, list_documents, not_found, stats,
    stream_documents,
};

#[derive(Clone)]
pub struct AppState<S: DocumentStore> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
    /// Pause between two streamed items; zero streams as fast as possible.
    pub stream_delay: Duration,
}

pub fn router<S: DocumentStore + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/stats", get(stats::<S>))
        .merge(document_routes::<S, Post>())
        .merge(document_routes::<S, Project>())
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .with_state(state)
}

fn document_routes<S, D>() -> Router<AppState<S>>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let base = format!("/{}", D::COLLECTION);
    Router::new()
        .route(
            &base,
            get(list_documents::<S, D>).post(create_document::<S, D>),
        )
        .route(&format!("{base}/stream"), get(stream_documents::<S, D>))
        .route(
            &format!("{base}/:id"),
            get(get_document::<S, D>).delete(delete_document::<S, D>),
        )
}

pub async fn serve<S: DocumentStore + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    stream_delay: Duration,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let state = AppState {
        storage,
        started_at: std::time::SystemTime::now(),
        stream_delay,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
