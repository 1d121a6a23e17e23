use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    model::{Document, Post, Project},
    storage::{DocumentStore, Repository},
};

use super::{
    error::ApiError,
    models::{ErrorResponse, HealthResponse, ListParams, StatsResponse},
    stream::{documents_sse, wants_event_stream},
    AppState,
};

type HandlerResult = Result<Response, ApiError>;

/// Runs a synchronous store call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => Err(ApiError::Internal(err.into())),
    }
}

fn repository<S, D>(state: &AppState<S>) -> Repository<S, D>
where
    S: DocumentStore + Clone,
    D: Document,
{
    Repository::new(state.storage.clone())
}

async fn load_documents<S, D>(
    state: &AppState<S>,
    author: Option<String>,
) -> Result<Vec<D>, ApiError>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let repo = repository::<S, D>(state);
    let author = author.filter(|author| !author.trim().is_empty());
    run_blocking(move || match author {
        Some(author) => repo.find_by_author(&author),
        None => repo.find_all(),
    })
    .await
}

pub async fn health<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn stats<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> HandlerResult {
    let posts = repository::<S, Post>(&state);
    let projects = repository::<S, Project>(&state);
    let stats = run_blocking(move || {
        Ok(StatsResponse {
            posts: posts.count()?,
            projects: projects.count()?,
        })
    })
    .await?;
    Ok(Json(stats).into_response())
}

/// Lists a collection as JSON, or as an event stream when the client
/// accepts `text/event-stream`.
pub async fn list_documents<S, D>(
    State(state): State<AppState<S>>,
    params: Result<Query<ListParams>, QueryRejection>,
    headers: HeaderMap,
) -> HandlerResult
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let Query(params) = params?;
    let docs = load_documents::<S, D>(&state, params.author).await?;
    if wants_event_stream(&headers) {
        log::info!("streaming {} {} documents", docs.len(), D::KIND);
        return Ok(documents_sse(docs, state.stream_delay).into_response());
    }
    Ok(Json(docs).into_response())
}

pub async fn stream_documents<S, D>(
    State(state): State<AppState<S>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> HandlerResult
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let Query(params) = params?;
    let docs = load_documents::<S, D>(&state, params.author).await?;
    log::info!("streaming {} {} documents", docs.len(), D::KIND);
    Ok(documents_sse(docs, state.stream_delay).into_response())
}

pub async fn get_document<S, D>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> HandlerResult
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let repo = repository::<S, D>(&state);
    let lookup = id.clone();
    match run_blocking(move || repo.find_by_id(&lookup)).await? {
        Some(doc) => Ok(Json(doc).into_response()),
        None => Err(ApiError::NotFound { kind: D::KIND, id }),
    }
}

pub async fn create_document<S, D>(
    State(state): State<AppState<S>>,
    payload: Result<Json<D::New>, JsonRejection>,
) -> HandlerResult
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let Json(new) = payload?;
    let repo = repository::<S, D>(&state);
    let doc = run_blocking(move || repo.save(new)).await?;
    log::info!("created {} {}", D::KIND, doc.id());
    Ok((StatusCode::CREATED, Json(doc)).into_response())
}

pub async fn delete_document<S, D>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> HandlerResult
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    D: Document,
{
    let repo = repository::<S, D>(&state);
    let target = id.clone();
    if run_blocking(move || repo.delete_by_id(&target)).await? {
        log::info!("deleted {} {}", D::KIND, id);
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Err(ApiError::NotFound { kind: D::KIND, id })
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}
