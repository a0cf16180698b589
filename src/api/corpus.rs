//! REST API endpoints for corpus ingestion and raw evidence retrieval

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::model::EvidenceUnit;

/// Request body for corpus ingestion
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Path of the document to ingest; replaces the previous corpus entirely
    pub path: String,
}

/// Response for a successful ingestion
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub document: String,
    pub chunks: usize,
}

/// Query parameters for raw evidence retrieval
#[derive(Debug, Deserialize, IntoParams)]
pub struct EvidenceParams {
    /// Query text
    pub query: String,
    /// Number of evidence units to return (default: 3, max: 20)
    pub k: Option<usize>,
}

const DEFAULT_K: usize = 3;
const MAX_K: usize = 20;

/// Ingest a document into the evidence store
///
/// Ingestion is destructive: the previous index is discarded entirely.
#[utoipa::path(
    post,
    path = "/v1/corpus",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Document ingested", body = IngestResponse),
        (status = 404, description = "Source file not found"),
        (status = 500, description = "Ingestion failed")
    ),
    tag = "corpus"
)]
#[post("/v1/corpus")]
pub async fn ingest_document(
    state: web::Data<AppState>,
    body: web::Json<IngestRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.path.trim().is_empty() {
        return Err(ApiError::BadRequest("path must not be empty".to_string()));
    }

    let path = Path::new(&body.path);
    let chunks = state.evidence.ingest(path).await?;

    tracing::info!(path = %body.path, chunks = chunks, "Corpus ingested via API");

    Ok(HttpResponse::Ok().json(IngestResponse {
        document: body.path.clone(),
        chunks,
    }))
}

/// Retrieve ranked evidence for a query
///
/// Returns an empty list, never an error, when no corpus is loaded.
#[utoipa::path(
    get,
    path = "/v1/evidence",
    params(EvidenceParams),
    responses(
        (status = 200, description = "Ranked evidence units, best first", body = [EvidenceUnit])
    ),
    tag = "corpus"
)]
#[get("/v1/evidence")]
pub async fn retrieve_evidence(
    state: web::Data<AppState>,
    query: web::Query<EvidenceParams>,
) -> impl Responder {
    let k = query.k.unwrap_or(DEFAULT_K).min(MAX_K);
    let results = state.evidence.retrieve(&query.query, k).await;
    HttpResponse::Ok().json(results)
}

/// Configure corpus routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ingest_document).service(retrieve_evidence);
}
