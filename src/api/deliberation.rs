//! REST API endpoints for deliberation runs and standalone audits

use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::service::session::{DeliberationReport, Session};

/// Request body for a deliberation run
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliberationRequest {
    /// The root legal question
    pub question: String,
    /// Override for the configured maximum tree depth
    pub max_depth: Option<usize>,
    /// Override for the configured sub-questions per node
    pub max_width: Option<usize>,
}

/// Request body for a standalone claim audit
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditRequest {
    /// The generated claim to judge
    pub claim: String,
    /// The evidence text the claim must be supported by
    pub evidence: String,
}

/// Run a full deliberation: decompose, ground, audit, record
#[utoipa::path(
    post,
    path = "/v1/deliberations",
    request_body = DeliberationRequest,
    responses(
        (status = 200, description = "Annotated deliberation tree", body = DeliberationReport),
        (status = 400, description = "Empty question")
    ),
    tag = "deliberation"
)]
#[post("/v1/deliberations")]
pub async fn run_deliberation(
    state: web::Data<AppState>,
    body: web::Json<DeliberationRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.question.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "question must not be empty".to_string(),
        ));
    }

    let max_depth = body.max_depth.unwrap_or(state.config.engine.max_depth);
    let max_width = body.max_width.unwrap_or(state.config.engine.max_width);

    // Sessions are owned per call; the core keeps no ambient session state
    let mut session = Session::new();
    let report = state
        .deliberation
        .deliberate(&mut session, body.question.trim(), max_depth, max_width)
        .await;

    Ok(HttpResponse::Ok().json(report))
}

/// Audit one claim against evidence text
#[utoipa::path(
    post,
    path = "/v1/audits",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit verdict", body = crate::model::AuditVerdict)
    ),
    tag = "deliberation"
)]
#[post("/v1/audits")]
pub async fn audit_claim(
    state: web::Data<AppState>,
    body: web::Json<AuditRequest>,
) -> impl Responder {
    let verdict = state.auditor.audit(&body.claim, &body.evidence).await;
    HttpResponse::Ok().json(verdict)
}

/// OpenAPI documentation for the service
#[derive(OpenApi)]
#[openapi(
    paths(
        run_deliberation,
        audit_claim,
        crate::api::corpus::ingest_document,
        crate::api::corpus::retrieve_evidence,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    components(schemas(
        DeliberationRequest,
        AuditRequest,
        DeliberationReport,
        crate::api::corpus::IngestRequest,
        crate::api::corpus::IngestResponse,
        crate::model::AuditVerdict,
        crate::model::EvidenceUnit,
        crate::model::ReasoningStep,
        crate::model::ValidationStatus,
        crate::service::session::AnnotatedNode,
    )),
    tags(
        (name = "deliberation", description = "Deliberation trees and claim audits"),
        (name = "corpus", description = "Corpus ingestion and evidence retrieval"),
        (name = "health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

/// Configure deliberation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(run_deliberation).service(audit_claim);
}
