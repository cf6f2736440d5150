use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use omics_core::shaper::GeneMetadata;
use omics_core::{QueryCriteria, QueryFailure, QueryService, SharedStore, Shaped, Summary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

pub type SharedService = Arc<QueryService<SharedStore>>;

#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
}

impl AppState {
    pub fn new(service: QueryService<SharedStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<QueryFailure> for AppError {
    fn from(failure: QueryFailure) -> Self {
        let status = match &failure {
            QueryFailure::InvalidCriteria(_) => StatusCode::BAD_REQUEST,
            QueryFailure::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QueryFailure::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        AppError::new(status, failure.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Deserialize)]
pub struct GeneQuery {
    pub name: String,
    #[serde(default)]
    pub tissue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeneLookupPayload {
    Success(GeneLookupSuccess),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneLookupSuccess {
    pub query_gene: String,
    pub results_count: usize,
    pub gene: GeneMetadata,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub data: Vec<GeneLookupRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneLookupRecord {
    pub gene_id: String,
    pub symbol: String,
    pub description: Option<String>,
    pub expression_tpm: f64,
    pub sample_info: SampleInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub id: String,
    pub tissue: String,
    pub condition: String,
    pub patient_age: Option<i32>,
    pub sequencing_date: Option<NaiveDate>,
}

impl From<Shaped> for GeneLookupPayload {
    fn from(shaped: Shaped) -> Self {
        match shaped {
            Shaped::Empty(empty) => GeneLookupPayload::Error {
                message: empty.message(),
            },
            Shaped::Found(response) => {
                let data: Vec<GeneLookupRecord> = response
                    .records
                    .into_iter()
                    .map(|record| GeneLookupRecord {
                        gene_id: record.gene_id,
                        symbol: record.gene_symbol,
                        description: record.description,
                        expression_tpm: record.tpm_value,
                        sample_info: SampleInfo {
                            id: record.sample_id,
                            tissue: record.tissue_type,
                            condition: record.condition,
                            patient_age: record.patient_age,
                            sequencing_date: record.sequencing_date,
                        },
                    })
                    .collect();
                GeneLookupPayload::Success(GeneLookupSuccess {
                    query_gene: response.queried_symbol,
                    results_count: data.len(),
                    gene: response.gene,
                    summary: response.summary,
                    warning: response.warning,
                    data,
                })
            }
        }
    }
}

/// Lookup routes without a `/` handler, so they can be merged into another
/// router that owns the index page.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/get_gene", get(get_gene))
        .route("/healthz", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(api_routes(state))
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Gene expression lookup API. Query /get_gene?name=<symbol>[&tissue=<tissue>]"
    }))
}

async fn get_gene(
    State(state): State<AppState>,
    Query(params): Query<GeneQuery>,
) -> ApiResult<Json<GeneLookupPayload>> {
    let criteria = QueryCriteria::from_inputs(&params.name, params.tissue.as_deref())?;
    let shaped = state.service.lookup(&criteria).await?;
    Ok(Json(GeneLookupPayload::from(shaped)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    state
        .service
        .store()
        .health_check()
        .await
        .map_err(|err| AppError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))?;
    Ok("ok")
}
