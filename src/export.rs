use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use omics_core::export::{CSV_CONTENT_TYPE, records_to_csv, report_file_name};
use omics_core::{QueryCriteria, QueryFailure, Shaped};
use serde::Deserialize;
use tracing::{error, info};

use crate::server::GlobalAppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub tissue: Option<String>,
}

pub fn export_routes(state: GlobalAppState) -> Router {
    Router::new()
        .route("/export/{gene}", get(export_csv))
        .with_state(state)
}

fn failure_response(failure: QueryFailure) -> Response {
    let status = match failure {
        QueryFailure::InvalidCriteria(_) => StatusCode::BAD_REQUEST,
        QueryFailure::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        QueryFailure::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    };
    if status.is_server_error() {
        error!(event = "export.failed", code = failure.code(), error = %failure, "export failed");
    }
    (status, failure.to_string()).into_response()
}

async fn export_csv(
    State(state): State<GlobalAppState>,
    Path(gene): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Response {
    let criteria = match QueryCriteria::from_inputs(&gene, params.tissue.as_deref()) {
        Ok(criteria) => criteria,
        Err(failure) => return failure_response(failure),
    };

    let response = match state.service.lookup(&criteria).await {
        Ok(Shaped::Found(response)) => response,
        Ok(Shaped::Empty(empty)) => return (StatusCode::NOT_FOUND, empty.message()).into_response(),
        Err(failure) => return failure_response(failure),
    };

    let body = match records_to_csv(&response.records) {
        Ok(body) => body,
        Err(err) => {
            error!(event = "export.encode_failed", error = %err, "csv encoding failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode report").into_response();
        }
    };

    info!(
        event = "export.served",
        gene = criteria.symbol(),
        tissue = criteria.tissue().as_label(),
        rows = response.records.len(),
        "csv report served"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_file_name(&response.queried_symbol)
    );
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use omics_core::memory::MemoryStore;
    use omics_core::schema::{Gene, Measurement, Sample};
    use omics_core::{QueryService, SharedStore};
    use tower::ServiceExt;

    use super::*;
    use crate::server::AppState;

    fn app(store: MemoryStore) -> Router {
        let store: SharedStore = Arc::new(store);
        export_routes(Arc::new(AppState {
            service: Arc::new(QueryService::new(store)),
            tissues: vec!["Lung".into()],
        }))
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_gene(Gene {
            gene_id: "ENSG00000141510".into(),
            gene_symbol: "TP53".into(),
            description: None,
            chromosome: Some("17".into()),
        });
        for (id, tissue, tpm) in [("S001", "Lung", 45.2), ("S002", "Liver", 12.346)] {
            store
                .insert_sample(Sample {
                    sample_id: id.into(),
                    tissue_type: tissue.into(),
                    condition: "Tumor".into(),
                    patient_age: Some(58),
                })
                .insert_measurement(Measurement {
                    gene_id: "ENSG00000141510".into(),
                    sample_id: id.into(),
                    tpm_value: tpm,
                    sequencing_date: NaiveDate::from_ymd_opt(2024, 5, 20),
                });
        }
        store
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, disposition, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn serves_csv_attachment_for_matching_gene() {
        let (status, disposition, body) = call(app(store()), "/export/tp53?tissue=All").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            disposition.as_deref(),
            Some("attachment; filename=\"TP53_report.csv\"")
        );
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines[0],
            "sample_id,tissue_type,condition,tpm_value,patient_age,sequencing_date"
        );
        assert_eq!(lines[1], "S001,Lung,Tumor,45.20,58,2024-05-20");
        assert_eq!(lines[2], "S002,Liver,Tumor,12.35,58,2024-05-20");
    }

    #[tokio::test]
    async fn tissue_filter_restricts_rows() {
        let (status, _, body) = call(app(store()), "/export/TP53?tissue=Liver").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.lines().count(), 2);
        assert!(body.contains("S002"));
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let (status, disposition, body) = call(app(store()), "/export/ZZZNOTFOUND").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(disposition.is_none());
        assert!(body.contains("ZZZNOTFOUND"));
    }

    #[tokio::test]
    async fn storage_outage_is_server_error() {
        let (status, _, body) = call(app(MemoryStore::unavailable("connection refused")), "/export/TP53").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("connection refused"));
    }
}
