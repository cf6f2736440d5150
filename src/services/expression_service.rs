use leptos::prelude::*;
use omics_core::charts::{ConditionDistribution, SampleBar, condition_distribution, sample_bars};
use omics_core::{ExpressionResponse, QueryFailure, Shaped, TissueFilter};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ssr")]
use omics_core::QueryCriteria;

/// Everything the explorer page renders for a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerView {
    pub response: ExpressionResponse,
    pub distribution: Vec<ConditionDistribution>,
    pub bars: Vec<SampleBar>,
    pub export_href: String,
}

impl ExplorerView {
    pub fn new(response: ExpressionResponse, tissue: &TissueFilter) -> Self {
        let distribution = condition_distribution(&response);
        let bars = sample_bars(&response);
        let export_href = export_href(&response.queried_symbol, tissue);
        Self {
            response,
            distribution,
            bars,
            export_href,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookupOutcome {
    Found(ExplorerView),
    NotFound { message: String },
    /// The input was rejected before reaching storage.
    Rejected { message: String },
}

pub fn export_href(symbol: &str, tissue: &TissueFilter) -> String {
    format!(
        "/export/{}?tissue={}",
        urlencoding::encode(symbol),
        urlencoding::encode(tissue.as_label())
    )
}

/// Splits a lookup result into what the page shows inline and what surfaces as
/// a server function error.
pub fn into_outcome(
    result: Result<Shaped, QueryFailure>,
    tissue: &TissueFilter,
) -> Result<LookupOutcome, ServerFnError> {
    match result {
        Ok(Shaped::Found(response)) => Ok(LookupOutcome::Found(ExplorerView::new(response, tissue))),
        Ok(Shaped::Empty(empty)) => Ok(LookupOutcome::NotFound {
            message: empty.message(),
        }),
        Err(QueryFailure::InvalidCriteria(message)) => Ok(LookupOutcome::Rejected { message }),
        Err(failure) => {
            tracing::warn!(event = "ui.lookup_failed", code = failure.code(), error = %failure, "lookup failed");
            Err(ServerFnError::new(failure.to_string()))
        }
    }
}

#[server]
pub async fn lookup_expression(
    gene: String,
    tissue: String,
) -> Result<LookupOutcome, ServerFnError> {
    let state = expect_context::<crate::server::GlobalAppState>();

    let filter = TissueFilter::parse(&tissue);
    let result = match QueryCriteria::new(&gene, filter.clone()) {
        Ok(criteria) => state.service.lookup(&criteria).await,
        Err(failure) => Err(failure),
    };
    into_outcome(result, &filter)
}

#[server]
pub async fn tissue_options() -> Result<Vec<String>, ServerFnError> {
    let state = expect_context::<crate::server::GlobalAppState>();
    Ok(state.tissues.clone())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use omics_core::shaper::GeneMetadata;
    use omics_core::{EmptyResponse, SampleRecord, Summary};

    use super::*;

    fn response() -> ExpressionResponse {
        let record = |sample_id: &str, condition: &str, tpm: f64| SampleRecord {
            sample_id: sample_id.into(),
            tissue_type: "Lung".into(),
            condition: condition.into(),
            tpm_value: tpm,
            patient_age: Some(61),
            sequencing_date: None,
            gene_id: "ENSG00000141510".into(),
            gene_symbol: "TP53".into(),
            description: Some("tumor protein p53".into()),
        };
        ExpressionResponse {
            queried_symbol: "TP53".into(),
            gene: GeneMetadata {
                gene_id: "ENSG00000141510".into(),
                gene_symbol: "TP53".into(),
                description: Some("tumor protein p53".into()),
                chromosome: Some("17".into()),
            },
            summary: Summary {
                count: 2,
                max_tpm: 40.0,
                mean_tpm: 30.0,
                min_tpm: 20.0,
            },
            records: vec![record("S1", "Tumor", 40.0), record("S2", "Normal", 20.0)],
            matched_gene_ids: vec!["ENSG00000141510".into()],
            warning: None,
        }
    }

    #[test]
    fn export_href_encodes_symbol_and_tissue() {
        assert_eq!(export_href("TP53", &TissueFilter::All), "/export/TP53?tissue=All");
        assert_eq!(
            export_href("HLA-A", &TissueFilter::Only("Bone Marrow".into())),
            "/export/HLA-A?tissue=Bone%20Marrow"
        );
    }

    #[test]
    fn found_response_carries_chart_datasets() {
        let outcome = into_outcome(Ok(Shaped::Found(response())), &TissueFilter::All).unwrap();
        let LookupOutcome::Found(view) = outcome else {
            panic!("expected a found outcome");
        };
        assert_eq!(view.bars.len(), 2);
        assert_eq!(view.bars[0].fraction, 1.0);
        assert_eq!(view.distribution.len(), 2);
        assert_eq!(view.export_href, "/export/TP53?tissue=All");
    }

    #[test]
    fn empty_and_rejected_render_inline() {
        let empty = Shaped::Empty(EmptyResponse {
            queried_symbol: "ZZZNOTFOUND".into(),
        });
        match into_outcome(Ok(empty), &TissueFilter::All).unwrap() {
            LookupOutcome::NotFound { message } => assert!(message.contains("ZZZNOTFOUND")),
            other => panic!("unexpected outcome {other:?}"),
        }

        let rejected = into_outcome(
            Err(QueryFailure::InvalidCriteria("gene symbol must not be empty".into())),
            &TissueFilter::All,
        )
        .unwrap();
        assert!(matches!(rejected, LookupOutcome::Rejected { .. }));
    }

    #[test]
    fn storage_failures_become_server_errors() {
        let err = into_outcome(
            Err(QueryFailure::Timeout(Duration::from_secs(10))),
            &TissueFilter::All,
        )
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
