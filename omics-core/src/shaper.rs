use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::schema::{ExpressionRow, ResultSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneMetadata {
    pub gene_id: String,
    pub gene_symbol: String,
    pub description: Option<String>,
    pub chromosome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    #[serde(serialize_with = "two_decimals")]
    pub max_tpm: f64,
    #[serde(serialize_with = "two_decimals")]
    pub mean_tpm: f64,
    #[serde(serialize_with = "two_decimals")]
    pub min_tpm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id: String,
    pub tissue_type: String,
    pub condition: String,
    pub tpm_value: f64,
    pub patient_age: Option<i32>,
    pub sequencing_date: Option<NaiveDate>,
    pub gene_id: String,
    pub gene_symbol: String,
    /// Description of this record's gene, which differs from
    /// `ExpressionResponse::gene` when several genes matched.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub queried_symbol: String,
    /// Metadata of the first (highest expressed) row.
    pub gene: GeneMetadata,
    pub summary: Summary,
    pub records: Vec<SampleRecord>,
    /// Distinct gene ids in row order.
    pub matched_gene_ids: Vec<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResponse {
    pub queried_symbol: String,
}

impl EmptyResponse {
    pub fn message(&self) -> String {
        format!(
            "No expression data found for gene {} (or none in the selected tissue)",
            self.queried_symbol
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Shaped {
    Found(ExpressionResponse),
    Empty(EmptyResponse),
}

/// Shapes joined rows into the response contract.
///
/// Gene metadata comes from the first row. When the symbol pattern matched
/// several genes the records are the union of all of them and `warning` says
/// so; the metadata still describes only the first gene.
pub fn shape(result: ResultSet) -> Shaped {
    let ResultSet {
        queried_symbol,
        rows,
    } = result;

    let Some(first) = rows.first() else {
        return Shaped::Empty(EmptyResponse { queried_symbol });
    };

    let gene = GeneMetadata {
        gene_id: first.gene_id.clone(),
        gene_symbol: first.gene_symbol.clone(),
        description: first.description.clone(),
        chromosome: first.chromosome.clone(),
    };

    let summary = summarize(&rows);

    let mut matched_gene_ids: Vec<String> = Vec::new();
    for row in &rows {
        if !matched_gene_ids.contains(&row.gene_id) {
            matched_gene_ids.push(row.gene_id.clone());
        }
    }

    let warning = (matched_gene_ids.len() > 1).then(|| {
        format!(
            "'{}' matched {} genes; showing metadata for {} ({}) and measurements for all of them",
            queried_symbol,
            matched_gene_ids.len(),
            gene.gene_symbol,
            gene.gene_id
        )
    });

    let records = rows.into_iter().map(SampleRecord::from).collect();

    Shaped::Found(ExpressionResponse {
        queried_symbol,
        gene,
        summary,
        records,
        matched_gene_ids,
        warning,
    })
}

/// Callers guarantee `rows` is non-empty.
fn summarize(rows: &[ExpressionRow]) -> Summary {
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    let mut total = 0.0_f64;
    for row in rows {
        max = max.max(row.tpm_value);
        min = min.min(row.tpm_value);
        total += row.tpm_value;
    }
    let mean = total / rows.len() as f64;
    Summary {
        count: rows.len(),
        max_tpm: max,
        // Summation error can push the mean a hair outside the observed range.
        mean_tpm: mean.clamp(min, max),
        min_tpm: min,
    }
}

impl From<ExpressionRow> for SampleRecord {
    fn from(row: ExpressionRow) -> Self {
        Self {
            sample_id: row.sample_id,
            tissue_type: row.tissue_type,
            condition: row.condition,
            tpm_value: row.tpm_value,
            patient_age: row.patient_age,
            sequencing_date: row.sequencing_date,
            gene_id: row.gene_id,
            gene_symbol: row.gene_symbol,
            description: row.description,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_tpm(value: f64) -> String {
    format!("{value:.2}")
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gene_id: &str, symbol: &str, sample_id: &str, tissue: &str, tpm: f64) -> ExpressionRow {
        ExpressionRow {
            gene_id: gene_id.to_string(),
            gene_symbol: symbol.to_string(),
            description: Some(format!("{symbol} description")),
            chromosome: Some("17".to_string()),
            tpm_value: tpm,
            sequencing_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            sample_id: sample_id.to_string(),
            tissue_type: tissue.to_string(),
            condition: "Tumor".to_string(),
            patient_age: Some(61),
        }
    }

    #[test]
    fn empty_rows_shape_to_empty_response() {
        let shaped = shape(ResultSet::empty("ZZZNOTFOUND"));
        match shaped {
            Shaped::Empty(empty) => {
                assert_eq!(empty.queried_symbol, "ZZZNOTFOUND");
                assert!(empty.message().contains("ZZZNOTFOUND"));
            }
            other => panic!("expected empty response, got {:?}", other),
        }
    }

    #[test]
    fn summary_covers_every_row() {
        let rows = vec![
            row("G1", "TP53", "S1", "Lung", 42.5),
            row("G1", "TP53", "S2", "Liver", 10.0),
            row("G1", "TP53", "S3", "Blood", 0.25),
        ];
        let Shaped::Found(response) = shape(ResultSet {
            queried_symbol: "TP53".into(),
            rows,
        }) else {
            panic!("expected found");
        };

        assert_eq!(response.summary.count, 3);
        assert_eq!(response.summary.max_tpm, 42.5);
        assert_eq!(response.summary.min_tpm, 0.25);
        assert!((response.summary.mean_tpm - 17.583_333).abs() < 1e-5);
        assert!(response.warning.is_none());
        let ids: Vec<_> = response.records.iter().map(|r| r.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn mean_stays_within_observed_range() {
        let rows: Vec<_> = (0..7)
            .map(|i| row("G1", "TP53", &format!("S{i}"), "Lung", 0.1))
            .collect();
        let Shaped::Found(response) = shape(ResultSet {
            queried_symbol: "TP53".into(),
            rows,
        }) else {
            panic!("expected found");
        };
        assert!(response.summary.mean_tpm >= response.summary.min_tpm);
        assert!(response.summary.mean_tpm <= response.summary.max_tpm);
    }

    #[test]
    fn first_row_supplies_metadata_and_multi_gene_match_warns() {
        let rows = vec![
            row("G2", "TP53BP1", "S1", "Lung", 90.0),
            row("G1", "TP53", "S2", "Lung", 40.0),
            row("G2", "TP53BP1", "S3", "Lung", 5.0),
        ];
        let Shaped::Found(response) = shape(ResultSet {
            queried_symbol: "TP53".into(),
            rows,
        }) else {
            panic!("expected found");
        };

        assert_eq!(response.gene.gene_id, "G2");
        assert_eq!(response.gene.gene_symbol, "TP53BP1");
        assert_eq!(response.matched_gene_ids, vec!["G2", "G1"]);
        let warning = response.warning.expect("multi-gene warning");
        assert!(warning.contains("matched 2 genes"));
        assert_eq!(response.records.len(), 3);
        assert_eq!(
            response.records[1].description.as_deref(),
            Some("TP53 description")
        );
    }

    #[test]
    fn aggregates_serialize_with_two_decimals() {
        let summary = Summary {
            count: 3,
            max_tpm: 12.3456,
            mean_tpm: 7.0 / 3.0,
            min_tpm: 0.004,
        };
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["max_tpm"], 12.35);
        assert_eq!(json["mean_tpm"], 2.33);
        assert_eq!(json["min_tpm"], 0.0);
        assert_eq!(format_tpm(12.3456), "12.35");
    }
}
