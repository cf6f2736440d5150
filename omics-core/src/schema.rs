use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const GENES_TABLE: &str = "genes";
pub const SAMPLES_TABLE: &str = "sample_info";
pub const MEASUREMENTS_TABLE: &str = "expression_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub gene_id: String,
    pub gene_symbol: String,
    pub description: Option<String>,
    pub chromosome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub sample_id: String,
    pub tissue_type: String,
    pub condition: String,
    pub patient_age: Option<i32>,
}

/// One expression measurement of a gene in a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub gene_id: String,
    pub sample_id: String,
    pub tpm_value: f64,
    pub sequencing_date: Option<NaiveDate>,
}

/// A joined gene x measurement x sample row as returned by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ExpressionRow {
    pub gene_id: String,
    pub gene_symbol: String,
    pub description: Option<String>,
    pub chromosome: Option<String>,
    pub tpm_value: f64,
    pub sequencing_date: Option<NaiveDate>,
    pub sample_id: String,
    pub tissue_type: String,
    pub condition: String,
    pub patient_age: Option<i32>,
}

impl ExpressionRow {
    pub fn join(gene: &Gene, measurement: &Measurement, sample: &Sample) -> Self {
        Self {
            gene_id: gene.gene_id.clone(),
            gene_symbol: gene.gene_symbol.clone(),
            description: gene.description.clone(),
            chromosome: gene.chromosome.clone(),
            tpm_value: measurement.tpm_value,
            sequencing_date: measurement.sequencing_date,
            sample_id: sample.sample_id.clone(),
            tissue_type: sample.tissue_type.clone(),
            condition: sample.condition.clone(),
            patient_age: sample.patient_age,
        }
    }
}

/// Ordered, capped rows produced by one query execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub queried_symbol: String,
    pub rows: Vec<ExpressionRow>,
}

impl ResultSet {
    pub fn empty(queried_symbol: impl Into<String>) -> Self {
        Self {
            queried_symbol: queried_symbol.into(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
