//! In-process [`ExpressionStore`] backed by plain vectors.
//!
//! It evaluates the predicates of a built [`ExpressionQuery`] with the same
//! semantics Postgres applies to the rendered statement, so the service and
//! both adapters can be exercised without a database.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::query::{Column, Comparison, ExpressionQuery, ilike_matches};
use crate::schema::{ExpressionRow, Gene, Measurement, Sample};
use crate::store::ExpressionStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    genes: Vec<Gene>,
    samples: Vec<Sample>,
    measurements: Vec<Measurement>,
    outage: Option<String>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the database were unreachable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outage: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert_gene(&mut self, gene: Gene) -> &mut Self {
        self.genes.push(gene);
        self
    }

    pub fn insert_sample(&mut self, sample: Sample) -> &mut Self {
        self.samples.push(sample);
        self
    }

    pub fn insert_measurement(&mut self, measurement: Measurement) -> &mut Self {
        self.measurements.push(measurement);
        self
    }

    fn joined_rows(&self) -> Vec<ExpressionRow> {
        let genes: HashMap<&str, &Gene> =
            self.genes.iter().map(|g| (g.gene_id.as_str(), g)).collect();
        let samples: HashMap<&str, &Sample> = self
            .samples
            .iter()
            .map(|s| (s.sample_id.as_str(), s))
            .collect();

        // Inner join: dangling measurements drop out like they would in SQL.
        self.measurements
            .iter()
            .filter_map(|m| {
                let gene = genes.get(m.gene_id.as_str())?;
                let sample = samples.get(m.sample_id.as_str())?;
                Some(ExpressionRow::join(gene, m, sample))
            })
            .collect()
    }

    async fn simulate_round_trip(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

fn column_value(row: &ExpressionRow, column: Column) -> &str {
    match column {
        Column::GeneSymbol => &row.gene_symbol,
        Column::TissueType => &row.tissue_type,
    }
}

fn compare_rows(a: &ExpressionRow, b: &ExpressionRow) -> Ordering {
    b.tpm_value
        .total_cmp(&a.tpm_value)
        .then_with(|| a.sample_id.cmp(&b.sample_id))
        .then_with(|| a.gene_id.cmp(&b.gene_id))
}

#[async_trait]
impl ExpressionStore for MemoryStore {
    async fn fetch_rows(&self, query: &ExpressionQuery) -> Result<Vec<ExpressionRow>, StoreError> {
        self.simulate_round_trip().await?;

        let mut rows: Vec<ExpressionRow> = self
            .joined_rows()
            .into_iter()
            .filter(|row| {
                query.predicates().iter().all(|p| {
                    let value = column_value(row, p.column);
                    match p.comparison {
                        Comparison::ILike => ilike_matches(&p.value, value),
                        Comparison::Equals => value == p.value,
                    }
                })
            })
            .collect();

        rows.sort_by(compare_rows);
        rows.truncate(query.limit() as usize);
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.simulate_round_trip().await
    }
}
