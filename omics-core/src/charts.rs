//! Chart-ready datasets derived from an [`ExpressionResponse`].

use serde::{Deserialize, Serialize};

use crate::shaper::ExpressionResponse;

/// Five-number summary of TPM for one (condition, tissue) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDistribution {
    pub condition: String,
    pub tissue_type: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBar {
    pub sample_id: String,
    pub tissue_type: String,
    pub tpm_value: f64,
    /// `tpm_value` relative to the largest bar, in `0.0..=1.0`.
    pub fraction: f64,
}

/// Groups by condition then tissue, in first-seen order.
pub fn condition_distribution(response: &ExpressionResponse) -> Vec<ConditionDistribution> {
    let mut groups: Vec<((String, String), Vec<f64>)> = Vec::new();
    for record in &response.records {
        let key = (record.condition.clone(), record.tissue_type.clone());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(record.tpm_value),
            None => groups.push((key, vec![record.tpm_value])),
        }
    }

    groups
        .into_iter()
        .map(|((condition, tissue_type), mut values)| {
            values.sort_by(f64::total_cmp);
            ConditionDistribution {
                condition,
                tissue_type,
                count: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            }
        })
        .collect()
}

/// One bar per record, in record order.
pub fn sample_bars(response: &ExpressionResponse) -> Vec<SampleBar> {
    let peak = response
        .records
        .iter()
        .map(|r| r.tpm_value)
        .fold(0.0_f64, f64::max);

    response
        .records
        .iter()
        .map(|record| SampleBar {
            sample_id: record.sample_id.clone(),
            tissue_type: record.tissue_type.clone(),
            tpm_value: record.tpm_value,
            fraction: if peak > 0.0 {
                (record.tpm_value / peak).clamp(0.0, 1.0)
            } else {
                0.0
            },
        })
        .collect()
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
