use serde::Serialize;

use crate::shaper::{SampleRecord, format_tpm};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    sample_id: &'a str,
    tissue_type: &'a str,
    condition: &'a str,
    tpm_value: String,
    patient_age: Option<i32>,
    sequencing_date: Option<String>,
}

impl<'a> From<&'a SampleRecord> for CsvRow<'a> {
    fn from(record: &'a SampleRecord) -> Self {
        Self {
            sample_id: &record.sample_id,
            tissue_type: &record.tissue_type,
            condition: &record.condition,
            tpm_value: format_tpm(record.tpm_value),
            patient_age: record.patient_age,
            sequencing_date: record
                .sequencing_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Renders per-sample records as CSV with a header row.
pub fn records_to_csv(records: &[SampleRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        writer.write_record([
            "sample_id",
            "tissue_type",
            "condition",
            "tpm_value",
            "patient_age",
            "sequencing_date",
        ])?;
    }
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Download name for a report, e.g. `TP53_report.csv`.
pub fn report_file_name(symbol: &str) -> String {
    let safe: String = symbol
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}_report.csv")
}
