use serde::{Deserialize, Serialize};

use crate::error::QueryFailure;

/// Tissue restriction applied to a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TissueFilter {
    #[default]
    All,
    Only(String),
}

impl TissueFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// Empty input and `all` (any case) mean no restriction; anything else is
    /// matched exactly after trimming.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) {
            TissueFilter::All
        } else {
            TissueFilter::Only(trimmed.to_string())
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            TissueFilter::All => Self::ALL_LABEL,
            TissueFilter::Only(tissue) => tissue,
        }
    }
}

/// Per-request lookup criteria. The symbol is always non-empty and upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryCriteria {
    symbol: String,
    tissue: TissueFilter,
}

impl QueryCriteria {
    pub fn new(symbol: &str, tissue: TissueFilter) -> Result<Self, QueryFailure> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(QueryFailure::InvalidCriteria(
                "gene symbol must not be empty".to_string(),
            ));
        }
        if symbol.chars().any(char::is_control) {
            return Err(QueryFailure::InvalidCriteria(
                "gene symbol must not contain control characters".to_string(),
            ));
        }
        Ok(Self { symbol, tissue })
    }

    /// Builds criteria from the raw strings an adapter receives.
    pub fn from_inputs(symbol: &str, tissue: Option<&str>) -> Result<Self, QueryFailure> {
        Self::new(symbol, tissue.map(TissueFilter::parse).unwrap_or_default())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn tissue(&self) -> &TissueFilter {
        &self.tissue
    }
}

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}
