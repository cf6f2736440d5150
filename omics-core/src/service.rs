use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::criteria::QueryCriteria;
use crate::error::QueryFailure;
use crate::query::{ExpressionQuery, MAX_ROWS};
use crate::schema::ResultSet;
use crate::shaper::{Shaped, shape};
use crate::store::ExpressionStore;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs lookups against an injected store. Holds no per-request state, so one
/// instance is shared by every adapter and request.
pub struct QueryService<S> {
    store: S,
    timeout: Duration,
    row_limit: u32,
}

impl<S: ExpressionStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timeout: DEFAULT_QUERY_TIMEOUT,
            row_limit: MAX_ROWS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_row_limit(mut self, row_limit: u32) -> Self {
        self.row_limit = row_limit.clamp(1, MAX_ROWS);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn execute(&self, criteria: &QueryCriteria) -> Result<ResultSet, QueryFailure> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        self.execute_until(criteria, deadline).await
    }

    /// Executes with an explicit deadline. On expiry the storage future is
    /// dropped, which releases any connection it holds.
    pub async fn execute_until(
        &self,
        criteria: &QueryCriteria,
        deadline: tokio::time::Instant,
    ) -> Result<ResultSet, QueryFailure> {
        let query = ExpressionQuery::build_with_limit(criteria, self.row_limit)?;
        let started = Instant::now();
        let budget = deadline.saturating_duration_since(tokio::time::Instant::now());

        let outcome = tokio::time::timeout_at(deadline, self.store.fetch_rows(&query)).await;
        let mut rows = match outcome {
            Ok(Ok(rows)) => rows,
            Ok(Err(err)) => {
                warn!(
                    event = "lookup.storage_failed",
                    gene = criteria.symbol(),
                    tissue = criteria.tissue().as_label(),
                    duration_ms = started.elapsed().as_millis(),
                    error = %err,
                    "storage round-trip failed"
                );
                return Err(err.into());
            }
            Err(_) => {
                warn!(
                    event = "lookup.timeout",
                    gene = criteria.symbol(),
                    tissue = criteria.tissue().as_label(),
                    budget_ms = budget.as_millis(),
                    "storage round-trip exceeded deadline"
                );
                return Err(QueryFailure::Timeout(budget));
            }
        };

        rows.truncate(query.limit() as usize);
        info!(
            event = "lookup.executed",
            gene = criteria.symbol(),
            tissue = criteria.tissue().as_label(),
            rows = rows.len(),
            duration_ms = started.elapsed().as_millis(),
            "expression query executed"
        );

        Ok(ResultSet {
            queried_symbol: criteria.symbol().to_string(),
            rows,
        })
    }

    /// Execute then shape; the single entry point for every adapter.
    pub async fn lookup(&self, criteria: &QueryCriteria) -> Result<Shaped, QueryFailure> {
        let rows = self.execute(criteria).await?;
        Ok(shape(rows))
    }
}
