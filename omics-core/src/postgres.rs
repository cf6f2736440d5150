use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StoreError;
use crate::query::ExpressionQuery;
use crate::schema::ExpressionRow;
use crate::store::ExpressionStore;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and checks out one connection to fail fast on a bad URL.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ExpressionStore for PostgresStore {
    async fn fetch_rows(&self, query: &ExpressionQuery) -> Result<Vec<ExpressionRow>, StoreError> {
        // Held for this statement only; returned to the pool on drop.
        let mut conn = self.pool.acquire().await?;

        let mut statement = sqlx::query_as::<_, ExpressionRow>(query.sql());
        for param in query.params() {
            statement = statement.bind(param);
        }

        let rows = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(classify_fetch_error)?;
        tracing::debug!(
            event = "store.fetch_rows",
            rows = rows.len(),
            params = query.params().len(),
            "expression rows fetched"
        );
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

/// Row shape mismatches are schema problems, not outages.
fn classify_fetch_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => StoreError::Decode(err.to_string()),
        other => StoreError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_classified_separately() {
        let err = classify_fetch_error(sqlx::Error::ColumnNotFound("patient_age".into()));
        match err {
            StoreError::Decode(msg) => assert!(msg.contains("patient_age")),
            other => panic!("expected decode error, got {other:?}"),
        }

        let err = classify_fetch_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(sqlx::Error::PoolTimedOut)));
    }
}
