use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::query::ExpressionQuery;
use crate::schema::ExpressionRow;

/// Read-only storage collaborator that executes built expression queries.
///
/// Implementations must bind `query.params()` positionally and return rows in
/// the order the statement produces. Any connection they hold must be released
/// before the call returns, on every path.
#[async_trait]
pub trait ExpressionStore: Send + Sync + 'static {
    async fn fetch_rows(&self, query: &ExpressionQuery) -> Result<Vec<ExpressionRow>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Type-erased store shared by every request of a running server.
pub type SharedStore = Arc<dyn ExpressionStore>;

#[async_trait]
impl<T: ExpressionStore + ?Sized> ExpressionStore for Arc<T> {
    async fn fetch_rows(&self, query: &ExpressionQuery) -> Result<Vec<ExpressionRow>, StoreError> {
        (**self).fetch_rows(query).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        (**self).health_check().await
    }
}
