//! Gene expression lookup core.
//!
//! A lookup flows `QueryCriteria -> ExpressionQuery -> ResultSet -> Shaped`.
//! Everything except the storage round-trip is synchronous and pure.

pub mod charts;
pub mod criteria;
pub mod error;
pub mod export;
#[cfg(feature = "server")]
pub mod memory;
pub mod query;
pub mod schema;
pub mod shaper;
pub mod store;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "server")]
pub mod service;

pub use criteria::{QueryCriteria, TissueFilter};
pub use error::{QueryFailure, StoreError};
pub use query::{ExpressionQuery, MAX_ROWS};
pub use schema::{ExpressionRow, ResultSet};
pub use shaper::{EmptyResponse, ExpressionResponse, SampleRecord, Shaped, Summary, shape};
pub use store::{ExpressionStore, SharedStore};

#[cfg(feature = "server")]
pub use service::QueryService;
