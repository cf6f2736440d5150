pub mod charts;
pub mod filter_bar;
pub mod header;
pub mod sample_table;
pub mod summary_cards;

pub use charts::{DistributionChart, SampleBarChart};
pub use filter_bar::FilterBar;
pub use header::Header;
pub use sample_table::SampleTable;
pub use summary_cards::SummaryCards;
