pub mod explorer;
pub use explorer::ExplorerPage;
