//! Services for loading, normalizing and summarizing ticker data

pub mod aggregator;
pub mod catalog;
pub mod dashboard;
pub mod loader;
pub mod normalizer;

pub use aggregator::Aggregator;
pub use catalog::{CatalogProvider, DirectoryCatalog, StaticCatalog};
pub use dashboard::Dashboard;
pub use loader::{placeholder_series, FallbackPolicy, SeriesLoader};
pub use normalizer::normalize;
