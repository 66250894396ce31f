//! HTTP API handlers for sentiflow-ingest

pub mod health;
pub mod preprocess;

pub use health::health_routes;
pub use preprocess::preprocess_routes;
