//! HTTP API handlers for sentiflow-enrich

pub mod health;
pub mod posts;
pub mod push;

pub use health::health_routes;
pub use posts::post_routes;
pub use push::push_routes;
