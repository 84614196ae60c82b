// HTTP API: query endpoints, suggested listing and health checks

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
