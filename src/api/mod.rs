//! HTTP API layer

mod gate;
mod handlers;
mod routes;

pub use routes::{create_router, AppState};
