mod catalog_routes;
pub mod config;
pub mod error;
mod generation_routes;
mod http_layers;
pub mod metrics;
mod review_routes;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use state::ServerState;
