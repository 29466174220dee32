#![warn(missing_docs)]

//! stroo interactive service
//!
//! Serves the generation cycle over HTTP for ad hoc snippets. The analysed
//! model is kept in a single shared slot and rebuilt only when a request says
//! its source changed.

pub mod cache;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod project;
pub mod routes;
pub mod server;
pub mod state;

pub use cache::AnalysisCache;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
