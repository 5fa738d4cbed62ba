//! HTTP API: symptom-based diagnosis and the assistant chat proxy.

mod endpoints;
pub mod error;
pub mod router;
pub mod server;
mod state;

pub use error::ApiError;
pub use router::api_router;
pub use server::{ApiServer, start_server};
pub use state::AppState;
