//! The HTTP boundary.

mod dto;
mod routes;
mod state;

pub use dto::{DirectionsData, DirectionsEnvelope, DirectionsRequest};
pub use routes::create_router;
pub use state::{AppState, ServerConfig};
