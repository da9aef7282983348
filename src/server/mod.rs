pub mod dto;
pub mod response;
mod router;
mod routes;
pub mod validation;

pub use router::{AppState, create_router};
