//! Events Layer - Request/Response Message Types
//!
//! Wire types for the line-delimited JSON request loop.

pub mod requests;
pub mod responses;

pub use requests::RegistryRequest;
pub use responses::{error_codes, ErrorResponse, RegistryResponse};
