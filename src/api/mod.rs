//! HTTP interface for the front desk client.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::clinic_api_router;
pub use types::ApiContext;
