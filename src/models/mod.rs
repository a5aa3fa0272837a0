//! Data Transfer Objects
//!
//! Request and response bodies for the operations HTTP surface.

pub mod requests;
pub mod responses;

pub use requests::StoreRequest;
pub use responses::{
    ClearResponse, DeleteResponse, ErrorResponse, FetchResponse, HealthResponse, StatsResponse,
    StoreResponse,
};
