//! Typed access to the qBraid HTTP API.
//!
//! Every remote operation is a [`ServiceRequestDetails`] descriptor; the
//! [`ServiceClient`] executes any descriptor generically and validates the
//! response shape before it is deserialized.

pub mod client;
pub mod operations;
pub mod request;
pub mod schema;
pub mod types;

pub use client::{RequestOptions, ServiceClient};
pub use operations::{QbraidApi, QbraidClient};
pub use request::{HttpMethod, ResponseSchema, ServiceEndpoint, ServiceRequest, ServiceRequestDetails};
pub use schema::{FieldType, Validation};
pub use types::*;
