//! Boundary to the remote records API.
//!
//! [`RecordsApi`] is the seam the stores depend on; hosts plug in an HTTP
//! implementation and tests plug in fakes. [`wire`] is the only place raw
//! response bodies are interpreted.

pub mod api;
pub mod errors;
pub mod wire;

pub use api::{LoginRequest, LoginResponse, RecordsApi, RegisterRequest};
pub use errors::{ApiError, ApiResult};
