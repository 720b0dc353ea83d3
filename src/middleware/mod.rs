pub mod auth;
pub mod response;

pub use auth::scope_middleware;
pub use response::{ApiResponse, ApiResult};
