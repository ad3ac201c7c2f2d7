pub mod auth;
pub mod response;

pub use auth::session_gate;
pub use response::{ApiResponse, ApiResult};
