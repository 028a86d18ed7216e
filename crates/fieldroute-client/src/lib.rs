pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody};
pub use retry::RetryPolicy;
