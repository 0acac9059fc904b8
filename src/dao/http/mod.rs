mod client;
mod config;
mod error;

pub use client::HttpScoreboardApi;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
