mod app;
mod config;
mod http;
mod network;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use network::NetworkError;
pub use validation::ValidationError;
