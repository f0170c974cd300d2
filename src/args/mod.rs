//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::LoadArgs;
pub use defaults::{
    DEFAULT_CONTENT_TYPE, DEFAULT_EXPECTED_STATUS, DEFAULT_HOST, DEFAULT_PATH,
    DEFAULT_PAYLOAD_PATH, DEFAULT_PORT, default_stages,
};
pub use types::{OutputFormat, PayloadKind};

pub(crate) use defaults::DEFAULT_USER_AGENT;
pub(crate) use parsers::parse_duration_value;
