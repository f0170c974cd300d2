//! Request issuing against the configured target.
mod issuer;
mod payload;
mod target;


pub use issuer::{ClientSettings, HttpIssuer, IssuedResponse, RequestIssuer};
pub use payload::Payload;
pub use target::{Target, TargetSettings};
