use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the payload is placed in the request body.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// Raw bytes as the request body.
    Binary,
    /// A multipart form with the bytes in a `file` part.
    Multipart,
}

impl PayloadKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PayloadKind::Binary => "Binary",
            PayloadKind::Multipart => "Multipart",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Quiet,
}
