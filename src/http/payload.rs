use std::path::Path;

use bytes::Bytes;

use crate::args::PayloadKind;
use crate::error::ConfigError;

/// Request body loaded once at startup and shared read-only by every
/// virtual user. Cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Payload {
    bytes: Bytes,
    kind: PayloadKind,
    content_type: String,
    file_name: String,
}

impl Payload {
    /// Read the payload file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is empty.
    pub fn load(path: &Path, kind: PayloadKind, content_type: &str) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|err| ConfigError::ReadPayload {
            path: path.to_path_buf(),
            source: err,
        })?;
        if data.is_empty() {
            return Err(ConfigError::PayloadEmpty {
                path: path.to_path_buf(),
            });
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "payload".to_owned());
        Ok(Self {
            bytes: Bytes::from(data),
            kind,
            content_type: content_type.to_owned(),
            file_name,
        })
    }

    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>, kind: PayloadKind, content_type: &str) -> Self {
        Self {
            bytes: bytes.into(),
            kind,
            content_type: content_type.to_owned(),
            file_name: "payload".to_owned(),
        }
    }

    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        self.kind
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
