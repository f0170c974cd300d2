use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid content type '{content_type}' for multipart payload: {source}")]
    InvalidPartMime {
        content_type: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid content type header '{content_type}'.")]
    InvalidContentType { content_type: String },
}
