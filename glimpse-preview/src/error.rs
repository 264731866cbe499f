use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

/// Host-side API errors. Nothing originating inside the sandbox ever
/// surfaces as one of these: runtime failures arrive as error log entries,
/// and malformed or stale bridge messages are silently dropped.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("preview session '{id}' not found")]
    SessionNotFound { id: String },

    #[error("preview engine is no longer running")]
    EngineClosed,

    #[error("preview engine dropped the reply channel")]
    ReplyDropped,
}
