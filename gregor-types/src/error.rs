//! Error types for gregor.

use thiserror::Error;

/// Errors that can occur while decoding gregor data.
#[derive(Debug, Error)]
pub enum GregorError {
    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Message id was not valid base64
    #[error("invalid message id: {0}")]
    InvalidMsgId(#[source] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = crate::MsgId::from_encoded("not base64!").unwrap_err();
        assert!(err.to_string().starts_with("invalid message id: "));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GregorError>();
    }
}
