//! Mapping of API failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::publisher::SubmitError;
use crate::resolver::ResolveError;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any missing level of the configuration graph.
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl From<ResolveError> for ApiError {
    fn from(_: ResolveError) -> Self {
        // Same response whichever level was missing.
        ApiError::NotFound
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Submit(e) => match e {
                SubmitError::ReadOnly => StatusCode::FORBIDDEN,
                SubmitError::InvalidProvider { .. } | SubmitError::Malformed(_) => {
                    StatusCode::BAD_REQUEST
                }
                SubmitError::Timeout(_) | SubmitError::PipelineClosed => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                SubmitError::Body(_) => StatusCode::PAYLOAD_TOO_LARGE,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::NotFound => status.into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(ResolveError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(ResolveError::InvalidPath("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(SubmitError::ReadOnly).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(SubmitError::InvalidProvider {
                reserved: "web".into(),
                requested: "docker".into(),
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SubmitError::PipelineClosed).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(SubmitError::Body("length limit exceeded".into())).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_read_only_message() {
        assert_eq!(
            ApiError::from(SubmitError::ReadOnly).to_string(),
            "REST API is in read-only mode"
        );
    }
}
