//! Mapping of query-layer outcomes onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staffgraph_core::ValidationError;
use staffgraph_graph::GraphError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// `{message}` body sent with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Invalid(e) | Self::Graph(GraphError::Invalid(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Body(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            Self::Graph(GraphError::NotFound { label, .. }) => {
                (StatusCode::NOT_FOUND, format!("{label} not found"))
            }
            Self::Graph(e) => {
                tracing::error!(error = %e, "Graph store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffgraph_core::NodeId;

    #[test]
    fn not_found_maps_to_404_with_label() {
        let err = ApiError::from(GraphError::NotFound {
            label: "Employee",
            id: NodeId::from_raw(3),
        });
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Employee not found");
    }

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::from(GraphError::Invalid(ValidationError::EmptyField {
            field: "name",
        }));
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);

        let err = ApiError::from(ValidationError::InvalidId {
            raw: "x".to_string(),
        });
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_are_opaque_500s() {
        let err = ApiError::from(GraphError::Connection("refused".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
