// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppState;
use crate::render::{RenderError, Svg};

pub const HEALTH_MESSAGE: &str = "Mermaid renderer API is running here";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Body of `POST /api/mermaid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RenderRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: Some(code.into()) }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing code parameter")]
    MissingCode,
    #[error("Error rendering diagram: {0}")]
    Render(#[from] RenderError),
    /// The blocking render task panicked or was cancelled.
    #[error("Error rendering diagram: Unknown error")]
    Worker(#[source] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCode => StatusCode::BAD_REQUEST,
            Self::Render(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingCode => {}
            Self::Render(err) => tracing::error!(error = %err, "error rendering mermaid diagram"),
            Self::Worker(err) => tracing::error!(error = %err, "render worker failed"),
        }
        (self.status(), [(header::CONTENT_TYPE, TEXT_PLAIN)], self.to_string()).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], HEALTH_MESSAGE)
}

pub async fn render(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let source = diagram_source(&body)?;

    let renderer = state.renderer().clone();
    let svg = tokio::task::spawn_blocking(move || renderer.render(&source))
        .await
        .map_err(ApiError::Worker)??;

    Ok(([(header::CONTENT_TYPE, Svg::CONTENT_TYPE)], svg.into_string()).into_response())
}

/// Pulls `code` out of the request body.
///
/// A body that is not a JSON object with a string `code` counts as a missing parameter.
pub(crate) fn diagram_source(body: &[u8]) -> Result<String, ApiError> {
    let request: RenderRequest = serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "unreadable render request body");
        ApiError::MissingCode
    })?;

    match request.code {
        Some(code) if !code.is_empty() => Ok(code),
        _ => Err(ApiError::MissingCode),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use super::{diagram_source, ApiError, RenderRequest};
    use crate::render::RenderError;

    #[rstest]
    #[case::empty_body("")]
    #[case::not_json("graph TD; A-->B")]
    #[case::empty_object("{}")]
    #[case::null_code(r#"{"code": null}"#)]
    #[case::empty_code(r#"{"code": ""}"#)]
    #[case::number_code(r#"{"code": 42}"#)]
    #[case::array_body(r#"["graph TD; A-->B"]"#)]
    fn missing_or_unusable_code_is_missing_parameter(#[case] body: &str) {
        let err = diagram_source(body.as_bytes()).unwrap_err();
        assert!(matches!(err, ApiError::MissingCode), "got: {err:?}");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing code parameter");
    }

    #[test]
    fn code_is_forwarded_verbatim() {
        let body = serde_json::to_vec(&RenderRequest::new("graph TD\n  A-->B\n")).expect("json");
        assert_eq!(diagram_source(&body).expect("source"), "graph TD\n  A-->B\n");
    }

    #[test]
    fn whitespace_only_code_is_left_to_the_renderer() {
        assert_eq!(diagram_source(br#"{"code": "  "}"#).expect("source"), "  ");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let source =
            diagram_source(br#"{"code": "graph LR; A-->B", "theme": "dark"}"#).expect("source");
        assert_eq!(source, "graph LR; A-->B");
    }

    #[test]
    fn render_errors_are_server_errors_with_reason() {
        let err = ApiError::from(RenderError::Rejected { reason: "Parse error on line 1".into() });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error rendering diagram: Parse error on line 1");

        let err = ApiError::from(RenderError::Unknown);
        assert_eq!(err.to_string(), "Error rendering diagram: Unknown error");
    }

    #[test]
    fn request_without_code_serializes_to_empty_object() {
        let json = serde_json::to_string(&RenderRequest::default()).expect("json");
        assert_eq!(json, "{}");
    }
}
