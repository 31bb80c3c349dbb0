// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client side of the render API.
//!
//! [`RenderClient`] speaks HTTP to a running service; [`Editor`] is the editing session on top
//! of it (current source, last SVG, busy flag, last error).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::Svg;
use crate::server::api::RenderRequest;
use crate::server::RENDER_ROUTE;

mod editor;

pub use editor::{Editor, RenderTicket};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error! status: {status}: {message}")]
    Status { status: u16, message: String },
    #[error("server response is not SVG markup")]
    NotSvg,
    #[error("a render is already in progress")]
    Busy,
    #[error("nothing to download; render a diagram first")]
    NothingToDownload,
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ClientError {
    /// HTTP status of the failed exchange, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RenderClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        let endpoint = format!("{}{RENDER_ROUTE}", base_url.trim_end_matches('/'));
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn render(&self, source: &str) -> Result<Svg, ClientError> {
        let response =
            self.http.post(&self.endpoint).json(&RenderRequest::new(source)).send().await?;
        let body = success_body(response).await?;
        Svg::new(body).map_err(|_| ClientError::NotSvg)
    }

    /// Fetches the liveness message.
    pub async fn health(&self) -> Result<String, ClientError> {
        let response = self.http.get(&self.endpoint).send().await?;
        success_body(response).await
    }
}

async fn success_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("no details").to_owned(),
        trimmed => trimmed.to_owned(),
    };
    Err(ClientError::Status { status: status.as_u16(), message })
}
