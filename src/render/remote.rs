// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use ureq::Agent;

use super::{MermaidConfig, RenderError, Renderer, Svg};

pub const DEFAULT_REMOTE_URL: &str = "https://kroki.io";

/// Renders through a Kroki-compatible HTTP service (`POST <base>/mermaid/svg`).
///
/// The service only sees the diagram text, so the configuration travels as an
/// `%%{init: ...}%%` directive prepended to the source.
#[derive(Debug, Clone)]
pub struct RemoteRenderer {
    agent: Agent,
    endpoint: String,
    config: Arc<MermaidConfig>,
}

impl RemoteRenderer {
    pub fn new(base_url: &str, config: Arc<MermaidConfig>) -> Self {
        let agent: Agent = Agent::config_builder().http_status_as_error(false).build().into();
        let endpoint = format!("{}/mermaid/svg", base_url.trim_end_matches('/'));
        Self { agent, endpoint, config }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn payload(&self, source: &str) -> Result<String, RenderError> {
        let mut payload = self.config.init_directive()?;
        payload.push_str(source);
        Ok(payload)
    }
}

impl Renderer for RemoteRenderer {
    fn render(&self, source: &str) -> Result<Svg, RenderError> {
        let payload = self.payload(source)?;

        tracing::debug!(endpoint = %self.endpoint, bytes = payload.len(), "posting to renderer");
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Accept", Svg::CONTENT_TYPE)
            .send(payload)?;

        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        if !status.is_success() {
            tracing::debug!(%status, body = %body, "remote renderer rejected diagram");
            return Err(RenderError::from_diagnostics(&body));
        }

        Svg::new(body)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
