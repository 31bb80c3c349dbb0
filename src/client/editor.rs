// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::Path;

use super::{ClientError, RenderClient};
use crate::render::Svg;

pub const SAMPLE_SOURCE: &str = "graph TD
    A[Christmas] -->|Get money| B(Go shopping)
    B --> C{Let me think}
    C -->|One| D[Laptop]
    C -->|Two| E[iPhone]
    C -->|Three| F[fa:fa-car Car]";

/// Proof that a render was started; handed back to [`Editor::finish_render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket(u64);

/// One editing session.
///
/// At most one render is outstanding at a time: [`Editor::begin_render`] hands out a ticket and
/// refuses further renders until that ticket is finished. The SVG always belongs to the most
/// recently submitted source that rendered successfully.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    source: String,
    svg: Option<Svg>,
    last_error: Option<String>,
    pending: Option<RenderTicket>,
    next_ticket: u64,
}

impl Editor {
    pub const DOWNLOAD_FILE_NAME: &'static str = "mermaid-diagram.svg";

    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), ..Self::default() }
    }

    /// Editor pre-filled with the sample flowchart shown by the browser page.
    pub fn with_sample() -> Self {
        Self::new(SAMPLE_SOURCE)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn svg(&self) -> Option<&Svg> {
        self.svg.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_download(&self) -> bool {
        self.svg.is_some()
    }

    /// Marks a render as outstanding and returns the source snapshot to submit.
    pub fn begin_render(&mut self) -> Result<(RenderTicket, String), ClientError> {
        if self.pending.is_some() {
            return Err(ClientError::Busy);
        }
        self.next_ticket += 1;
        let ticket = RenderTicket(self.next_ticket);
        self.pending = Some(ticket);
        Ok((ticket, self.source.clone()))
    }

    /// Records the outcome of the render started with `ticket` and clears the busy flag.
    ///
    /// On failure the error is kept as [`Editor::last_error`], the previous SVG stays in place,
    /// and the error is returned to the caller. Tickets that are not outstanding are ignored.
    pub fn finish_render(
        &mut self,
        ticket: RenderTicket,
        outcome: Result<Svg, ClientError>,
    ) -> Result<(), ClientError> {
        if self.pending != Some(ticket) {
            tracing::debug!(?ticket, "ignoring render outcome for stale ticket");
            return Ok(());
        }
        self.pending = None;

        match outcome {
            Ok(svg) => {
                self.svg = Some(svg);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(format!("Error rendering diagram: {err}"));
                Err(err)
            }
        }
    }

    /// Submits the current source and waits for the result.
    pub async fn render(&mut self, client: &RenderClient) -> Result<&Svg, ClientError> {
        let (ticket, source) = self.begin_render()?;
        let outcome = client.render(&source).await;
        self.finish_render(ticket, outcome)?;
        self.svg.as_ref().ok_or(ClientError::NothingToDownload)
    }

    /// Writes the last rendered SVG to `path`. No server round-trip.
    pub fn download(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        let svg = self.svg.as_ref().ok_or(ClientError::NothingToDownload)?;
        fs::write(path, svg.as_str())
            .map_err(|source| ClientError::Write { path: path.to_path_buf(), source })
    }
}
