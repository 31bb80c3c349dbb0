// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bridge to the external Mermaid renderer.
//!
//! Triton never parses or lays out diagrams itself. A [`Renderer`] hands the diagram source to a
//! collaborator (the Mermaid CLI or a Kroki-compatible server) and returns the SVG it produced,
//! or the reason it gave for rejecting the input.

use std::io;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

mod cli;
mod config;
mod remote;

pub use cli::MermaidCli;
pub use config::{
    MermaidConfig, Theme, UnknownThemeError, DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY,
};
pub use remote::{RemoteRenderer, DEFAULT_REMOTE_URL};

/// Synchronous render call into the external collaborator.
///
/// Implementations block (subprocess, HTTP round-trip); async callers run them on a blocking
/// worker.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &str) -> Result<Svg, RenderError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Rendered SVG markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Svg(String);

impl Svg {
    pub const CONTENT_TYPE: &'static str = "image/svg+xml";

    /// Wraps renderer output, rejecting anything without an `<svg` root element.
    pub fn new(markup: impl Into<String>) -> Result<Self, RenderError> {
        let markup = markup.into();
        if !markup.contains("<svg") {
            return Err(RenderError::NoMarkup);
        }
        Ok(Self(markup))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer refused the diagram and said why.
    #[error("{reason}")]
    Rejected { reason: String },
    /// The renderer failed without giving a reason.
    #[error("Unknown error")]
    Unknown,
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode renderer config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("renderer request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("renderer produced no SVG markup")]
    NoMarkup,
}

impl RenderError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { context, source }
    }

    /// Maps raw diagnostic output from the renderer to [`RenderError::Rejected`], or
    /// [`RenderError::Unknown`] when it carries nothing useful.
    pub(crate) fn from_diagnostics(raw: &str) -> Self {
        match failure_reason(raw) {
            Some(reason) => Self::Rejected { reason },
            None => Self::Unknown,
        }
    }
}

fn stack_frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s+at\s+.*(?:\(.*\)|:\d+:\d+)$").expect("valid stack frame regex")
    })
}

fn error_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]*Error:\s*").expect("valid prefix regex"))
}

/// Extracts the human-readable part of a renderer diagnostic.
///
/// Stack frames and blank lines are dropped and a leading `Error:`-style label is stripped, so
/// `Error: Parse error on line 1:` becomes `Parse error on line 1:`.
pub(crate) fn failure_reason(raw: &str) -> Option<String> {
    let mut lines = raw
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !stack_frame_re().is_match(line));

    let first = lines.next()?;
    let first = error_prefix_re().replace(first, "");

    let mut reason = first.into_owned();
    for line in lines {
        reason.push('\n');
        reason.push_str(line);
    }

    let reason = reason.trim().to_owned();
    (!reason.is_empty()).then_some(reason)
}
