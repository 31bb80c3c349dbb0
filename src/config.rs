// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup configuration for the render service.
//!
//! Everything here is resolved once before the server starts; the resulting [`MermaidConfig`]
//! and renderer are never changed afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::render::{MermaidCli, MermaidConfig, RemoteRenderer, Renderer, Theme, DEFAULT_REMOTE_URL};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RendererKind {
    /// Mermaid CLI subprocess.
    #[default]
    Cli,
    /// Kroki-compatible HTTP service.
    Remote,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => f.write_str("cli"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for RendererKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cli" | "mmdc" => Ok(Self::Cli),
            "remote" | "kroki" => Ok(Self::Remote),
            other => Err(ConfigError::UnknownRenderer(other.to_owned())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown renderer `{0}` (expected `cli` or `remote`)")]
    UnknownRenderer(String),
    #[error("failed to read CSS overrides from {}: {source}", path.display())]
    Css {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("puppeteer config {} does not exist", path.display())]
    MissingPuppeteerConfig { path: PathBuf },
}

/// Options for `triton serve`. Unset fields fall back to the defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub renderer: Option<RendererKind>,
    pub mmdc: Option<PathBuf>,
    pub puppeteer_config: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub theme: Option<Theme>,
    pub font_family: Option<String>,
    pub css: Option<PathBuf>,
    pub background: Option<String>,
}

impl ServeConfig {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn renderer_kind(&self) -> RendererKind {
        self.renderer.unwrap_or_default()
    }

    pub fn mermaid_config(&self) -> Result<MermaidConfig, ConfigError> {
        let mut config = MermaidConfig::default().with_theme(self.theme.unwrap_or_default());
        if let Some(font_family) = &self.font_family {
            config = config.with_font_family(font_family.clone());
        }
        if let Some(background) = &self.background {
            config = config.with_background(background.clone());
        }
        if let Some(path) = &self.css {
            let css = fs::read_to_string(path)
                .map_err(|source| ConfigError::Css { path: path.clone(), source })?;
            config = config.with_theme_css(css);
        }
        Ok(config)
    }

    pub fn build_renderer(&self) -> Result<Arc<dyn Renderer>, ConfigError> {
        let config = Arc::new(self.mermaid_config()?);

        match self.renderer_kind() {
            RendererKind::Cli => {
                let mut cli = MermaidCli::new(config);
                if let Some(program) = &self.mmdc {
                    cli = cli.with_program(program);
                }
                if let Some(path) = &self.puppeteer_config {
                    if !path.is_file() {
                        return Err(ConfigError::MissingPuppeteerConfig { path: path.clone() });
                    }
                    cli = cli.with_puppeteer_config(path);
                }
                if !cli.is_available() {
                    tracing::warn!(
                        program = %cli.program().display(),
                        "mermaid CLI not found; renders will fail until it is installed"
                    );
                }
                Ok(Arc::new(cli))
            }
            RendererKind::Remote => {
                let base_url = self.remote_url.as_deref().unwrap_or(DEFAULT_REMOTE_URL);
                Ok(Arc::new(RemoteRenderer::new(base_url, config)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RendererKind, ServeConfig, DEFAULT_HOST, DEFAULT_PORT};
    use crate::render::{Theme, DEFAULT_FONT_FAMILY};

    #[test]
    fn defaults_apply_to_unset_fields() {
        let config = ServeConfig::default();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.renderer_kind(), RendererKind::Cli);

        let mermaid = config.mermaid_config().expect("mermaid config");
        assert_eq!(mermaid.theme(), Theme::Default);
        assert_eq!(mermaid.font_family(), DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn parses_renderer_kinds() {
        assert_eq!("cli".parse::<RendererKind>().expect("cli"), RendererKind::Cli);
        assert_eq!("mmdc".parse::<RendererKind>().expect("mmdc"), RendererKind::Cli);
        assert_eq!("remote".parse::<RendererKind>().expect("remote"), RendererKind::Remote);
        assert_eq!("kroki".parse::<RendererKind>().expect("kroki"), RendererKind::Remote);
        assert!(matches!("wasm".parse::<RendererKind>(), Err(ConfigError::UnknownRenderer(_))));
    }

    #[test]
    fn css_file_becomes_theme_css() {
        let dir = tempfile::tempdir().expect("temp dir");
        let css = dir.path().join("overrides.css");
        std::fs::write(&css, ".edgeLabel { color: red; }").expect("write css");

        let config = ServeConfig {
            theme: Some(Theme::Forest),
            font_family: Some("Hand".to_owned()),
            background: Some("transparent".to_owned()),
            css: Some(css),
            ..ServeConfig::default()
        };
        let mermaid = config.mermaid_config().expect("mermaid config");
        assert_eq!(mermaid.theme(), Theme::Forest);
        assert_eq!(mermaid.font_family(), "Hand");
        assert_eq!(mermaid.background(), "transparent");
        assert_eq!(mermaid.theme_css(), Some(".edgeLabel { color: red; }"));
    }

    #[test]
    fn unreadable_css_fails_startup() {
        let config = ServeConfig {
            css: Some("/nonexistent/triton/overrides.css".into()),
            ..ServeConfig::default()
        };
        match config.mermaid_config() {
            Err(ConfigError::Css { path, .. }) => {
                assert_eq!(path, std::path::Path::new("/nonexistent/triton/overrides.css"));
            }
            other => panic!("expected Css error, got: {other:?}"),
        }
    }

    #[test]
    fn missing_puppeteer_config_fails_startup() {
        let config = ServeConfig {
            puppeteer_config: Some("/nonexistent/triton/puppeteer.json".into()),
            ..ServeConfig::default()
        };
        let err = config.build_renderer().err().expect("error");
        assert!(matches!(err, ConfigError::MissingPuppeteerConfig { .. }), "got: {err:?}");
    }

    #[test]
    fn builds_requested_renderer() {
        let remote = ServeConfig {
            renderer: Some(RendererKind::Remote),
            remote_url: Some("http://localhost:8000".to_owned()),
            ..ServeConfig::default()
        };
        assert_eq!(remote.build_renderer().expect("remote").name(), "remote");

        let cli = ServeConfig {
            mmdc: Some("/nonexistent/triton/mmdc".into()),
            ..ServeConfig::default()
        };
        assert_eq!(cli.build_renderer().expect("cli").name(), "mmdc");
    }
}
