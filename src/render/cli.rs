// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use super::{MermaidConfig, RenderError, Renderer, Svg};

const INPUT_FILENAME: &str = "diagram.mmd";
const OUTPUT_FILENAME: &str = "diagram.svg";
const CONFIG_FILENAME: &str = "mermaid.config.json";

/// Renders through the Mermaid CLI (`mmdc`).
///
/// Each call gets its own scratch directory holding the source, the generated Mermaid config and
/// the SVG written by `mmdc`; the directory is removed when the call returns.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: PathBuf,
    puppeteer_config: Option<PathBuf>,
    config: Arc<MermaidConfig>,
}

impl MermaidCli {
    pub const DEFAULT_PROGRAM: &'static str = "mmdc";

    pub fn new(config: Arc<MermaidConfig>) -> Self {
        Self { program: PathBuf::from(Self::DEFAULT_PROGRAM), puppeteer_config: None, config }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Passes `-p <file>` to `mmdc` (e.g. to disable the Chromium sandbox in containers).
    pub fn with_puppeteer_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.puppeteer_config = Some(path.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn config(&self) -> &MermaidConfig {
        &self.config
    }

    /// Whether `mmdc --version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn command(&self, input: &Path, output: &Path, config: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-c")
            .arg(config)
            .arg("-t")
            .arg(self.config.theme().as_str())
            .arg("-b")
            .arg(self.config.background());
        if let Some(puppeteer_config) = &self.puppeteer_config {
            cmd.arg("-p").arg(puppeteer_config);
        }
        cmd.arg("-q").stdin(Stdio::null());
        cmd
    }
}

impl Renderer for MermaidCli {
    fn render(&self, source: &str) -> Result<Svg, RenderError> {
        let scratch = tempfile::Builder::new()
            .prefix("triton-render-")
            .tempdir()
            .map_err(RenderError::io("failed to create scratch directory"))?;

        let input = scratch.path().join(INPUT_FILENAME);
        let output = scratch.path().join(OUTPUT_FILENAME);
        let config = scratch.path().join(CONFIG_FILENAME);

        fs::write(&input, source).map_err(RenderError::io("failed to write diagram source"))?;
        fs::write(&config, self.config.init_json()?)
            .map_err(RenderError::io("failed to write renderer config"))?;

        tracing::debug!(program = %self.program.display(), bytes = source.len(), "running mmdc");
        let result = self.command(&input, &output, &config).output().map_err(|source| {
            RenderError::Launch { program: self.program.display().to_string(), source }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::debug!(status = %result.status, stderr = %stderr, "mmdc rejected diagram");
            return Err(RenderError::from_diagnostics(&stderr));
        }

        let markup = match fs::read_to_string(&output) {
            Ok(markup) => markup,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(RenderError::NoMarkup),
            Err(err) => return Err(RenderError::io("failed to read rendered SVG")(err)),
        };
        Svg::new(markup)
    }

    fn name(&self) -> &'static str {
        "mmdc"
    }
}
