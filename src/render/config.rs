// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Font stack handed to Mermaid when none is configured.
pub const DEFAULT_FONT_FAMILY: &str = "HanyiSentyPea, Hand, Arial, Helvetica, sans-serif";

pub const DEFAULT_BACKGROUND: &str = "white";

/// Built-in Mermaid themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Neutral,
    Dark,
    Forest,
    Base,
}

impl Theme {
    pub const ALL: [Theme; 5] =
        [Self::Default, Self::Neutral, Self::Dark, Self::Forest, Self::Base];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Neutral => "neutral",
            Self::Dark => "dark",
            Self::Forest => "forest",
            Self::Base => "base",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme `{name}` (expected one of: default, neutral, dark, forest, base)")]
pub struct UnknownThemeError {
    name: String,
}

impl FromStr for Theme {
    type Err = UnknownThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownThemeError { name: trimmed.to_owned() })
    }
}

/// Renderer configuration shared by every request.
///
/// Built once at startup and only ever read afterwards; backends hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidConfig {
    theme: Theme,
    font_family: String,
    theme_css: Option<String>,
    background: String,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            theme_css: None,
            background: DEFAULT_BACKGROUND.to_owned(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitDirective<'a> {
    start_on_load: bool,
    theme: Theme,
    font_family: &'a str,
    #[serde(rename = "themeCSS", skip_serializing_if = "Option::is_none")]
    theme_css: Option<&'a str>,
}

impl MermaidConfig {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_theme_css(mut self, css: impl Into<String>) -> Self {
        let css = css.into();
        self.theme_css = (!css.trim().is_empty()).then_some(css);
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn theme_css(&self) -> Option<&str> {
        self.theme_css.as_deref()
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    /// Mermaid `initialize` options as JSON (the Mermaid CLI `--configFile` format).
    pub fn init_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&InitDirective {
            start_on_load: false,
            theme: self.theme,
            font_family: &self.font_family,
            theme_css: self.theme_css.as_deref(),
        })
    }

    /// `%%{init: ...}%%` line that applies this configuration from inside a diagram.
    pub fn init_directive(&self) -> Result<String, serde_json::Error> {
        Ok(format!("%%{{init: {}}}%%\n", self.init_json()?))
    }
}

#[cfg(test)]
mod tests {
    use super::{MermaidConfig, Theme, DEFAULT_FONT_FAMILY};
    use rstest::rstest;

    #[rstest]
    #[case("default", Theme::Default)]
    #[case("dark", Theme::Dark)]
    #[case(" Forest ", Theme::Forest)]
    #[case("NEUTRAL", Theme::Neutral)]
    #[case("base", Theme::Base)]
    fn parses_theme_names(#[case] raw: &str, #[case] expected: Theme) {
        assert_eq!(raw.parse::<Theme>().expect("theme"), expected);
    }

    #[test]
    fn rejects_unknown_theme() {
        let err = "solarized".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("solarized"), "unexpected message: {err}");
    }

    #[test]
    fn default_config_uses_default_theme_and_font_stack() {
        let config = MermaidConfig::default();
        assert_eq!(config.theme(), Theme::Default);
        assert_eq!(config.font_family(), DEFAULT_FONT_FAMILY);
        assert_eq!(config.theme_css(), None);
        assert_eq!(config.background(), "white");
    }

    #[test]
    fn init_json_carries_theme_font_and_css() {
        let config = MermaidConfig::default()
            .with_theme(Theme::Forest)
            .with_font_family("Hand, sans-serif")
            .with_theme_css(".node rect { rx: 4px; }");

        let json: serde_json::Value =
            serde_json::from_str(&config.init_json().expect("init json")).expect("valid json");
        assert_eq!(json["startOnLoad"], false);
        assert_eq!(json["theme"], "forest");
        assert_eq!(json["fontFamily"], "Hand, sans-serif");
        assert_eq!(json["themeCSS"], ".node rect { rx: 4px; }");
    }

    #[test]
    fn blank_theme_css_is_dropped() {
        let config = MermaidConfig::default().with_theme_css("  \n");
        assert_eq!(config.theme_css(), None);

        let json: serde_json::Value =
            serde_json::from_str(&config.init_json().expect("init json")).expect("valid json");
        assert!(json.get("themeCSS").is_none());
    }

    #[test]
    fn init_directive_wraps_json_on_its_own_line() {
        let config = MermaidConfig::default().with_theme(Theme::Dark);
        let directive = config.init_directive().expect("directive");
        assert!(directive.starts_with("%%{init: {"), "{directive}");
        assert!(directive.ends_with("}%%\n"), "{directive}");
        assert!(directive.contains(r#""theme":"dark""#), "{directive}");
    }
}
