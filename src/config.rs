//! Render configuration loaded from JSON.

use crate::style::{LineStyle, MarkerFace, MarkerKind, ResolvedStyle};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "COLORLINE_CONFIG";

/// Output and default-style settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// SVG width in pixels
    pub width: u32,
    /// SVG height in pixels
    pub height: u32,
    /// Background fill as `#rrggbb`
    pub background: String,
    pub title: Option<String>,
    /// Line width used when the call sets none
    pub line_width: f64,
    /// Marker size used when the call sets none
    pub marker_size: f64,
    pub line_style: LineStyle,
    pub marker: MarkerKind,
    /// Width of the colorbar strip in pixels
    pub colorbar_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background: "#ffffff".to_string(),
            title: None,
            line_width: 2.0,
            marker_size: 6.0,
            line_style: LineStyle::Solid,
            marker: MarkerKind::None,
            colorbar_width: 90,
        }
    }
}

impl RenderConfig {
    /// Parse a config file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from `$COLORLINE_CONFIG`, else defaults.
    /// A broken file named by the environment only produces a warning.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(env_path) => Self::from_file(&env_path).or_else(|e| {
                warn!(path = %env_path, error = %format!("{e:#}"), "ignoring config, using defaults");
                Ok(Self::default())
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.width < 100 || self.height < 100 {
            anyhow::bail!("width and height must be at least 100 pixels");
        }
        if !(self.line_width > 0.0 && self.marker_size > 0.0) {
            anyhow::bail!("line_width and marker_size must be positive");
        }
        parse_hex(&self.background)
            .with_context(|| format!("invalid background color '{}'", self.background))?;
        Ok(())
    }

    /// Background as 8-bit RGB.
    pub fn background_rgb(&self) -> (u8, u8, u8) {
        parse_hex(&self.background).unwrap_or((255, 255, 255))
    }

    /// Style a figure built from this config gives unset fields.
    pub fn default_style(&self) -> ResolvedStyle {
        ResolvedStyle {
            line_style: self.line_style,
            marker: self.marker,
            line_width: self.line_width,
            marker_size: self.marker_size,
            marker_face: MarkerFace::None,
            label: None,
        }
    }
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8)> {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        anyhow::bail!("expected #rrggbb");
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).context("invalid hex digit");
    Ok((byte(&h[..2])?, byte(&h[2..4])?, byte(&h[4..])?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"width": 640, "marker": "circle", "line_style": "none"}}"#).unwrap();
        let cfg = RenderConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.height, 800);
        let style = cfg.default_style();
        assert_eq!(style.marker, MarkerKind::Circle);
        assert_eq!(style.line_style, LineStyle::None);
    }

    #[test]
    fn rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r##"{{"background": "#12"}}"##).unwrap();
        assert!(RenderConfig::from_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"line_width": 0}}"#).unwrap();
        assert!(RenderConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(RenderConfig::load(Some(Path::new("/definitely/not/here.json"))).is_err());
    }

    #[test]
    fn background_parses() {
        let cfg = RenderConfig {
            background: "#10ff00".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.background_rgb(), (16, 255, 0));
    }
}
