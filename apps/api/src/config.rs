use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::layout::Rgb;

const DEFAULT_ACCENT_COLOR: &str = "#1f3a5f";
const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Plain/bold font files. `None` uses the built-in Helvetica pairing.
    pub font_paths: Option<(PathBuf, PathBuf)>,
    pub default_accent: Rgb,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let regular = optional_env("FONT_REGULAR_PATH");
        let bold = optional_env("FONT_BOLD_PATH");
        let font_paths = match (regular, bold) {
            (Some(regular), Some(bold)) => Some((PathBuf::from(regular), PathBuf::from(bold))),
            (None, None) => None,
            _ => bail!("FONT_REGULAR_PATH and FONT_BOLD_PATH must be set together"),
        };

        let accent_hex = optional_env("DEFAULT_ACCENT_COLOR")
            .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string());
        let default_accent = Rgb::from_hex(&accent_hex)
            .with_context(|| format!("DEFAULT_ACCENT_COLOR '{accent_hex}' is not #rrggbb"))?;

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            font_paths,
            default_accent,
            max_body_bytes: match optional_env("MAX_BODY_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_BODY_BYTES must be a byte count")?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
        })
    }
}

impl Config {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset. Tracing targets
    /// use the crate name (`onepage_api`), not the package name.
    pub fn log_directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.rust_log)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            font_paths: None,
            default_accent: Rgb {
                r: f32::from(0x1f_u8) / 255.0,
                g: f32::from(0x3a_u8) / 255.0,
                b: f32::from(0x5f_u8) / 255.0,
            },
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
