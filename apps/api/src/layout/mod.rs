// One-page layout engine.
// Flow: ladder (candidates) → fit selector (oracle probes) → renderer.
// The engine is synchronous and CPU-bound; HTTP callers run it inside
// tokio::task::spawn_blocking.

pub mod constants;
pub mod cursor;
pub mod fit_selector;
pub mod font_metrics;
pub mod ladder;
pub mod line_wrap;
pub mod oracle;
pub mod page_writer;
pub mod pipeline;
pub mod renderer;

use thiserror::Error;

// Re-export the public API consumed by export and the HTTP handlers.
pub use constants::{ScaleFactor, TextRole, LAYOUT};
pub use font_metrics::{FontPair, FontVariant, TextMetrics};
pub use page_writer::{LayoutContext, PageStyle, PhotoSlot, Rgb};
pub use pipeline::{fit_and_render, LayoutResult};
pub use renderer::{DrawCommand, RenderedPage};

/// Errors the layout engine and its exporters can raise.
///
/// Layout itself never fails; only loading fonts and producing output can.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("font unavailable at {path}: {reason}")]
    FontUnavailable { path: String, reason: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("photo error: {0}")]
    Photo(String),
}
