//! Layout Oracle: height-only dry run of the page walk.

use serde::Serialize;

use crate::layout::constants::ScaleFactor;
use crate::layout::ladder::Candidate;
use crate::layout::page_writer::{LayoutContext, PageWriter, Surface};
use crate::layout::renderer::DrawCommand;
use crate::models::resume::ResumeDocument;

/// Surface that never builds a draw command.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasureOnly;

impl Surface for MeasureOnly {
    fn draw(&mut self, _command: impl FnOnce() -> DrawCommand) {}
}

/// Result of one dry run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    /// Cursor position when the walk stopped.
    pub end_y: f32,
    /// Points consumed below the top margin.
    pub used_height: f32,
    pub overflowed: bool,
}

pub fn measure(doc: &ResumeDocument, scale: ScaleFactor, ctx: &LayoutContext<'_>) -> Measurement {
    let (state, _) = PageWriter::new(ctx, scale, MeasureOnly).write_document(doc);
    Measurement {
        end_y: state.y(),
        used_height: state.used(),
        overflowed: state.is_overflowed(),
    }
}

/// Does `candidate` fit on one page at `scale`?
pub fn fits(candidate: &Candidate, scale: ScaleFactor, ctx: &LayoutContext<'_>) -> bool {
    !measure(&candidate.document, scale, ctx).overflowed
}
