//! Ladder → selector → renderer, run once per request.

use serde::Serialize;
use tracing::info;

use crate::layout::constants::ScaleFactor;
use crate::layout::fit_selector::{self, FitOutcome};
use crate::layout::ladder::{build_candidates, Candidate};
use crate::layout::page_writer::LayoutContext;
use crate::layout::renderer::{render, RenderedPage};
use crate::models::resume::ResumeDocument;

/// The selected decision and the page drawn from it.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub candidate: Candidate,
    pub scale: ScaleFactor,
    pub outcome: FitOutcome,
    /// True when nothing fit and the fallback pair was used.
    pub degraded: bool,
    /// True when any content was cut (level > 0).
    pub truncated: bool,
    pub page: RenderedPage,
}

impl LayoutResult {
    pub fn level(&self) -> usize {
        self.candidate.level
    }
}

/// Searches for the best pair and renders it. Never fails: a document that
/// fits nowhere is rendered with the degraded fallback.
pub fn fit_and_render(source: &ResumeDocument, ctx: &LayoutContext<'_>) -> LayoutResult {
    let candidates = build_candidates(source);
    let outcome = fit_selector::select(&candidates, ctx);
    let scale = outcome.scale();
    let candidate = candidates
        .into_iter()
        .find(|c| c.level == outcome.level())
        .unwrap_or_else(|| Candidate::source(source.clone()));

    let page = render(&candidate, scale, ctx);
    info!(
        level = candidate.level,
        %scale,
        degraded = outcome.is_degraded(),
        summary_truncated = candidate.summary_truncated,
        overflowed = page.overflowed(),
        commands = page.commands.len(),
        "layout selected"
    );

    LayoutResult {
        truncated: candidate.is_degraded(),
        degraded: outcome.is_degraded(),
        candidate,
        scale,
        outcome,
        page,
    }
}
