//! Fit Selector: least-degraded, largest-scale pair the oracle accepts.

use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::constants::ScaleFactor;
use crate::layout::ladder::Candidate;
use crate::layout::oracle;
use crate::layout::page_writer::LayoutContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FitOutcome {
    /// The oracle accepted this pair.
    Fits { level: usize, scale: ScaleFactor },
    /// Nothing fit; most degraded candidate at the minimum scale.
    Degraded { level: usize, scale: ScaleFactor },
}

impl FitOutcome {
    pub fn level(self) -> usize {
        match self {
            FitOutcome::Fits { level, .. } | FitOutcome::Degraded { level, .. } => level,
        }
    }

    pub fn scale(self) -> ScaleFactor {
        match self {
            FitOutcome::Fits { scale, .. } | FitOutcome::Degraded { scale, .. } => scale,
        }
    }

    pub fn is_degraded(self) -> bool {
        matches!(self, FitOutcome::Degraded { .. })
    }
}

pub fn select(candidates: &[Candidate], ctx: &LayoutContext<'_>) -> FitOutcome {
    select_with(candidates, |candidate, scale| oracle::fits(candidate, scale, ctx))
}

/// Candidates in ladder order, each swept from full scale down; the first
/// accepted probe wins. Content outranks type size.
pub fn select_with<F>(candidates: &[Candidate], mut probe: F) -> FitOutcome
where
    F: FnMut(&Candidate, ScaleFactor) -> bool,
{
    let mut probes = 0usize;
    for candidate in candidates {
        for scale in ScaleFactor::sweep() {
            probes += 1;
            if probe(candidate, scale) {
                debug!(level = candidate.level, %scale, probes, "fit accepted");
                return FitOutcome::Fits {
                    level: candidate.level,
                    scale,
                };
            }
        }
    }

    let level = candidates.last().map(|c| c.level).unwrap_or(0);
    warn!(level, probes, "no candidate fits; using degraded fallback");
    FitOutcome::Degraded {
        level,
        scale: ScaleFactor::MIN,
    }
}
