//! Geometry Cursor: vertical write position with a sticky overflow flag.
//!
//! Coordinates are PDF user space: `y` starts at the top content edge and
//! decreases towards `bottom`. One `GeometryState` per oracle probe and per
//! renderer pass; never pooled or reused.

use serde::Serialize;

/// Where a single layout attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPhase {
    Fresh,
    Writing,
    Overflowed,
    Complete,
}

#[derive(Debug, Clone)]
pub struct GeometryState {
    y: f32,
    top: f32,
    bottom: f32,
    overflowed: bool,
    touched: bool,
}

impl GeometryState {
    pub fn new(top: f32, bottom: f32) -> Self {
        GeometryState {
            y: top,
            top,
            bottom,
            overflowed: false,
            touched: false,
        }
    }

    /// Returns whether `height` more points fit above the bottom boundary.
    ///
    /// The first refusal flips `overflowed` for the rest of the attempt.
    pub fn ensure(&mut self, height: f32) -> bool {
        self.touched = true;
        if self.overflowed {
            return false;
        }
        if self.y - height < self.bottom {
            self.overflowed = true;
            return false;
        }
        true
    }

    /// Moves the cursor down. Callers `ensure` the same amount first.
    pub fn advance(&mut self, height: f32) {
        self.touched = true;
        self.y -= height;
    }

    /// `ensure` + `advance`; a no-op when the space is not there.
    pub fn gap(&mut self, height: f32) {
        if self.ensure(height) {
            self.advance(height);
        }
    }

    /// Lowers the cursor to `y` if that is below the current position.
    ///
    /// Used after side-by-side blocks (header text next to the photo) so the
    /// cursor ends under whichever column is taller.
    pub fn settle_at(&mut self, y: f32) -> bool {
        let drop = self.y - y;
        if drop <= 0.0 {
            return !self.overflowed;
        }
        if self.ensure(drop) {
            self.advance(drop);
            true
        } else {
            false
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Points consumed since the start of the attempt.
    pub fn used(&self) -> f32 {
        self.top - self.y
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn phase(&self) -> CursorPhase {
        match (self.overflowed, self.touched) {
            (true, _) => CursorPhase::Overflowed,
            (false, true) => CursorPhase::Writing,
            (false, false) => CursorPhase::Fresh,
        }
    }

    /// Terminal phase once the walk is done.
    pub fn finish(&self) -> CursorPhase {
        match self.phase() {
            CursorPhase::Overflowed => CursorPhase::Overflowed,
            CursorPhase::Fresh | CursorPhase::Writing | CursorPhase::Complete => {
                CursorPhase::Complete
            }
        }
    }
}
