//! Layout constants and the uniform scale factor.
//!
//! `LAYOUT` is the single process-wide table. Oracle and renderer never read it
//! directly: they go through `ScaledLayout`, so every typographic dimension is
//! scaled by exactly the same factor in both paths. Page size and page margin
//! are physical and stay fixed.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Scale factor
// ────────────────────────────────────────────────────────────────────────────

/// Smallest scale, in hundredths.
pub const MIN_SCALE: u16 = 75;
/// Step between probed scales, in hundredths.
pub const SCALE_STEP: u16 = 5;

/// Uniform multiplier applied to every font size, line gap and spacing constant.
///
/// Stored as integer hundredths so the sweep `1.00, 0.95, …, 0.75` is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScaleFactor(u16);

impl ScaleFactor {
    pub const FULL: ScaleFactor = ScaleFactor(100);
    pub const MIN: ScaleFactor = ScaleFactor(MIN_SCALE);

    /// Clamps `hundredths` into `[MIN_SCALE, 100]`.
    pub fn from_hundredths(hundredths: u16) -> Self {
        ScaleFactor(hundredths.clamp(MIN_SCALE, 100))
    }

    pub fn hundredths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// Scales from 1.0 down to `MIN_SCALE`, largest first.
    pub fn sweep() -> impl Iterator<Item = ScaleFactor> {
        (MIN_SCALE..=100)
            .rev()
            .step_by(SCALE_STEP as usize)
            .map(ScaleFactor)
    }
}

impl std::fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text roles
// ────────────────────────────────────────────────────────────────────────────

/// Semantic role of a text run; each role has its own size and line gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Name,
    RoleTitle,
    Contact,
    Link,
    SectionTitle,
    Body,
    BodyTight,
    Meta,
}

impl TextRole {
    pub const ALL: [TextRole; 8] = [
        TextRole::Name,
        TextRole::RoleTitle,
        TextRole::Contact,
        TextRole::Link,
        TextRole::SectionTitle,
        TextRole::Body,
        TextRole::BodyTight,
        TextRole::Meta,
    ];
}

/// Font size and line advance for one role, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub font_size: f32,
    pub line_gap: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Constant table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConstants {
    pub page_width: f32,
    pub page_height: f32,
    pub page_margin: f32,
    pub photo_size: f32,
    /// Horizontal gap between the header text column and the photo slot.
    pub header_gap: f32,
    /// Space between the header block and the divider below it.
    pub header_to_body_gap: f32,
    /// Space above each section title.
    pub section_gap: f32,
    /// Space between a section title rule and the section body.
    pub title_rule_gap: f32,
    /// Space after each experience / project / education entry.
    pub entry_gap: f32,
    pub bullet_indent: f32,
    pub bullet_radius: f32,
    pub rule_thickness: f32,
    /// Minimum horizontal space between a left run and its right-aligned partner.
    pub pair_gap: f32,
    pub name: Typography,
    pub role_title: Typography,
    pub contact: Typography,
    pub link: Typography,
    pub section_title: Typography,
    pub body: Typography,
    pub body_tight: Typography,
    pub meta: Typography,
}

/// US Letter, half-inch margins.
pub static LAYOUT: LayoutConstants = LayoutConstants {
    page_width: 612.0,
    page_height: 792.0,
    page_margin: 36.0,
    photo_size: 72.0,
    header_gap: 14.0,
    header_to_body_gap: 8.0,
    section_gap: 8.0,
    title_rule_gap: 4.0,
    entry_gap: 5.0,
    bullet_indent: 10.0,
    bullet_radius: 1.3,
    rule_thickness: 0.75,
    pair_gap: 8.0,
    name: Typography { font_size: 22.0, line_gap: 26.0 },
    role_title: Typography { font_size: 12.0, line_gap: 15.0 },
    contact: Typography { font_size: 9.5, line_gap: 12.0 },
    link: Typography { font_size: 9.0, line_gap: 11.5 },
    section_title: Typography { font_size: 11.0, line_gap: 14.0 },
    body: Typography { font_size: 9.5, line_gap: 12.5 },
    body_tight: Typography { font_size: 9.0, line_gap: 11.5 },
    meta: Typography { font_size: 8.5, line_gap: 11.0 },
};

impl LayoutConstants {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.page_margin
    }

    pub fn typography(&self, role: TextRole) -> Typography {
        match role {
            TextRole::Name => self.name,
            TextRole::RoleTitle => self.role_title,
            TextRole::Contact => self.contact,
            TextRole::Link => self.link,
            TextRole::SectionTitle => self.section_title,
            TextRole::Body => self.body,
            TextRole::BodyTight => self.body_tight,
            TextRole::Meta => self.meta,
        }
    }

    pub fn scaled(&'static self, scale: ScaleFactor) -> ScaledLayout {
        ScaledLayout { base: self, factor: scale.value() }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scaled view
// ────────────────────────────────────────────────────────────────────────────

/// Per-attempt view over `LAYOUT`; the only way layout code reads dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ScaledLayout {
    base: &'static LayoutConstants,
    factor: f32,
}

impl ScaledLayout {
    pub fn page_width(&self) -> f32 {
        self.base.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.base.page_height
    }

    pub fn margin(&self) -> f32 {
        self.base.page_margin
    }

    pub fn content_width(&self) -> f32 {
        self.base.content_width()
    }

    pub fn typography(&self, role: TextRole) -> Typography {
        let t = self.base.typography(role);
        Typography {
            font_size: t.font_size * self.factor,
            line_gap: t.line_gap * self.factor,
        }
    }

    pub fn photo_size(&self) -> f32 {
        self.base.photo_size * self.factor
    }

    pub fn header_gap(&self) -> f32 {
        self.base.header_gap * self.factor
    }

    pub fn header_to_body_gap(&self) -> f32 {
        self.base.header_to_body_gap * self.factor
    }

    pub fn section_gap(&self) -> f32 {
        self.base.section_gap * self.factor
    }

    pub fn title_rule_gap(&self) -> f32 {
        self.base.title_rule_gap * self.factor
    }

    pub fn entry_gap(&self) -> f32 {
        self.base.entry_gap * self.factor
    }

    pub fn bullet_indent(&self) -> f32 {
        self.base.bullet_indent * self.factor
    }

    pub fn bullet_radius(&self) -> f32 {
        self.base.bullet_radius * self.factor
    }

    pub fn rule_thickness(&self) -> f32 {
        self.base.rule_thickness * self.factor
    }

    pub fn pair_gap(&self) -> f32 {
        self.base.pair_gap * self.factor
    }
}
