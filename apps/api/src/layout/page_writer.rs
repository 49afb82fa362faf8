//! Section traversal shared by the oracle and the renderer.
//!
//! There is exactly one walk over the document. It is generic over a `Surface`:
//! the oracle plugs in a surface that discards draw commands, the renderer one
//! that records them. Every `ensure`/`advance` therefore happens identically in
//! both paths, so "fits" and "rendered without overflow" cannot disagree.
//!
//! Section order: header, divider, summary, skills, experience, projects,
//! education, certifications. A section with no content contributes nothing,
//! not even its title.

use serde::{Deserialize, Serialize};

use crate::layout::constants::{ScaleFactor, ScaledLayout, TextRole, Typography, LAYOUT};
use crate::layout::cursor::GeometryState;
use crate::layout::font_metrics::{FontVariant, TextMetrics};
use crate::layout::line_wrap::wrap_lines;
use crate::layout::renderer::DrawCommand;
use crate::models::resume::{
    date_range, join_non_empty, pipe_pair, Header, ResumeDocument, Section,
};

// ────────────────────────────────────────────────────────────────────────────
// Style and context
// ────────────────────────────────────────────────────────────────────────────

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const TEXT: Rgb = Rgb { r: 0.11, g: 0.11, b: 0.13 };
    pub const MUTED: Rgb = Rgb { r: 0.38, g: 0.40, b: 0.44 };

    /// Parses `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// What occupies the header photo slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    /// No slot; header text uses the full width.
    Off,
    /// Slot reserved, drawn as an empty frame.
    Placeholder,
    /// Slot reserved, filled with the supplied image.
    Image,
}

impl PhotoSlot {
    pub fn is_reserved(self) -> bool {
        self != PhotoSlot::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    pub accent: Rgb,
    pub photo: PhotoSlot,
}

impl Default for PageStyle {
    fn default() -> Self {
        PageStyle {
            accent: Rgb { r: 0.12, g: 0.23, b: 0.37 },
            photo: PhotoSlot::Off,
        }
    }
}

/// Everything a layout attempt reads besides the candidate and the scale.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub metrics: &'a dyn TextMetrics,
    pub style: PageStyle,
}

impl<'a> LayoutContext<'a> {
    pub fn new(metrics: &'a dyn TextMetrics, style: PageStyle) -> Self {
        LayoutContext { metrics, style }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Surface
// ────────────────────────────────────────────────────────────────────────────

/// Receiver of draw commands. Commands are built lazily so a measuring
/// surface never pays for them.
pub trait Surface {
    fn draw(&mut self, command: impl FnOnce() -> DrawCommand);
}

// ────────────────────────────────────────────────────────────────────────────
// Writer
// ────────────────────────────────────────────────────────────────────────────

pub struct PageWriter<'a, S: Surface> {
    ctx: &'a LayoutContext<'a>,
    layout: ScaledLayout,
    state: GeometryState,
    surface: S,
}

impl<'a, S: Surface> PageWriter<'a, S> {
    /// Fresh cursor at the top content edge, bottom boundary at the margin.
    pub fn new(ctx: &'a LayoutContext<'a>, scale: ScaleFactor, surface: S) -> Self {
        let layout = LAYOUT.scaled(scale);
        let top = layout.page_height() - layout.margin();
        PageWriter {
            ctx,
            layout,
            state: GeometryState::new(top, layout.margin()),
            surface,
        }
    }

    /// Walks the whole document; stops early once the page has overflowed.
    pub fn write_document(mut self, doc: &ResumeDocument) -> (GeometryState, S) {
        let sections: [fn(&mut Self, &ResumeDocument); 8] = [
            Self::header,
            Self::divider,
            Self::summary,
            Self::skills,
            Self::experience,
            Self::projects,
            Self::education,
            Self::certifications,
        ];
        for section in sections {
            if self.state.is_overflowed() {
                break;
            }
            section(&mut self, doc);
        }
        (self.state, self.surface)
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn header(&mut self, doc: &ResumeDocument) {
        let header: &Header = &doc.header;
        let slot = self.ctx.style.photo;
        let x = self.layout.margin();
        let full = self.layout.content_width();
        let photo_size = self.layout.photo_size();
        let width = if slot.is_reserved() {
            (full - photo_size - self.layout.header_gap()).max(0.0)
        } else {
            full
        };
        let top = self.state.y();
        let accent = self.ctx.style.accent;

        // Name and role title always hold their line, even when blank.
        let mut lines = vec![
            (header.name.clone(), TextRole::Name, FontVariant::Bold, accent),
            (header.role_title.clone(), TextRole::RoleTitle, FontVariant::Regular, Rgb::TEXT),
        ];
        for (text, role) in [
            (header.contact_line(), TextRole::Contact),
            (header.link_line(), TextRole::Link),
        ] {
            if !text.is_empty() {
                lines.push((text, role, FontVariant::Regular, Rgb::MUTED));
            }
        }
        for (text, role, variant, color) in lines {
            if !self.text_block(&text, role, variant, x, width, color) {
                return;
            }
        }

        if slot.is_reserved() {
            // The cursor ends under whichever column is taller.
            let photo_bottom = top - photo_size;
            if self.state.settle_at(photo_bottom) {
                let photo_x = x + full - photo_size;
                self.surface.draw(|| match slot {
                    PhotoSlot::Image => DrawCommand::Photo {
                        x: photo_x,
                        y: photo_bottom,
                        size: photo_size,
                    },
                    _ => DrawCommand::PhotoFrame {
                        x: photo_x,
                        y: photo_bottom,
                        size: photo_size,
                        color: Rgb::MUTED,
                    },
                });
            }
        }
    }

    fn divider(&mut self, _doc: &ResumeDocument) {
        let band = self.layout.header_to_body_gap();
        if !self.state.ensure(band) {
            return;
        }
        let y = self.state.y() - band / 2.0;
        self.full_rule(y);
        self.state.advance(band);
    }

    fn summary(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Summary) {
            return;
        }
        let x = self.layout.margin();
        let width = self.layout.content_width();
        self.text_block(
            &doc.summary,
            TextRole::Body,
            FontVariant::Regular,
            x,
            width,
            Rgb::TEXT,
        );
    }

    fn skills(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Skills) {
            return;
        }
        let x = self.layout.margin();
        let width = self.layout.content_width();
        for (label, items) in doc.skills.buckets() {
            let line = format!("{label}: {}", join_non_empty(items.iter()));
            let fits = self.text_block(
                &line,
                TextRole::BodyTight,
                FontVariant::Regular,
                x,
                width,
                Rgb::TEXT,
            );
            if !fits {
                return;
            }
        }
    }

    fn experience(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Experience) {
            return;
        }
        for (i, entry) in doc.experience.iter().enumerate() {
            if i > 0 {
                self.state.gap(self.layout.entry_gap());
            }
            let heading = pipe_pair(&entry.role, &entry.company);
            let dates = date_range(&entry.start_date, &entry.end_date);
            if !self.paired_heading(&heading, &dates) {
                return;
            }
            if !entry.location.is_empty() && !self.meta_line(&entry.location) {
                return;
            }
            if !self.bullet_list(&entry.bullets) {
                return;
            }
        }
    }

    fn projects(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Projects) {
            return;
        }
        for (i, project) in doc.projects.iter().enumerate() {
            if i > 0 {
                self.state.gap(self.layout.entry_gap());
            }
            let link = project.link.as_deref().unwrap_or_default();
            if !self.paired_heading(&project.name, link) {
                return;
            }
            let stack = join_non_empty(project.tech_stack.iter());
            if !stack.is_empty() && !self.meta_line(&stack) {
                return;
            }
            if !self.bullet_list(&project.bullets) {
                return;
            }
        }
    }

    fn education(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Education) {
            return;
        }
        for (i, entry) in doc.education.iter().enumerate() {
            if i > 0 {
                self.state.gap(self.layout.entry_gap());
            }
            let heading = pipe_pair(&entry.degree, &entry.institution);
            let dates = date_range(&entry.start_date, &entry.end_date);
            if !self.paired_heading(&heading, &dates) || !self.bullet_list(&entry.details) {
                return;
            }
        }
    }

    fn certifications(&mut self, doc: &ResumeDocument) {
        if !self.open_section(doc, Section::Certifications) {
            return;
        }
        self.bullet_list(&doc.certifications);
    }

    // ── building blocks ─────────────────────────────────────────────────────

    /// Title block for `section`, or false when it has no content or no room.
    fn open_section(&mut self, doc: &ResumeDocument, section: Section) -> bool {
        doc.has_section(section) && self.section_title(section.title())
    }

    /// Section gap, title line and the accent rule under it.
    fn section_title(&mut self, title: &str) -> bool {
        self.state.gap(self.layout.section_gap());
        let t = self.layout.typography(TextRole::SectionTitle);
        let band = t.line_gap + self.layout.title_rule_gap();
        if !self.state.ensure(band) {
            return false;
        }
        let top = self.state.y();
        let x = self.layout.margin();
        let accent = self.ctx.style.accent;
        let label = title.to_uppercase();
        self.surface.draw(move || DrawCommand::Text {
            x,
            y: baseline(top, t),
            variant: FontVariant::Bold,
            size: t.font_size,
            text: label,
            color: accent,
        });
        self.full_rule(top - t.line_gap);
        self.state.advance(band);
        true
    }

    /// Wrapped text as one atomic block: either every line fits or none is drawn.
    fn text_block(
        &mut self,
        text: &str,
        role: TextRole,
        variant: FontVariant,
        x: f32,
        width: f32,
        color: Rgb,
    ) -> bool {
        let t = self.layout.typography(role);
        let lines = wrap_lines(text, width, variant, t.font_size, self.ctx.metrics);
        let height = lines.len() as f32 * t.line_gap;
        if !self.state.ensure(height) {
            return false;
        }
        let top = self.state.y();
        self.draw_lines(lines, top, x, t, variant, color);
        self.state.advance(height);
        true
    }

    /// Bold left run paired with a right-aligned meta run on its first line.
    fn paired_heading(&mut self, left: &str, right: &str) -> bool {
        let t = self.layout.typography(TextRole::Body);
        let meta = self.layout.typography(TextRole::Meta);
        let x = self.layout.margin();
        let full = self.layout.content_width();
        let right_width = if right.is_empty() {
            0.0
        } else {
            self.ctx.metrics.width(right, FontVariant::Regular, meta.font_size)
        };
        let reserved = if right.is_empty() {
            0.0
        } else {
            right_width + self.layout.pair_gap()
        };
        let left_width = (full - reserved).max(0.0);
        let lines = wrap_lines(left, left_width, FontVariant::Bold, t.font_size, self.ctx.metrics);
        let height = lines.len() as f32 * t.line_gap;
        if !self.state.ensure(height) {
            return false;
        }
        let top = self.state.y();
        self.draw_lines(lines, top, x, t, FontVariant::Bold, Rgb::TEXT);
        if !right.is_empty() {
            let right_text = right.to_string();
            let right_x = x + full - right_width;
            self.surface.draw(move || DrawCommand::Text {
                x: right_x,
                y: baseline(top, t),
                variant: FontVariant::Regular,
                size: meta.font_size,
                text: right_text,
                color: Rgb::MUTED,
            });
        }
        self.state.advance(height);
        true
    }

    fn meta_line(&mut self, text: &str) -> bool {
        let x = self.layout.margin();
        let width = self.layout.content_width();
        self.text_block(text, TextRole::Meta, FontVariant::Regular, x, width, Rgb::MUTED)
    }

    /// Indented items, each with a filled circle beside its first line.
    fn bullet_list(&mut self, items: &[String]) -> bool {
        let t = self.layout.typography(TextRole::BodyTight);
        let indent = self.layout.bullet_indent();
        let radius = self.layout.bullet_radius();
        let x = self.layout.margin();
        let width = (self.layout.content_width() - indent).max(0.0);
        let accent = self.ctx.style.accent;
        for item in items {
            let lines =
                wrap_lines(item, width, FontVariant::Regular, t.font_size, self.ctx.metrics);
            let height = lines.len() as f32 * t.line_gap;
            if !self.state.ensure(height) {
                return false;
            }
            let top = self.state.y();
            let cy = baseline(top, t) + t.font_size * 0.3;
            self.surface.draw(move || DrawCommand::Bullet {
                cx: x + indent / 2.0,
                cy,
                radius,
                color: accent,
            });
            self.draw_lines(lines, top, x + indent, t, FontVariant::Regular, Rgb::TEXT);
            self.state.advance(height);
        }
        true
    }

    fn full_rule(&mut self, y: f32) {
        let x1 = self.layout.margin();
        let x2 = x1 + self.layout.content_width();
        let thickness = self.layout.rule_thickness();
        let color = self.ctx.style.accent;
        self.surface.draw(move || DrawCommand::Rule {
            x1,
            x2,
            y,
            thickness,
            color,
        });
    }

    fn draw_lines(
        &mut self,
        lines: Vec<String>,
        top: f32,
        x: f32,
        t: Typography,
        variant: FontVariant,
        color: Rgb,
    ) {
        for (i, line) in lines.into_iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = baseline(top - i as f32 * t.line_gap, t);
            self.surface.draw(move || DrawCommand::Text {
                x,
                y,
                variant,
                size: t.font_size,
                text: line,
                color,
            });
        }
    }
}

/// Baseline of a line whose slot starts at `line_top`: the font box is
/// centred in the line gap, baseline at 80% of the font size below its top.
fn baseline(line_top: f32, t: Typography) -> f32 {
    line_top - (t.line_gap - t.font_size) / 2.0 - t.font_size * 0.8
}
