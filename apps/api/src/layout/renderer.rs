//! Renderer: replays the shared traversal and records what to draw.

use serde::Serialize;

use crate::layout::constants::{ScaleFactor, LAYOUT};
use crate::layout::cursor::CursorPhase;
use crate::layout::font_metrics::FontVariant;
use crate::layout::ladder::Candidate;
use crate::layout::page_writer::{LayoutContext, PageWriter, Rgb, Surface};

/// One drawing instruction in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Text run; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        variant: FontVariant,
        size: f32,
        text: String,
        color: Rgb,
    },
    /// Horizontal rule centred on `y`.
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    /// Filled circle.
    Bullet {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgb,
    },
    /// Profile photo; `(x, y)` is the bottom-left corner.
    Photo { x: f32, y: f32, size: f32 },
    /// Empty photo frame.
    PhotoFrame {
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
    },
}

/// Surface that keeps every command in drawing order.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl Surface for DrawList {
    fn draw(&mut self, command: impl FnOnce() -> DrawCommand) {
        self.commands.push(command());
    }
}

/// A finished single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub width: f32,
    pub height: f32,
    pub scale: ScaleFactor,
    pub level: usize,
    pub commands: Vec<DrawCommand>,
    /// `Complete`, or `Overflowed` when drawing stopped early.
    pub phase: CursorPhase,
    /// Points consumed below the top margin.
    pub used_height: f32,
}

impl RenderedPage {
    pub fn overflowed(&self) -> bool {
        self.phase == CursorPhase::Overflowed
    }

    pub fn has_photo(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Photo { .. }))
    }
}

/// Draws `candidate` at `scale`.
///
/// Still returns a page when the content overflows; drawing simply stops at
/// the first block that does not fit.
pub fn render(candidate: &Candidate, scale: ScaleFactor, ctx: &LayoutContext<'_>) -> RenderedPage {
    let writer = PageWriter::new(ctx, scale, DrawList::default());
    let (state, surface) = writer.write_document(&candidate.document);
    RenderedPage {
        width: LAYOUT.page_width,
        height: LAYOUT.page_height,
        scale,
        level: candidate.level,
        commands: surface.commands,
        phase: state.finish(),
        used_height: state.used(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::layout::font_metrics::{FontPair, TextMetrics};
    use crate::layout::ladder::{build_candidates, Candidate};
    use crate::layout::oracle::fits;
    use crate::layout::page_writer::{PageStyle, PhotoSlot};
    use crate::models::resume::{Education, Experience, Header, Project, ResumeDocument, Skills};

    pub(crate) fn sample_document() -> ResumeDocument {
        ResumeDocument {
            header: Header {
                name: "Ada Lovelace".to_string(),
                role_title: "Staff Software Engineer".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0000".to_string(),
                location: "London, UK".to_string(),
                links: vec!["github.com/ada".to_string(), "ada.dev".to_string()],
                photo: None,
            },
            summary: "Engineer focused on compilers and numerical computing.".to_string(),
            skills: Skills {
                core: vec!["Rust".to_string(), "Distributed systems".to_string()],
                tools: vec!["Tokio".to_string(), "Postgres".to_string()],
                soft: vec![],
            },
            experience: vec![Experience {
                company: "Analytical Engines Ltd".to_string(),
                role: "Staff Engineer".to_string(),
                location: "London".to_string(),
                start_date: "2019".to_string(),
                end_date: "Present".to_string(),
                bullets: vec![
                    "Designed the first general purpose program for the engine".to_string(),
                    "Reduced computation errors by 40% across the Bernoulli tables".to_string(),
                ],
            }],
            projects: vec![],
            education: vec![Education {
                institution: "University of London".to_string(),
                degree: "Mathematics".to_string(),
                start_date: "1835".to_string(),
                end_date: "1840".to_string(),
                details: vec![],
            }],
            certifications: vec![],
        }
    }

    pub(crate) fn crowded_document() -> ResumeDocument {
        let bullet = "Owned the rollout of a multi-region event pipeline processing two billion \
                      events per day with exactly-once delivery and automated failover drills";
        ResumeDocument {
            summary: "Pragmatic builder of reliable distributed platforms. ".repeat(58),
            experience: (0..8)
                .map(|i| Experience {
                    company: format!("Company {i}"),
                    role: "Senior Engineer".to_string(),
                    location: "Remote".to_string(),
                    start_date: "2015".to_string(),
                    end_date: "2018".to_string(),
                    bullets: vec![bullet.to_string(); 6],
                })
                .collect(),
            projects: (0..3)
                .map(|i| Project {
                    name: format!("Project {i}"),
                    tech_stack: vec!["Rust".to_string(), "Kafka".to_string()],
                    link: Some(format!("github.com/ada/project-{i}")),
                    bullets: vec![bullet.to_string(); 3],
                })
                .collect(),
            ..sample_document()
        }
    }

    fn text_runs(page: &RenderedPage) -> Vec<&str> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // ── determinism & agreement ─────────────────────────────────────────────

    #[test]
    fn test_render_is_deterministic() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let candidate = Candidate::source(sample_document());
        let a = render(&candidate, ScaleFactor::FULL, &ctx);
        let b = render(&candidate, ScaleFactor::FULL, &ctx);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn test_oracle_and_renderer_agree_everywhere() {
        let fonts = FontPair::standard();
        for photo in [PhotoSlot::Off, PhotoSlot::Placeholder] {
            let ctx = LayoutContext::new(&fonts, PageStyle { photo, ..PageStyle::default() });
            for doc in [sample_document(), crowded_document()] {
                for candidate in build_candidates(&doc) {
                    for scale in ScaleFactor::sweep() {
                        let page = render(&candidate, scale, &ctx);
                        assert_eq!(
                            fits(&candidate, scale, &ctx),
                            !page.overflowed(),
                            "disagreement at level {} scale {scale}",
                            candidate.level
                        );
                    }
                }
            }
        }
    }

    // ── drawing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_small_document_renders_completely() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        assert_eq!(page.phase, CursorPhase::Complete);
        let texts = text_runs(&page);
        assert_eq!(texts.first().copied(), Some("Ada Lovelace"));
        assert!(texts.contains(&"SUMMARY"));
        assert!(texts.contains(&"EXPERIENCE"));
        assert!(texts.contains(&"Staff Engineer | Analytical Engines Ltd"));
        assert!(texts.contains(&"2019 – Present"));
        assert!(!texts.contains(&"PROJECTS"), "empty section must not be titled");
        assert!(!texts.contains(&"CERTIFICATIONS"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let mut doc = sample_document();
        doc.certifications = vec!["AWS Solutions Architect".to_string()];
        let page = render(&Candidate::source(doc), ScaleFactor::FULL, &ctx);
        let titles: Vec<&str> = text_runs(&page)
            .into_iter()
            .filter(|t| t.chars().all(|c| c.is_ascii_uppercase()) && t.len() > 3)
            .collect();
        assert_eq!(
            titles,
            vec!["SUMMARY", "SKILLS", "EXPERIENCE", "EDUCATION", "CERTIFICATIONS"]
        );
    }

    #[test]
    fn test_one_bullet_glyph_per_bullet() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        let bullets = page
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Bullet { .. }))
            .count();
        assert_eq!(bullets, 2);
    }

    #[test]
    fn test_one_rule_per_section_plus_divider() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        let rules = page
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rule { .. }))
            .count();
        // divider + summary, skills, experience, education
        assert_eq!(rules, 5);
    }

    #[test]
    fn test_dates_are_right_aligned() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        let right_edge = LAYOUT.page_width - LAYOUT.page_margin;
        let (x, size, text) = page
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { x, size, text, .. } if text == "2019 – Present" => {
                    Some((*x, *size, text.clone()))
                }
                _ => None,
            })
            .expect("date run");
        let width = fonts.width(&text, FontVariant::Regular, size);
        assert!((x + width - right_edge).abs() < 1e-3);
    }

    #[test]
    fn test_everything_drawn_inside_margins() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        for command in &page.commands {
            if let DrawCommand::Text { y, .. } = command {
                assert!(*y >= LAYOUT.page_margin && *y <= LAYOUT.page_height - LAYOUT.page_margin);
            }
        }
    }

    // ── photo slot ──────────────────────────────────────────────────────────

    #[test]
    fn test_placeholder_frame_when_photo_missing() {
        let fonts = FontPair::standard();
        let style = PageStyle { photo: PhotoSlot::Placeholder, ..PageStyle::default() };
        let ctx = LayoutContext::new(&fonts, style);
        let page = render(&Candidate::source(sample_document()), ScaleFactor::FULL, &ctx);
        assert!(page
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::PhotoFrame { .. })));
        assert!(!page.has_photo());
    }

    #[test]
    fn test_photo_column_pushes_cursor_below_photo() {
        let fonts = FontPair::standard();
        let mut doc = sample_document();
        // Header text alone is shorter than the photo slot.
        doc.header.links.clear();
        let without = LayoutContext::new(&fonts, PageStyle::default());
        let with = LayoutContext::new(
            &fonts,
            PageStyle { photo: PhotoSlot::Image, ..PageStyle::default() },
        );
        let candidate = Candidate::source(doc);
        let plain = render(&candidate, ScaleFactor::FULL, &without);
        let photo = render(&candidate, ScaleFactor::FULL, &with);
        assert!(photo.has_photo());
        assert!(photo.used_height > plain.used_height);

        let photo_bottom = photo
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Photo { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        // Nothing after the header may start above the photo's bottom edge.
        let summary_y = photo
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, y, .. } if text == "SUMMARY" => Some(*y),
                _ => None,
            })
            .unwrap();
        assert!(summary_y < photo_bottom);
    }

    #[test]
    fn test_photo_narrows_header_text_column() {
        let fonts = FontPair::standard();
        let mut doc = sample_document();
        doc.header.links = vec!["a-very-long-portfolio-link.example.com/projects".to_string(); 4];
        let ctx = LayoutContext::new(
            &fonts,
            PageStyle { photo: PhotoSlot::Image, ..PageStyle::default() },
        );
        let page = render(&Candidate::source(doc), ScaleFactor::FULL, &ctx);
        let photo_x = page
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Photo { x, .. } => Some(*x),
                _ => None,
            })
            .unwrap();
        for command in &page.commands {
            if let DrawCommand::Text { x, text, size, variant, color, .. } = command {
                if *color == Rgb::MUTED && text.contains("example.com") {
                    let right = x + fonts.width(text, *variant, *size);
                    assert!(right <= photo_x, "link line '{text}' runs under the photo");
                }
            }
        }
    }

    // ── overflow ────────────────────────────────────────────────────────────

    #[test]
    fn test_overflowing_render_still_returns_page() {
        let fonts = FontPair::standard();
        let ctx = LayoutContext::new(&fonts, PageStyle::default());
        let page = render(&Candidate::source(crowded_document()), ScaleFactor::FULL, &ctx);
        assert!(page.overflowed());
        assert!(!page.commands.is_empty());
        for command in &page.commands {
            if let DrawCommand::Text { y, .. } = command {
                assert!(*y >= LAYOUT.page_margin, "drew below the bottom margin");
            }
        }
    }
}
