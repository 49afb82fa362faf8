//! Interactive preview payload.
//!
//! Carries the same decision as the PDF (level, scale, flags) and the
//! candidate's content in page order, so a client can lay it out natively
//! with the same section inclusion and truncation.

use serde::Serialize;

use crate::layout::constants::{TextRole, Typography, LAYOUT};
use crate::layout::page_writer::{PhotoSlot, Rgb};
use crate::layout::LayoutResult;
use crate::models::resume::{date_range, join_non_empty, pipe_pair, ResumeDocument, Section};

#[derive(Debug, Clone, Serialize)]
pub struct PreviewPayload {
    pub level: usize,
    pub scale: f32,
    pub degraded: bool,
    pub truncated: bool,
    pub summary_truncated: bool,
    pub page: PageGeometry,
    pub accent: Rgb,
    pub typography: Vec<RoleTypography>,
    pub sections: Vec<PreviewSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub photo_size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleTypography {
    pub role: TextRole,
    #[serde(flatten)]
    pub typography: Typography,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewSection {
    Header {
        name: String,
        role_title: String,
        contact: String,
        links: String,
        photo: PhotoSlot,
    },
    Summary {
        text: String,
    },
    Skills {
        buckets: Vec<SkillBucket>,
    },
    Experience {
        entries: Vec<PreviewEntry>,
    },
    Projects {
        entries: Vec<PreviewEntry>,
    },
    Education {
        entries: Vec<PreviewEntry>,
    },
    Certifications {
        items: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillBucket {
    pub label: &'static str,
    pub items: Vec<String>,
}

/// One heading line, its right-aligned partner, an optional meta line, bullets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub heading: String,
    pub aside: String,
    pub meta: String,
    pub bullets: Vec<String>,
}

pub fn build_preview(result: &LayoutResult, photo: PhotoSlot, accent: Rgb) -> PreviewPayload {
    let scaled = LAYOUT.scaled(result.scale);
    PreviewPayload {
        level: result.level(),
        scale: result.scale.value(),
        degraded: result.degraded,
        truncated: result.truncated,
        summary_truncated: result.candidate.summary_truncated,
        page: PageGeometry {
            width: scaled.page_width(),
            height: scaled.page_height(),
            margin: scaled.margin(),
            photo_size: scaled.photo_size(),
        },
        accent,
        typography: TextRole::ALL
            .iter()
            .map(|&role| RoleTypography {
                role,
                typography: scaled.typography(role),
            })
            .collect(),
        sections: sections(&result.candidate.document, photo),
    }
}

/// Header plus the non-empty sections, in page order.
pub fn sections(doc: &ResumeDocument, photo: PhotoSlot) -> Vec<PreviewSection> {
    let header = PreviewSection::Header {
        name: doc.header.name.clone(),
        role_title: doc.header.role_title.clone(),
        contact: doc.header.contact_line(),
        links: doc.header.link_line(),
        photo,
    };
    let body = Section::ALL
        .into_iter()
        .filter(|&section| doc.has_section(section))
        .map(|section| body_section(doc, section));
    std::iter::once(header).chain(body).collect()
}

fn body_section(doc: &ResumeDocument, section: Section) -> PreviewSection {
    match section {
        Section::Summary => PreviewSection::Summary {
            text: doc.summary.clone(),
        },
        Section::Skills => PreviewSection::Skills {
            buckets: doc
                .skills
                .buckets()
                .into_iter()
                .map(|(label, items)| SkillBucket {
                    label,
                    items: items.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        },
        Section::Experience => PreviewSection::Experience {
            entries: doc
                .experience
                .iter()
                .map(|e| PreviewEntry {
                    heading: pipe_pair(&e.role, &e.company),
                    aside: date_range(&e.start_date, &e.end_date),
                    meta: e.location.clone(),
                    bullets: e.bullets.clone(),
                })
                .collect(),
        },
        Section::Projects => PreviewSection::Projects {
            entries: doc
                .projects
                .iter()
                .map(|p| PreviewEntry {
                    heading: p.name.clone(),
                    aside: p.link.clone().unwrap_or_default(),
                    meta: join_non_empty(p.tech_stack.iter()),
                    bullets: p.bullets.clone(),
                })
                .collect(),
        },
        Section::Education => PreviewSection::Education {
            entries: doc
                .education
                .iter()
                .map(|e| PreviewEntry {
                    heading: pipe_pair(&e.degree, &e.institution),
                    aside: date_range(&e.start_date, &e.end_date),
                    meta: String::new(),
                    bullets: e.details.clone(),
                })
                .collect(),
        },
        Section::Certifications => PreviewSection::Certifications {
            items: doc.certifications.clone(),
        },
    }
}
