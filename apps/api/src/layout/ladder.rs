//! Content Degradation Ladder: progressively smaller variants of one document.
//!
//! Level 0 is the untouched source. Each further level is a `CapTable` that
//! never allows more of anything than the level before it. Capping keeps the
//! first N items in original order; nothing is reordered or re-ranked.

use serde::Serialize;

use crate::models::resume::ResumeDocument;

/// Appended to a summary cut at a word boundary.
pub const ELLIPSIS: &str = "…";

/// Per-level limits. `usize::MAX` means uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapTable {
    pub summary_chars: usize,
    pub skills_per_bucket: usize,
    pub experience: usize,
    pub bullets_per_experience: usize,
    pub projects: usize,
    pub bullets_per_project: usize,
    pub education: usize,
    pub details_per_education: usize,
    pub certifications: usize,
}

impl CapTable {
    pub const UNCAPPED: CapTable = CapTable {
        summary_chars: usize::MAX,
        skills_per_bucket: usize::MAX,
        experience: usize::MAX,
        bullets_per_experience: usize::MAX,
        projects: usize::MAX,
        bullets_per_project: usize::MAX,
        education: usize::MAX,
        details_per_education: usize::MAX,
        certifications: usize::MAX,
    };

    /// All caps in a fixed order, for monotonicity checks.
    pub fn as_array(&self) -> [usize; 9] {
        [
            self.summary_chars,
            self.skills_per_bucket,
            self.experience,
            self.bullets_per_experience,
            self.projects,
            self.bullets_per_project,
            self.education,
            self.details_per_education,
            self.certifications,
        ]
    }
}

#[allow(clippy::too_many_arguments)]
const fn caps(
    summary_chars: usize,
    skills_per_bucket: usize,
    experience: usize,
    bullets_per_experience: usize,
    projects: usize,
    bullets_per_project: usize,
    education: usize,
    details_per_education: usize,
    certifications: usize,
) -> CapTable {
    CapTable {
        summary_chars,
        skills_per_bucket,
        experience,
        bullets_per_experience,
        projects,
        bullets_per_project,
        education,
        details_per_education,
        certifications,
    }
}

/// The ladder, least destructive first.
#[rustfmt::skip]
pub static LEVELS: [CapTable; 7] = [
    CapTable::UNCAPPED,
    //   summary skills exp bullets proj p.bullets edu details certs
    caps(900,    14,    8,  6,      4,   4,        3,  3,      8),
    caps(700,    12,    6,  5,      3,   3,        3,  2,      6),
    caps(520,    10,    5,  4,      3,   2,        2,  2,      5),
    caps(380,    8,     4,  3,      2,   2,        2,  1,      4),
    caps(260,    6,     3,  3,      2,   1,        1,  1,      3),
    caps(160,    5,     3,  2,      1,   1,        1,  0,      2),
];

/// One content variant of the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub level: usize,
    pub caps: CapTable,
    pub document: ResumeDocument,
    /// True when the summary was cut at this level.
    pub summary_truncated: bool,
}

impl Candidate {
    /// The untouched source as level 0.
    pub fn source(document: ResumeDocument) -> Self {
        Candidate {
            level: 0,
            caps: CapTable::UNCAPPED,
            document,
            summary_truncated: false,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.level > 0
    }
}

/// Builds every level once for a fit-search run.
pub fn build_candidates(source: &ResumeDocument) -> Vec<Candidate> {
    LEVELS
        .iter()
        .enumerate()
        .map(|(level, caps)| apply_caps(source, level, caps))
        .collect()
}

/// Applies one cap table. Pure data transformation.
pub fn apply_caps(source: &ResumeDocument, level: usize, caps: &CapTable) -> Candidate {
    let (summary, summary_truncated) = truncate_summary(&source.summary, caps.summary_chars);

    let mut document = source.clone();
    document.summary = summary;
    document.skills.core.truncate(caps.skills_per_bucket);
    document.skills.tools.truncate(caps.skills_per_bucket);
    document.skills.soft.truncate(caps.skills_per_bucket);

    document.experience.truncate(caps.experience);
    for entry in &mut document.experience {
        entry.bullets.truncate(caps.bullets_per_experience);
    }
    document.projects.truncate(caps.projects);
    for entry in &mut document.projects {
        entry.bullets.truncate(caps.bullets_per_project);
    }
    document.education.truncate(caps.education);
    for entry in &mut document.education {
        entry.details.truncate(caps.details_per_education);
    }
    document.certifications.truncate(caps.certifications);

    Candidate {
        level,
        caps: *caps,
        document,
        summary_truncated,
    }
}

/// Cuts `summary` to at most `cap` characters (ellipsis included) at a word
/// boundary. Returns the text and whether it was cut.
///
/// When not even the first word fits, only the ellipsis remains.
pub fn truncate_summary(summary: &str, cap: usize) -> (String, bool) {
    if summary.chars().count() <= cap {
        return (summary.to_string(), false);
    }
    let budget = cap.saturating_sub(ELLIPSIS.chars().count());
    let mut kept = String::new();
    let mut kept_chars = 0usize;
    for word in summary.split_whitespace() {
        let word_chars = word.chars().count();
        let needed = if kept.is_empty() { word_chars } else { word_chars + 1 };
        if kept_chars + needed > budget {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(word);
        kept_chars += needed;
    }
    kept.push_str(ELLIPSIS);
    (kept, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience, Project, Skills};

    fn bullets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("bullet {i}")).collect()
    }

    fn big_document() -> ResumeDocument {
        ResumeDocument {
            summary: "word ".repeat(400),
            skills: Skills {
                core: (0..20).map(|i| format!("core{i}")).collect(),
                tools: (0..20).map(|i| format!("tool{i}")).collect(),
                soft: (0..20).map(|i| format!("soft{i}")).collect(),
            },
            experience: (0..10)
                .map(|i| Experience {
                    company: format!("Company {i}"),
                    role: "Engineer".to_string(),
                    bullets: bullets(8),
                    ..Experience::default()
                })
                .collect(),
            projects: (0..6)
                .map(|i| Project {
                    name: format!("Project {i}"),
                    bullets: bullets(6),
                    ..Project::default()
                })
                .collect(),
            education: (0..4)
                .map(|i| Education {
                    institution: format!("School {i}"),
                    details: bullets(4),
                    ..Education::default()
                })
                .collect(),
            certifications: (0..10).map(|i| format!("Cert {i}")).collect(),
            ..ResumeDocument::default()
        }
    }

    // ── ladder shape ────────────────────────────────────────────────────────

    #[test]
    fn test_level_zero_is_uncapped() {
        assert_eq!(LEVELS[0], CapTable::UNCAPPED);
    }

    #[test]
    fn test_levels_are_monotonic() {
        for pair in LEVELS.windows(2) {
            let (looser, tighter) = (pair[0].as_array(), pair[1].as_array());
            for (a, b) in looser.iter().zip(tighter.iter()) {
                assert!(b <= a, "cap grew between levels: {looser:?} -> {tighter:?}");
            }
            assert_ne!(looser, tighter, "every level must tighten something");
        }
    }

    #[test]
    fn test_candidate_lengths_are_monotonic() {
        let candidates = build_candidates(&big_document());
        assert_eq!(candidates.len(), LEVELS.len());
        for pair in candidates.windows(2) {
            let (a, b) = (&pair[0].document, &pair[1].document);
            assert!(b.summary.chars().count() <= a.summary.chars().count());
            assert!(b.skills.core.len() <= a.skills.core.len());
            assert!(b.experience.len() <= a.experience.len());
            assert!(b.projects.len() <= a.projects.len());
            assert!(b.education.len() <= a.education.len());
            assert!(b.certifications.len() <= a.certifications.len());
            let bullets_a: usize = a.experience.iter().map(|e| e.bullets.len()).sum();
            let bullets_b: usize = b.experience.iter().map(|e| e.bullets.len()).sum();
            assert!(bullets_b <= bullets_a);
        }
    }

    // ── capping ─────────────────────────────────────────────────────────────

    #[test]
    fn test_level_zero_is_identical_to_source() {
        let source = big_document();
        let candidates = build_candidates(&source);
        assert_eq!(candidates[0].document, source);
        assert!(!candidates[0].summary_truncated);
        assert!(!candidates[0].is_degraded());
    }

    #[test]
    fn test_capping_keeps_first_items_in_order() {
        let candidate = apply_caps(&big_document(), 3, &LEVELS[3]);
        let doc = &candidate.document;
        assert_eq!(doc.experience.len(), 5);
        assert_eq!(doc.experience[0].company, "Company 0");
        assert_eq!(doc.experience[4].company, "Company 4");
        assert_eq!(doc.experience[0].bullets, bullets(4));
        assert_eq!(doc.skills.tools.first().map(String::as_str), Some("tool0"));
        assert_eq!(doc.skills.tools.len(), 10);
        assert_eq!(doc.education[0].details.len(), 2);
    }

    #[test]
    fn test_short_lists_are_untouched() {
        let source = ResumeDocument {
            experience: vec![Experience {
                bullets: bullets(2),
                ..Experience::default()
            }],
            ..ResumeDocument::default()
        };
        let last = LEVELS.len() - 1;
        let candidate = apply_caps(&source, last, &LEVELS[last]);
        assert_eq!(candidate.document.experience[0].bullets.len(), 2);
    }

    // ── summary truncation ─────────────────────────────────────────────────

    #[test]
    fn test_summary_under_cap_is_unchanged() {
        let (text, cut) = truncate_summary("Short and sweet.", 100);
        assert_eq!(text, "Short and sweet.");
        assert!(!cut);
    }

    #[test]
    fn test_summary_cut_at_word_boundary() {
        let (text, cut) = truncate_summary("alpha beta gamma delta", 13);
        // budget 12 → "alpha beta" (10) fits, "alpha beta gamma" (16) does not
        assert_eq!(text, "alpha beta…");
        assert!(cut);
        assert!(text.chars().count() <= 13);
    }

    #[test]
    fn test_summary_never_cut_mid_word() {
        let summary = "Seasoned platform engineer with a decade of distributed systems work";
        for cap in 1..summary.len() {
            let (text, _) = truncate_summary(summary, cap);
            let body = text.trim_end_matches(ELLIPSIS);
            for word in body.split_whitespace() {
                assert!(summary.split_whitespace().any(|w| w == word), "'{word}' is a fragment");
            }
            assert!(text.chars().count() <= cap.max(1));
        }
    }

    #[test]
    fn test_summary_first_word_too_long_leaves_only_marker() {
        let (text, cut) = truncate_summary("Incomprehensibilities abound", 10);
        assert_eq!(text, ELLIPSIS);
        assert!(cut);
    }
}
