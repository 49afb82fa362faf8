use serde::{Deserialize, Serialize};

/// Structured resume as handed over by the upstream normalizer.
///
/// Every string is already sanitized (control characters stripped, whitespace
/// collapsed) and length-capped. The layout engine only reasons about geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub header: Header,
    pub summary: String,
    pub skills: Skills,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<String>,
}

impl ResumeDocument {
    /// Whether `section` has anything to show. A section without content gets
    /// no title and no spacing, on the page and in the preview alike.
    pub fn has_section(&self, section: Section) -> bool {
        match section {
            Section::Summary => !self.summary.trim().is_empty(),
            Section::Skills => !self.skills.is_empty(),
            Section::Experience => !self.experience.is_empty(),
            Section::Projects => !self.projects.is_empty(),
            Section::Education => !self.education.is_empty(),
            Section::Certifications => !self.certifications.is_empty(),
        }
    }
}

/// Body sections below the header divider, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
    Certifications,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Summary,
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Education,
        Section::Certifications,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Education => "Education",
            Section::Certifications => "Certifications",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub role_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<String>,
    /// Inline profile photo: base64 PNG/JPEG or a `data:` URI.
    pub photo: Option<String>,
}

impl Header {
    /// Contact fields joined into the single contact line, skipping blanks.
    pub fn contact_line(&self) -> String {
        join_non_empty([&self.email, &self.phone, &self.location])
    }

    pub fn link_line(&self) -> String {
        join_non_empty(self.links.iter())
    }
}

/// Skill buckets, rendered in this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub core: Vec<String>,
    pub tools: Vec<String>,
    pub soft: Vec<String>,
}

impl Skills {
    /// `(label, items)` for buckets with at least one non-blank item. Blank
    /// items are dropped.
    pub fn buckets(&self) -> Vec<(&'static str, Vec<&str>)> {
        [
            ("Core", &self.core),
            ("Tools", &self.tools),
            ("Soft skills", &self.soft),
        ]
        .into_iter()
        .map(|(label, items)| {
            let filled: Vec<&str> = items
                .iter()
                .map(String::as_str)
                .filter(|item| !item.trim().is_empty())
                .collect();
            (label, filled)
        })
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        [&self.core, &self.tools, &self.soft]
            .iter()
            .all(|bucket| bucket.iter().all(|item| item.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub tech_stack: Vec<String>,
    pub link: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub details: Vec<String>,
}

/// "start – end", collapsing to whichever side is present.
pub fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} – {end}"),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    }
}

/// "left | right", collapsing to whichever side is present.
pub fn pipe_pair(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{left} | {right}"),
        (false, true) => left.to_string(),
        (true, false) => right.to_string(),
        (true, true) => String::new(),
    }
}

pub(crate) fn join_non_empty<'a, I, S>(parts: I) -> String
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    parts
        .into_iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_line_skips_blank_fields() {
        let header = Header {
            email: "ada@example.com".to_string(),
            location: "London".to_string(),
            ..Header::default()
        };
        assert_eq!(header.contact_line(), "ada@example.com · London");
    }

    #[test]
    fn test_date_range_collapses_missing_side() {
        assert_eq!(date_range("2019", "2023"), "2019 – 2023");
        assert_eq!(date_range("2019", ""), "2019");
        assert_eq!(date_range("", ""), "");
    }

    #[test]
    fn test_blank_skill_items_do_not_make_a_bucket() {
        let skills = Skills {
            core: vec!["".to_string(), "  ".to_string()],
            tools: vec!["Tokio".to_string(), " ".to_string()],
            soft: vec![],
        };
        assert_eq!(skills.buckets(), vec![("Tools", vec!["Tokio"])]);
        assert!(!skills.is_empty());

        let blank = Skills {
            core: vec![" ".to_string()],
            ..Skills::default()
        };
        assert!(blank.is_empty());
        let doc = ResumeDocument {
            skills: blank,
            ..ResumeDocument::default()
        };
        assert!(!doc.has_section(Section::Skills));
    }

    #[test]
    fn test_blank_summary_is_not_a_section() {
        let doc = ResumeDocument {
            summary: " \t ".to_string(),
            certifications: vec!["CKA".to_string()],
            ..ResumeDocument::default()
        };
        assert!(!doc.has_section(Section::Summary));
        assert!(doc.has_section(Section::Certifications));
        assert!(!doc.has_section(Section::Experience));
    }

    #[test]
    fn test_document_deserializes_with_missing_fields() {
        let doc: ResumeDocument =
            serde_json::from_str(r#"{"header":{"name":"Ada"},"summary":"Hi"}"#).unwrap();
        assert_eq!(doc.header.name, "Ada");
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
    }
}
