//! Résumé document model, the read-only input of the layout engine.
//!
//! Editors own and mutate a `ResumeDocument`; the layout engine only ever borrows it.
//! Field names follow the editor wire format (camelCase).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::style::{StyleConfig, StyleError};

// ────────────────────────────────────────────────────────────────────────────
// Section kinds
// ────────────────────────────────────────────────────────────────────────────

/// A named, orderable region of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Personal,
    Summary,
    Work,
    Education,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Personal,
        SectionKind::Summary,
        SectionKind::Work,
        SectionKind::Education,
        SectionKind::Projects,
    ];

    /// Repeatable kinds hold an ordered list of blocks and go through the chunker.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            SectionKind::Work | SectionKind::Education | SectionKind::Projects
        )
    }

    /// Heading text rendered above the section.
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Personal => "Personal Information",
            SectionKind::Summary => "Professional Summary",
            SectionKind::Work => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Projects",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Personal => "personal",
            SectionKind::Summary => "summary",
            SectionKind::Work => "work",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalBlock {
    pub name: String,
    pub title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
}

impl PersonalBlock {
    /// Contact fields that are present and non-blank, in display order.
    pub fn contact_line(&self) -> Vec<&str> {
        [
            &self.email,
            &self.phone,
            &self.location,
            &self.website,
            &self.linkedin,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .filter(|s| !s.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub points: Vec<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub points: Vec<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub name: String,
    pub role: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub points: Vec<String>,
    pub display_order: i32,
}

/// One atomic entry of a repeatable section. Never split across chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepeatableBlock {
    Work(WorkItem),
    Education(EducationItem),
    Project(ProjectItem),
}

impl RepeatableBlock {
    pub fn kind(&self) -> SectionKind {
        match self {
            RepeatableBlock::Work(_) => SectionKind::Work,
            RepeatableBlock::Education(_) => SectionKind::Education,
            RepeatableBlock::Project(_) => SectionKind::Projects,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RepeatableBlock::Work(w) => w.description.as_deref(),
            RepeatableBlock::Education(e) => e.description.as_deref(),
            RepeatableBlock::Project(p) => p.description.as_deref(),
        }
    }

    pub fn points(&self) -> &[String] {
        match self {
            RepeatableBlock::Work(w) => &w.points,
            RepeatableBlock::Education(e) => &e.points,
            RepeatableBlock::Project(p) => &p.points,
        }
    }

    pub fn display_order(&self) -> i32 {
        match self {
            RepeatableBlock::Work(w) => w.display_order,
            RepeatableBlock::Education(e) => e.display_order,
            RepeatableBlock::Project(p) => p.display_order,
        }
    }

    /// Primary line of the entry (company, institution or project name).
    pub fn title(&self) -> &str {
        match self {
            RepeatableBlock::Work(w) => &w.company,
            RepeatableBlock::Education(e) => &e.institution,
            RepeatableBlock::Project(p) => &p.name,
        }
    }

    /// Secondary line of the entry (position, degree and field, or role).
    pub fn subtitle(&self) -> Option<String> {
        match self {
            RepeatableBlock::Work(w) => Some(w.position.clone()).filter(|s| !s.is_empty()),
            RepeatableBlock::Education(e) => match e.field.as_deref() {
                Some(field) if !field.is_empty() => Some(format!("{}, {}", e.degree, field)),
                _ => Some(e.degree.clone()).filter(|s| !s.is_empty()),
            },
            RepeatableBlock::Project(p) => p.role.clone(),
        }
    }

    /// "start – end" date range, if either end is known.
    pub fn date_range(&self) -> Option<String> {
        let (start, end) = match self {
            RepeatableBlock::Work(w) => (&w.start_date, &w.end_date),
            RepeatableBlock::Education(e) => (&e.start_date, &e.end_date),
            RepeatableBlock::Project(p) => (&p.start_date, &p.end_date),
        };
        match (start.as_deref(), end.as_deref()) {
            (Some(s), Some(e)) => Some(format!("{s} – {e}")),
            (Some(s), None) => Some(format!("{s} – Present")),
            (None, Some(e)) => Some(e.to_string()),
            (None, None) => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Root aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal: PersonalBlock,
    pub summary: String,
    pub work: Vec<WorkItem>,
    pub education: Vec<EducationItem>,
    pub projects: Vec<ProjectItem>,
    pub active_sections: Vec<SectionKind>,
    pub style: StyleConfig,
}

impl Default for ResumeDocument {
    /// The document an editor starts from on first load.
    fn default() -> Self {
        Self {
            personal: PersonalBlock::default(),
            summary: String::new(),
            work: Vec::new(),
            education: Vec::new(),
            projects: Vec::new(),
            active_sections: SectionKind::ALL.to_vec(),
            style: StyleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("activeSections must not be empty")]
    NoActiveSections,

    #[error("activeSections must begin with personal, found {0:?}")]
    PersonalNotFirst(SectionKind),

    #[error("section {0:?} appears more than once in activeSections")]
    DuplicateSection(SectionKind),

    #[error(transparent)]
    Style(#[from] StyleError),
}

impl ResumeDocument {
    /// Blocks of a repeatable section in display order. Singleton kinds yield nothing.
    ///
    /// The sort is stable: blocks with equal `displayOrder` keep their list position.
    pub fn blocks(&self, kind: SectionKind) -> Vec<RepeatableBlock> {
        let mut blocks: Vec<RepeatableBlock> = match kind {
            SectionKind::Work => self.work.iter().cloned().map(RepeatableBlock::Work).collect(),
            SectionKind::Education => self
                .education
                .iter()
                .cloned()
                .map(RepeatableBlock::Education)
                .collect(),
            SectionKind::Projects => self
                .projects
                .iter()
                .cloned()
                .map(RepeatableBlock::Project)
                .collect(),
            SectionKind::Personal | SectionKind::Summary => Vec::new(),
        };
        blocks.sort_by_key(|b| b.display_order());
        blocks
    }

    /// Number of raw entries in a section, before any ordering.
    pub fn block_count(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::Work => self.work.len(),
            SectionKind::Education => self.education.len(),
            SectionKind::Projects => self.projects.len(),
            SectionKind::Personal | SectionKind::Summary => 0,
        }
    }

    /// Checks the structural invariants the editing layer is expected to uphold.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let first = self
            .active_sections
            .first()
            .ok_or(DocumentError::NoActiveSections)?;
        if *first != SectionKind::Personal {
            return Err(DocumentError::PersonalNotFirst(*first));
        }

        let mut seen = Vec::with_capacity(self.active_sections.len());
        for kind in &self.active_sections {
            if seen.contains(kind) {
                return Err(DocumentError::DuplicateSection(*kind));
            }
            seen.push(*kind);
        }

        self.style.validate()?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn work(company: &str, order: i32) -> WorkItem {
        WorkItem {
            company: company.to_string(),
            position: "Engineer".to_string(),
            display_order: order,
            ..Default::default()
        }
    }

    // ── defaults ────────────────────────────────────────────────────────────

    #[test]
    fn test_default_document_starts_with_personal() {
        let doc = ResumeDocument::default();
        assert_eq!(doc.active_sections[0], SectionKind::Personal);
        assert_eq!(doc.active_sections.len(), 5);
        assert!(doc.validate().is_ok());
    }

    // ── blocks ordering ─────────────────────────────────────────────────────

    #[test]
    fn test_blocks_sorted_by_display_order() {
        let doc = ResumeDocument {
            work: vec![work("C", 2), work("A", 0), work("B", 1)],
            ..Default::default()
        };
        let titles: Vec<String> = doc
            .blocks(SectionKind::Work)
            .iter()
            .map(|b| b.title().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_blocks_equal_order_keeps_insertion() {
        let doc = ResumeDocument {
            work: vec![work("first", 0), work("second", 0)],
            ..Default::default()
        };
        let blocks = doc.blocks(SectionKind::Work);
        assert_eq!(blocks[0].title(), "first");
        assert_eq!(blocks[1].title(), "second");
    }

    #[test]
    fn test_singleton_kinds_have_no_blocks() {
        let doc = ResumeDocument {
            summary: "Engineer".to_string(),
            ..Default::default()
        };
        assert!(doc.blocks(SectionKind::Summary).is_empty());
        assert!(doc.blocks(SectionKind::Personal).is_empty());
    }

    // ── validate ────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_missing_personal_first() {
        let doc = ResumeDocument {
            active_sections: vec![SectionKind::Work, SectionKind::Personal],
            ..Default::default()
        };
        assert_eq!(
            doc.validate(),
            Err(DocumentError::PersonalNotFirst(SectionKind::Work))
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let doc = ResumeDocument {
            active_sections: vec![SectionKind::Personal, SectionKind::Work, SectionKind::Work],
            ..Default::default()
        };
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateSection(SectionKind::Work))
        );
    }

    #[test]
    fn test_validate_rejects_empty_sections() {
        let doc = ResumeDocument {
            active_sections: vec![],
            ..Default::default()
        };
        assert_eq!(doc.validate(), Err(DocumentError::NoActiveSections));
    }

    // ── wire format ─────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{
            "personal": { "name": "Ada", "title": "Engineer" },
            "work": [{ "company": "Acme", "position": "Dev", "displayOrder": 3, "points": ["a"] }],
            "activeSections": ["personal", "work"]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.personal.name, "Ada");
        assert_eq!(doc.work[0].display_order, 3);
        assert_eq!(doc.active_sections, vec![SectionKind::Personal, SectionKind::Work]);
        assert_eq!(doc.style, StyleConfig::default());
    }

    #[test]
    fn test_date_range_and_subtitle() {
        let block = RepeatableBlock::Education(EducationItem {
            institution: "MIT".to_string(),
            degree: "BSc".to_string(),
            field: Some("Physics".to_string()),
            start_date: Some("2015".to_string()),
            ..Default::default()
        });
        assert_eq!(block.subtitle().as_deref(), Some("BSc, Physics"));
        assert_eq!(block.date_range().as_deref(), Some("2015 – Present"));
        assert_eq!(block.kind(), SectionKind::Education);
    }

    #[test]
    fn test_contact_line_skips_blank() {
        let personal = PersonalBlock {
            email: Some("a@b.c".to_string()),
            phone: Some("  ".to_string()),
            location: Some("Oslo".to_string()),
            ..Default::default()
        };
        assert_eq!(personal.contact_line(), vec!["a@b.c", "Oslo"]);
    }
}
