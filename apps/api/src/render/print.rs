//! Declarative print document tree built from a `PageModel`.
//!
//! The exporter receives only this tree, never the résumé itself. One `PrintPage` per
//! planned page, in order. A section heading is emitted only where the page model asks for
//! it, so continuation pages carry entries without repeating the heading.

use serde::{Deserialize, Serialize};

use crate::layout::planner::{PageContent, PageModel};
use crate::layout::style::{PrintStyles, ResolvedStyle};
use crate::models::resume::{PersonalBlock, RepeatableBlock, SectionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PrintNode {
    Identity {
        name: String,
        title: String,
        contacts: Vec<String>,
    },
    SectionHeading {
        section: SectionKind,
        text: String,
    },
    Divider,
    Summary {
        text: String,
    },
    Entry {
        section: SectionKind,
        title: String,
        subtitle: Option<String>,
        dates: Option<String>,
        description: Option<String>,
        points: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPage {
    pub number: usize,
    pub nodes: Vec<PrintNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintDocument {
    pub styles: PrintStyles,
    pub pages: Vec<PrintPage>,
}

/// Builds the exporter's page tree.
pub fn build_print_document(model: &PageModel, style: &ResolvedStyle) -> PrintDocument {
    let show_divider = style.print_styles.show_divider;

    let pages = model
        .pages
        .iter()
        .map(|page| {
            let mut nodes = Vec::new();
            for entry in &page.entries {
                if entry.show_header {
                    nodes.push(PrintNode::SectionHeading {
                        section: entry.section,
                        text: entry.section.heading().to_string(),
                    });
                    if show_divider {
                        nodes.push(PrintNode::Divider);
                    }
                }
                match &entry.content {
                    PageContent::Personal(personal) => nodes.push(identity(personal)),
                    PageContent::Summary { text } => {
                        nodes.push(PrintNode::Summary { text: text.clone() })
                    }
                    PageContent::Chunk(chunk) => {
                        nodes.extend(chunk.blocks.iter().map(entry_node));
                    }
                }
            }
            PrintPage {
                number: page.number,
                nodes,
            }
        })
        .collect();

    PrintDocument {
        styles: style.print_styles.clone(),
        pages,
    }
}

fn identity(personal: &PersonalBlock) -> PrintNode {
    PrintNode::Identity {
        name: personal.name.clone(),
        title: personal.title.clone(),
        contacts: personal
            .contact_line()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

fn entry_node(block: &RepeatableBlock) -> PrintNode {
    PrintNode::Entry {
        section: block.kind(),
        title: block.title().to_string(),
        subtitle: block.subtitle(),
        dates: block.date_range(),
        description: block
            .description()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        points: block.points().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::planner::plan;
    use crate::layout::style::{resolve, StyleConfig};
    use crate::models::resume::{ResumeDocument, WorkItem};

    fn document(items: i32) -> ResumeDocument {
        ResumeDocument {
            personal: PersonalBlock {
                name: "Ada Lovelace".to_string(),
                title: "Analyst".to_string(),
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
            summary: "Writes programs for engines.".to_string(),
            work: (0..items)
                .map(|i| WorkItem {
                    company: format!("Company {i}"),
                    position: "Engineer".to_string(),
                    start_date: Some("2020".to_string()),
                    points: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    display_order: i,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn headings(page: &PrintPage) -> usize {
        page.nodes
            .iter()
            .filter(|n| matches!(n, PrintNode::SectionHeading { .. }))
            .count()
    }

    #[test]
    fn test_one_print_page_per_planned_page() {
        let doc = document(10);
        let model = plan(&doc);
        let print = build_print_document(&model, &resolve(&doc.style));
        assert_eq!(print.pages.len(), model.page_count());
        assert_eq!(print.pages.len(), 2);
    }

    #[test]
    fn test_heading_only_on_first_occurrence() {
        let doc = document(10);
        let print = build_print_document(&plan(&doc), &resolve(&doc.style));
        // summary + work on page one, none on the continuation page
        assert_eq!(headings(&print.pages[0]), 2);
        assert_eq!(headings(&print.pages[1]), 0);
        assert!(matches!(print.pages[1].nodes[0], PrintNode::Entry { .. }));
    }

    #[test]
    fn test_identity_first_and_divider_follows_style() {
        let mut doc = document(1);
        let print = build_print_document(&plan(&doc), &resolve(&doc.style));
        match &print.pages[0].nodes[0] {
            PrintNode::Identity { name, contacts, .. } => {
                assert_eq!(name, "Ada Lovelace");
                assert_eq!(contacts, &vec!["ada@example.com".to_string()]);
            }
            other => panic!("expected Identity, got {other:?}"),
        }
        assert!(print.pages[0].nodes.contains(&PrintNode::Divider));

        doc.style = StyleConfig {
            show_divider: false,
            ..Default::default()
        };
        let print = build_print_document(&plan(&doc), &resolve(&doc.style));
        assert!(!print.pages[0].nodes.contains(&PrintNode::Divider));
    }

    #[test]
    fn test_entry_fields_carried() {
        let doc = document(1);
        let print = build_print_document(&plan(&doc), &resolve(&doc.style));
        let entry = print.pages[0]
            .nodes
            .iter()
            .find(|n| matches!(n, PrintNode::Entry { .. }))
            .unwrap();
        assert_eq!(
            entry,
            &PrintNode::Entry {
                section: SectionKind::Work,
                title: "Company 0".to_string(),
                subtitle: Some("Engineer".to_string()),
                dates: Some("2020 – Present".to_string()),
                description: None,
                points: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            }
        );
    }
}
