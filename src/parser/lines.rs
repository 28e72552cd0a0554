use super::scan_section;
use crate::notes::{Section, SectionContent};

/// Free-form notes under a heading, e.g. `# Critical Changes`
#[derive(Debug, Clone)]
pub struct LinesParser {
    pub title: String,
}

impl LinesParser {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    pub fn parse(&self, body: &str) -> Option<Section> {
        let blocks = scan_section(body, &self.title);
        if blocks.is_empty() {
            return None;
        }
        Some(Section {
            title: self.title.clone(),
            content: SectionContent::Lines(blocks),
        })
    }
}
