use super::scan_section;
use crate::notes::{Section, SectionContent};
use regex::Regex;

/// `#123` issue references under a heading, e.g. `# Issues Closed`
#[derive(Debug, Clone)]
pub struct IssuesParser {
    pub title: String,
}

impl IssuesParser {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    pub fn parse(&self, body: &str) -> Option<Section> {
        let re = Regex::new(r"#(\d+)").ok()?;
        let mut numbers: Vec<u64> = Vec::new();

        for block in scan_section(body, &self.title) {
            for line in &block.lines {
                for caps in re.captures_iter(line) {
                    if let Ok(n) = caps[1].parse::<u64>() {
                        if !numbers.contains(&n) {
                            numbers.push(n);
                        }
                    }
                }
            }
        }

        if numbers.is_empty() {
            return None;
        }
        Some(Section {
            title: self.title.clone(),
            content: SectionContent::Issues(numbers),
        })
    }
}
