mod issues;
mod lines;

pub use issues::IssuesParser;
pub use lines::LinesParser;

use crate::config::{ParserClass, ParserConfig};
use crate::github::PullRequest;
use crate::notes::{Block, PullRequestNote, Section};

/// Recognizes one named section of a pull request body
#[derive(Debug, Clone)]
pub enum SectionParser {
    Lines(LinesParser),
    Issues(IssuesParser),
}

impl SectionParser {
    pub fn from_config(config: &ParserConfig) -> Self {
        match config.class {
            ParserClass::Lines => SectionParser::Lines(LinesParser::new(&config.title)),
            ParserClass::Issues => SectionParser::Issues(IssuesParser::new(&config.title)),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SectionParser::Lines(p) => &p.title,
            SectionParser::Issues(p) => &p.title,
        }
    }

    pub fn parse(&self, body: &str) -> Option<Section> {
        match self {
            SectionParser::Lines(p) => p.parse(body),
            SectionParser::Issues(p) => p.parse(body),
        }
    }
}

/// Build the ordered parser list from config
pub fn build_parsers(configs: &[ParserConfig]) -> Vec<SectionParser> {
    configs.iter().map(SectionParser::from_config).collect()
}

/// Apply every parser to a pull request body
pub fn parse_pull_request(pr: &PullRequest, parsers: &[SectionParser]) -> PullRequestNote {
    let sections = parsers
        .iter()
        .filter_map(|parser| parser.parse(pr.body()))
        .collect();

    PullRequestNote {
        number: pr.number,
        title: pr.title.clone(),
        url: pr.html_url.clone(),
        sections,
    }
}

/// Split an ATX heading into (level, text). `#123` is not a heading.
pub(crate) fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

/// Collect the non-blank lines under the heading named `title`, grouped by
/// `##`+ sub-headings. The section ends at the next level-1 heading. HTML
/// comments are skipped.
pub(crate) fn scan_section(body: &str, title: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut in_section = false;
    let mut in_comment = false;

    for raw in body.lines() {
        let line = raw.trim_end();
        let stripped = line.trim_start();

        if in_comment {
            if stripped.contains("-->") {
                in_comment = false;
            }
            continue;
        }
        if stripped.starts_with("<!--") {
            in_comment = !stripped.contains("-->");
            continue;
        }

        if let Some((level, text)) = heading(line) {
            if text.eq_ignore_ascii_case(title) {
                in_section = true;
                blocks.push(Block::default());
            } else if level == 1 {
                in_section = false;
            } else if in_section {
                blocks.push(Block {
                    heading: Some(text.to_string()),
                    lines: Vec::new(),
                });
            }
            continue;
        }

        if !in_section || stripped.is_empty() {
            continue;
        }
        if let Some(block) = blocks.last_mut() {
            block.lines.push(line.to_string());
        }
    }

    blocks.retain(|b| !b.lines.is_empty());
    blocks
}
