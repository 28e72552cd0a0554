//! Release notes assembled from pull request descriptions.
//!
//! Each pull request body is parsed into named sections by the configured
//! parsers, the sections are merged across pull requests in parser order, and
//! the result is rendered as a markdown document. The same renderer backs
//! release publication and parent pull request bodies.

mod generator;
mod naming;
mod parent;
mod tags;

pub use generator::{ReleaseNotesGenerator, ReleaseNotesOptions};
pub use naming::{BranchNaming, FeaturePrefix};
pub use parent::{ParentOutcome, ParentPullRequestNotes, ParentTarget};
pub use tags::previous_tag;

use crate::error::GitHubError;
use crate::github::{GitHub, PullRequest};
use crate::parser::{parse_pull_request, SectionParser};
use std::collections::HashMap;
use tracing::debug;

pub const EMPTY_SECTION_TITLE: &str = "Pull requests without release notes";

/// Lines grouped under an optional sub-heading
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Lines(Vec<Block>),
    Issues(Vec<u64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub content: SectionContent,
}

/// Sections parsed out of one pull request
#[derive(Debug, Clone)]
pub struct PullRequestNote {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub sections: Vec<Section>,
}

impl PullRequestNote {
    fn link(&self) -> String {
        format!(" [[PR{}]({})]", self.number, self.url)
    }
}

/// Sections merged across pull requests, in parser order
#[derive(Debug, Clone)]
pub struct ReleaseNotes {
    sections: Vec<Section>,
    empty: Vec<PullRequestNote>,
    link_pr: bool,
}

impl ReleaseNotes {
    pub fn new(parsers: &[SectionParser], link_pr: bool) -> Self {
        let sections = parsers
            .iter()
            .map(|parser| Section {
                title: parser.title().to_string(),
                content: match parser {
                    SectionParser::Lines(_) => SectionContent::Lines(Vec::new()),
                    SectionParser::Issues(_) => SectionContent::Issues(Vec::new()),
                },
            })
            .collect();

        Self {
            sections,
            empty: Vec::new(),
            link_pr,
        }
    }

    /// Merge one pull request's sections in
    pub fn add(&mut self, note: PullRequestNote) {
        if note.sections.is_empty() {
            self.empty.push(note);
            return;
        }

        let suffix = if self.link_pr { note.link() } else { String::new() };
        for section in &note.sections {
            let Some(target) = self.sections.iter_mut().find(|s| s.title == section.title)
            else {
                continue;
            };
            match (&mut target.content, &section.content) {
                (SectionContent::Lines(merged), SectionContent::Lines(blocks)) => {
                    for block in blocks {
                        merge_block(merged, block, &suffix);
                    }
                }
                (SectionContent::Issues(merged), SectionContent::Issues(numbers)) => {
                    for n in numbers {
                        if !merged.contains(n) {
                            merged.push(*n);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub fn issue_numbers(&self) -> Vec<u64> {
        let mut numbers: Vec<u64> = self
            .sections
            .iter()
            .filter_map(|s| match &s.content {
                SectionContent::Issues(numbers) => Some(numbers.iter().copied()),
                SectionContent::Lines(_) => None,
            })
            .flatten()
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Render markdown. Issues render as `#N: title` when a title is known.
    pub fn render(&self, issue_titles: &HashMap<u64, String>, include_empty: bool) -> String {
        let mut parts: Vec<String> = Vec::new();

        for section in &self.sections {
            match &section.content {
                SectionContent::Lines(blocks) if !blocks.is_empty() => {
                    parts.push(format!("# {}", section.title));
                    for block in blocks {
                        if let Some(heading) = &block.heading {
                            parts.push(format!("## {heading}"));
                        }
                        parts.push(block.lines.join("\n"));
                    }
                }
                SectionContent::Issues(numbers) if !numbers.is_empty() => {
                    let mut numbers = numbers.clone();
                    numbers.sort_unstable();
                    let lines: Vec<String> = numbers
                        .iter()
                        .map(|n| match issue_titles.get(n) {
                            Some(title) => format!("#{n}: {title}"),
                            None => format!("#{n}"),
                        })
                        .collect();
                    parts.push(format!("# {}", section.title));
                    parts.push(lines.join("\n"));
                }
                _ => {}
            }
        }

        if include_empty && !self.empty.is_empty() {
            parts.push(format!("# {EMPTY_SECTION_TITLE}"));
            parts.push(
                self.empty
                    .iter()
                    .map(|note| format!("* [#{}]({}) {}", note.number, note.url, note.title))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        parts.join("\n\n")
    }
}

fn merge_block(merged: &mut Vec<Block>, block: &Block, suffix: &str) {
    let lines = block.lines.iter().map(|line| format!("{line}{suffix}"));
    match merged.iter_mut().find(|b| b.heading == block.heading) {
        Some(existing) => existing.lines.extend(lines),
        None => {
            let new_block = Block {
                heading: block.heading.clone(),
                lines: lines.collect(),
            };
            // Lines without a sub-heading always lead the section
            if new_block.heading.is_none() {
                merged.insert(0, new_block);
            } else {
                merged.push(new_block);
            }
        }
    }
}

/// Parse, merge and render the notes of `pulls` in the given order
pub async fn render_pull_requests(
    github: &dyn GitHub,
    parsers: &[SectionParser],
    pulls: &[PullRequest],
    link_pr: bool,
    include_empty: bool,
    has_issues: bool,
) -> Result<String, GitHubError> {
    let mut notes = ReleaseNotes::new(parsers, link_pr);
    for pr in pulls {
        debug!("Parsing notes from PR #{}", pr.number);
        notes.add(parse_pull_request(pr, parsers));
    }

    let mut issue_titles = HashMap::new();
    if has_issues {
        for number in notes.issue_numbers() {
            if let Some(title) = github.issue_title(number).await? {
                issue_titles.insert(number, title);
            }
        }
    }

    Ok(notes.render(&issue_titles, include_empty))
}
