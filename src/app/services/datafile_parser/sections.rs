//! Section splitting for data file documents
//!
//! A document consists of sections introduced by `!NAME:` header lines. Each
//! section runs until the next header or the end of input. Lines starting with
//! `;` are comments and, like blank lines, are not part of a section's content.
//! The same section name may appear several times; its content lines are then
//! concatenated in document order.
//!
//! A leading UTF-8 byte order mark is set aside before classification so the
//! first header is still recognised.
//!
//! Lines are classified once. The classification backs both listing a section's
//! lines and rewriting them in place while reproducing every other byte of the
//! document unchanged.

use crate::constants::{BYTE_ORDER_MARK, COMMENT_PREFIX};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!([^:]+):$").expect("section header pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Header,
    Comment,
    Blank,
    /// Content line belonging to the section at the given index
    Content(usize),
    /// Content line before the first header
    Preamble,
}

#[derive(Debug, Clone)]
struct ClassifiedLine<'a> {
    text: &'a str,
    terminator: &'a str,
    kind: LineKind,
}

/// Classified view of a data file document
#[derive(Debug, Clone)]
pub struct SectionLineExtractor<'a> {
    byte_order_mark: &'a str,
    lines: Vec<ClassifiedLine<'a>>,
    section_names: Vec<String>,
    section_index: HashMap<String, usize>,
}

impl<'a> SectionLineExtractor<'a> {
    /// Classify all lines of a document
    pub fn new(content: &'a str) -> Self {
        let (byte_order_mark, content) = match content.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => content.split_at(content.len() - rest.len()),
            None => ("", content),
        };

        let mut lines = Vec::new();
        let mut section_names: Vec<String> = Vec::new();
        let mut section_index: HashMap<String, usize> = HashMap::new();
        let mut current_section = None;

        for raw_line in content.split_inclusive('\n') {
            let (text, terminator) = split_terminator(raw_line);

            let kind = if let Some(name) = parse_header(text) {
                let index = *section_index.entry(name.clone()).or_insert_with(|| {
                    section_names.push(name);
                    section_names.len() - 1
                });
                current_section = Some(index);
                LineKind::Header
            } else if text.trim().is_empty() {
                LineKind::Blank
            } else if text.trim_start().starts_with(COMMENT_PREFIX) {
                LineKind::Comment
            } else {
                match current_section {
                    Some(index) => LineKind::Content(index),
                    None => LineKind::Preamble,
                }
            };

            lines.push(ClassifiedLine {
                text,
                terminator,
                kind,
            });
        }

        debug!(
            "Classified {} lines into {} sections",
            lines.len(),
            section_names.len()
        );

        Self {
            byte_order_mark,
            lines,
            section_names,
            section_index,
        }
    }

    /// Names of all sections in order of first appearance (upper case)
    pub fn section_names(&self) -> &[String] {
        &self.section_names
    }

    /// Check whether the document contains a header for the given section
    pub fn has_section(&self, name: &str) -> bool {
        self.section_index.contains_key(&normalize_name(name))
    }

    /// Whether the document started with a UTF-8 byte order mark
    pub fn has_byte_order_mark(&self) -> bool {
        !self.byte_order_mark.is_empty()
    }

    /// Content lines that appear before the first section header
    ///
    /// These belong to no section and are never decoded.
    pub fn preamble_lines(&self) -> Vec<&'a str> {
        self.lines
            .iter()
            .filter(|line| line.kind == LineKind::Preamble)
            .map(|line| line.text)
            .collect()
    }

    /// Content lines of a section, without comments, blanks and line terminators
    ///
    /// Returns an empty list for sections that do not exist.
    pub fn relevant_lines(&self, name: &str) -> Vec<&'a str> {
        let Some(&index) = self.section_index.get(&normalize_name(name)) else {
            return Vec::new();
        };

        self.lines
            .iter()
            .filter(|line| line.kind == LineKind::Content(index))
            .map(|line| line.text)
            .collect()
    }

    /// Reproduce the document, replacing the content lines of one section
    ///
    /// Every line that is not a content line of the named section (headers,
    /// comments, blank lines, other sections) is copied byte for byte. Rewritten
    /// lines keep their original line terminator.
    pub fn rewrite_section<F>(&self, name: &str, mut rewrite: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let target = self.section_index.get(&normalize_name(name)).copied();
        let mut output = String::with_capacity(self.lines.iter().map(|l| l.text.len() + 2).sum());
        output.push_str(self.byte_order_mark);

        for line in &self.lines {
            match (line.kind, target) {
                (LineKind::Content(index), Some(target)) if index == target => {
                    output.push_str(&rewrite(line.text));
                }
                _ => output.push_str(line.text),
            }
            output.push_str(line.terminator);
        }

        output
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

fn parse_header(text: &str) -> Option<String> {
    HEADER_PATTERN
        .captures(text.trim_end())
        .and_then(|captures| captures.get(1))
        .map(|name| normalize_name(name.as_str()))
}

fn split_terminator(raw_line: &str) -> (&str, &str) {
    if let Some(text) = raw_line.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = raw_line.strip_suffix('\n') {
        (text, "\n")
    } else {
        (raw_line, "")
    }
}
