//! Removal of common leading indentation from code samples.
//!
//! Code samples are usually written nested inside surrounding markup, so every
//! line carries the indentation of the markup around it. [`dedent`] strips
//! that shared prefix so the sample displays (and copies) as it was meant.

use std::{fmt, ops::Deref};

/// Code text with its common indentation removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedBlock(String);

impl NormalizedBlock {
    /// Normalize raw block text.
    pub fn new(raw: &str) -> Self {
        Self(dedent(raw))
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the block, returning the text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of lines, counting an empty block as zero.
    pub fn line_count(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split('\n').count()
        }
    }
}

impl Deref for NormalizedBlock {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedBlock {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip one leading newline, the trailing whitespace, and the indentation
/// shared by every non-blank line.
///
/// Indentation is measured in whitespace characters. Blank lines do not take
/// part in the minimum; they lose the minimum when they are at least that
/// long and are left alone otherwise. Slicing every line at the minimum
/// would instead empty short blank lines; keeping them as written is
/// intentional.
pub fn dedent(raw: &str) -> String {
    let body = raw.strip_prefix('\n').unwrap_or(raw).trim_end();

    let indent = min_indent(body);
    if indent == 0 {
        return body.to_string();
    }

    body.split('\n')
        .map(|line| strip_indent(line, indent))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Smallest leading-whitespace run over the non-blank lines, or 0.
pub fn min_indent(text: &str) -> usize {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min()
        .unwrap_or(0)
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let mut chars = line.char_indices();
    for _ in 0..indent {
        match chars.next() {
            Some((_, c)) if c.is_whitespace() => {}
            _ => return line,
        }
    }
    chars.next().map_or("", |(at, _)| &line[at..])
}
