//! `{0}`-style message patterns.
//!
//! Quoting follows the familiar message-format rules: `''` is a literal
//! quote, text between single quotes is literal (braces included), and
//! `{n,type,...}` renders argument `n` plainly.

use std::fmt::{self, Display, Write};

use super::TranslationError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Argument(usize),
}

/// A parsed message pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    pattern: String,
    segments: Vec<Segment>,
}

impl MessageFormat {
    pub fn parse(pattern: &str) -> Result<Self, TranslationError> {
        let invalid = |reason: &str| TranslationError::InvalidFormat {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut in_quote = false;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    literal.push('\'');
                }
                '\'' => in_quote = !in_quote,
                _ if in_quote => literal.push(c),
                '{' => {
                    let mut depth = 1;
                    let mut body = String::new();
                    for inner in chars.by_ref() {
                        match inner {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        body.push(inner);
                    }
                    if depth != 0 {
                        return Err(invalid("unmatched braces"));
                    }
                    let index = body.split(',').next().unwrap_or_default().trim();
                    let index = index
                        .parse::<usize>()
                        .map_err(|_| invalid(&format!("can't parse argument number: {index}")))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Argument(index));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// The source pattern, as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Substitute `args` into the pattern. Missing arguments render as `{n}`.
    pub fn format(&self, args: &[&dyn Display]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Argument(index) => {
                    let _ = match args.get(*index) {
                        Some(arg) => write!(out, "{arg}"),
                        None => write!(out, "{{{index}}}"),
                    };
                }
            }
        }
        out
    }
}

impl Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
