//! Template tokenizer: splits a template string into literal runs and
//! placeholder markers.
//!
//! Parsing is total. Malformed placeholder syntax (a prefix with no matching
//! suffix, a partial multi-character token) degrades to literal text instead
//! of failing.

use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::any;

/// Identity of a placeholder, driving how a value is looked up for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKey {
    /// Unnamed; bound by encounter order.
    Position,
    /// All-digits key no larger than `u16::MAX`, a zero-based position into
    /// an ordered value sequence.
    Indexed(usize),
    /// Explicit key into a map or record.
    Named(String),
}

/// One placeholder occurrence in a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    key: PlaceholderKey,
    name: String,
    text: String,
}

impl Placeholder {
    fn new(raw: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            key: classify(raw),
            name: raw.to_string(),
            text: format!("{prefix}{raw}{suffix}"),
        }
    }

    fn positional(token: &str) -> Self {
        Self {
            key: PlaceholderKey::Position,
            name: token.to_string(),
            text: token.to_string(),
        }
    }

    pub fn key(&self) -> &PlaceholderKey {
        &self.key
    }

    /// The variable name: the raw key for named/indexed placeholders, the
    /// token itself for positional ones.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The placeholder as it renders verbatim, delimiters included.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One parsed element of a template: a literal run or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Largest accepted placeholder index. Indexed results are materialized as
/// lists spanning index 0 to the highest index, so the bound keeps a hostile
/// key like `{18446744073709551615}` from demanding a huge allocation; keys
/// past it stay named.
const MAX_INDEX: usize = u16::MAX as usize;

fn classify(raw: &str) -> PlaceholderKey {
    if raw.is_empty() {
        return PlaceholderKey::Position;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = raw.parse::<usize>() {
            if index <= MAX_INDEX {
                return PlaceholderKey::Indexed(index);
            }
        }
    }
    PlaceholderKey::Named(raw.to_string())
}

/// Matches a runtime-configured delimiter string, like a `tag` parser but
/// over a non-static needle.
fn lit<'i, 't>(text: &'t str) -> impl Parser<&'i str, &'i str, ContextError> + 't {
    move |input: &mut &'i str| {
        let source: &'i str = input;
        match source.strip_prefix(text) {
            Some(rest) => {
                *input = rest;
                Ok(&source[..text.len()])
            }
            None => Err(ErrMode::Backtrack(ContextError::new())),
        }
    }
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// Parse a single-token template such as `"this is {} for {}"`.
pub(crate) fn parse_simple(template: &str, token: &str, escape: char) -> Vec<Segment> {
    let mut rest = template;
    simple_segments(&mut rest, token, escape)
        .unwrap_or_else(|_| vec![Segment::Literal(template.to_string())])
}

fn simple_segments(input: &mut &str, token: &str, escape: char) -> ModalResult<Vec<Segment>> {
    let escaped_token = format!("{escape}{token}");
    let double_escape = format!("{escape}{escape}");

    let mut segments = Vec::new();
    let mut literal = String::new();

    while !input.is_empty() {
        if opt(lit(escaped_token.as_str())).parse_next(input)?.is_some() {
            literal.push_str(token);
        } else if opt(lit(double_escape.as_str())).parse_next(input)?.is_some() {
            literal.push(escape);
        } else if opt(lit(token)).parse_next(input)?.is_some() {
            flush(&mut segments, &mut literal);
            segments.push(Segment::Placeholder(Placeholder::positional(token)));
        } else {
            literal.push(any.parse_next(input)?);
        }
    }
    flush(&mut segments, &mut literal);
    Ok(segments)
}

/// Parse a prefix/suffix template such as `"select * from #[tableName]"`.
pub(crate) fn parse_named(template: &str, prefix: &str, suffix: &str, escape: char) -> Vec<Segment> {
    let mut rest = template;
    named_segments(&mut rest, prefix, suffix, escape)
        .unwrap_or_else(|_| vec![Segment::Literal(template.to_string())])
}

fn named_segments(
    input: &mut &str,
    prefix: &str,
    suffix: &str,
    escape: char,
) -> ModalResult<Vec<Segment>> {
    let escaped_prefix = format!("{escape}{prefix}");
    let double_escape = format!("{escape}{escape}");

    let mut segments = Vec::new();
    let mut literal = String::new();

    while !input.is_empty() {
        if opt(lit(escaped_prefix.as_str())).parse_next(input)?.is_some() {
            literal.push_str(prefix);
        } else if opt(lit(double_escape.as_str())).parse_next(input)?.is_some() {
            literal.push(escape);
        } else if opt(lit(prefix)).parse_next(input)?.is_some() {
            match placeholder_key(input, suffix, escape)? {
                Some(raw) => {
                    flush(&mut segments, &mut literal);
                    segments.push(Segment::Placeholder(Placeholder::new(&raw, prefix, suffix)));
                }
                // No unescaped suffix ahead: the prefix is plain text.
                None => literal.push_str(prefix),
            }
        } else {
            literal.push(any.parse_next(input)?);
        }
    }
    flush(&mut segments, &mut literal);
    Ok(segments)
}

/// Scans for the first unescaped suffix and returns the raw key before it,
/// or `None` (restoring the input) when the placeholder never closes.
fn placeholder_key(input: &mut &str, suffix: &str, escape: char) -> ModalResult<Option<String>> {
    let start = *input;
    let escaped_suffix = format!("{escape}{suffix}");
    let double_escape = format!("{escape}{escape}");

    let mut raw = String::new();
    while !input.is_empty() {
        if opt(lit(escaped_suffix.as_str())).parse_next(input)?.is_some() {
            raw.push_str(suffix);
        } else if opt(lit(double_escape.as_str())).parse_next(input)?.is_some() {
            raw.push(escape);
        } else if opt(lit(suffix)).parse_next(input)?.is_some() {
            return Ok(Some(raw));
        } else {
            raw.push(any.parse_next(input)?);
        }
    }
    *input = start;
    Ok(None)
}
