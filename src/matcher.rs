//! Reverse matching: recover placeholder values from a formatted string.
//!
//! Literal segments anchor the scan. The first literal must prefix-match,
//! interior literals match at their first occurrence past the cursor, and a
//! trailing literal must suffix-match so no input dangles after the template.

use crate::error::{Error, Result};
use crate::features::{FeatureSet, MatchDefaultPolicy, MatchEmptyPolicy, MatchNullStrPolicy};
use crate::parse::{Placeholder, Segment};

/// Walks the input against the segments and returns one capture per
/// placeholder in encounter order, or `None` when the input does not fit the
/// template shape.
///
/// Two placeholders with no literal between them have no anchor to split
/// their captures on, so matching fails with an error rather than guessing.
pub(crate) fn match_segments<'a>(
    segments: &[Segment],
    input: &'a str,
) -> Result<Option<Vec<&'a str>>> {
    let mut captures = Vec::new();
    let mut pending: Option<&Placeholder> = None;
    let mut pos = 0;

    for (index, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Placeholder(placeholder) => {
                if let Some(previous) = pending {
                    return Err(Error::AdjacentPlaceholders(
                        previous.name().to_string(),
                        placeholder.name().to_string(),
                    ));
                }
                pending = Some(placeholder);
            }
            Segment::Literal(text) => {
                let last = index == segments.len() - 1;
                match pending.take() {
                    Some(_) if last => {
                        // Anchor at the end of the input so nothing trails
                        // past the template.
                        if !input.ends_with(text.as_str()) {
                            return Ok(None);
                        }
                        let capture_end = input.len() - text.len();
                        if capture_end < pos {
                            return Ok(None);
                        }
                        captures.push(&input[pos..capture_end]);
                        pos = input.len();
                    }
                    Some(_) => match input[pos..].find(text.as_str()) {
                        Some(offset) => {
                            captures.push(&input[pos..pos + offset]);
                            pos += offset + text.len();
                        }
                        None => return Ok(None),
                    },
                    None => {
                        if !input[pos..].starts_with(text.as_str()) {
                            return Ok(None);
                        }
                        pos += text.len();
                    }
                }
            }
        }
    }

    if pending.is_some() {
        captures.push(&input[pos..]);
        pos = input.len();
    }

    if pos == input.len() {
        Ok(Some(captures))
    } else {
        Ok(None)
    }
}

/// What to do with a refined capture.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CaptureOutcome {
    /// Report the capture, possibly rewritten or blanked to `None`.
    Keep(Option<String>),
    /// Drop the entry from the result entirely.
    Skip,
}

/// Applies the match-side policies to a raw capture. `default` supplies the
/// default value for this placeholder; it is only invoked by stages that
/// actually need it, and a `None` result means no default is configured.
///
/// Stages fire in order: default-value rewrite, then empty capture, then the
/// literal string `null`. A capture that passes all three is kept verbatim.
pub(crate) fn refine_capture<D>(features: &FeatureSet, raw: &str, default: D) -> CaptureOutcome
where
    D: Fn() -> Option<String>,
{
    let default_policy = features.match_default;
    if matches!(
        default_policy,
        Some(MatchDefaultPolicy::Ignore) | Some(MatchDefaultPolicy::ToNone)
    ) && default().as_deref() == Some(raw)
    {
        return if default_policy == Some(MatchDefaultPolicy::Ignore) {
            CaptureOutcome::Skip
        } else {
            CaptureOutcome::Keep(None)
        };
    }

    if raw.is_empty() {
        return match features.match_empty {
            Some(MatchEmptyPolicy::ToNone) => CaptureOutcome::Keep(None),
            Some(MatchEmptyPolicy::ToDefaultValue) => CaptureOutcome::Keep(default()),
            Some(MatchEmptyPolicy::Ignore) => CaptureOutcome::Skip,
            // A cleared group keeps the capture untouched.
            Some(MatchEmptyPolicy::Keep) | None => CaptureOutcome::Keep(Some(String::new())),
        };
    }

    if raw == "null" {
        return match features.match_null_str {
            Some(MatchNullStrPolicy::ToNone) => CaptureOutcome::Keep(None),
            Some(MatchNullStrPolicy::Ignore) => CaptureOutcome::Skip,
            Some(MatchNullStrPolicy::Keep) | None => CaptureOutcome::Keep(Some(raw.to_string())),
        };
    }

    CaptureOutcome::Keep(Some(raw.to_string()))
}
