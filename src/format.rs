//! Forward rendering: substitute values into parsed template segments.
//!
//! Rendering is two-pass. Placeholder replacements are resolved first so the
//! output buffer can be sized exactly, then literals and replacements are
//! concatenated in segment order.

use crate::error::{Error, Result};
use crate::features::{FeatureSet, MissingKeyPolicy, NullValuePolicy};
use crate::parse::{Placeholder, PlaceholderKey, Segment};
use crate::template::DefaultValue;
use crate::value::{Value, ValueSource};

/// Renders segments with a resolver called once per placeholder, in order.
/// `index` is the zero-based encounter position of the placeholder.
///
/// A `None` resolution invokes the missing-key policy, a `Value::Null`
/// resolution the null-value policy.
pub(crate) fn format_resolved<F>(
    segments: &[Segment],
    fixed_len: usize,
    features: &FeatureSet,
    default_value: Option<&DefaultValue>,
    mut resolve: F,
) -> Result<String>
where
    F: FnMut(usize, &Placeholder) -> Option<Value>,
{
    let mut replacements = Vec::new();
    let mut index = 0;
    for segment in segments {
        if let Segment::Placeholder(placeholder) = segment {
            let text = match resolve(index, placeholder) {
                None => missing_text(placeholder, features, default_value)?,
                Some(value) => match value.render() {
                    Some(text) => text,
                    None => null_text(placeholder, features, default_value)?,
                },
            };
            replacements.push(text);
            index += 1;
        }
    }

    let capacity = fixed_len + replacements.iter().map(String::len).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    let mut replacements = replacements.into_iter();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(_) => out.push_str(&replacements.next().unwrap_or_default()),
        }
    }
    Ok(out)
}

/// Renders segments against a value source, mapping each placeholder to a
/// lookup appropriate for the source shape.
pub(crate) fn format_source(
    segments: &[Segment],
    fixed_len: usize,
    features: &FeatureSet,
    default_value: Option<&DefaultValue>,
    source: &ValueSource<'_>,
) -> Result<String> {
    match source {
        ValueSource::Sequence(values) => {
            format_resolved(segments, fixed_len, features, default_value, |index, _| {
                values.get(index).cloned()
            })
        }
        ValueSource::Indexed(values) => {
            format_resolved(segments, fixed_len, features, default_value, |_, placeholder| {
                match placeholder.key() {
                    PlaceholderKey::Indexed(index) => values.get(*index).cloned(),
                    _ => None,
                }
            })
        }
        ValueSource::Named(map) => {
            format_resolved(segments, fixed_len, features, default_value, |_, placeholder| {
                map.get(placeholder.name()).cloned()
            })
        }
        ValueSource::Record(get) => {
            format_resolved(segments, fixed_len, features, default_value, |_, placeholder| {
                get(placeholder.name())
            })
        }
    }
}

/// Renders segments with a caller-supplied textual resolver, bypassing all
/// policies. A `None` result renders the string `null`.
pub(crate) fn format_raw<F>(segments: &[Segment], mut render: F) -> String
where
    F: FnMut(&Placeholder) -> Option<String>,
{
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(placeholder) => match render(placeholder) {
                Some(text) => out.push_str(&text),
                None => out.push_str("null"),
            },
        }
    }
    out
}

fn default_text(placeholder: &Placeholder, default_value: Option<&DefaultValue>) -> Result<String> {
    match default_value {
        Some(default) => Ok(default.resolve(placeholder.name())),
        None => Err(Error::NoDefaultValue(placeholder.name().to_string())),
    }
}

fn missing_text(
    placeholder: &Placeholder,
    features: &FeatureSet,
    default_value: Option<&DefaultValue>,
) -> Result<String> {
    match features.missing_key {
        Some(MissingKeyPolicy::WholePlaceholder) => Ok(placeholder.text().to_string()),
        Some(MissingKeyPolicy::DefaultValue) => default_text(placeholder, default_value),
        Some(MissingKeyPolicy::NullStr) => Ok("null".to_string()),
        Some(MissingKeyPolicy::Empty) => Ok(String::new()),
        Some(MissingKeyPolicy::VariableName) => Ok(placeholder.name().to_string()),
        Some(MissingKeyPolicy::Error) | None => {
            Err(Error::MissingValue(placeholder.name().to_string()))
        }
    }
}

fn null_text(
    placeholder: &Placeholder,
    features: &FeatureSet,
    default_value: Option<&DefaultValue>,
) -> Result<String> {
    match features.null_value {
        Some(NullValuePolicy::NullStr) => Ok("null".to_string()),
        Some(NullValuePolicy::Empty) => Ok(String::new()),
        Some(NullValuePolicy::WholePlaceholder) => Ok(placeholder.text().to_string()),
        Some(NullValuePolicy::DefaultValue) => default_text(placeholder, default_value),
        None => Err(Error::NullValue(placeholder.name().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use crate::parse::{parse_named, parse_simple};
    use std::collections::HashMap;

    fn fixed_len(segments: &[Segment]) -> usize {
        segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder(_) => 0,
            })
            .sum()
    }

    #[test]
    fn test_format_sequence() {
        let segments = parse_simple("this is {} for {}", "{}", '\\');
        let values = vec![Value::from("a"), Value::from("b")];
        let out = format_source(
            &segments,
            fixed_len(&segments),
            &FeatureSet::default(),
            None,
            &ValueSource::Sequence(&values),
        )
        .unwrap();
        assert_eq!(out, "this is a for b");
    }

    #[test]
    fn test_format_named_map() {
        let segments = parse_named("select * from #[tableName] where id = #[id]", "#[", "]", '\\');
        let mut map = HashMap::new();
        map.insert("tableName".to_string(), Value::from("user"));
        map.insert("id".to_string(), Value::from(1001));
        let out = format_source(
            &segments,
            fixed_len(&segments),
            &FeatureSet::default(),
            None,
            &ValueSource::Named(&map),
        )
        .unwrap();
        assert_eq!(out, "select * from user where id = 1001");
    }

    #[test]
    fn test_format_indexed() {
        let segments = parse_named("a {1} b {0}", "{", "}", '\\');
        let values = vec![Value::from("x"), Value::from("y")];
        let out = format_source(
            &segments,
            fixed_len(&segments),
            &FeatureSet::default(),
            None,
            &ValueSource::Indexed(&values),
        )
        .unwrap();
        assert_eq!(out, "a y b x");
    }

    #[test]
    fn test_missing_key_policies() {
        let segments = parse_named("hi {name}", "{", "}", '\\');
        let len = fixed_len(&segments);
        let map = HashMap::new();
        let source = ValueSource::Named(&map);

        let run = |feature: Feature, default: Option<&DefaultValue>| {
            let mut features = FeatureSet::default();
            features.set(feature);
            format_source(&segments, len, &features, default, &source)
        };

        assert_eq!(
            run(Feature::MissingKeyWholePlaceholder, None).unwrap(),
            "hi {name}"
        );
        assert_eq!(run(Feature::MissingKeyNullStr, None).unwrap(), "hi null");
        assert_eq!(run(Feature::MissingKeyEmpty, None).unwrap(), "hi ");
        assert_eq!(run(Feature::MissingKeyVariableName, None).unwrap(), "hi name");
        let default = DefaultValue::Constant("guest".to_string());
        assert_eq!(
            run(Feature::MissingKeyDefaultValue, Some(&default)).unwrap(),
            "hi guest"
        );
        assert_eq!(
            run(Feature::MissingKeyDefaultValue, None),
            Err(Error::NoDefaultValue("name".to_string()))
        );
        assert_eq!(
            run(Feature::MissingKeyError, None),
            Err(Error::MissingValue("name".to_string()))
        );
    }

    #[test]
    fn test_null_value_policies() {
        let segments = parse_named("hi {name}", "{", "}", '\\');
        let len = fixed_len(&segments);
        let mut map = HashMap::new();
        map.insert("name".to_string(), Value::Null);
        let source = ValueSource::Named(&map);

        let run = |feature: Feature| {
            let mut features = FeatureSet::default();
            features.set(feature);
            format_source(&segments, len, &features, None, &source).unwrap()
        };

        assert_eq!(run(Feature::NullValueNullStr), "hi null");
        assert_eq!(run(Feature::NullValueEmpty), "hi ");
        assert_eq!(run(Feature::NullValueWholePlaceholder), "hi {name}");
    }

    #[test]
    fn test_cleared_group_is_an_error() {
        let segments = parse_named("hi {name}", "{", "}", '\\');
        let map = HashMap::new();
        let mut features = FeatureSet::default();
        features.clear(Feature::MissingKeyWholePlaceholder);
        let result = format_source(
            &segments,
            fixed_len(&segments),
            &features,
            None,
            &ValueSource::Named(&map),
        );
        assert_eq!(result, Err(Error::MissingValue("name".to_string())));
    }

    #[test]
    fn test_format_raw() {
        let segments = parse_named("a {x} b {y}", "{", "}", '\\');
        let out = format_raw(&segments, |p| {
            (p.name() == "x").then(|| "1".to_string())
        });
        assert_eq!(out, "a 1 b null");
    }
}
