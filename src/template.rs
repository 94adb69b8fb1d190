//! Template facades: a single-token [`SimpleTemplate`] and a prefix/suffix
//! [`NamedTemplate`], both built through chained builders.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::features::{Feature, FeatureSet};
use crate::format;
use crate::matcher::{self, CaptureOutcome};
use crate::parse::{self, Placeholder, PlaceholderKey, Segment};
use crate::value::{Value, ValueSource};

/// Fallback value used by the default-value policies, either a constant or a
/// handler keyed on the placeholder name.
#[derive(Clone)]
pub(crate) enum DefaultValue {
    Constant(String),
    Handler(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl DefaultValue {
    pub(crate) fn resolve(&self, name: &str) -> String {
        match self {
            DefaultValue::Constant(text) => text.clone(),
            DefaultValue::Handler(handler) => handler(name),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Constant(text) => f.debug_tuple("Constant").field(text).finish(),
            DefaultValue::Handler(_) => f.debug_tuple("Handler").field(&"<fn>").finish(),
        }
    }
}

/// State shared by both template kinds: the parsed segments plus the policy
/// configuration they are evaluated under.
#[derive(Debug, Clone)]
struct TemplateCore {
    template: String,
    segments: Vec<Segment>,
    fixed_len: usize,
    features: FeatureSet,
    default_value: Option<DefaultValue>,
}

impl TemplateCore {
    fn new(
        template: String,
        segments: Vec<Segment>,
        features: FeatureSet,
        default_value: Option<DefaultValue>,
    ) -> Self {
        let fixed_len = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder(_) => 0,
            })
            .sum();
        Self {
            template,
            segments,
            fixed_len,
            features,
            default_value,
        }
    }

    fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Literal(_) => None,
        })
    }

    fn format_source(&self, source: &ValueSource<'_>) -> Result<String> {
        format::format_source(
            &self.segments,
            self.fixed_len,
            &self.features,
            self.default_value.as_ref(),
            source,
        )
    }

    fn refine(&self, placeholder: &Placeholder, raw: &str) -> CaptureOutcome {
        matcher::refine_capture(&self.features, raw, || {
            self.default_value
                .as_ref()
                .map(|d| d.resolve(placeholder.name()))
        })
    }

    /// Raw captures paired with their placeholders, before policy refinement.
    fn captures<'a>(&self, input: &'a str) -> Result<Option<Vec<(&Placeholder, &'a str)>>> {
        match matcher::match_segments(&self.segments, input)? {
            Some(captures) => Ok(Some(self.placeholders().zip(captures).collect())),
            None => Ok(None),
        }
    }
}

// Builder configuration shared verbatim between the two builders.
macro_rules! policy_methods {
    () => {
        /// Replaces the whole feature set with exactly the given features.
        /// Groups not named are cleared, not reset to their defaults.
        pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
            let mut set = FeatureSet::empty();
            for feature in features {
                set.set(feature);
            }
            self.features = set;
            self
        }

        /// Activates features on top of the current set, replacing the
        /// previously active member of each touched group.
        pub fn add_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
            for feature in features {
                self.features.set(feature);
            }
            self
        }

        /// Clears the whole group of each given feature.
        pub fn remove_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
            for feature in features {
                self.features.clear(feature);
            }
            self
        }

        /// Sets a constant default value for the default-value policies.
        pub fn default_value(mut self, value: impl Into<String>) -> Self {
            self.default_value = Some(DefaultValue::Constant(value.into()));
            self
        }

        /// Sets a default-value handler called with the placeholder name.
        pub fn default_value_with(
            mut self,
            handler: impl Fn(&str) -> String + Send + Sync + 'static,
        ) -> Self {
            self.default_value = Some(DefaultValue::Handler(Arc::new(handler)));
            self
        }
    };
}

/// A template whose placeholders are all the same token, bound by position.
///
/// ```
/// use stencil::SimpleTemplate;
///
/// let template = SimpleTemplate::builder("this is {} for {}").build()?;
/// assert_eq!(template.format(["a", "b"])?, "this is a for b");
/// # Ok::<(), stencil::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SimpleTemplate {
    core: TemplateCore,
}

impl SimpleTemplate {
    pub fn builder(template: impl Into<String>) -> SimpleTemplateBuilder {
        SimpleTemplateBuilder {
            template: template.into(),
            token: "{}".to_string(),
            escape: '\\',
            features: FeatureSet::default(),
            default_value: None,
        }
    }

    pub fn template(&self) -> &str {
        &self.core.template
    }

    /// Placeholder names in encounter order. For a simple template every
    /// name is the token itself.
    pub fn variable_names(&self) -> Vec<&str> {
        self.core.placeholders().map(Placeholder::name).collect()
    }

    pub fn placeholder_texts(&self) -> Vec<&str> {
        self.core.placeholders().map(Placeholder::text).collect()
    }

    /// Formats values into the template, consumed left to right.
    pub fn format<I>(&self, values: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.core.format_source(&ValueSource::Sequence(&values))
    }

    /// Formats with a caller-supplied textual resolver, bypassing policies.
    pub fn format_raw<F>(&self, render: F) -> String
    where
        F: FnMut(&Placeholder) -> Option<String>,
    {
        format::format_raw(&self.core.segments, render)
    }

    /// Whether the input fits the template shape.
    pub fn is_match(&self, input: &str) -> Result<bool> {
        Ok(matcher::match_segments(&self.core.segments, input)?.is_some())
    }

    /// Recovers captures in placeholder order. Ignore-style policies drop
    /// their element from the list.
    pub fn matches(&self, input: &str) -> Result<Option<Vec<Option<String>>>> {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(captures.len());
        for (placeholder, raw) in captures {
            match self.core.refine(placeholder, raw) {
                CaptureOutcome::Keep(value) => values.push(value),
                CaptureOutcome::Skip => {}
            }
        }
        Ok(Some(values))
    }
}

#[derive(Debug)]
pub struct SimpleTemplateBuilder {
    template: String,
    token: String,
    escape: char,
    features: FeatureSet,
    default_value: Option<DefaultValue>,
}

impl SimpleTemplateBuilder {
    /// Sets the placeholder token, `{}` by default.
    pub fn placeholder(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Sets the escape character, `\` by default.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    policy_methods!();

    pub fn build(self) -> Result<SimpleTemplate> {
        if self.token.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        let segments = parse::parse_simple(&self.template, &self.token, self.escape);
        Ok(SimpleTemplate {
            core: TemplateCore::new(self.template, segments, self.features, self.default_value),
        })
    }
}

/// A template whose placeholders carry names between a prefix and a suffix,
/// like `#[tableName]` or `{id}`.
///
/// ```
/// use std::collections::HashMap;
/// use stencil::{NamedTemplate, Value};
///
/// let template = NamedTemplate::builder("select * from #[table] where id = #[id]")
///     .prefix("#[")
///     .suffix("]")
///     .build()?;
///
/// let mut values = HashMap::new();
/// values.insert("table".to_string(), Value::from("user"));
/// values.insert("id".to_string(), Value::from(1001));
/// assert_eq!(
///     template.format_map(&values)?,
///     "select * from user where id = 1001"
/// );
///
/// let captured = template
///     .matches("select * from user where id = 1001")?
///     .unwrap();
/// assert_eq!(captured["id"], Some("1001".to_string()));
/// # Ok::<(), stencil::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct NamedTemplate {
    core: TemplateCore,
}

impl NamedTemplate {
    pub fn builder(template: impl Into<String>) -> NamedTemplateBuilder {
        NamedTemplateBuilder {
            template: template.into(),
            prefix: "{".to_string(),
            suffix: "}".to_string(),
            escape: '\\',
            features: FeatureSet::default(),
            default_value: None,
        }
    }

    pub fn template(&self) -> &str {
        &self.core.template
    }

    /// Placeholder names in encounter order, duplicates included.
    pub fn variable_names(&self) -> Vec<&str> {
        self.core.placeholders().map(Placeholder::name).collect()
    }

    pub fn placeholder_texts(&self) -> Vec<&str> {
        self.core.placeholders().map(Placeholder::text).collect()
    }

    pub fn format(&self, source: &ValueSource<'_>) -> Result<String> {
        self.core.format_source(source)
    }

    /// Formats values consumed left to right, ignoring placeholder names.
    pub fn format_sequence<I>(&self, values: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.core.format_source(&ValueSource::Sequence(&values))
    }

    /// Formats values addressed by `{0}`-style zero-based indexes.
    pub fn format_indexed<I>(&self, values: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.core.format_source(&ValueSource::Indexed(&values))
    }

    /// Like [`format_indexed`](Self::format_indexed) but out-of-range
    /// indexes render the fallback's result instead of going through the
    /// missing-key policy.
    pub fn format_indexed_or_else<I, F>(&self, values: I, fallback: F) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        F: Fn(usize) -> String,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        format::format_resolved(
            &self.core.segments,
            self.core.fixed_len,
            &self.core.features,
            self.core.default_value.as_ref(),
            |_, placeholder| match placeholder.key() {
                PlaceholderKey::Indexed(index) => Some(
                    values
                        .get(*index)
                        .cloned()
                        .unwrap_or_else(|| Value::Str(fallback(*index))),
                ),
                _ => None,
            },
        )
    }

    pub fn format_map(&self, values: &HashMap<String, Value>) -> Result<String> {
        self.core.format_source(&ValueSource::Named(values))
    }

    /// Formats with an accessor looking values up by placeholder name, e.g.
    /// struct field getters.
    pub fn format_with<F>(&self, accessor: F) -> Result<String>
    where
        F: Fn(&str) -> Option<Value>,
    {
        self.core.format_source(&ValueSource::Record(&accessor))
    }

    /// Formats with a caller-supplied textual resolver, bypassing policies.
    pub fn format_raw<F>(&self, render: F) -> String
    where
        F: FnMut(&Placeholder) -> Option<String>,
    {
        format::format_raw(&self.core.segments, render)
    }

    /// Whether the input fits the template shape.
    pub fn is_match(&self, input: &str) -> Result<bool> {
        Ok(matcher::match_segments(&self.core.segments, input)?.is_some())
    }

    /// Recovers captures keyed by placeholder name. For duplicate names the
    /// later capture wins. Ignore-style policies omit their key.
    pub fn matches(&self, input: &str) -> Result<Option<HashMap<String, Option<String>>>> {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(None);
        };
        let mut map = HashMap::with_capacity(captures.len());
        for (placeholder, raw) in captures {
            match self.core.refine(placeholder, raw) {
                CaptureOutcome::Keep(value) => {
                    map.insert(placeholder.name().to_string(), value);
                }
                CaptureOutcome::Skip => {}
            }
        }
        Ok(Some(map))
    }

    /// Recovers captures in placeholder order, ignoring names.
    pub fn matches_sequence(&self, input: &str) -> Result<Option<Vec<Option<String>>>> {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(captures.len());
        for (placeholder, raw) in captures {
            match self.core.refine(placeholder, raw) {
                CaptureOutcome::Keep(value) => values.push(value),
                CaptureOutcome::Skip => {}
            }
        }
        Ok(Some(values))
    }

    /// Recovers captures into a list addressed by `{0}`-style indexes. The
    /// list spans index 0 to the highest index seen; positions with no
    /// placeholder stay `None`.
    pub fn matches_indexed(&self, input: &str) -> Result<Option<Vec<Option<String>>>> {
        self.matches_indexed_with(input, |_, placeholder| {
            self.core
                .default_value
                .as_ref()
                .map(|d| d.resolve(placeholder.name()))
        })
    }

    /// Like [`matches_indexed`](Self::matches_indexed) but the fallback
    /// stands in for the configured default value of each indexed
    /// placeholder, keyed by its index. It feeds the default-dependent match
    /// policies, notably [`Feature::MatchEmptyToDefaultValue`]; positions no
    /// placeholder covers still stay `None`.
    pub fn matches_indexed_or_else<F>(
        &self,
        input: &str,
        fallback: F,
    ) -> Result<Option<Vec<Option<String>>>>
    where
        F: Fn(usize) -> Option<String>,
    {
        self.matches_indexed_with(input, |index, _| fallback(index))
    }

    fn matches_indexed_with<D>(
        &self,
        input: &str,
        default_for: D,
    ) -> Result<Option<Vec<Option<String>>>>
    where
        D: Fn(usize, &Placeholder) -> Option<String>,
    {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(None);
        };
        let len = captures
            .iter()
            .filter_map(|(placeholder, _)| match placeholder.key() {
                PlaceholderKey::Indexed(index) => Some(index + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let mut values: Vec<Option<String>> = vec![None; len];
        for (placeholder, raw) in captures {
            if let PlaceholderKey::Indexed(index) = placeholder.key() {
                let outcome = matcher::refine_capture(&self.core.features, raw, || {
                    default_for(*index, placeholder)
                });
                if let CaptureOutcome::Keep(value) = outcome {
                    values[*index] = value;
                }
            }
        }
        Ok(Some(values))
    }

    /// Feeds each kept capture to the consumer as `(name, value)`. Returns
    /// whether the input matched at all.
    pub fn matches_by_key<F>(&self, input: &str, mut consumer: F) -> Result<bool>
    where
        F: FnMut(&str, Option<String>),
    {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(false);
        };
        for (placeholder, raw) in captures {
            match self.core.refine(placeholder, raw) {
                CaptureOutcome::Keep(value) => consumer(placeholder.name(), value),
                CaptureOutcome::Skip => {}
            }
        }
        Ok(true)
    }

    /// Builds a value with `factory` and feeds each kept capture to `setter`
    /// as `(target, name, value)`. Returns `None` when the input does not
    /// match; the factory only runs on a match.
    pub fn match_into<T, F, S>(&self, input: &str, factory: F, mut setter: S) -> Result<Option<T>>
    where
        F: FnOnce() -> T,
        S: FnMut(&mut T, &str, Option<String>),
    {
        let Some(captures) = self.core.captures(input)? else {
            return Ok(None);
        };
        let mut target = factory();
        for (placeholder, raw) in captures {
            match self.core.refine(placeholder, raw) {
                CaptureOutcome::Keep(value) => setter(&mut target, placeholder.name(), value),
                CaptureOutcome::Skip => {}
            }
        }
        Ok(Some(target))
    }
}

#[derive(Debug)]
pub struct NamedTemplateBuilder {
    template: String,
    prefix: String,
    suffix: String,
    escape: char,
    features: FeatureSet,
    default_value: Option<DefaultValue>,
}

impl NamedTemplateBuilder {
    /// Sets the placeholder prefix, `{` by default.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the placeholder suffix, `}` by default.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the escape character, `\` by default.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    policy_methods!();

    pub fn build(self) -> Result<NamedTemplate> {
        if self.prefix.is_empty() || self.suffix.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        let segments = parse::parse_named(&self.template, &self.prefix, &self.suffix, self.escape);
        Ok(NamedTemplate {
            core: TemplateCore::new(self.template, segments, self.features, self.default_value),
        })
    }
}
