//! Behavioral policies for formatting and matching.
//!
//! Features come in five mutually-exclusive groups. Adding a feature replaces
//! whichever member of its group was active before; removing a feature clears
//! its whole group, leaving the group with no active member.

/// A single behavioral flag. One member per group is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    // Format: placeholder has no bound value.
    /// Render the whole placeholder verbatim, e.g. `{name}`. Default.
    MissingKeyWholePlaceholder,
    /// Render the configured default value; error if none is configured.
    MissingKeyDefaultValue,
    /// Render the string `null`.
    MissingKeyNullStr,
    /// Render nothing.
    MissingKeyEmpty,
    /// Render only the variable name, e.g. `name`.
    MissingKeyVariableName,
    /// Fail with [`Error::MissingValue`](crate::Error::MissingValue).
    MissingKeyError,

    // Format: placeholder resolved to an explicit null value.
    /// Render the string `null`. Default.
    NullValueNullStr,
    /// Render nothing.
    NullValueEmpty,
    /// Render the whole placeholder verbatim.
    NullValueWholePlaceholder,
    /// Render the configured default value; error if none is configured.
    NullValueDefaultValue,

    // Match: capture equals the configured default value.
    /// Keep the capture as-is. Default.
    MatchKeepDefaultValue,
    /// Drop the entry from the result.
    MatchIgnoreDefaultValue,
    /// Report the capture as `None`.
    MatchDefaultValueToNone,

    // Match: capture is the empty string.
    /// Report the capture as `None`. Default.
    MatchEmptyToNone,
    /// Report the configured default value (or `None` without one).
    MatchEmptyToDefaultValue,
    /// Drop the entry from the result.
    MatchIgnoreEmpty,
    /// Keep the empty string.
    MatchKeepEmpty,

    // Match: capture is the literal string "null".
    /// Report the capture as `None`. Default.
    MatchNullStrToNone,
    /// Keep the string `"null"`.
    MatchKeepNullStr,
    /// Drop the entry from the result.
    MatchIgnoreNullStr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingKeyPolicy {
    WholePlaceholder,
    DefaultValue,
    NullStr,
    Empty,
    VariableName,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NullValuePolicy {
    NullStr,
    Empty,
    WholePlaceholder,
    DefaultValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchDefaultPolicy {
    Keep,
    Ignore,
    ToNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchEmptyPolicy {
    ToNone,
    ToDefaultValue,
    Ignore,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchNullStrPolicy {
    ToNone,
    Keep,
    Ignore,
}

/// The resolved per-group policy state of a template.
///
/// Each slot holds at most one active member; `None` means the group was
/// cleared and operations that need the policy fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FeatureSet {
    pub missing_key: Option<MissingKeyPolicy>,
    pub null_value: Option<NullValuePolicy>,
    pub match_default: Option<MatchDefaultPolicy>,
    pub match_empty: Option<MatchEmptyPolicy>,
    pub match_null_str: Option<MatchNullStrPolicy>,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            missing_key: Some(MissingKeyPolicy::WholePlaceholder),
            null_value: Some(NullValuePolicy::NullStr),
            match_default: Some(MatchDefaultPolicy::Keep),
            match_empty: Some(MatchEmptyPolicy::ToNone),
            match_null_str: Some(MatchNullStrPolicy::ToNone),
        }
    }
}

impl FeatureSet {
    /// All groups cleared; used by `features(..)` which replaces the whole
    /// set rather than starting from the defaults.
    pub(crate) fn empty() -> Self {
        Self {
            missing_key: None,
            null_value: None,
            match_default: None,
            match_empty: None,
            match_null_str: None,
        }
    }

    pub(crate) fn set(&mut self, feature: Feature) {
        use Feature::*;
        match feature {
            MissingKeyWholePlaceholder => {
                self.missing_key = Some(MissingKeyPolicy::WholePlaceholder)
            }
            MissingKeyDefaultValue => self.missing_key = Some(MissingKeyPolicy::DefaultValue),
            MissingKeyNullStr => self.missing_key = Some(MissingKeyPolicy::NullStr),
            MissingKeyEmpty => self.missing_key = Some(MissingKeyPolicy::Empty),
            MissingKeyVariableName => self.missing_key = Some(MissingKeyPolicy::VariableName),
            MissingKeyError => self.missing_key = Some(MissingKeyPolicy::Error),

            NullValueNullStr => self.null_value = Some(NullValuePolicy::NullStr),
            NullValueEmpty => self.null_value = Some(NullValuePolicy::Empty),
            NullValueWholePlaceholder => {
                self.null_value = Some(NullValuePolicy::WholePlaceholder)
            }
            NullValueDefaultValue => self.null_value = Some(NullValuePolicy::DefaultValue),

            MatchKeepDefaultValue => self.match_default = Some(MatchDefaultPolicy::Keep),
            MatchIgnoreDefaultValue => self.match_default = Some(MatchDefaultPolicy::Ignore),
            MatchDefaultValueToNone => self.match_default = Some(MatchDefaultPolicy::ToNone),

            MatchEmptyToNone => self.match_empty = Some(MatchEmptyPolicy::ToNone),
            MatchEmptyToDefaultValue => self.match_empty = Some(MatchEmptyPolicy::ToDefaultValue),
            MatchIgnoreEmpty => self.match_empty = Some(MatchEmptyPolicy::Ignore),
            MatchKeepEmpty => self.match_empty = Some(MatchEmptyPolicy::Keep),

            MatchNullStrToNone => self.match_null_str = Some(MatchNullStrPolicy::ToNone),
            MatchKeepNullStr => self.match_null_str = Some(MatchNullStrPolicy::Keep),
            MatchIgnoreNullStr => self.match_null_str = Some(MatchNullStrPolicy::Ignore),
        }
    }

    /// Clears the whole group the feature belongs to, whichever member is
    /// currently active.
    pub(crate) fn clear(&mut self, feature: Feature) {
        use Feature::*;
        match feature {
            MissingKeyWholePlaceholder | MissingKeyDefaultValue | MissingKeyNullStr
            | MissingKeyEmpty | MissingKeyVariableName | MissingKeyError => {
                self.missing_key = None
            }
            NullValueNullStr | NullValueEmpty | NullValueWholePlaceholder
            | NullValueDefaultValue => self.null_value = None,
            MatchKeepDefaultValue | MatchIgnoreDefaultValue | MatchDefaultValueToNone => {
                self.match_default = None
            }
            MatchEmptyToNone | MatchEmptyToDefaultValue | MatchIgnoreEmpty | MatchKeepEmpty => {
                self.match_empty = None
            }
            MatchNullStrToNone | MatchKeepNullStr | MatchIgnoreNullStr => {
                self.match_null_str = None
            }
        }
    }

    /// Whether the given feature is the active member of its group.
    #[cfg(test)]
    pub(crate) fn contains(&self, feature: Feature) -> bool {
        use Feature::*;
        match feature {
            MissingKeyWholePlaceholder => {
                self.missing_key == Some(MissingKeyPolicy::WholePlaceholder)
            }
            MissingKeyDefaultValue => self.missing_key == Some(MissingKeyPolicy::DefaultValue),
            MissingKeyNullStr => self.missing_key == Some(MissingKeyPolicy::NullStr),
            MissingKeyEmpty => self.missing_key == Some(MissingKeyPolicy::Empty),
            MissingKeyVariableName => self.missing_key == Some(MissingKeyPolicy::VariableName),
            MissingKeyError => self.missing_key == Some(MissingKeyPolicy::Error),

            NullValueNullStr => self.null_value == Some(NullValuePolicy::NullStr),
            NullValueEmpty => self.null_value == Some(NullValuePolicy::Empty),
            NullValueWholePlaceholder => {
                self.null_value == Some(NullValuePolicy::WholePlaceholder)
            }
            NullValueDefaultValue => self.null_value == Some(NullValuePolicy::DefaultValue),

            MatchKeepDefaultValue => self.match_default == Some(MatchDefaultPolicy::Keep),
            MatchIgnoreDefaultValue => self.match_default == Some(MatchDefaultPolicy::Ignore),
            MatchDefaultValueToNone => self.match_default == Some(MatchDefaultPolicy::ToNone),

            MatchEmptyToNone => self.match_empty == Some(MatchEmptyPolicy::ToNone),
            MatchEmptyToDefaultValue => {
                self.match_empty == Some(MatchEmptyPolicy::ToDefaultValue)
            }
            MatchIgnoreEmpty => self.match_empty == Some(MatchEmptyPolicy::Ignore),
            MatchKeepEmpty => self.match_empty == Some(MatchEmptyPolicy::Keep),

            MatchNullStrToNone => self.match_null_str == Some(MatchNullStrPolicy::ToNone),
            MatchKeepNullStr => self.match_null_str == Some(MatchNullStrPolicy::Keep),
            MatchIgnoreNullStr => self.match_null_str == Some(MatchNullStrPolicy::Ignore),
        }
    }
}
