use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("placeholder delimiters must not be empty")]
    EmptyDelimiter,

    #[error("no value bound to placeholder '{0}' and no missing-key policy is active")]
    MissingValue(String),

    #[error("placeholder '{0}' resolved to a null value and no null-value policy is active")]
    NullValue(String),

    #[error("no default value configured for placeholder '{0}'")]
    NoDefaultValue(String),

    #[error("placeholders '{0}' and '{1}' are adjacent; their captures cannot be split")]
    AdjacentPlaceholders(String, String),
}

pub type Result<T> = std::result::Result<T, Error>;
