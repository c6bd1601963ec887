use thiserror::Error;

/// Errors raised while compiling a filter expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    /// Structure of the filter text is invalid (unbalanced parentheses,
    /// empty arguments, wrong argument count).
    #[error("malformed filter: {message}")]
    Malformed { message: String },

    /// A bare field name is not part of the feature type.
    #[error("unknown filter field: {field}")]
    UnknownField { field: String },

    /// A function keyword outside the supported vocabulary.
    #[error("unknown filter operator: {keyword}")]
    UnknownOperator { keyword: String },

    /// Writing the filter document failed.
    #[error("failed to render filter XML: {0}")]
    Xml(String),
}

impl FilterError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
