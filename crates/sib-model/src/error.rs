use thiserror::Error;

use crate::value::ColumnType;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid network node '{node}': {message}")]
    InvalidNetworkNode { node: String, message: String },
    #[error("cannot read '{value}' as {ty}")]
    InvalidValue { ty: ColumnType, value: String },
    #[error("data source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ModelError {
    pub(crate) fn wrap_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
