use thiserror::Error;

/// A contract violation in the loaded table. Raised only at load time; the
/// aggregation pipeline itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}': expected {expected}, got '{found}'")]
    InvalidValue {
        column: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("column '{column}' has unsupported type {found}")]
    UnsupportedType { column: &'static str, found: String },
}
