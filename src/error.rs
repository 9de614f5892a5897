use thiserror::Error;

use crate::format::Format;

/// Errors raised while reading holders or binding a schema to a source.
///
/// `Parse` and `Emit` always carry the format name and the fully-qualified
/// path of the element that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum BindfigError {
    /// A holder was read before it received a value.
    #[error("value is not set")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(bindfig::not_set),
            help("check `initialized()` before reading, or give the field a default")
        )
    )]
    NotSet,

    /// A mandatory element could not be resolved, or a validator rejected it.
    #[error("{format} '{path}' {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(bindfig::parse)))]
    Parse {
        format: &'static str,
        path: String,
        reason: String,
    },

    /// A mandatory element could not be written to the destination.
    #[error("{format} '{path}' {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(bindfig::emit)))]
    Emit {
        format: &'static str,
        path: String,
        reason: String,
    },
}

impl BindfigError {
    pub(crate) fn parse<F: Format>(path: &str, reason: impl Into<String>) -> Self {
        BindfigError::Parse {
            format: F::NAME,
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn emit<F: Format>(path: &str, reason: impl Into<String>) -> Self {
        BindfigError::Emit {
            format: F::NAME,
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// The path the failure was reported against, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            BindfigError::NotSet => None,
            BindfigError::Parse { path, .. } | BindfigError::Emit { path, .. } => Some(path),
        }
    }
}
