//! Result, error, and warning types for Pagina.

use thiserror::Error;

/// Result type for Pagina operations
pub type PageResult<T> = Result<T, PageError>;

/// Result type at the driver boundary
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur while declaring, resolving, or driving fields
#[derive(Debug, Error)]
pub enum PageError {
    /// A field was declared without a usable locator
    #[error("`locator` must be instance of class `Locator`, got `{got}`")]
    InvalidLocator {
        /// Runtime type name of the value found (`NoneType` when absent)
        got: String,
    },

    /// A field was declared under a name reserved for the resolver's cache
    #[error("`{name}` attribute is not permitted in `{kind}` fields")]
    AttributeNotPermitted {
        /// The offending field name
        name: String,
        /// The resolver kind that reserves it
        kind: String,
    },

    /// A boolean flag in a page document held a non-boolean value
    #[error("`{flag}` must be of `bool` type, got `{got}`")]
    FlagType {
        /// The flag name (e.g. `search_with_driver`)
        flag: String,
        /// Runtime type name of the offending value
        got: String,
    },

    /// A field name was accessed that the owning section never declared
    #[error("no field named `{name}` is declared in `{section}`")]
    UnknownField {
        /// The requested field name
        name: String,
        /// The owning section's type name
        section: String,
    },

    /// `fill` was handed something other than a mapping
    #[error("fill data must be a mapping, got `{got}`")]
    NotAnObject {
        /// Runtime type name of the offending value
        got: String,
    },

    /// A visibility wait expired
    #[error("element did not become visible within {ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds
        ms: u64,
    },

    /// A declarative page document could not be interpreted
    #[error("page document is invalid: {message}")]
    Document {
        /// What was wrong with the document
        message: String,
    },

    /// Failure propagated unchanged from the session/driver collaborator
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Errors produced by the session/driver collaborator
#[derive(Debug, Error)]
pub enum DriverError {
    /// The lookup matched nothing
    #[error("no element matched `{locator}`")]
    NotFound {
        /// Display form of the locator that failed
        locator: String,
    },

    /// Any other native failure (protocol, stale reference, script error)
    #[error("driver backend error: {message}")]
    Backend {
        /// Error message from the backend
        message: String,
    },
}

/// Recoverable warning emitted when a lookup cannot proceed because its
/// scope has no live single handle (invalidated, degraded, or a multi-handle
/// collection).
///
/// The field is left unresolved; this warning is the only signal. It is also
/// mirrored through `tracing::warn!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionWarning {
    /// Type name of the section whose scope was unusable
    pub section: String,
}

impl ResolutionWarning {
    /// Create a warning naming the declaring section
    #[must_use]
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` has no resolved `handle` to search from; field left unresolved",
            self.section
        )
    }
}
