// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Markup(String),
}

/// Item-scoped render degradations.
///
/// None of these are fatal: each resolves to a degraded card on the stage
/// while the overlay stays fully operable. They are carried inside the
/// stage content rather than propagated as `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    /// The resource URI failed the safety policy and was never loaded.
    UnsafeResource(String),

    /// An accepted resource failed to decode or load asynchronously.
    LoadFailure(String),

    /// The item requires inline content or a source and has neither.
    MissingContent,

    /// An optional third-party backend is absent at runtime.
    BackendUnavailable(String),
}

impl RenderFailure {
    /// Returns a stable identifier for the failure class, usable as a
    /// message key by the presenting layer.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            RenderFailure::UnsafeResource(_) => "stage-error-unsafe-resource",
            RenderFailure::LoadFailure(_) => "stage-error-load-failure",
            RenderFailure::MissingContent => "stage-error-missing-content",
            RenderFailure::BackendUnavailable(_) => "stage-error-backend-unavailable",
        }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFailure::UnsafeResource(uri) => write!(f, "Unsafe resource: {}", uri),
            RenderFailure::LoadFailure(msg) => write!(f, "Load failure: {}", msg),
            RenderFailure::MissingContent => write!(f, "No content to display"),
            RenderFailure::BackendUnavailable(name) => {
                write!(f, "Backend unavailable: {}", name)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Markup(e) => write!(f, "Markup Error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Markup(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
