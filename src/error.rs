//! Error types for the content pipeline and the request boundary

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading content or rendering pages
#[derive(Error, Debug)]
pub enum Error {
    /// Front matter could not be segmented or parsed
    #[error("malformed content in {path:?}: {reason}")]
    MalformedContent { path: PathBuf, reason: String },

    /// No content file matches the requested identifier
    #[error("no content found for {0:?}")]
    ContentNotFound(String),

    /// The page name is not present in the template cache
    #[error("the template {0} does not exist")]
    UnknownTemplate(String),

    /// Tera failed while executing a compiled page
    #[error("failed to render template {name}")]
    TemplateExecution {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// A page or layout failed to compile while building the cache
    #[error("failed to compile template {name}")]
    TemplateCompile {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write rendered output")]
    Output(#[source] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedContent {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure means "nothing here" rather than a server fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ContentNotFound(_))
    }

    /// The error message followed by every underlying cause, one per line
    pub fn trace(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
