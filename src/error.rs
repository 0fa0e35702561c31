//! Error types for rust-sqlscripter

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::model::ObjectKind;

/// Errors that abort a scripting run
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Invalid filter pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown object kind: {name}")]
    UnknownObjectKind { name: String },

    #[error("Failed to read filter file: {path}")]
    FilterFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid connection string: {message}")]
    InvalidConnection { message: String },

    #[error("Failed to open TCP connection to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error while {context}")]
    Database {
        context: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Unexpected catalog data in {facet}: {message}")]
    Catalog { facet: &'static str, message: String },

    #[error("Catalog queries did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Object enumeration task failed: {message}")]
    Producer { message: String },

    #[error("Scripting run was cancelled")]
    Cancelled,
}

impl ScriptError {
    pub(crate) fn database(context: impl Into<String>, source: tiberius::error::Error) -> Self {
        ScriptError::Database {
            context: context.into(),
            source,
        }
    }
}

/// Per-object rendering failures; the pipeline logs these and moves on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{name}: {renderer} renderer cannot script a {kind}")]
    KindMismatch {
        name: String,
        renderer: &'static str,
        kind: ObjectKind,
    },

    #[error("{name}: {kind} record carries no module settings")]
    NotAModule { name: String, kind: ObjectKind },

    #[error("{name}: no {facet} metadata loaded")]
    MissingMetadata { name: String, facet: &'static str },

    #[error("{name}: definition text is unavailable")]
    MissingDefinition { name: String },
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;
