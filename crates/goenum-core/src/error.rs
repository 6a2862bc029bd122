use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid directive line: {0}")]
    InvalidLine(String),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("{path}: parser produced no syntax tree")]
    NoTree { path: PathBuf },

    #[error("{path}:{line}:{column}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{path}: no enumeration values found for type `{type_name}`")]
    NoValues { path: PathBuf, type_name: String },

    #[error("{path}: `{first}` and `{second}` both map to representation {representation:?}")]
    DuplicateRepresentation {
        path: PathBuf,
        representation: String,
        first: String,
        second: String,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
