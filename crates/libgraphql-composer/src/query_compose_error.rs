use crate::file_reader::ReadContentError;
use std::path::PathBuf;
use thiserror::Error;

/// Identifies which kind of external source a file-loading error refers to.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    Fragment(String),
    Query,
}
impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fragment(name) => write!(f, "fragment `{name}`"),
            Self::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryComposeError {
    #[error(
        "Fragment resolution did not settle after {passes} passes; spreads \
        still expanding: {}",
        format_fragment_names(.unresolved),
    )]
    CircularOrExcessiveExpansion {
        passes: usize,
        unresolved: Vec<String>,
    },

    #[error("No fluent operation or selections defined")]
    EmptySelection,

    #[error("GraphQL {kind} file not found: {}", path.display())]
    SourceNotFound {
        kind: SourceKind,
        path: PathBuf,
    },

    #[error("Failed to read GraphQL {kind} file {}: {err}", path.display())]
    SourceUnreadable {
        kind: SourceKind,
        path: PathBuf,
        err: Box<ReadContentError>,
    },

    #[error("Cannot call end() - no nested selection to close")]
    UnbalancedScope,
}
impl QueryComposeError {
    pub(crate) fn from_read_error(kind: SourceKind, err: ReadContentError) -> Self {
        match err {
            ReadContentError::PathNotFound(path) =>
                Self::SourceNotFound { kind, path },

            other => Self::SourceUnreadable {
                kind,
                path: other.file_path().to_path_buf(),
                err: Box::new(other),
            },
        }
    }
}

fn format_fragment_names(names: &[String]) -> String {
    if names.is_empty() {
        return "<none detected>".to_string();
    }

    names.iter()
        .map(|name| format!("...{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
