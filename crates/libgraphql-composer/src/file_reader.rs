use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, ReadContentError>;

/// Read the full contents of a GraphQL source file as UTF-8 text.
///
/// The content is returned exactly as stored on disk; callers decide whether
/// to trim it.
pub fn read_content<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(ReadContentError::PathNotFound(file_path.to_path_buf()));
    }

    if !file_path.is_file() {
        return Err(ReadContentError::PathIsNotAFile(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)
        .map_err(|err| ReadContentError::FileReadError {
            file_path: file_path.to_path_buf(),
            err,
        })?;

    let content = String::from_utf8(bytes)
        .map_err(|err| ReadContentError::FileDecodeError {
            file_path: file_path.to_path_buf(),
            err,
        })?;

    Ok(content)
}

#[derive(Debug, Error)]
pub enum ReadContentError {
    #[error("File at {} is not valid UTF-8: {err}", file_path.display())]
    FileDecodeError {
        file_path: PathBuf,
        err: std::string::FromUtf8Error,
    },

    #[error("Failed to read file at {}: {err}", file_path.display())]
    FileReadError {
        file_path: PathBuf,
        err: std::io::Error,
    },

    #[error("Path is not a file: {}", .0.display())]
    PathIsNotAFile(PathBuf),

    #[error("No file exists at {}", .0.display())]
    PathNotFound(PathBuf),
}
impl ReadContentError {
    pub fn file_path(&self) -> &Path {
        match self {
            Self::FileDecodeError { file_path, .. }
                | Self::FileReadError { file_path, .. } => file_path.as_path(),

            Self::PathIsNotAFile(path)
                | Self::PathNotFound(path) => path.as_path(),
        }
    }
}
impl std::cmp::PartialEq for ReadContentError {
    fn eq(&self, other: &Self) -> bool {
        use ReadContentError::*;
        match (self, other) {
            (FileDecodeError {
                file_path: self_file_path,
                err: self_err,
            }, FileDecodeError {
                file_path: other_file_path,
                err: other_err,
            }) => {
                self_file_path.eq(other_file_path)
                && self_err.eq(other_err)
            },

            (FileReadError {
                file_path: self_file_path,
                err: self_err,
            }, FileReadError {
                file_path: other_file_path,
                err: other_err,
            }) => {
                self_file_path == other_file_path
                && self_err.kind() == other_err.kind()
            },

            (PathIsNotAFile(self_path), PathIsNotAFile(other_path)) => {
                self_path.eq(other_path)
            },

            (PathNotFound(self_path), PathNotFound(other_path)) => {
                self_path.eq(other_path)
            },

            _ => false,
        }
    }
}
