use crate::{runtime::error::RuntimeError, search::SearchError, tools::escape::EscapeError};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to access {}: {source}", .path.display())]
    #[diagnostic(code(hexsearch::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Program output could not be written to stdout")]
    #[diagnostic(
        code(hexsearch::output),
        help("the output stream was closed while the program was running")
    )]
    Output,
    #[error(transparent)]
    #[diagnostic(transparent)]
    Escape(#[from] EscapeError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeError),
}

impl CliError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
