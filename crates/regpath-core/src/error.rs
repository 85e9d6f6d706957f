use std::path::PathBuf;

use thiserror::Error;

use crate::dump::VariableCategory;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Module results file {} doesn't exist", path.display())]
    MissingInput { path: PathBuf },

    #[error("Random file {trial} doesn't exist ({}); aborting", path.display())]
    MissingTrial { trial: usize, path: PathBuf },

    #[error("{}:{line}: {message}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(
        "Too many entries per symbol in dump files ({category}: {symbol}, count {count}, total {total})"
    )]
    ConfidenceOverflow {
        category: VariableCategory,
        symbol: String,
        count: u64,
        total: u64,
    },

    #[error("Invalid file pattern: {0}")]
    Pattern(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
