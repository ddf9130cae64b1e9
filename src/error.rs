use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read `{path}`: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
    #[error("cannot write `{path}`: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
    #[error("input has no header row")]
    EmptyInput,
    #[error("duplicate column `{0}` in header")]
    DuplicateColumn(String),
    #[error("record {record} has {found} fields, header has {expected}")]
    RaggedRow {
        record: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown key column `{0}`")]
    UnknownKeyColumn(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn input(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Input {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Output {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
