use std::path::PathBuf;

use thiserror::Error;

pub type Res<T> = std::result::Result<T, CorpusError>;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "could not find a domain file for {} in the same or parent directory. Candidates: {candidates:?}",
        problem.display()
    )]
    NoDomainFile { problem: PathBuf, candidates: Vec<String> },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}
