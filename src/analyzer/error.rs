use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Repository path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Failed to run git")]
    ExtractionFailed(#[source] std::io::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}
