//! Error types for corral

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("not enough documents to cluster: {have} documents into {clusters} clusters")]
    InsufficientCorpus { have: usize, clusters: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
