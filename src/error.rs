//! Error types for html2docx.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Writing the `.docx` package failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A table row carries more cells than the table has columns.
    #[error("table row {row} has {cells} cells but the table has {columns} columns")]
    TableBounds {
        row: usize,
        cells: usize,
        columns: usize,
    },
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
