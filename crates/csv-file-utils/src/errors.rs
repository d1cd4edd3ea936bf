use std::path::PathBuf;

use thiserror::Error;

pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Create CSV error: {} already exists. Do you want to overwrite?", .path.display())]
    FileExists { path: PathBuf },

    #[error("Parse error in record {record}: {message}")]
    Parse { record: usize, message: String },
}

impl CsvError {
    pub(crate) fn parse(record: usize, message: impl Into<String>) -> Self {
        CsvError::Parse {
            record,
            message: message.into(),
        }
    }
}
