use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PfSplitError {
    #[error("line {line}: field line has no tab separator")]
    UnseparatedField { line: usize },

    #[error("record starting at line {line} is missing its // terminator")]
    UnterminatedRecord { line: usize },

    #[error("record ending at line {line} has no ID field")]
    RecordWithoutId { line: usize },

    #[error("missing expected column {column} in {path}")]
    MissingColumn { column: String, path: Utf8PathBuf },

    #[error("failed to parse table {path}: {message}")]
    TableParse { path: Utf8PathBuf, message: String },

    #[error("no record found for intact ORF {0}")]
    MissingIntactOrf(String),

    #[error("failed to read input file at {0}")]
    InputRead(Utf8PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
