/// Error types for package editing operations.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for package editing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for package editing operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced part, slide position, shape, placeholder, or input file
    /// does not exist. Never retried.
    #[error("not found: {0}")]
    NotFound(String),

    /// An expected top-level part is missing; the working directory is not a
    /// valid unpacked package.
    #[error("invalid package structure: expected {}", .0.display())]
    PackageStructure(PathBuf),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
