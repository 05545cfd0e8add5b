use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    /// A registry, record or options file could not be deserialized
    Config(#[from] serde_json::Error),

    #[error("no box named `{0}` in the geometry registry")]
    UnknownBox(String),

    #[error("no table named `{0}` in the geometry registry")]
    UnknownTable(String),

    #[error("slot `{0}` has already been placed in every box of its chain")]
    ExhaustedSlot(String),
}
