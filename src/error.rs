use thiserror::Error;

/// Failures the business layer reports as data. Callers branch on the
/// variant; only `Storage` escalates to the presentation boundary as a
/// generic failure.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Photo not found")]
    PhotoNotFound,

    #[error("Album not found")]
    AlbumNotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("Tag already exists")]
    TagExists,

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
