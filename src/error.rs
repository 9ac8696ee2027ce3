use thiserror::Error;

/// Everything that can go wrong while analysing an image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no opaque pixels to cluster")]
    EmptyInput,

    #[error("palette is empty")]
    InvalidPalette,

    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    #[error("cluster count must be between 1 and {max}, got {k}")]
    InvalidClusterCount { k: usize, max: usize },
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

const DECODE_MESSAGE: &str = "Could not read image, try another file";
const GENERIC_MESSAGE: &str = "Something went wrong while analysing the image colors";

impl AnalysisError {
    /// Text that can be shown to the end user as-is.
    ///
    /// Only a failed decode is the user's to fix; every other variant is a
    /// caller bug and gets the generic fallback.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Decode(_) => DECODE_MESSAGE,
            _ => GENERIC_MESSAGE,
        }
    }
}
