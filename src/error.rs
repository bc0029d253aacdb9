use std::path::PathBuf;

/// Errors produced while discovering screens, fitting images, or applying the
/// composed background.
///
/// None of these are transient; callers are expected to give up on the run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("could not open display {display:?}: {reason}")]
    DisplayUnavailable { display: String, reason: String },

    #[error("{extension} is not available: {reason}")]
    ExtensionUnavailable {
        extension: &'static str,
        reason: String,
    },

    #[error("failed to decode image {}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to resize image: {reason}")]
    ImageResize { reason: String },

    #[error("invalid screen geometry {0:?}, expected WIDTHxHEIGHT+X+Y with a non-zero size")]
    InvalidGeometry(String),

    #[error("no screens to compose onto")]
    EmptyLayout,

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("failed to encode composed image")]
    Encode(#[source] image::ImageError),

    #[error("failed to load config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("`{command}` {status}")]
    Command { command: String, status: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn display_unavailable(display: Option<&str>, reason: impl ToString) -> Self {
        Self::DisplayUnavailable {
            display: display.unwrap_or_default().to_owned(),
            reason: reason.to_string(),
        }
    }
}
