use std::path::PathBuf;

use skillsync_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Skills(#[from] skillsync_skills::Error),
    #[error("project manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },
    #[error("{message}")]
    Message { message: String },
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

skillsync_common::impl_context!();
