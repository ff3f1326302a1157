use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Setting not found: {section}.{key}")]
    SettingNotFound { section: String, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn capture_unavailable(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    pub fn setting_not_found(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self::SettingNotFound {
            section: section.into(),
            key: key.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
