use crate::boxes::FourCC;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A read or skip would cross the end of the current bounded region.
    #[error("insufficient data: {requested} bytes requested, {available} available")]
    InsufficientData { requested: u64, available: u64 },

    #[error("invalid seek to offset {0}")]
    InvalidSeek(i128),

    #[error("malformed box '{box_type}': {reason}")]
    MalformedBox { box_type: FourCC, reason: String },

    #[error("invalid box type {0:?}: box names must be exactly 4 characters long")]
    Configuration(String),

    #[error("data is not an ISO media file")]
    NotIsoMedia,
}

impl Error {
    pub(crate) fn malformed(box_type: FourCC, reason: impl Into<String>) -> Self {
        Error::MalformedBox {
            box_type,
            reason: reason.into(),
        }
    }

    /// True for the "ran out of bytes" family of errors.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
