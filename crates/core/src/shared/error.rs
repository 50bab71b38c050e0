use thiserror::Error;

/// Failures of the decode → detect → mask → encode pipeline.
#[derive(Error, Debug)]
pub enum DukeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("face detector unavailable: {0}")]
    DetectorUnavailable(String),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

impl DukeError {
    /// Short stable name of the failure kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            DukeError::InvalidInput(_) => "InvalidInput",
            DukeError::Decode(_) => "DecodeError",
            DukeError::DetectorUnavailable(_) => "DetectorUnavailable",
            DukeError::Encode(_) => "EncodeError",
        }
    }
}
