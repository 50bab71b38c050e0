use crate::shared::error::DukeError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// One instance is shared by every worker, so detection takes `&self`
/// and must not mutate the frame. Regions come back in the detector's
/// native order, clamped to the frame.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<Region>, DukeError>;
}
