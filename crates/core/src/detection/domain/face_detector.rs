use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for face detection.
///
/// Implementations may hold sessions or scratch buffers, hence `&mut self`.
/// An empty result is a valid answer, not an error.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}
