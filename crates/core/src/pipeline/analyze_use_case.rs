use crate::classification::domain::gender_classifier::{GenderClassifier, GenderResult};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// One detected face with its gender call.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnalysis {
    pub region: FaceRegion,
    pub gender: GenderResult,
}

/// Single-frame pipeline: detect → classify each face.
///
/// Detection failure propagates; a face whose classification fails is
/// dropped with a warning so the rest of the frame still reports.
pub struct AnalyzeFrameUseCase {
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn GenderClassifier>,
}

impl AnalyzeFrameUseCase {
    pub fn new(detector: Box<dyn FaceDetector>, classifier: Box<dyn GenderClassifier>) -> Self {
        Self {
            detector,
            classifier,
        }
    }

    pub fn execute(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<FaceAnalysis>, Box<dyn std::error::Error>> {
        let regions = self.detector.detect(frame)?;
        let mut analyses = Vec::with_capacity(regions.len());

        for region in regions {
            match self.classifier.classify(frame, &region) {
                Ok(gender) => analyses.push(FaceAnalysis { region, gender }),
                Err(e) => log::warn!("dropping face at {region:?}: {e}"),
            }
        }

        Ok(analyses)
    }
}
