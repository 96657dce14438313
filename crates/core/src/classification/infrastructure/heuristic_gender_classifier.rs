use crate::classification::domain::features;
use crate::classification::domain::gender_classifier::{Gender, GenderClassifier, GenderResult};
use crate::shared::config::ClassifierConfig;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Model-free gender call: four crop statistics blended into a score.
///
/// Scores above 0.5 label the face male; confidence is the score's
/// distance from the opposite label.
pub struct HeuristicGenderClassifier {
    config: ClassifierConfig,
}

impl HeuristicGenderClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

impl GenderClassifier for HeuristicGenderClassifier {
    fn classify(
        &mut self,
        frame: &Frame,
        region: &FaceRegion,
    ) -> Result<GenderResult, Box<dyn std::error::Error>> {
        let crop = frame
            .crop(region)
            .ok_or_else(|| format!("face region {region:?} is outside the frame"))?;

        let features = features::extract(&crop, &self.config);
        let score = features::male_score(&features, &self.config);

        let (label, confidence) = if score > 0.5 {
            (Gender::Male, score)
        } else {
            (Gender::Female, 1.0 - score)
        };
        log::debug!("heuristic gender: {label} score={score:.3} features={features:?}");

        Ok(GenderResult { label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeuristicGenderClassifier {
        HeuristicGenderClassifier::new(ClassifierConfig::default())
    }

    fn textured_frame(w: u32, h: u32, a: [u8; 3], b: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(if (x + y) % 2 == 0 { &a } else { &b });
            }
        }
        Frame::new(data, w, h, 0)
    }

    #[test]
    fn test_dark_textured_crop_reads_male() {
        // Dark, high-variance, edge-heavy, low red bias: every ramp at the
        // masculine end.
        let frame = textured_frame(64, 64, [20, 30, 20], [120, 130, 120]);
        let region = FaceRegion::new(0, 0, 64, 64, None);
        let result = classifier().classify(&frame, &region).unwrap();
        assert_eq!(result.label, Gender::Male);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_bright_flat_crop_reads_female() {
        let frame = textured_frame(64, 64, [230, 160, 140], [230, 160, 140]);
        let region = FaceRegion::new(0, 0, 64, 64, None);
        let result = classifier().classify(&frame, &region).unwrap();
        assert_eq!(result.label, Gender::Female);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_confidence_is_distance_from_other_label() {
        let frame = textured_frame(64, 64, [20, 30, 20], [120, 130, 120]);
        let region = FaceRegion::new(0, 0, 64, 64, None);
        let result = classifier().classify(&frame, &region).unwrap();
        assert!((0.5..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_region_outside_frame_errors() {
        let frame = textured_frame(32, 32, [20, 30, 20], [120, 130, 120]);
        let region = FaceRegion::new(100, 100, 20, 20, None);
        assert!(classifier().classify(&frame, &region).is_err());
    }

    #[test]
    fn test_region_overhanging_frame_is_clamped_not_error() {
        let frame = textured_frame(32, 32, [20, 30, 20], [120, 130, 120]);
        let region = FaceRegion::new(16, 16, 32, 32, None);
        assert!(classifier().classify(&frame, &region).is_ok());
    }
}
