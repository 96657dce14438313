use std::path::Path;

use crate::classification::domain::gender_classifier::{Gender, GenderClassifier, GenderResult};
use crate::shared::constants::{GENDER_INPUT_SIZE, GENDER_MEAN_BGR};
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Model-backed gender call: a two-class Caffe-lineage network via `ort`.
///
/// The face crop is resized to 227x227 and mean-centered per channel in
/// BGR order, matching the network's training-time preprocessing. Class
/// index 0 is male, 1 is female.
pub struct OnnxGenderClassifier {
    session: ort::session::Session,
}

impl OnnxGenderClassifier {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl GenderClassifier for OnnxGenderClassifier {
    fn classify(
        &mut self,
        frame: &Frame,
        region: &FaceRegion,
    ) -> Result<GenderResult, Box<dyn std::error::Error>> {
        let crop = frame
            .crop(region)
            .ok_or_else(|| format!("face region {region:?} is outside the frame"))?;

        let input = ort::value::Tensor::from_array(gender_blob(&crop))?;
        let outputs = self.session.run(ort::inputs![input])?;
        let probs = outputs[0].try_extract_array::<f32>()?;
        let scores = probs.as_slice().ok_or("cannot view classifier output")?;
        if scores.len() < 2 {
            return Err(format!("gender model produced {} scores, need 2", scores.len()).into());
        }

        Ok(result_from_scores(scores[0], scores[1]))
    }
}

/// Arg-max over the two class scores, with the winner's share of the
/// total as confidence.
fn result_from_scores(male: f32, female: f32) -> GenderResult {
    let label = if male >= female {
        Gender::Male
    } else {
        Gender::Female
    };
    let total = male + female;
    let confidence = if total > 0.0 {
        (male.max(female) / total) as f64
    } else {
        0.5
    };
    GenderResult { label, confidence }
}

/// Resize the crop to the network input and mean-center it, NCHW float32
/// with channels in BGR order.
fn gender_blob(crop: &Frame) -> ndarray::Array4<f32> {
    let src = crop.as_ndarray();
    let (src_w, src_h) = (crop.width() as usize, crop.height() as usize);
    let s = GENDER_INPUT_SIZE as usize;

    let mut blob = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let sy = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let sx = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                // Blob channel c holds B, G, R; the frame stores R, G, B.
                let value = src[[sy, sx, 2 - c]] as f32;
                blob[[0, c, y, x]] = value - GENDER_MEAN_BGR[c];
            }
        }
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solid_frame(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for _ in 0..(w * h) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(data, w, h, 0)
    }

    #[test]
    fn test_blob_shape() {
        let crop = solid_frame(64, 48, [100, 110, 120]);
        assert_eq!(gender_blob(&crop).shape(), &[1, 3, 227, 227]);
    }

    #[test]
    fn test_blob_is_bgr_and_mean_centered() {
        let crop = solid_frame(32, 32, [200, 150, 100]);
        let blob = gender_blob(&crop);
        // Channel 0 = blue 100, channel 1 = green 150, channel 2 = red 200.
        assert_relative_eq!(blob[[0, 0, 0, 0]], 100.0 - GENDER_MEAN_BGR[0]);
        assert_relative_eq!(blob[[0, 1, 113, 113]], 150.0 - GENDER_MEAN_BGR[1]);
        assert_relative_eq!(blob[[0, 2, 226, 226]], 200.0 - GENDER_MEAN_BGR[2]);
    }

    #[test]
    fn test_result_prefers_higher_score() {
        let r = result_from_scores(0.8, 0.2);
        assert_eq!(r.label, Gender::Male);
        assert_relative_eq!(r.confidence, 0.8);

        let r = result_from_scores(0.1, 0.9);
        assert_eq!(r.label, Gender::Female);
        assert_relative_eq!(r.confidence, 0.9);
    }

    #[test]
    fn test_result_tie_goes_male_at_half_confidence() {
        let r = result_from_scores(0.5, 0.5);
        assert_eq!(r.label, Gender::Male);
        assert_relative_eq!(r.confidence, 0.5);
    }

    #[test]
    fn test_result_degenerate_scores() {
        let r = result_from_scores(0.0, 0.0);
        assert_relative_eq!(r.confidence, 0.5);
    }

    #[test]
    fn test_result_unnormalized_scores() {
        // Raw logit-ish outputs still land in [0.5, 1].
        let r = result_from_scores(3.0, 1.0);
        assert_eq!(r.label, Gender::Male);
        assert_relative_eq!(r.confidence, 0.75);
    }
}
