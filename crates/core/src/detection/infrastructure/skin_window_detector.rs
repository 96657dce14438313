use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::skin::is_skin_pixel;
use crate::shared::config::DetectorConfig;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Hand-rolled face finder: a fixed-size window slid over the frame at a
/// fixed stride.
///
/// A window becomes a candidate when its skin-pixel fraction clears the
/// configured floor, its aspect ratio sits in the accepted band, and its
/// intensity variance shows actual structure. No multi-scale search and no
/// suppression: candidates may overlap, and the caller sees all of them.
/// Candidate confidence is the skin fraction.
pub struct SkinWindowDetector {
    config: DetectorConfig,
}

impl SkinWindowDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn evaluate_window(&self, frame: &Frame, plane: &[u8], x: u32, y: u32) -> Option<FaceRegion> {
        let win = self.config.window_size as usize;
        let frame_w = frame.width() as usize;
        let data = frame.data();

        let mut skin = 0usize;
        let mut sum = 0u64;
        let mut sum_sq = 0u64;

        for row in 0..win {
            let base = (y as usize + row) * frame_w + x as usize;
            for col in 0..win {
                let rgb_off = (base + col) * 3;
                if is_skin_pixel(data[rgb_off], data[rgb_off + 1], data[rgb_off + 2]) {
                    skin += 1;
                }
                let i = plane[base + col] as u64;
                sum += i;
                sum_sq += i * i;
            }
        }

        let n = (win * win) as f64;
        let skin_fraction = skin as f64 / n;
        if skin_fraction <= self.config.skin_fraction {
            return None;
        }

        let region = FaceRegion::new(
            x as i32,
            y as i32,
            self.config.window_size as i32,
            self.config.window_size as i32,
            Some(skin_fraction),
        );
        let aspect = region.aspect_ratio();
        if aspect < self.config.aspect_min || aspect > self.config.aspect_max {
            return None;
        }

        let mean = sum as f64 / n;
        let variance = sum_sq as f64 / n - mean * mean;
        if variance < self.config.min_variance {
            return None;
        }

        Some(region)
    }
}

impl FaceDetector for SkinWindowDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let win = self.config.window_size;
        if win == 0 || frame.width() < win || frame.height() < win {
            return Ok(Vec::new());
        }

        let plane = frame.intensity_plane();
        let stride = self.config.stride.max(1);
        let mut candidates = Vec::new();

        let mut y = 0;
        while y + win <= frame.height() {
            let mut x = 0;
            while x + win <= frame.width() {
                if let Some(region) = self.evaluate_window(frame, &plane, x, y) {
                    candidates.push(region);
                }
                x += stride;
            }
            y += stride;
        }

        log::debug!(
            "skin window scan: {} candidates in {}x{} frame",
            candidates.len(),
            frame.width(),
            frame.height()
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::frame_source::FrameSource;
    use crate::capture::infrastructure::synthetic_source::SyntheticSource;

    fn detector() -> SkinWindowDetector {
        SkinWindowDetector::new(DetectorConfig::default())
    }

    fn solid_frame(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for _ in 0..(w * h) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(data, w, h, 0)
    }

    #[test]
    fn test_uniform_skin_block_rejected_by_variance() {
        // All skin, but perfectly flat: variance 0 is below the floor of 100.
        let frame = solid_frame(120, 120, [224, 172, 145]);
        let found = detector().detect(&frame).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_non_skin_frame_yields_nothing() {
        let frame = solid_frame(120, 120, [60, 80, 200]);
        assert!(detector().detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_frame_smaller_than_window_yields_nothing() {
        let frame = solid_frame(40, 40, [224, 172, 145]);
        assert!(detector().detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_synthetic_patch_produces_overlapping_candidate() {
        let mut source = SyntheticSource::new(320, 240);
        let frame = source.next_frame().unwrap();
        let (px, py) = source.patch_origin();
        let patch = FaceRegion::new(
            px as i32,
            py as i32,
            source.patch_size() as i32,
            source.patch_size() as i32,
            None,
        );

        let found = detector().detect(&frame).unwrap();
        assert!(
            found.iter().any(|r| r.iou(&patch) > 0.0),
            "no candidate overlaps the skin patch; got {found:?}"
        );
    }

    #[test]
    fn test_candidates_align_to_stride_and_window() {
        let mut source = SyntheticSource::new(320, 240);
        let frame = source.next_frame().unwrap();
        for r in detector().detect(&frame).unwrap() {
            assert_eq!(r.x % 10, 0);
            assert_eq!(r.y % 10, 0);
            assert_eq!(r.width, 60);
            assert_eq!(r.height, 60);
        }
    }

    #[test]
    fn test_confidence_is_skin_fraction() {
        let mut source = SyntheticSource::new(320, 240);
        let frame = source.next_frame().unwrap();
        for r in detector().detect(&frame).unwrap() {
            let c = r.confidence.expect("candidate carries skin fraction");
            assert!(c > 0.3 && c <= 1.0);
        }
    }

    #[test]
    fn test_overlapping_candidates_are_not_suppressed() {
        // A patch much larger than the window produces several accepted
        // windows at 10 px offsets; none are merged away.
        let mut source = SyntheticSource::new(320, 240);
        let frame = source.next_frame().unwrap();
        let found = detector().detect(&frame).unwrap();
        assert!(found.len() > 1, "expected overlapping windows, got {found:?}");
    }
}
