use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// IoU above which a lower-scoring detection is suppressed.
const NMS_IOU_THRESH: f64 = 0.3;

/// Anchor count of the short-range BlazeFace model.
const NUM_ANCHORS: usize = 896;

/// Model-backed face detector: a BlazeFace ONNX session via `ort`.
///
/// Frames are resized to 128x128 and normalized to [0,1]; the model's
/// anchor-relative outputs are decoded back into frame coordinates and
/// cleaned up with greedy NMS.
pub struct OnnxFaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxFaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence,
            anchors: anchor_centers(),
        })
    }
}

impl FaceDetector for OnnxFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let input = ort::value::Tensor::from_array(input_blob(frame))?;
        let outputs = self.session.run(ort::inputs![input])?;

        // Two outputs: box regressors [1, 896, 16] and raw scores [1, 896, 1].
        if outputs.len() < 2 {
            return Err(format!("face model expected 2 outputs, got {}", outputs.len()).into());
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg = regressors.as_slice().ok_or("cannot view regressor output")?;
        let raw_scores = scores.as_slice().ok_or("cannot view score output")?;

        let mut detections = Vec::new();
        for (i, anchor) in self.anchors.iter().enumerate().take(raw_scores.len()) {
            let score = sigmoid(raw_scores[i]) as f64;
            if score < self.confidence {
                continue;
            }
            let offset = i * 16;
            if offset + 4 > reg.len() {
                break;
            }
            detections.push(decode_box(anchor, &reg[offset..offset + 4], score, frame));
        }

        let kept = suppress(detections, NMS_IOU_THRESH);
        log::debug!("face model: {} detections after NMS", kept.len());
        Ok(kept)
    }
}

/// Resize to `INPUT_SIZE` square and normalize to [0,1] NCHW float32.
fn input_blob(frame: &Frame) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let (src_w, src_h) = (frame.width() as usize, frame.height() as usize);
    let s = INPUT_SIZE as usize;

    let mut blob = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let sy = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let sx = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                blob[[0, c, y, x]] = src[[sy, sx, c]] as f32 / 255.0;
            }
        }
    }
    blob
}

/// Anchor centers of the short-range model: a 16x16 grid with 2 anchors per
/// cell followed by an 8x8 grid with 6, all in unit coordinates.
fn anchor_centers() -> Vec<[f32; 2]> {
    let strides = [(8u32, 2usize), (16, 6)];
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for (stride, per_cell) in strides {
        let grid = (INPUT_SIZE / stride) as usize;
        for y in 0..grid {
            for x in 0..grid {
                let cx = (x as f32 + 0.5) / grid as f32;
                let cy = (y as f32 + 0.5) / grid as f32;
                anchors.extend(std::iter::repeat([cx, cy]).take(per_cell));
            }
        }
    }
    anchors
}

/// Decode one anchor-relative box (cx, cy, w, h) into frame coordinates.
fn decode_box(anchor: &[f32; 2], reg: &[f32], score: f64, frame: &Frame) -> FaceRegion {
    let (fw, fh) = (frame.width() as f32, frame.height() as f32);
    let cx = anchor[0] + reg[0] / INPUT_SIZE as f32;
    let cy = anchor[1] + reg[1] / INPUT_SIZE as f32;
    let w = reg[2] / INPUT_SIZE as f32;
    let h = reg[3] / INPUT_SIZE as f32;

    let region = FaceRegion::new(
        ((cx - w / 2.0) * fw) as i32,
        ((cy - h / 2.0) * fh) as i32,
        (w * fw) as i32,
        (h * fh) as i32,
        Some(score),
    );
    region.clamped(frame.width(), frame.height())
}

/// Greedy NMS: keep the best-scoring box, drop everything overlapping it
/// beyond `iou_thresh`, repeat.
fn suppress(mut detections: Vec<FaceRegion>, iou_thresh: f64) -> Vec<FaceRegion> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<FaceRegion> = Vec::new();
    for det in detections {
        if kept.iter().all(|k| k.iou(&det) <= iou_thresh) {
            kept.push(det);
        }
    }
    kept
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
