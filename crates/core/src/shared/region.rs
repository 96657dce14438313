/// An axis-aligned face bounding box in frame coordinates.
///
/// Coordinates are signed so detectors can report boxes that extend past
/// the frame edge; `clamped` brings them back in bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: Option<f64>,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: Option<f64>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Width over height; 0.0 when the region is degenerate.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Intersection over union with another region, in [0, 1].
    pub fn iou(&self, other: &FaceRegion) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }
        let union = self.area() as f64 + other.area() as f64 - inter;
        inter / union
    }

    /// Copy of the region intersected with a `frame_width` x `frame_height`
    /// frame. The result may be empty (zero width or height).
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> FaceRegion {
        let fw = frame_width as i32;
        let fh = frame_height as i32;
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = (self.x + self.width).clamp(0, fw);
        let y2 = (self.y + self.height).clamp(0, fh);
        FaceRegion {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            confidence: self.confidence,
        }
    }
}
