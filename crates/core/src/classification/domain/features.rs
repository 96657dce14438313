use crate::shared::config::ClassifierConfig;
use crate::shared::frame::Frame;

/// The four scalars the hand-rulebook classifier works from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceFeatures {
    /// Mean intensity over the crop.
    pub brightness: f64,
    /// Intensity variance over the crop.
    pub variance: f64,
    /// Fraction of pixels whose right or down neighbor differs by more
    /// than the configured gradient.
    pub edge_density: f64,
    /// Mean red over mean green; 1.0 when green is absent.
    pub skin_ratio: f64,
}

/// Extracts all four features from a face crop.
pub fn extract(crop: &Frame, config: &ClassifierConfig) -> FaceFeatures {
    let plane = crop.intensity_plane();
    let (brightness, variance) = intensity_stats(&plane);
    FaceFeatures {
        brightness,
        variance,
        edge_density: edge_density(
            &plane,
            crop.width() as usize,
            crop.height() as usize,
            config.edge_gradient,
        ),
        skin_ratio: red_green_ratio(crop),
    }
}

/// `(mean, variance)` of an intensity plane; `(0, 0)` for an empty plane.
pub fn intensity_stats(plane: &[u8]) -> (f64, f64) {
    if plane.is_empty() {
        return (0.0, 0.0);
    }
    let n = plane.len() as f64;
    let mut sum = 0u64;
    let mut sum_sq = 0u64;
    for &p in plane {
        sum += p as u64;
        sum_sq += (p as u64) * (p as u64);
    }
    let mean = sum as f64 / n;
    (mean, sum_sq as f64 / n - mean * mean)
}

/// Fraction of pixels that sit on an edge: the right or down neighbor
/// differs by more than `gradient`.
pub fn edge_density(plane: &[u8], width: usize, height: usize, gradient: f64) -> f64 {
    if width == 0 || height == 0 {
        return 0.0;
    }
    let mut edges = 0usize;
    for y in 0..height {
        for x in 0..width {
            let here = plane[y * width + x] as f64;
            let right = x + 1 < width && (plane[y * width + x + 1] as f64 - here).abs() > gradient;
            let down =
                y + 1 < height && (plane[(y + 1) * width + x] as f64 - here).abs() > gradient;
            if right || down {
                edges += 1;
            }
        }
    }
    edges as f64 / (width * height) as f64
}

/// Mean red divided by mean green over the crop.
pub fn red_green_ratio(crop: &Frame) -> f64 {
    let mut red = 0u64;
    let mut green = 0u64;
    for px in crop.data().chunks_exact(3) {
        red += px[0] as u64;
        green += px[1] as u64;
    }
    if green == 0 {
        return 1.0;
    }
    red as f64 / green as f64
}

/// Blends the four features into a masculinity score in [0, 1].
///
/// Each feature passes through a saturating ramp between its configured
/// band edges, so the score is monotonic in every feature with the others
/// held fixed: it rises with edge density and variance, falls with
/// brightness and with the red/green ratio. Scores above 0.5 read as male.
pub fn male_score(features: &FaceFeatures, config: &ClassifierConfig) -> f64 {
    let darkness = 1.0 - ramp(features.brightness, config.brightness_lo, config.brightness_hi);
    let texture = ramp(features.variance, config.variance_lo, config.variance_hi);
    let edges = ramp(features.edge_density, config.edge_lo, config.edge_hi);
    let pallor = 1.0 - ramp(features.skin_ratio, config.ratio_lo, config.ratio_hi);

    (0.25 * (darkness + texture + edges + pallor)).clamp(0.0, 1.0)
}

/// 0 below `lo`, 1 above `hi`, linear in between.
fn ramp(value: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return if value >= hi { 1.0 } else { 0.0 };
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}
