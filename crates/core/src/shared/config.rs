use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Runtime configuration for capture and the two analysis engines.
///
/// Every tunable threshold lives here so binaries pass one value down
/// instead of reaching for module-level constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub detector: DetectorConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index (0 = default camera).
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Confidence threshold for the model-backed detector (0.0-1.0).
    pub confidence: f64,
    /// Side length of the sliding window, pixels.
    pub window_size: u32,
    /// Sliding-window step, pixels.
    pub stride: u32,
    /// Minimum fraction of skin-colored pixels for a window candidate.
    pub skin_fraction: f64,
    /// Minimum intensity variance for a window candidate.
    pub min_variance: f64,
    /// Accepted candidate aspect-ratio band.
    pub aspect_min: f64,
    pub aspect_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Neighbor intensity difference that counts as an edge pixel.
    pub edge_gradient: f64,
    /// Mean-intensity band: below `lo` reads fully masculine, above `hi`
    /// fully feminine.
    pub brightness_lo: f64,
    pub brightness_hi: f64,
    /// Intensity-variance band, rising toward masculine.
    pub variance_lo: f64,
    pub variance_hi: f64,
    /// Edge-density band, rising toward masculine.
    pub edge_lo: f64,
    pub edge_hi: f64,
    /// Red/green ratio band: below `lo` reads masculine, above `hi` feminine.
    pub ratio_lo: f64,
    pub ratio_hi: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            detector: DetectorConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence: 0.5,
            window_size: 60,
            stride: 10,
            skin_fraction: 0.3,
            min_variance: 100.0,
            aspect_min: 0.7,
            aspect_max: 1.3,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            edge_gradient: 30.0,
            brightness_lo: 90.0,
            brightness_hi: 170.0,
            variance_lo: 400.0,
            variance_hi: 2500.0,
            edge_lo: 0.05,
            edge_hi: 0.25,
            ratio_lo: 1.05,
            ratio_hi: 1.35,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| format!("cannot parse config {}: {e}", path.display()))?;
        Ok(config)
    }
}
