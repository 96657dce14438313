use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::config::CaptureConfig;
use crate::shared::frame::Frame;

/// Webcam frame source backed by `nokhwa`.
///
/// Opening the device is the unrecoverable part; once streaming, a failed
/// grab surfaces as a transient error and the next grab may succeed.
pub struct CameraSource {
    camera: Camera,
    resolution: (u32, u32),
    next_index: usize,
}

// Safety: CameraSource is only used from a single thread at a time; the
// capture loop owns it exclusively after construction.
unsafe impl Send for CameraSource {}

impl CameraSource {
    /// Opens the camera described by `config` and starts streaming.
    pub fn open(config: &CaptureConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(config.device_index), requested)
            .map_err(|e| format!("cannot open camera {}: {e}", config.device_index))?;

        camera
            .open_stream()
            .map_err(|e| format!("cannot start camera stream: {e}"))?;

        // Resolution and rate are requests; drivers may refuse them.
        if let Err(e) = camera.set_resolution(Resolution::new(config.width, config.height)) {
            log::warn!(
                "camera kept its own resolution ({}x{} requested): {e}",
                config.width,
                config.height
            );
        }
        if let Err(e) = camera.set_frame_rate(config.fps) {
            log::warn!("camera kept its own frame rate ({} requested): {e}", config.fps);
        }

        let actual = camera.resolution();
        log::info!(
            "camera {} streaming at {}x{} @ {} fps",
            config.device_index,
            actual.width(),
            actual.height(),
            camera.frame_rate()
        );

        Ok(Self {
            resolution: (actual.width(), actual.height()),
            camera,
            next_index: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| format!("frame grab failed: {e}"))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| format!("frame decode failed: {e}"))?;

        let (width, height) = (decoded.width(), decoded.height());
        let frame = Frame::new(decoded.into_raw(), width, height, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("failed to stop camera stream: {e}");
        }
    }
}
