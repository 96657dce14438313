use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Adapts a single image file to the [`FrameSource`] interface.
///
/// Yields the decoded frame once, then reports the source as exhausted.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
    resolution: (u32, u32),
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let rgb = image::open(path)
            .map_err(|e| format!("cannot open image {}: {e}", path.display()))?
            .to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());
        Ok(Self {
            path: path.to_path_buf(),
            frame: Some(Frame::new(rgb.into_raw(), width, height, 0)),
            resolution: (width, height),
        })
    }
}

impl FrameSource for ImageFileSource {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        self.frame
            .take()
            .ok_or_else(|| format!("image source exhausted: {}", self.path.display()).into())
    }
}
