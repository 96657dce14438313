use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Deterministic stand-in for a camera: a cool gradient background with a
/// textured, skin-toned patch in the middle.
///
/// The patch is larger than one detector window and keeps enough intensity
/// variation that the heuristic pipeline finds at least one candidate, so
/// the menu flow stays exercisable on machines without a camera.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    next_index: usize,
}

/// Side length of the skin-toned patch.
const PATCH_SIZE: u32 = 96;

/// Checker block size inside the patch, pixels.
const BLOCK: u32 = 4;

/// Two skin tones that both satisfy the RGB skin rule; alternating them
/// keeps window variance above the detector's floor.
const SKIN_LIGHT: [u8; 3] = [224, 172, 145];
const SKIN_DARK: [u8; 3] = [182, 130, 108];

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_index: 0,
        }
    }

    /// Top-left corner of the centered patch.
    pub fn patch_origin(&self) -> (u32, u32) {
        (
            (self.width.saturating_sub(PATCH_SIZE)) / 2,
            (self.height.saturating_sub(PATCH_SIZE)) / 2,
        )
    }

    pub fn patch_size(&self) -> u32 {
        PATCH_SIZE
    }

    fn render(&self, index: usize) -> Frame {
        let (px, py) = self.patch_origin();
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);

        for y in 0..self.height {
            for x in 0..self.width {
                let in_patch =
                    x >= px && x < px + PATCH_SIZE && y >= py && y < py + PATCH_SIZE;
                let rgb = if in_patch {
                    if ((x - px) / BLOCK + (y - py) / BLOCK) % 2 == 0 {
                        SKIN_LIGHT
                    } else {
                        SKIN_DARK
                    }
                } else {
                    // Bluish gradient; fails the skin rule everywhere.
                    let shade = (x * 64 / self.width.max(1)) as u8;
                    [56, 64, 120u8.saturating_add(shade)]
                };
                data.extend_from_slice(&rgb);
            }
        }

        Frame::new(data, self.width, self.height, index)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

impl FrameSource for SyntheticSource {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let frame = self.render(self.next_index);
        self.next_index += 1;
        Ok(frame)
    }
}
