use crate::classification::domain::gender_classifier::Gender;
use crate::pipeline::analyze_use_case::FaceAnalysis;
use crate::shared::constants::{FEMALE_BOX_COLOR, MALE_BOX_COLOR};
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws hollow, color-coded boxes into frame pixels.
///
/// Text labels are the display layer's job; pixels only carry the boxes so
/// saved snapshots stay legible at any scale.
pub struct FrameAnnotator {
    thickness: u32,
}

impl FrameAnnotator {
    pub fn new(thickness: u32) -> Self {
        Self {
            thickness: thickness.max(1),
        }
    }

    pub fn box_color(gender: Gender) -> [u8; 3] {
        match gender {
            Gender::Male => MALE_BOX_COLOR,
            Gender::Female => FEMALE_BOX_COLOR,
        }
    }

    /// Draws one box per analysis, colored by its gender label.
    pub fn annotate(&self, frame: &mut Frame, analyses: &[FaceAnalysis]) {
        for analysis in analyses {
            self.draw_box(frame, &analysis.region, Self::box_color(analysis.gender.label));
        }
    }

    /// Draws a hollow rectangle, clamped to the frame.
    pub fn draw_box(&self, frame: &mut Frame, region: &FaceRegion, color: [u8; 3]) {
        let clamped = region.clamped(frame.width(), frame.height());
        if clamped.width <= 0 || clamped.height <= 0 {
            return;
        }
        let (x1, y1) = (clamped.x as u32, clamped.y as u32);
        let (x2, y2) = (
            (clamped.x + clamped.width) as u32,
            (clamped.y + clamped.height) as u32,
        );
        let t = self.thickness;

        for y in y1..y2 {
            for x in x1..x2 {
                let on_horizontal = y < y1 + t || y >= y2.saturating_sub(t);
                let on_vertical = x < x1 + t || x >= x2.saturating_sub(t);
                if on_horizontal || on_vertical {
                    put_pixel(frame, x, y, color);
                }
            }
        }
    }
}

impl Default for FrameAnnotator {
    fn default() -> Self {
        Self::new(2)
    }
}

fn put_pixel(frame: &mut Frame, x: u32, y: u32, color: [u8; 3]) {
    let offset = ((y * frame.width() + x) * 3) as usize;
    frame.data_mut()[offset..offset + 3].copy_from_slice(&color);
}
