use ndarray::ArrayView3;

use crate::shared::region::FaceRegion;

/// A single captured image: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion happens at capture/IO boundaries only; every
/// layer above treats the buffer as RGB8.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

/// RGB frames always carry three channels.
pub const FRAME_CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * FRAME_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sequence number assigned by the capture source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// RGB triple at `(x, y)`. Caller must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = ((y as usize) * (self.width as usize) + x as usize) * FRAME_CHANNELS;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                FRAME_CHANNELS,
            ),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// 8-bit intensity plane: per-pixel average of the three channels.
    pub fn intensity_plane(&self) -> Vec<u8> {
        self.data
            .chunks_exact(FRAME_CHANNELS)
            .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
            .collect()
    }

    /// Owned copy of the sub-frame covered by `region`, clamped to bounds.
    ///
    /// Returns `None` when the clamped region is empty.
    pub fn crop(&self, region: &FaceRegion) -> Option<Frame> {
        let clamped = region.clamped(self.width, self.height);
        if clamped.width <= 0 || clamped.height <= 0 {
            return None;
        }
        let (cx, cy) = (clamped.x as usize, clamped.y as usize);
        let (cw, ch) = (clamped.width as usize, clamped.height as usize);
        let src_w = self.width as usize;

        let mut data = Vec::with_capacity(cw * ch * FRAME_CHANNELS);
        for row in 0..ch {
            let start = ((cy + row) * src_w + cx) * FRAME_CHANNELS;
            data.extend_from_slice(&self.data[start..start + cw * FRAME_CHANNELS]);
        }
        Some(Frame::new(data, cw as u32, ch as u32, self.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(w: u32, h: u32) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                data.push((x % 256) as u8);
                data.push((y % 256) as u8);
                data.push(0);
            }
        }
        Frame::new(data, w, h, 0)
    }

    #[test]
    fn test_construction_and_accessors() {
        let frame = Frame::new(vec![7u8; 12], 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data().len(), 12);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_pixel_lookup() {
        let frame = gradient_frame(4, 3);
        assert_eq!(frame.pixel(2, 1), [2, 1, 0]);
        assert_eq!(frame.pixel(0, 2), [0, 2, 0]);
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        let frame = gradient_frame(4, 2);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]);
        assert_eq!(arr[[1, 3, 0]], 3); // R channel carries x
        assert_eq!(arr[[1, 3, 1]], 1); // G channel carries y
    }

    #[test]
    fn test_intensity_plane_averages_channels() {
        let frame = Frame::new(vec![30, 60, 90, 0, 0, 0], 2, 1, 0);
        assert_eq!(frame.intensity_plane(), vec![60, 0]);
    }

    #[test]
    fn test_crop_interior() {
        let frame = gradient_frame(10, 10);
        let crop = frame
            .crop(&FaceRegion::new(2, 3, 4, 5, None))
            .expect("non-empty crop");
        assert_eq!(crop.width(), 4);
        assert_eq!(crop.height(), 5);
        assert_eq!(crop.pixel(0, 0), [2, 3, 0]);
        assert_eq!(crop.pixel(3, 4), [5, 7, 0]);
    }

    #[test]
    fn test_crop_clamps_at_border() {
        let frame = gradient_frame(10, 10);
        let crop = frame
            .crop(&FaceRegion::new(8, 8, 5, 5, None))
            .expect("non-empty crop");
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
    }

    #[test]
    fn test_crop_outside_is_none() {
        let frame = gradient_frame(10, 10);
        assert!(frame.crop(&FaceRegion::new(20, 20, 5, 5, None)).is_none());
        assert!(frame.crop(&FaceRegion::new(3, 3, 0, 4, None)).is_none());
    }

    #[test]
    fn test_crop_preserves_index() {
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 9);
        let crop = frame.crop(&FaceRegion::new(0, 0, 2, 2, None)).unwrap();
        assert_eq!(crop.index(), 9);
    }
}
