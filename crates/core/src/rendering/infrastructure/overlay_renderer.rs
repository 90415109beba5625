use crate::rendering::domain::detection_renderer::DetectionRenderer;
use crate::shared::detection::Detection;
use crate::shared::frame::{ChannelOrder, Frame};
use crate::shared::region::Region;

/// Light grey box outline (RGB).
pub const DEFAULT_BOX_COLOR: [u8; 3] = [224, 224, 224];
/// Red keypoints (RGB).
pub const DEFAULT_KEYPOINT_COLOR: [u8; 3] = [255, 0, 0];
pub const DEFAULT_THICKNESS: i32 = 2;
pub const DEFAULT_KEYPOINT_RADIUS: i32 = 2;

/// CPU renderer drawing a box outline and keypoint discs straight into
/// the frame buffer.
///
/// Colours are given in RGB and written in the frame's channel order.
/// All drawing is clipped to the frame, and a box cut by a frame edge
/// gets no outline along that edge.
pub struct OverlayRenderer {
    box_color: [u8; 3],
    keypoint_color: [u8; 3],
    thickness: i32,
    keypoint_radius: i32,
}

impl OverlayRenderer {
    pub fn new(
        box_color: [u8; 3],
        keypoint_color: [u8; 3],
        thickness: i32,
        keypoint_radius: i32,
    ) -> Self {
        Self {
            box_color,
            keypoint_color,
            thickness: thickness.max(1),
            keypoint_radius: keypoint_radius.max(0),
        }
    }

    fn draw_outline(&self, frame: &mut Frame, region: &Region) {
        if region.is_empty() {
            return;
        }
        let visible = region.clamp_to(frame.width(), frame.height());
        let t = self.thickness;
        let (left, top) = (region.x, region.y);
        let (right, bottom) = (region.x + region.width, region.y + region.height);

        for y in visible.y..visible.y + visible.height {
            for x in visible.x..visible.x + visible.width {
                let on_edge =
                    x < left + t || x >= right - t || y < top + t || y >= bottom - t;
                if on_edge {
                    put_pixel(frame, x, y, self.box_color);
                }
            }
        }
    }

    fn draw_disc(&self, frame: &mut Frame, cx: i32, cy: i32) {
        let r = self.keypoint_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    put_pixel(frame, cx + dx, cy + dy, self.keypoint_color);
                }
            }
        }
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(
            DEFAULT_BOX_COLOR,
            DEFAULT_KEYPOINT_COLOR,
            DEFAULT_THICKNESS,
            DEFAULT_KEYPOINT_RADIUS,
        )
    }
}

impl DetectionRenderer for OverlayRenderer {
    fn draw(
        &self,
        frame: &mut Frame,
        detection: &Detection,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.draw_outline(frame, &detection.region);
        for &(kx, ky) in &detection.keypoints {
            self.draw_disc(frame, kx, ky);
        }
        Ok(())
    }
}

/// Writes an RGB colour at `(x, y)`; out-of-frame coordinates are ignored.
fn put_pixel(frame: &mut Frame, x: i32, y: i32, rgb: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let channels = frame.channels() as usize;
    let ordered = match frame.channel_order() {
        ChannelOrder::Rgb => rgb,
        ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
    };
    let offset = (y as usize * frame.width() as usize + x as usize) * channels;
    let pixel = &mut frame.data_mut()[offset..offset + channels];
    if channels >= 3 {
        pixel[..3].copy_from_slice(&ordered);
    } else {
        let luma = ((rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3) as u8;
        pixel.fill(luma);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32, order: ChannelOrder) -> Frame {
        Frame::new(
            vec![0; (width * height * 3) as usize],
            width,
            height,
            3,
            order,
            0,
        )
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [arr[[y, x, 0]], arr[[y, x, 1]], arr[[y, x, 2]]]
    }

    fn box_only(region: Region) -> Detection {
        Detection::new(region, 0.9)
    }

    #[test]
    fn test_outline_drawn_interior_untouched() {
        let mut frame = blank(20, 20, ChannelOrder::Rgb);
        OverlayRenderer::default()
            .draw(&mut frame, &box_only(Region::new(2, 2, 10, 10)))
            .unwrap();

        assert_eq!(pixel(&frame, 2, 2), DEFAULT_BOX_COLOR);
        assert_eq!(pixel(&frame, 3, 6), DEFAULT_BOX_COLOR); // second column of left edge
        assert_eq!(pixel(&frame, 11, 6), DEFAULT_BOX_COLOR); // right edge
        assert_eq!(pixel(&frame, 6, 6), [0, 0, 0]); // interior
        assert_eq!(pixel(&frame, 1, 1), [0, 0, 0]); // outside
        assert_eq!(pixel(&frame, 12, 12), [0, 0, 0]);
    }

    #[test]
    fn test_colour_written_in_bgr_order() {
        let mut frame = blank(10, 10, ChannelOrder::Bgr);
        let detection = Detection::new(Region::new(0, 0, 0, 0), 0.9).with_keypoints(vec![(5, 5)]);
        OverlayRenderer::default().draw(&mut frame, &detection).unwrap();
        // red in BGR
        assert_eq!(pixel(&frame, 5, 5), [0, 0, 255]);
    }

    #[test]
    fn test_keypoint_disc_radius() {
        let mut frame = blank(10, 10, ChannelOrder::Rgb);
        let detection = Detection::new(Region::new(0, 0, 0, 0), 0.9).with_keypoints(vec![(5, 5)]);
        OverlayRenderer::default().draw(&mut frame, &detection).unwrap();
        assert_eq!(pixel(&frame, 7, 5), DEFAULT_KEYPOINT_COLOR);
        assert_eq!(pixel(&frame, 5, 3), DEFAULT_KEYPOINT_COLOR);
        // corner of the bounding square lies outside the disc
        assert_eq!(pixel(&frame, 7, 7), [0, 0, 0]);
    }

    #[test]
    fn test_box_clipped_at_frame_edge_has_no_edge_line() {
        let mut frame = blank(10, 10, ChannelOrder::Rgb);
        // extends past the right border
        OverlayRenderer::default()
            .draw(&mut frame, &box_only(Region::new(4, 2, 20, 6)))
            .unwrap();
        assert_eq!(pixel(&frame, 4, 4), DEFAULT_BOX_COLOR); // left edge
        assert_eq!(pixel(&frame, 9, 4), [0, 0, 0]); // frame border, not box edge
        assert_eq!(pixel(&frame, 9, 2), DEFAULT_BOX_COLOR); // top edge
    }

    #[test]
    fn test_detection_outside_frame_draws_nothing() {
        let mut frame = blank(10, 10, ChannelOrder::Rgb);
        let detection =
            Detection::new(Region::new(50, 50, 10, 10), 0.9).with_keypoints(vec![(-20, -20)]);
        OverlayRenderer::default().draw(&mut frame, &detection).unwrap();
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_thickness_is_clamped_to_one() {
        let mut frame = blank(10, 10, ChannelOrder::Rgb);
        OverlayRenderer::new([1, 2, 3], [4, 5, 6], 0, 0)
            .draw(&mut frame, &box_only(Region::new(0, 0, 5, 5)))
            .unwrap();
        assert_eq!(pixel(&frame, 0, 2), [1, 2, 3]);
        assert_eq!(pixel(&frame, 1, 2), [0, 0, 0]);
    }
}
