/// An axis-aligned face rectangle in frame pixel coordinates.
///
/// `(x, y)` is the top-left corner. Detectors produce regions already
/// clamped to their frame; consumers still clip when drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection with `[0, frame_width) x [0, frame_height)`.
    ///
    /// Regions fully outside the frame collapse to a zero-sized region
    /// at the nearest corner.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Region {
        let fw = i32::try_from(frame_width).unwrap_or(i32::MAX);
        let fh = i32::try_from(frame_height).unwrap_or(i32::MAX);

        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = self.x.saturating_add(self.width.max(0)).clamp(0, fw);
        let y2 = self.y.saturating_add(self.height.max(0)).clamp(0, fh);

        Region {
            x: x1,
            y: y1,
            width: (x2 - x1).max(0),
            height: (y2 - y1).max(0),
        }
    }
}
