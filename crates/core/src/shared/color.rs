/// The three mask colours.
///
/// Channel values are given in RGB order; the fourth component is written
/// to the alpha channel of RGBA frames and is always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Red,
}

impl Color {
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Color::Black => [0, 0, 0, 0],
            Color::White => [255, 255, 255, 0],
            Color::Red => [255, 0, 0, 0],
        }
    }

    /// The colour laid out for a frame with `channels` channels (3 or 4).
    pub fn channels(self, channels: usize) -> Vec<u8> {
        let rgba = self.rgba();
        rgba[..channels.min(4)].to_vec()
    }
}
