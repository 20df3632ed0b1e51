/// Bytes per pixel (RGBA8).
pub const CHANNELS: usize = 4;

pub type Rgba = [u8; CHANNELS];

/// A row-major RGBA8 image. Used both for single shaped lines and for the
/// assembled viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// The croppable pixel grid a shaper produces for one line.
pub type GlyphGrid = PixelBuffer;

impl PixelBuffer {
    /// A fully transparent buffer.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Wraps existing RGBA8 data. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(CHANNELS)?;

        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = (y * self.width + x) * CHANNELS;
        let mut px = [0u8; CHANNELS];
        px.copy_from_slice(&self.data[i..i + CHANNELS]);

        Some(px)
    }

    /// Writes one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, px: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&px);
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, px: Rgba) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);

        for row in y.min(y_end)..y_end {
            for col in x.min(x_end)..x_end {
                self.set_pixel(col, row, px);
            }
        }
    }

    /// True if every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }

    /// Copies `src` so that source column `src_x` lands on `(dest_x, dest_y)`.
    /// Columns left of `src_x` are cropped; the copy is clipped to both
    /// buffers.
    pub fn blit_cropped(&mut self, src: &PixelBuffer, src_x: usize, dest_x: i64, dest_y: i64) {
        let mut src_x = src_x;
        let mut dest_x = dest_x;

        if dest_x < 0 {
            src_x = src_x.saturating_add(usize::try_from(dest_x.unsigned_abs()).unwrap_or(usize::MAX));
            dest_x = 0;
        }

        let Ok(dest_x) = usize::try_from(dest_x) else {
            return;
        };

        if src_x >= src.width || dest_x >= self.width {
            return;
        }

        let run = (src.width - src_x).min(self.width - dest_x) * CHANNELS;

        for src_y in 0..src.height {
            let Some(dy) = dest_y.checked_add(src_y as i64) else {
                break;
            };
            let Ok(dy) = usize::try_from(dy) else {
                continue;
            };

            if dy >= self.height {
                break;
            }

            let s = (src_y * src.width + src_x) * CHANNELS;
            let d = (dy * self.width + dest_x) * CHANNELS;

            self.data[d..d + run].copy_from_slice(&src.data[s..s + run]);
        }
    }
}

impl crate::capability::CompositingSink for PixelBuffer {
    fn blit(&mut self, buffer: &PixelBuffer, x: f64, y: f64) {
        #[allow(clippy::cast_possible_truncation)]
        self.blit_cropped(buffer, 0, x.round() as i64, y.round() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    /// 4x2 source whose pixel at column `c` has red channel `c * 10`.
    fn gradient() -> PixelBuffer {
        let mut src = PixelBuffer::new(4, 2);
        for y in 0..2 {
            for x in 0..4 {
                src.set_pixel(x, y, [x as u8 * 10, 0, 0, 255]);
            }
        }
        src
    }

    #[test]
    fn test_from_rgba_checks_len() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_set_and_get_pixel_bounds() {
        let mut buf = PixelBuffer::new(3, 3);

        buf.set_pixel(2, 2, RED);
        buf.set_pixel(3, 0, BLUE); // ignored

        assert_eq!(buf.pixel(2, 2), Some(RED));
        assert_eq!(buf.pixel(3, 0), None);
        assert!(!buf.is_blank());
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(2, 2, 10, 10, BLUE);

        assert_eq!(buf.pixel(3, 3), Some(BLUE));
        assert_eq!(buf.pixel(1, 1), Some([0; 4]));
    }

    #[test]
    fn test_blit_crops_left_columns() {
        let mut dest = PixelBuffer::new(4, 2);
        dest.blit_cropped(&gradient(), 2, 0, 0);

        assert_eq!(dest.pixel(0, 0), Some([20, 0, 0, 255]));
        assert_eq!(dest.pixel(1, 1), Some([30, 0, 0, 255]));
        // Nothing left to copy past the end of the source
        assert_eq!(dest.pixel(2, 0), Some([0; 4]));
    }

    #[test]
    fn test_blit_clips_to_destination() {
        let mut dest = PixelBuffer::new(3, 3);
        dest.blit_cropped(&gradient(), 0, 1, 2);

        assert_eq!(dest.pixel(1, 2), Some([0, 0, 0, 255]));
        assert_eq!(dest.pixel(2, 2), Some([10, 0, 0, 255]));
        assert_eq!(dest.pixel(1, 1), Some([0; 4]));
    }

    #[test]
    fn test_blit_negative_origin() {
        let mut dest = PixelBuffer::new(4, 2);
        dest.blit_cropped(&gradient(), 0, -1, -1);

        assert_eq!(dest.pixel(0, 0), Some([10, 0, 0, 255]));
        assert_eq!(dest.pixel(0, 1), Some([0; 4]));
    }

    #[test]
    fn test_blit_past_source_is_noop() {
        let mut dest = PixelBuffer::new(4, 2);
        dest.blit_cropped(&gradient(), 9, 0, 0);

        assert!(dest.is_blank());
    }
}
