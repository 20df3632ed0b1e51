/// Everything about a view that input can change, plus the cached frame.
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// First visible line.
    pub top_line: usize,
    /// Horizontal scroll in pixels, a multiple of the column width.
    pub column_offset: u64,
    pub width: u32,
    pub height: u32,
    pub screen_position: crate::geometry::Point2,
    pub drag: crate::enums::DragState,
    /// The cached frame is stale.
    pub dirty: bool,
    /// Valid only while `dirty` is false.
    pub rendered: crate::pixels::PixelBuffer,
    /// Byte range read by the last render.
    pub last_range: Option<std::ops::Range<u64>>,
}

impl ViewportState {
    #[must_use]
    pub fn new(options: &crate::options::ViewOptions) -> Self {
        Self {
            top_line: 0,
            column_offset: 0,
            width: options.width,
            height: options.height,
            screen_position: options.position,
            drag: crate::enums::DragState::Idle,
            dirty: true,
            rendered: crate::pixels::PixelBuffer::default(),
            last_range: None,
        }
    }
}

/// `top_line + delta`, kept within `[0, line_count - 1]` (0 when empty).
#[must_use]
pub fn clamp_top_line(top_line: usize, delta: i64, line_count: usize) -> usize {
    let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
    let moved = if delta < 0 {
        top_line.saturating_sub(magnitude)
    } else {
        top_line.saturating_add(magnitude)
    };

    moved.min(line_count.saturating_sub(1))
}

/// `column_offset + delta * col_width`, never below 0. There is no right
/// bound: scrolling past the longest line shows blank space.
#[must_use]
pub fn clamp_column_offset(column_offset: u64, delta: i64, col_width: u32) -> u64 {
    column_offset.saturating_add_signed(delta.saturating_mul(i64::from(col_width)))
}
