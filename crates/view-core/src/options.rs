/// Construction-time geometry of a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewOptions {
    pub width: u32,
    pub height: u32,
    /// Horizontal scroll stride in pixels.
    pub col_width: u32,
    pub line_height: u32,
    /// Vertical gap between lines in pixels.
    pub line_buffer: u32,
    /// Where the view is first drawn.
    pub position: crate::geometry::Point2,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            col_width: 8,
            line_height: 12,
            line_buffer: 1,
            position: crate::geometry::Point2::default(),
        }
    }
}

/// One override applied on top of [`ViewOptions::default`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewOption {
    /// Viewport size in pixels.
    Dimensions(u32, u32),
    Position(f64, f64),
    ColumnWidth(u32),
    LineHeight(u32),
    LineBuffer(u32),
}

impl ViewOptions {
    /// Applies `options` in order; later options win.
    #[must_use]
    pub fn with(options: &[ViewOption]) -> Self {
        let mut resolved = Self::default();

        for option in options {
            resolved.apply(*option);
        }

        resolved
    }

    pub fn apply(&mut self, option: ViewOption) {
        match option {
            ViewOption::Dimensions(w, h) => {
                self.width = w;
                self.height = h;
            }
            ViewOption::Position(x, y) => self.position = crate::geometry::Point2::new(x, y),
            ViewOption::ColumnWidth(px) => self.col_width = px,
            ViewOption::LineHeight(px) => self.line_height = px,
            ViewOption::LineBuffer(px) => self.line_buffer = px,
        }
    }

    /// Vertical distance between consecutive line origins.
    #[inline]
    #[must_use]
    pub fn line_stride(&self) -> u32 {
        self.line_height.saturating_add(self.line_buffer)
    }

    /// How many whole lines fit in the viewport.
    #[must_use]
    pub fn visible_line_count(&self) -> usize {
        match self.line_stride() {
            0 => 0,
            stride => (self.height / stride) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewOptions::default();

        assert_eq!((options.width, options.height), (240, 240));
        assert_eq!(options.col_width, 8);
        assert_eq!(options.line_stride(), 13);
        assert_eq!(options.visible_line_count(), 18);
    }

    #[test]
    fn test_options_apply_in_order() {
        let options = ViewOptions::with(&[
            ViewOption::Dimensions(100, 50),
            ViewOption::LineHeight(20),
            ViewOption::Dimensions(320, 200),
            ViewOption::Position(4.0, 5.0),
        ]);

        assert_eq!((options.width, options.height), (320, 200));
        assert_eq!(options.line_height, 20);
        assert_eq!(options.position, crate::geometry::Point2::new(4.0, 5.0));
        assert_eq!(options.visible_line_count(), 9);
    }

    #[test]
    fn test_zero_stride_shows_nothing() {
        let options = ViewOptions::with(&[ViewOption::LineHeight(0), ViewOption::LineBuffer(0)]);

        assert_eq!(options.visible_line_count(), 0);
    }
}
