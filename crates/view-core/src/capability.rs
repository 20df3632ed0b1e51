/// Somewhere an assembled [`crate::pixels::PixelBuffer`] can be composited.
/// The sink owns its target surface.
pub trait CompositingSink {
    /// Composites `buffer` with its top-left corner at `(x, y)`.
    fn blit(&mut self, buffer: &crate::pixels::PixelBuffer, x: f64, y: f64);
}

/// Something that renders into a pixel buffer.
pub trait Drawable {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    fn render(&mut self) -> &crate::pixels::PixelBuffer;

    /// Renders and hands the result to `sink`, displaced by `(x_off, y_off)`
    /// from the drawable's own position.
    fn draw_offset(&mut self, sink: &mut dyn CompositingSink, x_off: f64, y_off: f64);

    fn draw(&mut self, sink: &mut dyn CompositingSink) {
        self.draw_offset(sink, 0.0, 0.0);
    }
}

/// Something with a place on screen that pointer events can hit.
pub trait Positionable {
    fn position(&self) -> crate::geometry::Point2;

    fn set_position(&mut self, position: crate::geometry::Point2);

    fn bounds(&self) -> crate::geometry::Rect;

    fn contains(&self, point: crate::geometry::Point2) -> bool {
        self.bounds().contains(point)
    }
}
