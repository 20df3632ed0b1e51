use fltk::prelude::ImageExt;

/// Composites frames onto whatever fltk surface is currently being drawn,
/// typically from inside a widget's draw callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct FltkSink;

impl view_core::capability::CompositingSink for FltkSink {
    fn blit(&mut self, buffer: &view_core::pixels::PixelBuffer, x: f64, y: f64) {
        let (Ok(w), Ok(h)) = (i32::try_from(buffer.width()), i32::try_from(buffer.height())) else {
            return;
        };

        if w == 0 || h == 0 {
            return;
        }

        match fltk::image::RgbImage::new(buffer.as_bytes(), w, h, fltk::enums::ColorDepth::Rgba8) {
            #[allow(clippy::cast_possible_truncation)]
            Ok(mut image) => image.draw(x.round() as i32, y.round() as i32, w, h),
            Err(e) => tracing::warn!(target: "render", error = ?e, w, h, "frame_image_failed"),
        }
    }
}
