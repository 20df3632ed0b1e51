use fltk::prelude::ImageExt;

/// Rasterizes a line with fltk's font machinery on an offscreen surface.
///
/// Needs a running fltk display; headless callers use
/// [`view_core::shaping::CellShaper`] instead.
#[derive(Debug, Clone, Copy)]
pub struct FontShaper {
    pub font: fltk::enums::Font,
    pub font_size: i32,
    pub line_height: i32,
    pub tab_width: usize,
    pub foreground: fltk::enums::Color,
    pub background: fltk::enums::Color,
}

impl FontShaper {
    pub const FONT_SIZE: i32 = 12;

    #[must_use]
    pub fn new(line_height: u32) -> Self {
        Self {
            font: fltk::enums::Font::Courier,
            font_size: Self::FONT_SIZE,
            line_height: i32::try_from(line_height).unwrap_or(i32::MAX),
            tab_width: 4,
            foreground: fltk::enums::Color::White,
            background: fltk::enums::Color::from_rgb(40, 44, 52),
        }
    }

    #[must_use]
    pub fn from_options(options: &view_core::options::ViewOptions) -> Self {
        Self::new(options.line_height)
    }

    fn empty(&self) -> view_core::pixels::GlyphGrid {
        view_core::pixels::PixelBuffer::new(0, usize::try_from(self.line_height).unwrap_or(0))
    }
}

impl view_core::shaping::Shaper for FontShaper {
    fn shape(&mut self, text: &str, start_column: usize) -> view_core::pixels::GlyphGrid {
        let text = view_core::shaping::expand_tabs(text, start_column, self.tab_width);

        if text.is_empty() || self.line_height <= 0 {
            return self.empty();
        }

        fltk::draw::set_font(self.font, self.font_size);
        #[allow(clippy::cast_possible_truncation)]
        let w = (fltk::draw::width(&text).ceil() as i32).max(1);
        let h = self.line_height;

        let Some(mut offs) = fltk::draw::Offscreen::new(w, h) else {
            tracing::warn!(target: "render", w, h, "offscreen_unavailable");
            return self.empty();
        };

        offs.begin();
        fltk::draw::draw_rect_fill(0, 0, w, h, self.background);
        fltk::draw::set_font(self.font, self.font_size);
        fltk::draw::set_draw_color(self.foreground);
        fltk::draw::draw_text2(&text, 0, 0, w, h, fltk::enums::Align::Left);
        offs.end();

        match fltk::draw::capture_offscreen(&mut offs, w, h) {
            Ok(image) => to_pixel_buffer(&image).unwrap_or_else(|| {
                tracing::warn!(target: "render", depth = ?image.depth(), "unsupported_capture_depth");
                self.empty()
            }),
            Err(e) => {
                tracing::warn!(target: "render", error = ?e, "offscreen_capture_failed");
                self.empty()
            }
        }
    }
}

/// Converts a captured image of any colour depth to RGBA8.
fn to_pixel_buffer(image: &fltk::image::RgbImage) -> Option<view_core::pixels::PixelBuffer> {
    let width = usize::try_from(image.data_w()).ok()?;
    let height = usize::try_from(image.data_h()).ok()?;
    let data = image.to_rgb_data();

    let channels = match image.depth() {
        fltk::enums::ColorDepth::L8 => 1,
        fltk::enums::ColorDepth::La8 => 2,
        fltk::enums::ColorDepth::Rgb8 => 3,
        fltk::enums::ColorDepth::Rgba8 => 4,
    };

    if data.len() < width * height * channels {
        return None;
    }

    let mut rgba = Vec::with_capacity(width * height * view_core::pixels::CHANNELS);

    for px in data.chunks_exact(channels).take(width * height) {
        let pixel = match *px {
            [l] => [l, l, l, 255],
            [l, a] => [l, l, l, a],
            [r, g, b] => [r, g, b, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => return None,
        };
        rgba.extend_from_slice(&pixel);
    }

    view_core::pixels::PixelBuffer::from_rgba(width, height, rgba)
}
