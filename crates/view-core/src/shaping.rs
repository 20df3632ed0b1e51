/// Turns one line of text into a croppable pixel grid.
pub trait Shaper {
    /// `start_column` is the column the first character sits in, for tab
    /// alignment.
    fn shape(&mut self, text: &str, start_column: usize) -> crate::pixels::GlyphGrid;
}

impl<T: Shaper + ?Sized> Shaper for Box<T> {
    fn shape(&mut self, text: &str, start_column: usize) -> crate::pixels::GlyphGrid {
        (**self).shape(text, start_column)
    }
}

/// Replaces tabs with spaces up to the next multiple of `tab_width`, counting
/// columns from `start_column`.
#[must_use]
pub fn expand_tabs(text: &str, start_column: usize, tab_width: usize) -> String {
    if !text.contains('\t') {
        return text.to_owned();
    }

    let tab = tab_width.max(1);
    let mut column = start_column;
    let mut expanded = String::with_capacity(text.len() + tab);

    for ch in text.chars() {
        if ch == '\t' {
            let pad = tab - column % tab;
            expanded.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            expanded.push(ch);
            column += 1;
        }
    }

    expanded
}

/// A font-free shaper: every visible character becomes a solid box in its
/// fixed-width cell, whitespace stays transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellShaper {
    pub col_width: usize,
    pub line_height: usize,
    pub tab_width: usize,
    pub ink: crate::pixels::Rgba,
}

impl CellShaper {
    pub const DEFAULT_INK: crate::pixels::Rgba = [255, 255, 255, 255];

    #[must_use]
    pub fn new(col_width: usize, line_height: usize) -> Self {
        Self {
            col_width,
            line_height,
            tab_width: 4,
            ink: Self::DEFAULT_INK,
        }
    }

    #[must_use]
    pub fn from_options(options: &crate::options::ViewOptions) -> Self {
        Self::new(options.col_width as usize, options.line_height as usize)
    }
}

impl Shaper for CellShaper {
    fn shape(&mut self, text: &str, start_column: usize) -> crate::pixels::GlyphGrid {
        let text = expand_tabs(text, start_column, self.tab_width);
        let columns = text.chars().count();
        let mut grid = crate::pixels::PixelBuffer::new(columns * self.col_width, self.line_height);
        // One pixel of gutter on the right and bottom keeps cells apart.
        let glyph_w = self.col_width.saturating_sub(1).max(1);
        let glyph_h = self.line_height.saturating_sub(1).max(1);

        for (column, ch) in text.chars().enumerate() {
            if ch.is_whitespace() || ch.is_control() {
                continue;
            }
            grid.fill_rect(column * self.col_width, 0, glyph_w, glyph_h, self.ink);
        }

        grid
    }
}
