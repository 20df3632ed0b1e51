/// A fixed-size window onto a seekable byte stream, one line per row.
///
/// The stream is indexed once at construction. Input only changes
/// [`crate::viewport::state::ViewportState`] and marks it dirty; [`Self::render`]
/// reads just the bytes of the visible lines, and only when dirty.
///
/// `S` may be an owned stream or `&mut` to one the caller keeps.
pub struct ViewportWindow<S> {
    id: Option<crate::events::ViewId>,
    stream: S,
    index: crate::line_index::LineIndex,
    shaper: Box<dyn crate::shaping::Shaper>,
    options: crate::options::ViewOptions,
    state: crate::viewport::state::ViewportState,
    /// Text of the lines shaped by the last render.
    visible_text: Vec<String>,
}

impl<S> std::fmt::Debug for ViewportWindow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportWindow")
            .field("id", &self.id)
            .field("line_count", &self.index.line_count())
            .field("options", &self.options)
            .field("top_line", &self.state.top_line)
            .field("column_offset", &self.state.column_offset)
            .field("screen_position", &self.state.screen_position)
            .field("drag", &self.state.drag)
            .field("dirty", &self.state.dirty)
            .finish_non_exhaustive()
    }
}

/*

====================
===== CREATION =====
====================

*/

impl<S> ViewportWindow<S>
where
    S: std::io::Read + std::io::Seek,
{
    /// Indexes `stream` and creates a dirty view at line 0.
    ///
    /// # Errors
    ///
    /// - [`crate::errors::ViewError::Io`] if the stream cannot be scanned or
    ///   rewound.
    pub fn new(
        mut stream: S,
        shaper: Box<dyn crate::shaping::Shaper>,
        options: &[crate::options::ViewOption],
    ) -> crate::errors::ViewResult<Self> {
        let options = crate::options::ViewOptions::with(options);
        let index = crate::line_index::LineIndex::build(&mut stream)?;

        Ok(Self {
            id: None,
            stream,
            index,
            shaper,
            state: crate::viewport::state::ViewportState::new(&options),
            options,
            visible_text: Vec::new(),
        })
    }
}

impl ViewportWindow<io::mmap::MmapFile> {
    /// Memory-maps the file at `path` and views it.
    ///
    /// # Errors
    ///
    /// - [`crate::errors::ViewError::Open`] if the file cannot be opened or mapped.
    /// - [`crate::errors::ViewError::Io`] if indexing fails.
    pub fn open(
        path: impl AsRef<std::path::Path>,
        shaper: Box<dyn crate::shaping::Shaper>,
        options: &[crate::options::ViewOption],
    ) -> crate::errors::ViewResult<Self> {
        let path = path.as_ref();
        let file = io::mmap::MmapFile::open(path).map_err(|source| crate::errors::ViewError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(file, shaper, options)
    }
}

/*

======================
======= GETTER =======
======================

*/

impl<S> ViewportWindow<S> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<crate::events::ViewId> {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &crate::line_index::LineIndex {
        &self.index
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &crate::viewport::state::ViewportState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &crate::options::ViewOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn top_line(&self) -> usize {
        self.state.top_line
    }

    /// Horizontal scroll in pixels.
    #[inline]
    #[must_use]
    pub fn column_offset(&self) -> u64 {
        self.state.column_offset
    }

    /// Horizontal scroll in whole columns.
    #[must_use]
    pub fn column(&self) -> u64 {
        match self.options.col_width {
            0 => 0,
            w => self.state.column_offset / u64::from(w),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    #[inline]
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.state.drag.is_following()
    }

    /// Byte range read by the last render.
    #[must_use]
    pub fn last_range(&self) -> Option<std::ops::Range<u64>> {
        self.state.last_range.clone()
    }

    /// Text of the lines drawn by the last render, without line terminators.
    #[must_use]
    pub fn visible_lines(&self) -> &[String] {
        &self.visible_text
    }

    #[inline]
    #[must_use]
    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn into_stream(self) -> S {
        self.stream
    }
}

/*

======================
======= INPUT ========
======================

*/

impl<S> ViewportWindow<S> {
    /// Moves the top line by `delta` lines, clamped to the indexed lines.
    pub fn scroll_vertical(&mut self, delta: i64) {
        let top_line = crate::viewport::state::clamp_top_line(
            self.state.top_line,
            delta,
            self.index.line_count(),
        );

        if top_line != self.state.top_line {
            tracing::trace!(target: "input", from = self.state.top_line, to = top_line, "scroll_vertical");
            self.state.top_line = top_line;
            self.state.dirty = true;
        }
    }

    /// Moves the horizontal scroll by `delta` column strides, never left of 0.
    pub fn scroll_horizontal(&mut self, delta: i64) {
        let column_offset = crate::viewport::state::clamp_column_offset(
            self.state.column_offset,
            delta,
            self.options.col_width,
        );

        if column_offset != self.state.column_offset {
            tracing::trace!(target: "input", from = self.state.column_offset, to = column_offset, "scroll_horizontal");
            self.state.column_offset = column_offset;
            self.state.dirty = true;
        }
    }

    /// Starts following the pointer, remembering where on the view it grabbed.
    pub fn begin_drag(&mut self, pointer: crate::geometry::Point2) {
        self.state.drag = crate::enums::DragState::Following {
            offset: pointer - self.state.screen_position,
        };
        tracing::trace!(target: "input", x = pointer.x, y = pointer.y, "drag_begin");
    }

    /// Keeps the grab point under the pointer. Ignored unless following.
    pub fn update_drag(&mut self, pointer: crate::geometry::Point2) {
        let crate::enums::DragState::Following { offset } = self.state.drag else {
            return;
        };

        self.move_to(pointer - offset);
    }

    pub fn end_drag(&mut self) {
        if self.state.drag.is_following() {
            tracing::trace!(target: "input", "drag_end");
        }
        self.state.drag = crate::enums::DragState::Idle;
    }

    fn move_to(&mut self, position: crate::geometry::Point2) {
        if position != self.state.screen_position {
            self.state.screen_position = position;
            self.state.dirty = true;
        }
    }

    /// Runs the method `handler` names. A press only starts a drag when it
    /// lands on the view.
    pub fn handle(
        &mut self,
        handler: crate::enums::ViewHandler,
        payload: crate::enums::EventPayload,
    ) {
        match handler {
            crate::enums::ViewHandler::ScrollVertical(shift) => self.scroll_vertical(shift),
            crate::enums::ViewHandler::ScrollHorizontal(shift) => self.scroll_horizontal(shift),
            crate::enums::ViewHandler::BeginDrag => {
                if let Some(pointer) = payload.pointer()
                    && crate::capability::Positionable::contains(self, pointer)
                {
                    self.begin_drag(pointer);
                }
            }
            crate::enums::ViewHandler::UpdateDrag => {
                if let Some(pointer) = payload.pointer() {
                    self.update_drag(pointer);
                }
            }
            crate::enums::ViewHandler::EndDrag => self.end_drag(),
        }
    }
}

/*

======================
====== BINDINGS ======
======================

*/

impl<S> ViewportWindow<S> {
    /// Registers this view's handlers on `subscriber`, allocating its id on
    /// first attach.
    pub fn attach(
        &mut self,
        subscriber: &mut dyn crate::events::EventSubscriber,
    ) -> crate::events::ViewId {
        let id = *self.id.get_or_insert_with(|| subscriber.allocate_id());

        for binding in crate::events::default_bindings(id) {
            subscriber.bind(binding);
        }

        id
    }

    /// Removes the handlers registered by [`Self::attach`]. Returns how many
    /// were bound.
    pub fn detach(&mut self, subscriber: &mut dyn crate::events::EventSubscriber) -> usize {
        let Some(id) = self.id else {
            return 0;
        };

        self.end_drag();

        crate::events::default_bindings(id)
            .iter()
            .filter(|binding| subscriber.unbind(binding))
            .count()
    }
}

/*

======================
======= RENDER =======
======================

*/

impl<S> ViewportWindow<S>
where
    S: std::io::Read + std::io::Seek,
{
    /// The current frame. Only reads the stream when something changed since
    /// the last call; the stream is left at offset 0 either way.
    pub fn render(&mut self) -> &crate::pixels::PixelBuffer {
        if !self.state.dirty {
            return &self.state.rendered;
        }

        let _span = tracing::trace_span!(
            target: "render",
            "render_cycle",
            top_line = self.state.top_line,
            column_offset = self.state.column_offset
        )
        .entered();

        let line_count = self.index.line_count();
        let top_line = self.state.top_line.min(line_count);
        let end_line = top_line
            .saturating_add(self.options.visible_line_count())
            .min(line_count);
        let start_byte = self.index.line_start(top_line);
        let end_byte = self.index.line_start(end_line);

        let content = read_window(&mut self.stream, start_byte..end_byte);

        let mut frame =
            crate::pixels::PixelBuffer::new(self.state.width as usize, self.state.height as usize);
        let stride = i64::from(self.options.line_stride());
        let crop = usize::try_from(self.state.column_offset).unwrap_or(usize::MAX);

        self.visible_text.clear();

        for (row, (_, range)) in self.index.lines(top_line..end_line).enumerate() {
            let b1 = window_offset(range.start - start_byte, content.len());
            let b2 = window_offset(range.end - start_byte, content.len());
            let text = decode_line(&content[b1..b2]);
            let glyphs = self.shaper.shape(&text, 0);

            frame.blit_cropped(&glyphs, crop, 0, row as i64 * stride);
            self.visible_text.push(text);
        }

        self.state.rendered = frame;
        self.state.last_range = Some(start_byte..end_byte);
        self.state.dirty = false;

        if let Err(e) = self.stream.seek(std::io::SeekFrom::Start(0)) {
            tracing::warn!(target: "render", error = %e, "stream_rewind_failed");
        }

        &self.state.rendered
    }
}

/// Reads `range` from `stream`. Anything short of the full range is logged
/// and whatever was read is returned.
fn read_window<S>(stream: &mut S, range: std::ops::Range<u64>) -> Vec<u8>
where
    S: std::io::Read + std::io::Seek + ?Sized,
{
    let expected = usize::try_from(range.end - range.start).unwrap_or(usize::MAX);

    if let Err(e) = stream.seek(std::io::SeekFrom::Start(range.start)) {
        tracing::warn!(target: "render", start = range.start, error = %e, "stream_seek_failed");
        return Vec::new();
    }

    let mut content = vec![0u8; expected];
    let mut filled = 0;

    while filled < expected {
        match stream.read(&mut content[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::warn!(target: "render", error = %e, "stream_read_failed");
                break;
            }
        }
    }

    if filled != expected {
        tracing::warn!(
            target: "render",
            expected,
            read = filled,
            start = range.start,
            "unexpected_content_length"
        );
        content.truncate(filled);
    }

    content
}

#[inline]
fn window_offset(relative: u64, len: usize) -> usize {
    usize::try_from(relative).map_or(len, |offset| offset.min(len))
}

/// One line's bytes as text, without its terminator.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

    String::from_utf8_lossy(bytes).into_owned()
}

/*

========================
===== CAPABILITIES =====
========================

*/

impl<S> crate::capability::Drawable for ViewportWindow<S>
where
    S: std::io::Read + std::io::Seek,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }

    fn render(&mut self) -> &crate::pixels::PixelBuffer {
        ViewportWindow::render(self)
    }

    fn draw_offset(
        &mut self,
        sink: &mut dyn crate::capability::CompositingSink,
        x_off: f64,
        y_off: f64,
    ) {
        let position = self.state.screen_position;
        let frame = ViewportWindow::render(self);

        sink.blit(frame, position.x + x_off, position.y + y_off);
    }
}

impl<S> crate::capability::Positionable for ViewportWindow<S> {
    fn position(&self) -> crate::geometry::Point2 {
        self.state.screen_position
    }

    fn set_position(&mut self, position: crate::geometry::Point2) {
        self.move_to(position);
    }

    fn bounds(&self) -> crate::geometry::Rect {
        crate::geometry::Rect::new(
            self.state.screen_position,
            f64::from(self.state.width),
            f64::from(self.state.height),
        )
    }
}
