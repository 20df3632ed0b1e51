#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

/// Input events a view can be bound to. How the host toolkit produces them is
/// the host's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    KeyDown(Key),
    /// Auto-repeat while a key stays pressed.
    KeyHeld(Key),
    /// Pointer pressed.
    PressOn,
    /// Pointer moved with the button held.
    Drag,
    /// Pointer released.
    Release,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EventPayload {
    #[default]
    None,
    Pointer(crate::geometry::Point2),
}

impl EventPayload {
    #[must_use]
    pub fn pointer(&self) -> Option<crate::geometry::Point2> {
        match self {
            EventPayload::Pointer(point) => Some(*point),
            EventPayload::None => None,
        }
    }
}

/// Names a method of [`crate::viewport::ViewportWindow`] together with its
/// fixed argument, so bindings can be compared and removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewHandler {
    /// Shift in lines.
    ScrollVertical(i64),
    /// Shift in column strides.
    ScrollHorizontal(i64),
    BeginDrag,
    UpdateDrag,
    EndDrag,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Following {
        /// Pointer position relative to the view origin at press time.
        offset: crate::geometry::Point2,
    },
}

impl DragState {
    #[inline]
    #[must_use]
    pub fn is_following(&self) -> bool {
        matches!(self, DragState::Following { .. })
    }
}
