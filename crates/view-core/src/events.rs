/// Identity of a view on an event subscriber. Allocated by the subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// One registration: when `event` fires, run `handler` on the view `owner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub event: crate::enums::EventName,
    pub owner: ViewId,
    pub handler: crate::enums::ViewHandler,
}

/// The event-subscription interface a view registers its handlers through.
///
/// Implementations own the registrations; views never touch global state.
pub trait EventSubscriber {
    fn allocate_id(&mut self) -> ViewId;

    fn bind(&mut self, binding: Binding);

    /// Removes a previously registered binding. Returns `false` if it was not
    /// bound.
    fn unbind(&mut self, binding: &Binding) -> bool;
}

/// The bindings a view registers: arrow keys on press and auto-repeat, plus
/// the pointer drag gesture.
#[must_use]
pub fn default_bindings(owner: ViewId) -> Vec<Binding> {
    let keys = [
        (crate::enums::Key::Up, crate::enums::ViewHandler::ScrollVertical(-1)),
        (crate::enums::Key::Down, crate::enums::ViewHandler::ScrollVertical(1)),
        (crate::enums::Key::Left, crate::enums::ViewHandler::ScrollHorizontal(-1)),
        (crate::enums::Key::Right, crate::enums::ViewHandler::ScrollHorizontal(1)),
    ];
    let mut bindings = Vec::with_capacity(keys.len() * 2 + 3);

    for (key, handler) in keys {
        for event in [
            crate::enums::EventName::KeyDown(key),
            crate::enums::EventName::KeyHeld(key),
        ] {
            bindings.push(Binding {
                event,
                owner,
                handler,
            });
        }
    }

    for (event, handler) in [
        (crate::enums::EventName::PressOn, crate::enums::ViewHandler::BeginDrag),
        (crate::enums::EventName::Drag, crate::enums::ViewHandler::UpdateDrag),
        (crate::enums::EventName::Release, crate::enums::ViewHandler::EndDrag),
    ] {
        bindings.push(Binding {
            event,
            owner,
            handler,
        });
    }

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{EventName, Key, ViewHandler};

    #[test]
    fn test_default_bindings_cover_keys_and_drag() {
        let bindings = default_bindings(ViewId(7));

        assert_eq!(bindings.len(), 11);
        assert!(bindings.iter().all(|b| b.owner == ViewId(7)));

        let handler_for = |event| {
            bindings
                .iter()
                .find(|b| b.event == event)
                .map(|b| b.handler)
        };

        assert_eq!(
            handler_for(EventName::KeyDown(Key::Up)),
            Some(ViewHandler::ScrollVertical(-1))
        );
        assert_eq!(
            handler_for(EventName::KeyHeld(Key::Down)),
            Some(ViewHandler::ScrollVertical(1))
        );
        assert_eq!(
            handler_for(EventName::KeyDown(Key::Left)),
            Some(ViewHandler::ScrollHorizontal(-1))
        );
        assert_eq!(
            handler_for(EventName::KeyHeld(Key::Right)),
            Some(ViewHandler::ScrollHorizontal(1))
        );
        assert_eq!(handler_for(EventName::PressOn), Some(ViewHandler::BeginDrag));
        assert_eq!(handler_for(EventName::Drag), Some(ViewHandler::UpdateDrag));
        assert_eq!(handler_for(EventName::Release), Some(ViewHandler::EndDrag));
    }
}
