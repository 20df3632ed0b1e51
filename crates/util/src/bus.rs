/// An event waiting for dispatch.
pub type Queued = (view_core::enums::EventName, view_core::enums::EventPayload);

/// An event bus the embedder owns and hands to views.
///
/// Producers (toolkit callbacks) push events through a [`Sender`] from
/// [`EventBus::sender`]; the owning thread calls [`EventBus::dispatch`] to
/// deliver them to every matching binding.
///
/// [`Sender`]: crossbeam_channel::Sender
#[derive(Debug)]
pub struct EventBus {
    bindings: Vec<view_core::events::Binding>,
    next_id: u64,
    sender: crossbeam_channel::Sender<Queued>,
    receiver: crossbeam_channel::Receiver<Queued>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();

        Self {
            bindings: Vec::new(),
            next_id: 0,
            sender,
            receiver,
        }
    }

    /// A handle producers can clone into callbacks.
    #[must_use]
    pub fn sender(&self) -> crossbeam_channel::Sender<Queued> {
        self.sender.clone()
    }

    /// Queues one event for the next [`Self::dispatch`].
    pub fn trigger(
        &self,
        event: view_core::enums::EventName,
        payload: view_core::enums::EventPayload,
    ) {
        // The bus holds its own receiver, so the channel cannot be disconnected.
        let _ = self.sender.send((event, payload));
    }

    #[must_use]
    pub fn bindings(&self) -> &[view_core::events::Binding] {
        &self.bindings
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Drains queued events in arrival order, calling `deliver` once per
    /// matching binding. Returns the number of deliveries.
    pub fn dispatch<F>(&self, mut deliver: F) -> usize
    where
        F: FnMut(&view_core::events::Binding, view_core::enums::EventPayload),
    {
        let mut delivered = 0;

        for (event, payload) in self.receiver.try_iter() {
            let mut matched = false;

            for binding in self.bindings.iter().filter(|b| b.event == event) {
                deliver(binding, payload);
                delivered += 1;
                matched = true;
            }

            if !matched {
                tracing::trace!(target: "input", ?event, "event_unbound");
            }
        }

        delivered
    }
}

impl view_core::events::EventSubscriber for EventBus {
    fn allocate_id(&mut self) -> view_core::events::ViewId {
        self.next_id += 1;
        view_core::events::ViewId(self.next_id)
    }

    fn bind(&mut self, binding: view_core::events::Binding) {
        if !self.bindings.contains(&binding) {
            self.bindings.push(binding);
        }
    }

    fn unbind(&mut self, binding: &view_core::events::Binding) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b != binding);
        self.bindings.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use view_core::enums::{EventName, EventPayload, Key, ViewHandler};
    use view_core::events::{Binding, EventSubscriber, ViewId};
    use view_core::geometry::Point2;

    fn binding(event: EventName, owner: u64, handler: ViewHandler) -> Binding {
        Binding {
            event,
            owner: ViewId(owner),
            handler,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut bus = EventBus::new();

        let a = bus.allocate_id();
        let b = bus.allocate_id();

        assert_ne!(a, b);
    }

    #[test]
    fn test_bind_is_deduplicated_and_unbind_reports() {
        let mut bus = EventBus::new();
        let up = binding(EventName::KeyDown(Key::Up), 1, ViewHandler::ScrollVertical(-1));

        bus.bind(up);
        bus.bind(up);
        assert_eq!(bus.bindings().len(), 1);

        assert!(bus.unbind(&up));
        assert!(!bus.unbind(&up));
        assert!(bus.bindings().is_empty());
    }

    #[test]
    fn test_unbind_matches_handler_identity() {
        let mut bus = EventBus::new();
        let event = EventName::KeyDown(Key::Left);

        bus.bind(binding(event, 1, ViewHandler::ScrollHorizontal(-1)));
        bus.bind(binding(event, 2, ViewHandler::ScrollHorizontal(-1)));

        // Same event and handler on another owner stays bound
        assert!(bus.unbind(&binding(event, 1, ViewHandler::ScrollHorizontal(-1))));
        assert_eq!(bus.bindings(), &[binding(event, 2, ViewHandler::ScrollHorizontal(-1))]);
        assert!(!bus.unbind(&binding(event, 2, ViewHandler::ScrollHorizontal(1))));
    }

    #[test]
    fn test_dispatch_delivers_in_order_to_matching_bindings() {
        let mut bus = EventBus::new();
        bus.bind(binding(EventName::PressOn, 1, ViewHandler::BeginDrag));
        bus.bind(binding(EventName::PressOn, 2, ViewHandler::BeginDrag));
        bus.bind(binding(EventName::Release, 1, ViewHandler::EndDrag));

        let press = EventPayload::Pointer(Point2::new(3.0, 4.0));
        bus.trigger(EventName::PressOn, press);
        bus.trigger(EventName::Drag, EventPayload::None); // unbound
        bus.trigger(EventName::Release, EventPayload::None);
        assert_eq!(bus.pending(), 3);

        let mut seen = Vec::new();
        let delivered = bus.dispatch(|b, payload| seen.push((b.owner, b.handler, payload)));

        assert_eq!(delivered, 3);
        assert_eq!(
            seen,
            vec![
                (ViewId(1), ViewHandler::BeginDrag, press),
                (ViewId(2), ViewHandler::BeginDrag, press),
                (ViewId(1), ViewHandler::EndDrag, EventPayload::None),
            ]
        );
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_sender_can_be_used_from_another_thread() {
        let mut bus = EventBus::new();
        bus.bind(binding(EventName::KeyHeld(Key::Down), 1, ViewHandler::ScrollVertical(1)));

        let sender = bus.sender();
        std::thread::spawn(move || {
            for _ in 0..5 {
                sender
                    .send((EventName::KeyHeld(Key::Down), EventPayload::None))
                    .unwrap();
            }
        })
        .join()
        .unwrap();

        assert_eq!(bus.dispatch(|_, _| {}), 5);
    }

    #[test]
    fn test_attached_view_scrolls_through_bus() {
        let content = std::io::Cursor::new(b"1\n2\n3\n4\n".to_vec());
        let mut view = view_core::viewport::ViewportWindow::new(
            content,
            Box::new(view_core::shaping::CellShaper::new(8, 12)),
            &[],
        )
        .unwrap();
        let mut bus = EventBus::new();
        let id = view.attach(&mut bus);

        bus.trigger(EventName::KeyDown(Key::Down), EventPayload::None);
        bus.trigger(EventName::KeyHeld(Key::Down), EventPayload::None);
        bus.trigger(EventName::KeyDown(Key::Right), EventPayload::None);
        bus.dispatch(|b, payload| {
            if b.owner == id {
                view.handle(b.handler, payload);
            }
        });

        assert_eq!(view.top_line(), 2);
        assert_eq!(view.column(), 1);

        assert_eq!(view.detach(&mut bus), 11);
        bus.trigger(EventName::KeyDown(Key::Up), EventPayload::None);
        assert_eq!(bus.dispatch(|_, _| {}), 0);
    }
}
