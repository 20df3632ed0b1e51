use fltk::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// ==========================================
// UTILS
// ==========================================
#[inline(always)]
fn pointer_in(c: &fltk::widget::Widget) -> view_core::geometry::Point2 {
    view_core::geometry::Point2::new(
        f64::from(fltk::app::event_x() - c.x()),
        f64::from(fltk::app::event_y() - c.y()),
    )
}

fn arrow(key: fltk::enums::Key) -> Option<view_core::enums::Key> {
    match key {
        fltk::enums::Key::Up => Some(view_core::enums::Key::Up),
        fltk::enums::Key::Down => Some(view_core::enums::Key::Down),
        fltk::enums::Key::Left => Some(view_core::enums::Key::Left),
        fltk::enums::Key::Right => Some(view_core::enums::Key::Right),
        _ => None,
    }
}

/// Held arrow after a key release. Releasing any other key keeps it held.
fn released(
    held: Option<view_core::enums::Key>,
    key: Option<view_core::enums::Key>,
) -> Option<view_core::enums::Key> {
    if key.is_some() && key == held { None } else { held }
}

// ==========================================
// 1. STATE
// ==========================================
pub struct State<S> {
    pub view: view_core::viewport::ViewportWindow<S>,
    pub bus: util::bus::EventBus,
    /// Arrow key currently held down, to tell auto-repeat from a fresh press.
    pub held: Option<view_core::enums::Key>,
}

// ==========================================
// 2. MAIN COMPONENT API
// ==========================================
/// A canvas showing one [`view_core::viewport::ViewportWindow`]. Pointer
/// coordinates are relative to the canvas origin.
pub struct ViewerWidget<S> {
    pub canvas: fltk::widget::Widget,
    pub state: Rc<RefCell<State<S>>>,
}

impl<S> ViewerWidget<S>
where
    S: std::io::Read + std::io::Seek + 'static,
{
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        mut view: view_core::viewport::ViewportWindow<S>,
    ) -> Self {
        let mut bus = util::bus::EventBus::new();
        let id = view.attach(&mut bus);

        tracing::debug!(target: "input", ?id, "view_attached");

        let mut canvas = fltk::widget::Widget::default()
            .with_pos(x, y)
            .with_size(w, h);
        let state = Rc::new(RefCell::new(State {
            view,
            bus,
            held: None,
        }));

        Renderer::wire(&mut canvas, state.clone());
        Controller::wire(&mut canvas, state.clone());

        Self { canvas, state }
    }

    /// Unregisters the view from its bus; further input is ignored.
    pub fn close(&mut self) {
        let mut st = self.state.borrow_mut();
        let State { view, bus, .. } = &mut *st;
        let removed = view.detach(bus);

        tracing::debug!(target: "input", removed, "view_detached");
    }
}

// ==========================================
// 3. RENDERER (View)
// ==========================================
struct Renderer;

impl Renderer {
    fn wire<S>(canvas: &mut fltk::widget::Widget, state: Rc<RefCell<State<S>>>)
    where
        S: std::io::Read + std::io::Seek + 'static,
    {
        canvas.draw(move |w| {
            // Keep the frame (which can be dragged around) inside the canvas.
            fltk::draw::push_clip(w.x(), w.y(), w.width(), w.height());
            Self::draw_bg(w);

            let mut st = state.borrow_mut();
            view_core::capability::Drawable::draw_offset(
                &mut st.view,
                &mut renderer::sink::FltkSink,
                f64::from(w.x()),
                f64::from(w.y()),
            );

            fltk::draw::pop_clip();
        });
    }

    fn draw_bg(w: &mut fltk::widget::Widget) {
        fltk::draw::draw_rect_fill(
            w.x(),
            w.y(),
            w.width(),
            w.height(),
            fltk::enums::Color::from_rgb(24, 26, 31),
        );
    }
}

// ==========================================
// 4. CONTROLLER (Input & Events)
// ==========================================
struct Controller;

impl Controller {
    fn wire<S>(canvas: &mut fltk::widget::Widget, state: Rc<RefCell<State<S>>>)
    where
        S: std::io::Read + std::io::Seek + 'static,
    {
        canvas.handle(move |c, ev| {
            let mut st = state.borrow_mut();

            let handled = match ev {
                fltk::enums::Event::Push => {
                    let _ = c.take_focus();
                    Self::emit(&st, view_core::enums::EventName::PressOn, pointer_in(c))
                }
                fltk::enums::Event::Drag => {
                    Self::emit(&st, view_core::enums::EventName::Drag, pointer_in(c))
                }
                fltk::enums::Event::Released => {
                    st.bus.trigger(
                        view_core::enums::EventName::Release,
                        view_core::enums::EventPayload::None,
                    );
                    true
                }
                fltk::enums::Event::KeyDown => Self::on_keydown(&mut st),
                fltk::enums::Event::KeyUp => {
                    st.held = released(st.held, arrow(fltk::app::event_key()));
                    false
                }
                fltk::enums::Event::Focus | fltk::enums::Event::Unfocus => true,
                _ => false,
            };

            if handled {
                Self::pump(c, &mut st);
            }

            handled
        });
    }

    fn emit<S>(
        st: &State<S>,
        event: view_core::enums::EventName,
        pointer: view_core::geometry::Point2,
    ) -> bool {
        st.bus
            .trigger(event, view_core::enums::EventPayload::Pointer(pointer));
        true
    }

    fn on_keydown<S>(st: &mut State<S>) -> bool {
        let Some(key) = arrow(fltk::app::event_key()) else {
            return false;
        };

        let event = if st.held == Some(key) {
            view_core::enums::EventName::KeyHeld(key)
        } else {
            view_core::enums::EventName::KeyDown(key)
        };

        st.held = Some(key);
        st.bus
            .trigger(event, view_core::enums::EventPayload::None);

        true
    }

    /// Delivers queued events to the view and redraws if it changed.
    fn pump<S>(c: &mut fltk::widget::Widget, st: &mut State<S>) {
        let State { view, bus, .. } = st;
        let Some(id) = view.id() else {
            return;
        };

        bus.dispatch(|binding, payload| {
            if binding.owner == id {
                view.handle(binding.handler, payload);
            }
        });

        if view.is_dirty() {
            c.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use view_core::enums::Key;

    #[test]
    fn test_releasing_held_arrow_clears_it() {
        assert_eq!(released(Some(Key::Up), Some(Key::Up)), None);
    }

    #[test]
    fn test_releasing_other_key_keeps_held_arrow() {
        assert_eq!(released(Some(Key::Up), Some(Key::Left)), Some(Key::Up));
        assert_eq!(released(Some(Key::Down), None), Some(Key::Down));
        assert_eq!(released(None, Some(Key::Right)), None);
    }
}
