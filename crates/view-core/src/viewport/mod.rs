pub mod state;
pub mod window;

pub use window::ViewportWindow;
