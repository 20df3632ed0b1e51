pub mod capability;
pub mod config;
pub mod enums;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod line_index;
pub mod options;
pub mod pixels;
pub mod shaping;
pub mod viewport;
