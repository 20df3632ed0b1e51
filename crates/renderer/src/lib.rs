pub mod shaper;
pub mod sink;
