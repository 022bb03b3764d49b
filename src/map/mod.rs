pub mod export;
pub mod geometry;
pub mod projection;
pub mod renderer;
pub mod spatial;

pub use projection::Projection;
pub use renderer::{Country, MapRenderer};
