mod geometry;
mod projection;
mod renderer;

pub use projection::Viewport;
pub use renderer::{LineString, Lod, MapLayers, MapRenderer, MarkerCell, MarkerFocus};
