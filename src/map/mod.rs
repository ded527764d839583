mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use geometry::{fill_spans, point_in_rings};
pub use projection::Viewport;
pub use renderer::{Country, CountryMap};
