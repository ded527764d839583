mod bar;
mod dataset;
mod pie;
mod scale;
mod tween;

pub use bar::{band, BarChart, AXIS_TRANSITION, BAR_UPDATE};
pub use dataset::{bar_dataset, diff_by_label, pie_dataset, ChartDiff, Datum};
pub use pie::{PieChart, PIE_ENTER, PIE_UPDATE};
pub use scale::{
    LinearColorScale, MagnitudeScale, OrdinalScale, MAGNITUDE_BUCKETS, NON_PARTICIPANT,
};
pub use tween::Tween;
