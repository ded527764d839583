use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::braille::BrailleCanvas;
use crate::chart::dataset::{diff_by_label, Datum};
use crate::chart::scale::OrdinalScale;
use crate::chart::tween::Tween;

/// Duration of the angle tween for persisting slices
pub const PIE_UPDATE: Duration = Duration::from_millis(750);
/// Duration of the sweep-in for entering slices
pub const PIE_ENTER: Duration = Duration::from_millis(1000);

/// One displayed donut slice. Angles are radians clockwise from
/// 12 o'clock, 0..TAU.
struct PieSlice {
    label: &'static str,
    value: f64,
    start: Tween,
    end: Tween,
    color: Color,
}

/// Win/draw/loss donut with animated transitions. Persisting slices
/// tween old angles to new angles; entering slices sweep open from
/// their end angle; exiting slices are dropped immediately.
pub struct PieChart {
    slices: Vec<PieSlice>,
    colors: OrdinalScale,
}

impl PieChart {
    pub fn new() -> Self {
        Self {
            slices: Vec::new(),
            colors: OrdinalScale::pie(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    fn displayed(&self) -> Vec<Datum> {
        self.slices
            .iter()
            .map(|s| Datum {
                label: s.label,
                value: s.value,
            })
            .collect()
    }

    /// Point the chart at a new dataset. Membership comes from the
    /// explicit label-keyed diff; angle targets from cumulative
    /// fractions in dataset order (no sorting).
    pub fn retarget(&mut self, dataset: &[Datum], now: Instant) {
        let targets = slice_angles(dataset);
        let angle_of = |label: &str| {
            dataset
                .iter()
                .position(|d| d.label == label)
                .map(|idx| targets[idx])
        };

        let diff = diff_by_label(&self.displayed(), dataset);

        // Exiting slices disappear without animation
        self.slices
            .retain(|s| !diff.removed.iter().any(|d| d.label == s.label));

        for (_, new) in &diff.updated {
            let Some((a0, a1)) = angle_of(new.label) else {
                continue;
            };
            if let Some(slice) = self.slices.iter_mut().find(|s| s.label == new.label) {
                slice.value = new.value;
                slice.start = slice.start.retarget(a0, now, PIE_UPDATE);
                slice.end = slice.end.retarget(a1, now, PIE_UPDATE);
            }
        }

        for datum in &diff.added {
            let Some((a0, a1)) = angle_of(datum.label) else {
                continue;
            };
            let color = self.colors.color(datum.label);
            // Sweep open: the start angle travels from the end angle
            // back to its resting place while the end stays put.
            self.slices.push(PieSlice {
                label: datum.label,
                value: datum.value,
                start: Tween::new(a1, a0, now, PIE_ENTER),
                end: Tween::fixed(a1),
                color,
            });
        }

        // Keep slices in dataset order so the legend stays stable
        self.slices
            .sort_by_key(|s| dataset.iter().position(|d| d.label == s.label));
    }

    /// Legend entries regenerated from the current color domain
    pub fn legend(&self) -> Vec<(Color, String)> {
        self.slices
            .iter()
            .map(|s| (s.color, format!("{}: {:.0}", s.label, s.value)))
            .collect()
    }

    /// Displayed (start, end) angles of a slice by label, for tests and
    /// tooltips
    pub fn angles_at(&self, label: &str, now: Instant) -> Option<(f64, f64)> {
        self.slices
            .iter()
            .find(|s| s.label == label)
            .map(|s| (s.start.at(now), s.end.at(now)))
    }

    /// Draw the donut into the canvas: radial strokes sweep each slice's
    /// currently displayed angular extent.
    pub fn render(&self, canvas: &mut BrailleCanvas, now: Instant) {
        let (pw, ph) = canvas.pixel_size();
        if pw < 8 || ph < 8 {
            return;
        }
        let cx = pw as f64 / 2.0;
        let cy = ph as f64 / 2.0;
        let outer = (pw.min(ph) as f64 / 2.0 - 1.0).max(2.0);
        let inner = outer / 2.0;

        for slice in &self.slices {
            let a0 = slice.start.at(now);
            let a1 = slice.end.at(now);
            if a1 - a0 <= 1e-4 {
                continue;
            }
            let steps = ((a1 - a0) * outer).ceil() as usize + 1;
            for i in 0..=steps {
                let theta = a0 + (a1 - a0) * i as f64 / steps as f64;
                let (sin, cos) = theta.sin_cos();
                let mut r = inner;
                while r <= outer {
                    let x = (cx + r * sin) as i32;
                    let y = (cy - r * cos) as i32;
                    canvas.set_pixel_signed(x, y, slice.color);
                    r += 1.0;
                }
            }
        }
    }
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new()
    }
}

/// Target (start, end) angles for each datum: cumulative fractions of
/// the total, in dataset order. A zero total collapses every slice.
fn slice_angles(dataset: &[Datum]) -> Vec<(f64, f64)> {
    let total: f64 = dataset.iter().map(|d| d.value).sum();
    if total <= 0.0 {
        return vec![(0.0, 0.0); dataset.len()];
    }
    let mut angle = 0.0;
    dataset
        .iter()
        .map(|d| {
            let sweep = d.value / total * TAU;
            let arc = (angle, angle + sweep);
            angle += sweep;
            arc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france_pie() -> Vec<Datum> {
        vec![
            Datum { label: "Wins", value: 10.0 },
            Datum { label: "Draws", value: 5.0 },
            Datum { label: "Losses", value: 3.0 },
        ]
    }

    #[test]
    fn test_angles_partition_full_circle() {
        let angles = slice_angles(&france_pie());
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0].0, 0.0);
        for pair in angles.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-9);
        }
        assert!((angles[2].1 - TAU).abs() < 1e-9);
        // Wins take 10/18 of the circle
        assert!((angles[0].1 - 10.0 / 18.0 * TAU).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_collapses() {
        let dataset = vec![
            Datum { label: "Wins", value: 0.0 },
            Datum { label: "Draws", value: 0.0 },
            Datum { label: "Losses", value: 0.0 },
        ];
        assert_eq!(slice_angles(&dataset), vec![(0.0, 0.0); 3]);
    }

    #[test]
    fn test_entering_slices_sweep_open() {
        let now = Instant::now();
        let mut pie = PieChart::new();
        pie.retarget(&france_pie(), now);

        // At the start of the enter sweep every slice is collapsed onto
        // its end angle
        let (s0, e0) = pie.angles_at("Wins", now).unwrap();
        assert!((s0 - e0).abs() < 1e-9);

        // After the sweep it has opened to its full target extent
        let done = now + PIE_ENTER;
        let (s1, e1) = pie.angles_at("Wins", done).unwrap();
        assert!((s1 - 0.0).abs() < 1e-9);
        assert!((e1 - 10.0 / 18.0 * TAU).abs() < 1e-9);
    }

    #[test]
    fn test_update_tweens_between_targets() {
        let now = Instant::now();
        let mut pie = PieChart::new();
        pie.retarget(&france_pie(), now);

        let settled = now + PIE_ENTER;
        let next = vec![
            Datum { label: "Wins", value: 6.0 },
            Datum { label: "Draws", value: 6.0 },
            Datum { label: "Losses", value: 6.0 },
        ];
        pie.retarget(&next, settled);

        // Mid-transition the end angle sits between old and new targets
        let mid = settled + PIE_UPDATE / 2;
        let (_, end_mid) = pie.angles_at("Wins", mid).unwrap();
        let old_end = 10.0 / 18.0 * TAU;
        let new_end = TAU / 3.0;
        assert!(end_mid < old_end && end_mid > new_end);

        let (_, end_done) = pie.angles_at("Wins", settled + PIE_UPDATE).unwrap();
        assert!((end_done - new_end).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset_removes_all_slices_immediately() {
        let now = Instant::now();
        let mut pie = PieChart::new();
        pie.retarget(&france_pie(), now);
        assert!(!pie.is_empty());

        pie.retarget(&[], now);
        assert!(pie.is_empty());
        assert!(pie.legend().is_empty());
    }

    #[test]
    fn test_legend_matches_dataset_order() {
        let now = Instant::now();
        let mut pie = PieChart::new();
        pie.retarget(&france_pie(), now);

        let legend = pie.legend();
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[0].1, "Wins: 10");
        assert_eq!(legend[1].1, "Draws: 5");
        assert_eq!(legend[2].1, "Losses: 3");
        // Distinct slice colors
        assert_ne!(legend[0].0, legend[1].0);
        assert_ne!(legend[1].0, legend[2].0);
    }

    #[test]
    fn test_render_draws_pixels() {
        let now = Instant::now();
        let mut pie = PieChart::new();
        pie.retarget(&france_pie(), now);
        let mut canvas = BrailleCanvas::new(20, 10);
        pie.render(&mut canvas, now + PIE_ENTER);
        assert!(canvas.cells().count() > 0);
    }
}
