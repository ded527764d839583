use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::braille::BrailleCanvas;
use crate::chart::dataset::{diff_by_label, Datum};
use crate::chart::scale::MagnitudeScale;
use crate::chart::tween::Tween;

/// Duration of the height tween for bars
pub const BAR_UPDATE: Duration = Duration::from_millis(750);
/// Duration of the value-axis rescale
pub const AXIS_TRANSITION: Duration = Duration::from_millis(1500);

/// Band padding ratios (inner between bars, outer at the edges)
const PADDING_INNER: f64 = 0.3;
const PADDING_OUTER: f64 = 0.3;

struct BarAnim {
    label: &'static str,
    value: f64,
    height: Tween,
}

/// Six-metric bar chart with animated heights and a transitioning value
/// axis. Fill colors quantize each bar's target value into the decile
/// ramp; color changes land instantly while geometry tweens.
pub struct BarChart {
    bars: Vec<BarAnim>,
    axis_max: Tween,
    scale_max: f64,
}

impl BarChart {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            axis_max: Tween::fixed(0.0),
            scale_max: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    fn displayed(&self) -> Vec<Datum> {
        self.bars
            .iter()
            .map(|b| Datum {
                label: b.label,
                value: b.value,
            })
            .collect()
    }

    /// Point the chart at a new dataset. Bars present in both sets tween
    /// to their new heights; new bars grow from zero; departed bars are
    /// dropped immediately. The axis maximum transitions on its own,
    /// slower clock.
    pub fn retarget(&mut self, dataset: &[Datum], now: Instant) {
        let max = dataset.iter().map(|d| d.value).fold(0.0, f64::max);
        self.axis_max = self.axis_max.retarget(max, now, AXIS_TRANSITION);
        self.scale_max = max;

        let diff = diff_by_label(&self.displayed(), dataset);

        self.bars
            .retain(|b| !diff.removed.iter().any(|d| d.label == b.label));

        for (_, new) in &diff.updated {
            if let Some(bar) = self.bars.iter_mut().find(|b| b.label == new.label) {
                bar.value = new.value;
                bar.height = bar.height.retarget(new.value, now, BAR_UPDATE);
            }
        }

        for datum in &diff.added {
            self.bars.push(BarAnim {
                label: datum.label,
                value: datum.value,
                height: Tween::new(0.0, datum.value, now, BAR_UPDATE),
            });
        }

        self.bars
            .sort_by_key(|b| dataset.iter().position(|d| d.label == b.label));
    }

    /// Currently displayed axis maximum
    pub fn axis_max_at(&self, now: Instant) -> f64 {
        self.axis_max.at(now)
    }

    /// Color scale over the current target domain, also used for the
    /// magnitude legend
    pub fn magnitude_scale(&self) -> MagnitudeScale {
        MagnitudeScale::new(self.scale_max)
    }

    /// Bar labels in display order with their target values and fills
    pub fn bars(&self) -> Vec<(&'static str, f64, Color)> {
        let scale = self.magnitude_scale();
        self.bars
            .iter()
            .map(|b| (b.label, b.value, scale.color(b.value)))
            .collect()
    }

    /// Displayed height of a bar in value units, for tests
    pub fn height_at(&self, label: &str, now: Instant) -> Option<f64> {
        self.bars
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.height.at(now))
    }

    /// Draw the bars into the canvas. Heights scale against the
    /// transitioning axis maximum, so a rescale visibly re-seats every
    /// bar.
    pub fn render(&self, canvas: &mut BrailleCanvas, now: Instant) {
        let (pw, ph) = canvas.pixel_size();
        if self.bars.is_empty() || pw < 8 || ph < 8 {
            return;
        }
        let axis_max = self.axis_max.at(now);
        if axis_max <= 0.0 {
            return;
        }
        let scale = self.magnitude_scale();

        for (i, bar) in self.bars.iter().enumerate() {
            let (x0, bandwidth) = band(i, self.bars.len(), pw as f64);
            let ratio = (bar.height.at(now) / axis_max).clamp(0.0, 1.0);
            let height = (ratio * ph as f64).round() as i32;
            if height <= 0 {
                continue;
            }
            let color = scale.color(bar.value);
            let x_end = (x0 + bandwidth) as i32;
            for x in x0 as i32..x_end.min(pw as i32) {
                for y in (ph as i32 - height).max(0)..ph as i32 {
                    canvas.set_pixel_signed(x, y, color);
                }
            }
        }
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

/// Band layout: (start, bandwidth) for bar `i` of `n` across `width`
/// pixels, 0.3 inner and outer padding
pub fn band(i: usize, n: usize, width: f64) -> (f64, f64) {
    let n = n.max(1) as f64;
    let step = width / (n - PADDING_INNER + 2.0 * PADDING_OUTER);
    let bandwidth = step * (1.0 - PADDING_INNER);
    let start = step * PADDING_OUTER + i as f64 * step;
    (start, bandwidth)
}
