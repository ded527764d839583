use ratatui::style::Color;

/// Fill for map features with no matching team record
pub const NON_PARTICIPANT: Color = Color::Rgb(233, 233, 233);

/// Number of discrete buckets in the magnitude ramp
pub const MAGNITUDE_BUCKETS: usize = 10;

/// Clamped linear interpolation between two RGB endpoints over a
/// numeric domain. The map's participation shading runs white to blue
/// over 0..10.
#[derive(Clone, Copy)]
pub struct LinearColorScale {
    domain: (f64, f64),
    from: (u8, u8, u8),
    to: (u8, u8, u8),
}

impl LinearColorScale {
    pub fn new(domain: (f64, f64), from: (u8, u8, u8), to: (u8, u8, u8)) -> Self {
        Self { domain, from, to }
    }

    /// White-to-blue participation ramp over 0..10
    pub fn participation() -> Self {
        Self::new((0.0, 10.0), (255, 255, 255), (0, 0, 255))
    }

    /// Normalized position of a value in the domain, clamped to 0..1
    pub fn position(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        if d1 == d0 {
            return 0.0;
        }
        ((value - d0) / (d1 - d0)).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> Color {
        let t = self.position(value);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::Rgb(
            lerp(self.from.0, self.to.0),
            lerp(self.from.1, self.to.1),
            lerp(self.from.2, self.to.2),
        )
    }
}

/// Quantized magnitude coloring for bar fills: a value's position in
/// 0..max picks one of ten discrete shades of the participation ramp,
/// matching the ten legend swatches.
#[derive(Clone, Copy)]
pub struct MagnitudeScale {
    max: f64,
}

impl MagnitudeScale {
    pub fn new(max: f64) -> Self {
        Self { max: max.max(f64::MIN_POSITIVE) }
    }

    pub fn bucket(&self, value: f64) -> usize {
        let t = (value / self.max).clamp(0.0, 1.0);
        ((t * MAGNITUDE_BUCKETS as f64) as usize).min(MAGNITUDE_BUCKETS - 1)
    }

    pub fn color(&self, value: f64) -> Color {
        Self::bucket_color(self.bucket(value))
    }

    /// Shade for a bucket index; also used to draw the legend swatches
    pub fn bucket_color(bucket: usize) -> Color {
        LinearColorScale::participation().color(bucket as f64)
    }
}

/// Ordinal label-to-color assignment: unseen labels are appended to the
/// domain and take the next palette entry, wrapping around.
pub struct OrdinalScale {
    palette: Vec<Color>,
    domain: Vec<String>,
}

impl OrdinalScale {
    pub fn new(palette: Vec<Color>) -> Self {
        Self {
            palette,
            domain: Vec::new(),
        }
    }

    /// Pie slice palette: blue, white, lavender
    pub fn pie() -> Self {
        Self::new(vec![
            Color::Rgb(0, 0, 255),
            Color::Rgb(255, 255, 255),
            Color::Rgb(204, 204, 255),
        ])
    }

    pub fn color(&mut self, label: &str) -> Color {
        let idx = match self.domain.iter().position(|l| l == label) {
            Some(idx) => idx,
            None => {
                self.domain.push(label.to_string());
                self.domain.len() - 1
            }
        };
        self.palette[idx % self.palette.len()]
    }
}
