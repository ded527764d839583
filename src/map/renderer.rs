use rayon::prelude::*;
use ratatui::style::Color;

use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, fill_spans, paint_spans, point_in_rings, Span};
use crate::map::projection::Viewport;
use crate::map::spatial::FeatureGrid;

/// Stroke color for country outlines
const BORDER_COLOR: Color = Color::Rgb(115, 103, 103);
/// Outline highlight for the selected country
const SELECTED_COLOR: Color = Color::Yellow;
/// Grid cell size in degrees for the hit-test index
const GRID_CELL_DEGREES: f64 = 4.0;

/// One country boundary feature: name plus exterior rings in lon/lat.
pub struct Country {
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
    bbox: (f64, f64, f64, f64),
}

impl Country {
    pub fn new(name: impl Into<String>, rings: Vec<Vec<(f64, f64)>>) -> Self {
        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for ring in &rings {
            for &(lon, lat) in ring {
                bbox.0 = bbox.0.min(lon);
                bbox.1 = bbox.1.min(lat);
                bbox.2 = bbox.2.max(lon);
                bbox.3 = bbox.3.max(lat);
            }
        }
        Self {
            name: name.into(),
            rings,
            bbox,
        }
    }

    fn overlaps(&self, bounds: (f64, f64, f64, f64)) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        self.bbox.2 >= min_lon
            && self.bbox.0 <= max_lon
            && self.bbox.3 >= min_lat
            && self.bbox.1 <= max_lat
    }
}

/// Immutable country boundary store with a spatial hit-test index.
pub struct CountryMap {
    countries: Vec<Country>,
    grid: FeatureGrid,
}

impl CountryMap {
    pub fn new(countries: Vec<Country>) -> Self {
        let grid = FeatureGrid::build(
            countries.iter().map(|c| c.bbox),
            GRID_CELL_DEGREES,
        );
        Self { countries, grid }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Check if any boundary data is loaded
    pub fn has_data(&self) -> bool {
        !self.countries.is_empty()
    }

    /// Find the country containing a geographic point. Grid candidates
    /// first, exact even-odd ring test second; first hit wins.
    pub fn hit_test(&self, lon: f64, lat: f64) -> Option<&Country> {
        self.grid
            .query_point(lon, lat)
            .iter()
            .map(|&idx| &self.countries[idx])
            .find(|c| point_in_rings(lon, lat, &c.rings))
    }

    /// Render the choropleth: filled country shapes colored by
    /// `fill_for(name)`, outlines on top, the selected country's outline
    /// highlighted. Span rasterization fans out per feature.
    pub fn render<F>(
        &self,
        canvas: &mut BrailleCanvas,
        viewport: &Viewport,
        fill_for: F,
        selected: Option<&str>,
    ) where
        F: Fn(&str) -> Color + Sync,
    {
        let bounds = viewport.geo_bounds();
        let (pw, ph) = canvas.pixel_size();

        let visible: Vec<&Country> = self
            .countries
            .iter()
            .filter(|c| c.overlaps(bounds))
            .collect();

        // Project and rasterize visible features in parallel; painting
        // stays sequential because the canvas is a single buffer.
        let rastered: Vec<(Vec<Vec<(i32, i32)>>, Vec<Span>, Color)> = visible
            .par_iter()
            .map(|country| {
                let projected: Vec<Vec<(i32, i32)>> = country
                    .rings
                    .iter()
                    .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project(lon, lat)).collect())
                    .collect();
                let spans = fill_spans(&projected, pw as i32, ph as i32);
                (projected, spans, fill_for(&country.name))
            })
            .collect();

        for (_, spans, color) in &rastered {
            paint_spans(canvas, spans, *color);
        }

        // Outline pass over the fills; the selected country last so its
        // highlight wins shared border cells.
        for (country, (projected, _, _)) in visible.iter().zip(&rastered) {
            if selected != Some(country.name.as_str()) {
                Self::draw_outline(canvas, projected, viewport, BORDER_COLOR);
            }
        }
        if let Some(name) = selected {
            for (country, (projected, _, _)) in visible.iter().zip(&rastered) {
                if country.name == name {
                    Self::draw_outline(canvas, projected, viewport, SELECTED_COLOR);
                }
            }
        }
    }

    /// Draw ring outlines with viewport culling
    fn draw_outline(
        canvas: &mut BrailleCanvas,
        rings: &[Vec<(i32, i32)>],
        viewport: &Viewport,
        color: Color,
    ) {
        for ring in rings {
            if ring.len() < 2 {
                continue;
            }
            let mut prev: Option<(i32, i32)> = None;
            for &(px, py) in ring.iter().chain(ring.first()) {
                if let Some((prev_x, prev_y)) = prev {
                    let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
                    if dist < viewport.width
                        && viewport.segment_might_be_visible((prev_x, prev_y), (px, py))
                    {
                        draw_line(canvas, prev_x, prev_y, px, py, color);
                    }
                }
                prev = Some((px, py));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, lon0: f64, lat0: f64, size: f64) -> Country {
        Country::new(
            name,
            vec![vec![
                (lon0, lat0),
                (lon0 + size, lat0),
                (lon0 + size, lat0 + size),
                (lon0, lat0 + size),
            ]],
        )
    }

    #[test]
    fn test_hit_test_inside() {
        let map = CountryMap::new(vec![square("France", 0.0, 44.0, 6.0), square("Spain", -8.0, 37.0, 6.0)]);
        assert_eq!(map.hit_test(3.0, 47.0).map(|c| c.name.as_str()), Some("France"));
        assert_eq!(map.hit_test(-5.0, 40.0).map(|c| c.name.as_str()), Some("Spain"));
    }

    #[test]
    fn test_hit_test_outside_all() {
        let map = CountryMap::new(vec![square("France", 0.0, 44.0, 6.0)]);
        assert!(map.hit_test(30.0, 30.0).is_none());
    }

    #[test]
    fn test_render_fills_matching_color() {
        let map = CountryMap::new(vec![square("France", 0.0, 40.0, 20.0)]);
        let mut canvas = BrailleCanvas::new(40, 20);
        let viewport = Viewport::new(10.0, 50.0, 4.0, 80, 80);
        map.render(&mut canvas, &viewport, |_| Color::Blue, None);
        assert!(canvas.cells().count() > 0);
    }

    #[test]
    fn test_empty_map_has_no_data() {
        let map = CountryMap::new(Vec::new());
        assert!(!map.has_data());
        assert!(map.hit_test(0.0, 0.0).is_none());
    }
}
