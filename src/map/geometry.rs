use crate::braille::BrailleCanvas;
use ratatui::style::Color;

/// A horizontal run of filled pixels: (y, x_start, x_end) inclusive.
pub type Span = (i32, i32, i32);

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Compute even-odd scanline fill spans for a set of projected rings,
/// clipped to `0..width` x `0..height`. Each ring is a closed loop of
/// pixel coordinates (the closing edge back to the first vertex is
/// implied).
pub fn fill_spans(rings: &[Vec<(i32, i32)>], width: i32, height: i32) -> Vec<Span> {
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for ring in rings {
        for &(_, y) in ring {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y > max_y {
        return Vec::new();
    }
    min_y = min_y.max(0);
    max_y = max_y.min(height - 1);

    let mut spans = Vec::new();
    let mut xs: Vec<f64> = Vec::new();

    for y in min_y..=max_y {
        // Sample mid-row to dodge vertices sitting exactly on the scanline
        let scan = y as f64 + 0.5;
        xs.clear();

        for ring in rings {
            if ring.len() < 3 {
                continue;
            }
            for i in 0..ring.len() {
                let (x0, y0) = ring[i];
                let (x1, y1) = ring[(i + 1) % ring.len()];
                let (y0, y1) = (y0 as f64, y1 as f64);
                if (y0 <= scan) == (y1 <= scan) {
                    continue; // edge does not cross the scanline
                }
                let t = (scan - y0) / (y1 - y0);
                xs.push(x0 as f64 + t * (x1 - x0) as f64);
            }
        }

        xs.sort_by(|a, b| a.total_cmp(b));

        for pair in xs.chunks_exact(2) {
            let x0 = (pair[0].ceil() as i32).max(0);
            let x1 = (pair[1].floor() as i32).min(width - 1);
            if x0 <= x1 {
                spans.push((y, x0, x1));
            }
        }
    }

    spans
}

/// Paint fill spans onto the canvas
pub fn paint_spans(canvas: &mut BrailleCanvas, spans: &[Span], color: Color) {
    for &(y, x0, x1) in spans {
        for x in x0..=x1 {
            canvas.set_pixel_signed(x, y, color);
        }
    }
}

/// Even-odd point-in-polygon test over a set of geographic rings.
/// A point inside any ring is considered inside the feature (the outer
/// rings of a multipolygon are disjoint).
pub fn point_in_rings(lon: f64, lat: f64, rings: &[Vec<(f64, f64)>]) -> bool {
    rings.iter().any(|ring| point_in_ring(lon, lat, ring))
}

fn point_in_ring(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > lat) != (yj > lat))
            && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
    }

    #[test]
    fn test_point_inside_square() {
        let rings = vec![unit_square()];
        assert!(point_in_rings(5.0, 5.0, &rings));
    }

    #[test]
    fn test_point_outside_square() {
        let rings = vec![unit_square()];
        assert!(!point_in_rings(15.0, 5.0, &rings));
        assert!(!point_in_rings(5.0, -1.0, &rings));
    }

    #[test]
    fn test_point_in_second_ring() {
        let far = vec![(20.0, 20.0), (30.0, 20.0), (30.0, 30.0), (20.0, 30.0)];
        let rings = vec![unit_square(), far];
        assert!(point_in_rings(25.0, 25.0, &rings));
    }

    #[test]
    fn test_fill_spans_square() {
        let ring = vec![(2, 2), (8, 2), (8, 8), (2, 8)];
        let spans = fill_spans(&[ring], 20, 20);
        assert!(!spans.is_empty());
        // Every span stays inside the square bounds
        for &(y, x0, x1) in &spans {
            assert!((2..=8).contains(&y));
            assert!(x0 >= 2 && x1 <= 8);
            assert!(x0 <= x1);
        }
        // Middle row is a full run
        let mid = spans.iter().find(|&&(y, _, _)| y == 5).unwrap();
        assert_eq!((mid.1, mid.2), (2, 8));
    }

    #[test]
    fn test_fill_spans_clipped() {
        let ring = vec![(-5, -5), (5, -5), (5, 5), (-5, 5)];
        let spans = fill_spans(&[ring], 10, 10);
        for &(y, x0, _) in &spans {
            assert!(y >= 0);
            assert!(x0 >= 0);
        }
    }

    #[test]
    fn test_degenerate_ring_ignored() {
        let spans = fill_spans(&[vec![(1, 1), (2, 2)]], 10, 10);
        assert!(spans.is_empty());
        assert!(!point_in_rings(1.0, 1.0, &[vec![(0.0, 0.0), (2.0, 2.0)]]));
    }

    #[test]
    fn test_draw_line_sets_pixels() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0, Color::Cyan);
        assert!(canvas.cells().count() > 0);
    }
}
