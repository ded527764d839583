use ratatui::style::Color;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots) plus a
/// foreground color. Unicode Braille patterns: U+2800 to U+28FF.
///
/// A cell can only show one color, so the last pixel written to a cell
/// decides its color; outline passes drawn after fill passes therefore
/// take over shared border cells.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<CanvasCell>,
}

#[derive(Clone, Copy)]
struct CanvasCell {
    bits: u8,
    color: Color,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![
                CanvasCell {
                    bits: 0,
                    color: Color::Reset,
                };
                width * height
            ],
        }
    }

    /// Pixel resolution of the canvas (width, height).
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width * 2, self.height * 4)
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        let cell = &mut self.cells[cy * self.width + cx];
        cell.bits |= bit;
        cell.color = color;
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Iterate over non-empty cells as (col, row, char, color).
    /// Empty braille characters (U+2800) are skipped so callers can
    /// blit over existing buffer content.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16, char, Color)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            if cell.bits == 0 {
                return None;
            }
            let ch = char::from_u32(0x2800 + cell.bits as u32)?;
            let cx = (idx % self.width) as u16;
            let cy = (idx / self.width) as u16;
            Some((cx, cy, ch, cell.color))
        })
    }

    /// Convert the canvas to a string of Braille characters (color dropped)
    #[cfg(test)]
    pub fn to_plain_string(&self) -> String {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|cell| char::from_u32(0x2800 + cell.bits as u32).unwrap_or(' '))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
