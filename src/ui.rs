use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::app::{App, UK_TEAMS};
use crate::braille::BrailleCanvas;
use crate::chart::{band, MagnitudeScale, MAGNITUDE_BUCKETS};

/// Width of the charts column in terminal cells
const CHARTS_WIDTH: u16 = 38;

/// Top-level pane arrangement; app-side hit testing uses the same
/// rectangles the renderer draws into.
pub struct ScreenLayout {
    pub map: Rect,
    pub map_inner: Rect,
    pub charts: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Main
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(CHARTS_WIDTH)])
        .split(rows[0]);

    ScreenLayout {
        map: cols[0],
        map_inner: cols[0].inner(Margin::new(1, 1)),
        charts: cols[1],
        status: rows[1],
    }
}

/// Geometry of the UK constituent menu modal
pub struct MenuLayout {
    pub frame: Rect,
    pub buttons: [Rect; 4],
    pub close: Rect,
}

pub fn uk_menu_layout(area: Rect) -> MenuLayout {
    let width = area.width.min(40);
    let height = area.height.min(9);
    let frame = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    let button = |i: u16| {
        Rect::new(
            frame.x + 2,
            frame.y + 3 + i,
            frame.width.saturating_sub(4),
            1,
        )
    };
    MenuLayout {
        frame,
        buttons: [button(0), button(1), button(2), button(3)],
        close: Rect::new(frame.x + frame.width.saturating_sub(5), frame.y + 1, 3, 1),
    }
}

/// Render one frame
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let layout = screen_layout(frame.area());

    render_map(frame, app, layout.map);
    render_charts(frame, app, layout.charts, now);
    render_status_bar(frame, app, layout.status);

    if app.uk_menu.is_some() {
        render_uk_menu(frame, app);
    } else if let Some(tooltip) = &app.tooltip {
        render_tooltip(frame, &tooltip.lines, tooltip.col, tooltip.row);
    }
}

/// Blits a braille canvas into the buffer, skipping empty cells
struct CanvasWidget {
    canvas: BrailleCanvas,
}

impl Widget for CanvasWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (cx, cy, ch, color) in self.canvas.cells() {
            if cx < area.width && cy < area.height {
                buf[(area.x + cx, area.y + cy)].set_char(ch).set_fg(color);
            }
        }
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Euro Cup Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    app.data.countries.render(
        &mut canvas,
        &viewport,
        |name| app.fill_color(name),
        app.selected_feature(),
    );

    frame.render_widget(CanvasWidget { canvas }, inner);
}

fn render_charts(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Selected country readout
            Constraint::Min(10),   // Pie
            Constraint::Min(12),   // Bar
        ])
        .split(area);

    let readout = match &app.selection {
        Some(selection) => Line::from(vec![
            Span::styled(" Selected: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                selection.team.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            " Click a country to inspect it",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(readout), rows[0]);

    render_pie_pane(frame, app, rows[1], now);
    render_bar_pane(frame, app, rows[2], now);
}

fn render_pie_pane(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Results ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 5 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(inner);

    let mut canvas = BrailleCanvas::new(parts[0].width as usize, parts[0].height as usize);
    app.pie.render(&mut canvas, now);
    frame.render_widget(CanvasWidget { canvas }, parts[0]);

    // Legend rebuilt from the current color domain every frame
    let legend: Vec<Line> = app
        .pie
        .legend()
        .into_iter()
        .map(|(color, text)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(text),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), parts[1]);
}

fn render_bar_pane(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Record ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 7 || inner.width < 12 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Plot
            Constraint::Length(1), // Bar names
            Constraint::Length(2), // Magnitude legend
        ])
        .split(inner);

    let plot = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(rows[0]);

    render_bar_axis(frame, app, plot[0], now);

    let mut canvas = BrailleCanvas::new(plot[1].width as usize, plot[1].height as usize);
    app.bar.render(&mut canvas, now);
    frame.render_widget(CanvasWidget { canvas }, plot[1]);

    render_bar_names(frame, app, Rect::new(plot[1].x, rows[1].y, plot[1].width, 1));
    render_bar_legend(frame, app, rows[2]);
}

/// Value-axis ticks against the transitioning maximum
fn render_bar_axis(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    if app.bar.is_empty() {
        return;
    }
    let max = app.bar.axis_max_at(now);
    let style = Style::default().fg(Color::DarkGray);
    let tick = |v: f64| {
        if v >= 10.0 {
            format!("{v:>4.0}")
        } else {
            format!("{v:>4.1}")
        }
    };

    let mut lines = vec![Line::from(Span::styled(tick(max), style))];
    if area.height >= 4 {
        for _ in 0..(area.height - 2) / 2 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(tick(max / 2.0), style)));
    }
    frame.render_widget(Paragraph::new(lines), area);

    // Baseline zero hugs the plot's bottom edge
    let zero = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    frame.render_widget(Paragraph::new(Span::styled(tick(0.0), style)), zero);
}

/// Truncated metric names centered under their bands
fn render_bar_names(frame: &mut Frame, app: &App, area: Rect) {
    let bars = app.bar.bars();
    if bars.is_empty() {
        return;
    }
    let mut row = vec![" ".to_string(); area.width as usize];
    let width_px = area.width as f64 * 2.0;
    for (i, (label, _, _)) in bars.iter().enumerate() {
        let (x0, bw) = band(i, bars.len(), width_px);
        let cell_start = (x0 / 2.0).round() as usize;
        let cell_width = ((bw / 2.0).floor() as usize).max(1);
        for (j, ch) in label.chars().take(cell_width).enumerate() {
            if let Some(slot) = row.get_mut(cell_start + j) {
                *slot = ch.to_string();
            }
        }
    }
    let text: String = row.concat();
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray))),
        area,
    );
}

/// Ten ramp swatches with the domain endpoints underneath; rebuilt in
/// full on every frame
fn render_bar_legend(frame: &mut Frame, app: &App, area: Rect) {
    if app.bar.is_empty() {
        return;
    }
    let swatch_width = ((area.width as usize).saturating_sub(2) / MAGNITUDE_BUCKETS).clamp(1, 3);
    let swatches: Vec<Span> = (0..MAGNITUDE_BUCKETS)
        .map(|i| {
            Span::styled(
                "█".repeat(swatch_width),
                Style::default().fg(MagnitudeScale::bucket_color(i)),
            )
        })
        .collect();

    let max = app.bar.bars().iter().map(|b| b.1).fold(0.0, f64::max);
    let max_label = if max >= 10.0 {
        format!("{max:.0}")
    } else {
        format!("{max:.1}")
    };
    let ramp_width = swatch_width * MAGNITUDE_BUCKETS;
    let gap = ramp_width.saturating_sub(1 + max_label.len());
    let bounds = Line::from(vec![
        Span::styled("0", Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(gap)),
        Span::styled(max_label, Style::default().fg(Color::DarkGray)),
    ]);

    let lines = vec![Line::from(swatches), bounds];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let selection = app
        .selection
        .as_ref()
        .map(|s| s.team.clone())
        .unwrap_or_else(|| "none".to_string());

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | Selected: ", Style::default().fg(Color::DarkGray)),
        Span::styled(selection, Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hjkl:pan +/-:zoom r:reset click:select q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

fn render_tooltip(frame: &mut Frame, lines: &[String], col: u16, row: u16) {
    let area = frame.area();
    let width = (lines.iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 2).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);

    // Clamp so the box stays on screen
    let x = col.min(area.width.saturating_sub(width));
    let y = row.min(area.height.saturating_sub(height));
    let rect = Rect::new(x, y, width, height);

    let text: Vec<Line> = lines.iter().map(|l| Line::raw(l.clone())).collect();
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        rect,
    );
}

fn render_uk_menu(frame: &mut Frame, app: &App) {
    let layout = uk_menu_layout(frame.area());
    let hover = app.uk_menu.as_ref().and_then(|m| m.hover);

    frame.render_widget(Clear, layout.frame);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Choose UK country "),
        layout.frame,
    );

    let title = Rect::new(
        layout.frame.x + 2,
        layout.frame.y + 1,
        layout.frame.width.saturating_sub(7),
        1,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Which team do you want to display?",
            Style::default().fg(Color::Gray),
        )),
        title,
    );
    frame.render_widget(
        Paragraph::new(Span::styled("[x]", Style::default().fg(Color::Red))),
        layout.close,
    );

    for (i, (team, rect)) in UK_TEAMS.iter().zip(layout.buttons).enumerate() {
        let style = if hover == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("{}) {team}", i + 1), style)),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout_partitions_area() {
        let layout = screen_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.charts.width, CHARTS_WIDTH);
        assert_eq!(layout.map.width + layout.charts.width, 120);
        // Inner map excludes the one-cell border
        assert_eq!(layout.map_inner.x, layout.map.x + 1);
        assert_eq!(layout.map_inner.width, layout.map.width - 2);
    }

    #[test]
    fn test_uk_menu_layout_centered_buttons() {
        let layout = uk_menu_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.buttons.len(), 4);
        for (i, b) in layout.buttons.iter().enumerate() {
            assert_eq!(b.y, layout.frame.y + 3 + i as u16);
            assert!(b.x > layout.frame.x);
        }
        assert!(layout.close.x > layout.buttons[0].x);
    }
}
