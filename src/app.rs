use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::chart::{bar_dataset, pie_dataset, BarChart, LinearColorScale, PieChart, NON_PARTICIPANT};
use crate::data::{LoadedData, TeamRecord};
use crate::map::Viewport;
use crate::ui;

/// The four teams hiding behind the single United Kingdom map feature
pub const UK_FEATURE: &str = "United Kingdom";
pub const UK_TEAMS: [&str; 4] = ["England", "Northern Ireland", "Scotland", "Wales"];

/// Hand-tuned tooltip nudges per country name, with a default of (0, 0)
/// for everyone not listed. Cell offsets, column then row.
const TOOLTIP_OFFSETS: &[(&str, (u16, u16))] = &[
    (UK_FEATURE, (2, 0)),
    ("Norway", (3, 1)),
    ("Russia", (4, 2)),
    ("Netherlands", (0, 3)),
    ("Portugal", (0, 2)),
    ("France", (1, 1)),
];

fn tooltip_offset(name: &str) -> (u16, u16) {
    TOOLTIP_OFFSETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, off)| off)
        .unwrap_or((0, 0))
}

/// The active selection: the team whose statistics the charts show and
/// the map feature it belongs to (they differ for UK constituents).
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub team: String,
    pub feature: String,
}

/// Floating tooltip anchored near the cursor, offset already applied
pub struct Tooltip {
    pub col: u16,
    pub row: u16,
    pub lines: Vec<String>,
}

/// Modal menu for picking a UK constituent team
pub struct UkMenu {
    pub hover: Option<usize>,
}

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub data: LoadedData,
    pub selection: Option<Selection>,
    pub pie: PieChart,
    pub bar: BarChart,
    pub tooltip: Option<Tooltip>,
    pub uk_menu: Option<UkMenu>,
    pub should_quit: bool,
    /// Terminal size, kept for layout-dependent hit testing
    area: Rect,
    /// Last mouse position while a drag may be in progress
    last_mouse: Option<(u16, u16)>,
    /// Whether the current press turned into a drag
    drag_moved: bool,
    map_scale: LinearColorScale,
}

impl App {
    pub fn new(data: LoadedData, width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        let inner = ui::screen_layout(area).map_inner;
        Self {
            viewport: Viewport::europe(inner.width as usize * 2, inner.height as usize * 4),
            data,
            selection: None,
            pie: PieChart::new(),
            bar: BarChart::new(),
            tooltip: None,
            uk_menu: None,
            should_quit: false,
            area,
            last_mouse: None,
            drag_moved: false,
            map_scale: LinearColorScale::participation(),
        }
    }

    /// Update viewport size when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let inner = ui::screen_layout(self.area).map_inner;
        self.viewport.width = inner.width as usize * 2;
        self.viewport.height = inner.height as usize * 4;
    }

    /// Fill color for a map feature: first matching record's
    /// participation count through the white-blue ramp, default grey for
    /// non-participants
    pub fn fill_color(&self, feature_name: &str) -> Color {
        match self.record_for_feature(feature_name) {
            Some(record) => self.map_scale.color(record.participations as f64),
            None => NON_PARTICIPANT,
        }
    }

    /// First record whose Country matches the feature name (linear
    /// scan, first match wins)
    pub fn record_for_feature(&self, feature_name: &str) -> Option<&TeamRecord> {
        self.data.teams.iter().find(|r| r.country == feature_name)
    }

    /// Map feature to highlight for the current selection
    pub fn selected_feature(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.feature.as_str())
    }

    /// Convert a terminal cell inside the map pane to braille pixel
    /// coordinates; None outside the pane
    fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = ui::screen_layout(self.area).map_inner;
        if col < inner.x
            || row < inner.y
            || col >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        Some((
            (col - inner.x) as i32 * 2,
            (row - inner.y) as i32 * 4,
        ))
    }

    /// Country feature under a terminal cell, if any
    fn feature_at(&self, col: u16, row: u16) -> Option<&str> {
        let (px, py) = self.map_pixel(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        self.data
            .countries
            .hit_test(lon, lat)
            .map(|c| c.name.as_str())
    }

    // --- mouse ---

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.drag_moved = false;
    }

    /// Drag pans the map; sensitivity scales with zoom
    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = last_col as i32 - col as i32;
            let dy = last_row as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.drag_moved = true;
                let scale = if self.viewport.zoom < 2.0 { 2 } else { 3 };
                self.viewport.pan(dx * scale, dy * scale);
            }
        }
        self.last_mouse = Some((col, row));
    }

    pub fn mouse_up(&mut self, col: u16, row: u16, now: Instant) {
        let was_drag = self.drag_moved;
        self.last_mouse = None;
        self.drag_moved = false;
        if !was_drag {
            self.click(col, row, now);
        }
    }

    /// Route a click: menu buttons when the menu is open, otherwise map
    /// selection
    pub fn click(&mut self, col: u16, row: u16, now: Instant) {
        if self.uk_menu.is_some() {
            let menu = ui::uk_menu_layout(self.area);
            if contains(menu.close, col, row) {
                self.uk_menu = None;
            } else if let Some(idx) = menu
                .buttons
                .iter()
                .position(|b| contains(*b, col, row))
            {
                self.choose_uk_team(idx, now);
            }
            return;
        }

        if let Some(name) = self.feature_at(col, row).map(str::to_owned) {
            self.activate_feature(&name, now);
        }
    }

    /// Selection entry point for a map feature. Features without a
    /// matching record are inert; the United Kingdom always routes
    /// through the constituent menu and never yields chart data itself.
    pub fn activate_feature(&mut self, feature_name: &str, now: Instant) {
        let Some(record) = self.record_for_feature(feature_name) else {
            return;
        };
        if record.country == UK_FEATURE {
            self.uk_menu = Some(UkMenu { hover: None });
        } else {
            let team = record.team.clone();
            let feature = record.country.clone();
            self.select_team(team, feature, now);
        }
    }

    /// Pick a UK constituent from the menu and close it
    pub fn choose_uk_team(&mut self, idx: usize, now: Instant) {
        self.uk_menu = None;
        if let Some(team) = UK_TEAMS.get(idx) {
            self.select_team(team.to_string(), UK_FEATURE.to_string(), now);
        }
    }

    fn select_team(&mut self, team: String, feature: String, now: Instant) {
        self.pie.retarget(&pie_dataset(&self.data.teams, &team), now);
        self.bar.retarget(&bar_dataset(&self.data.teams, &team), now);
        self.selection = Some(Selection { team, feature });
    }

    /// Hover: tooltip for participating countries, menu button
    /// highlight while the menu is open
    pub fn hover(&mut self, col: u16, row: u16) {
        if let Some(menu) = &mut self.uk_menu {
            let layout = ui::uk_menu_layout(self.area);
            menu.hover = layout.buttons.iter().position(|b| contains(*b, col, row));
            self.tooltip = None;
            return;
        }

        self.tooltip = self
            .feature_at(col, row)
            .map(str::to_owned)
            .and_then(|name| self.record_for_feature(&name).map(|_| name))
            .map(|name| {
                let lines = if name == UK_FEATURE {
                    UK_TEAMS.iter().map(|t| t.to_string()).collect()
                } else {
                    vec![name.clone()]
                };
                let (dx, dy) = tooltip_offset(&name);
                Tooltip {
                    col: col.saturating_add(dx),
                    row: row.saturating_add(dy),
                    lines,
                }
            });
    }

    // --- keys ---

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom towards a terminal cell (scroll wheel)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Reset the view to the default Europe framing
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::europe(self.viewport.width, self.viewport.height);
    }

    pub fn close_menu(&mut self) {
        self.uk_menu = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Zoom level for the status bar
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fallback_europe, LoadedData};

    fn record(country: &str, team: &str, participations: u32) -> TeamRecord {
        TeamRecord {
            country: country.to_string(),
            team: team.to_string(),
            participations,
            played: 18,
            win: 10,
            draw: 5,
            loss: 3,
            goal_for: 40,
            goal_against: 20,
            points: 35,
            points_per_match: 1.9,
        }
    }

    fn app() -> App {
        let teams = vec![
            record("France", "France", 9),
            record("United Kingdom", "England", 9),
            record("United Kingdom", "Northern Ireland", 1),
            record("United Kingdom", "Scotland", 2),
            record("United Kingdom", "Wales", 1),
        ];
        let data = LoadedData {
            teams,
            countries: fallback_europe(),
        };
        App::new(data, 120, 40)
    }

    #[test]
    fn test_selecting_country_updates_charts() {
        let mut app = app();
        let now = Instant::now();
        app.activate_feature("France", now);

        let selection = app.selection.as_ref().unwrap();
        assert_eq!(selection.team, "France");
        assert_eq!(selection.feature, "France");
        assert!(!app.pie.is_empty());
        assert!(!app.bar.is_empty());
    }

    #[test]
    fn test_uk_routes_through_menu_not_charts() {
        let mut app = app();
        let now = Instant::now();
        app.activate_feature(UK_FEATURE, now);

        // The menu is open and no chart data was produced
        assert!(app.uk_menu.is_some());
        assert!(app.selection.is_none());
        assert!(app.pie.is_empty());
        assert!(app.bar.is_empty());
    }

    #[test]
    fn test_uk_menu_choice_selects_constituent() {
        let mut app = app();
        let now = Instant::now();
        app.activate_feature(UK_FEATURE, now);
        app.choose_uk_team(2, now);

        assert!(app.uk_menu.is_none());
        let selection = app.selection.as_ref().unwrap();
        assert_eq!(selection.team, "Scotland");
        assert_eq!(selection.feature, UK_FEATURE);
        assert!(!app.pie.is_empty());
    }

    #[test]
    fn test_unmatched_feature_is_inert() {
        let mut app = app();
        let now = Instant::now();
        // Spain is on the map but has no record in this fixture
        app.activate_feature("Spain", now);
        assert!(app.selection.is_none());
        assert!(app.pie.is_empty());
    }

    #[test]
    fn test_fill_colors_join_by_country() {
        let app = app();
        assert_ne!(app.fill_color("France"), NON_PARTICIPANT);
        assert_ne!(app.fill_color(UK_FEATURE), NON_PARTICIPANT);
        assert_eq!(app.fill_color("Spain"), NON_PARTICIPANT);
    }

    #[test]
    fn test_tooltip_offset_table_has_default() {
        assert_eq!(tooltip_offset("France"), (1, 1));
        assert_eq!(tooltip_offset("Germany"), (0, 0));
    }

    #[test]
    fn test_drag_suppresses_click_selection() {
        let mut app = app();
        let now = Instant::now();
        app.mouse_down(30, 10);
        app.mouse_drag(35, 12);
        app.mouse_up(35, 12, now);
        assert!(app.selection.is_none());
    }
}
