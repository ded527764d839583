use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use euro_map::app::App;
use euro_map::{data, ui};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding euro_cup_teams.json and countries.json
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load both resources before the terminal enters raster mode so
    // warnings stay readable
    let loaded = data::load(&cli.data_dir);

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, loaded);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events: hover tooltips, scroll zoom, click-or-drag
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.hover(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => {
            app.mouse_up(mouse.column, mouse.row, Instant::now());
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    // The menu grabs keys while open
    if app.uk_menu.is_some() {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_menu(),
            KeyCode::Char(c @ '1'..='4') => {
                app.choose_uk_team(c as usize - '1' as usize, Instant::now());
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Reset view
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, loaded: data::LoadedData) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(loaded, size.width, size.height);

    // Main loop
    loop {
        let now = Instant::now();
        terminal.draw(|frame| ui::render(frame, &app, now))?;

        // Handle events with ~60fps target so tweens stay smooth
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        handle_key(&mut app, key.code);
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
