use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::{error, info};
use ratatui::DefaultTerminal;
use std::time::Duration;
use trigger_cities::app::{App, View};
use trigger_cities::city::{self, City, Source};
use trigger_cities::config::{Args, Config};
use trigger_cities::logging::setup_logging;
use trigger_cities::tier::Tier;
use trigger_cities::{basemap, ui};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args)?;
    setup_logging(&config.log_file, config.log_level)?;

    // Fetch before raw mode so a slow request doesn't leave a blank screen behind
    let (cities, load_error) = match city::load(&Source::parse(&config.data)) {
        Ok(cities) => (cities, None),
        Err(e) => {
            error!("could not load cities: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &config, cities, load_error);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events: hover, click, drag to pan, scroll to zoom
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.hover(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release(mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let table = app.ui.view == View::Table;

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.escape(),

        KeyCode::Tab | KeyCode::Char('t') => app.toggle_view(),
        KeyCode::Enter => app.activate(),
        KeyCode::Char('n') => app.cycle_popup(true),
        KeyCode::Char('N') => app.cycle_popup(false),

        // Row selection in the table, panning on the map
        KeyCode::Up | KeyCode::Char('k') if table => app.select_row(-1),
        KeyCode::Down | KeyCode::Char('j') if table => app.select_row(1),
        KeyCode::PageUp if table => app.select_row(-10),
        KeyCode::PageDown if table => app.select_row(10),
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('0') => app.clear_tier_focus(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tier) = Tier::from_digit(c) {
                app.toggle_tier_focus(tier);
            }
        }

        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('L') => app.map_renderer.toggle_labels(),
        KeyCode::Char('r') => app.reset(),

        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    config: &Config,
    cities: Vec<City>,
    load_error: Option<String>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(cities, config, size.width, size.height);
    app.load_error = load_error;

    basemap::load_or_fallback(&mut app.map_renderer, &config.basemap_dir);
    info!("showing {} cities", app.cities.len());

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
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
