use crate::app::{App, View};
use crate::city::{format_population, City};
use crate::map::MapLayers;
use crate::tier::Tier;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Widget, Wrap},
    Frame,
};

const LEGEND_WIDTH: u16 = 22;
const POPUP_WIDTH: u16 = 76;
const POPUP_HEIGHT: u16 = 20;

/// Map area without the status bar
fn map_frame_area(area: Rect) -> Rect {
    Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1))
}

/// Inside of the bordered map block, where braille cells go
pub fn map_inner_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(map_frame_area(area))
}

/// Legend box in the bottom-left corner of the map, sized for `rows` tiers
pub fn legend_area(inner: Rect, rows: usize) -> Rect {
    let width = LEGEND_WIDTH.min(inner.width);
    let height = (rows as u16 + 2).min(inner.height);
    Rect::new(inner.x, inner.bottom().saturating_sub(height), width, height)
}

/// Legend row index under a terminal cell
pub fn legend_row_at(legend: Rect, col: u16, row: u16) -> Option<usize> {
    let rows = Block::default().borders(Borders::ALL).inner(legend);
    if col >= rows.x && col < rows.right() && row >= rows.y && row < rows.bottom() {
        Some((row - rows.y) as usize)
    } else {
        None
    }
}

/// First terminal cell of a legend row
pub fn legend_row_cell(legend: Rect, index: usize) -> (u16, u16) {
    (legend.x + 1, legend.y + 1 + index as u16)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map or table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    match app.ui.view {
        View::Map => {
            render_map(frame, app, chunks[0]);
            render_legend(frame, app, map_inner_area(area));
            render_tooltip(frame, app, map_inner_area(area));
        }
        View::Table => render_table(frame, app, chunks[0]),
    }

    if let Some(city) = app.popup_city() {
        render_popup(frame, city, chunks[0]);
    }

    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Trigger Cities ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let markers = app.markers();
    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &app.viewport,
        &app.cities,
        &markers,
        app.marker_focus(),
    );

    frame.render_widget(MapWidget { layers }, inner);
}

/// Braille basemap with tier-colored markers and labels on top
struct MapWidget {
    layers: MapLayers,
}

impl MapWidget {
    fn render_layer(canvas: &crate::braille::BrailleCanvas, area: Rect, buf: &mut Buffer, style: impl Fn(usize, usize) -> Style) {
        for (col, row, ch) in canvas.glyphs() {
            if col >= area.width as usize || row >= area.height as usize {
                continue;
            }
            let x = area.x + col as u16;
            let y = area.y + row as u16;
            buf[(x, y)].set_char(ch).set_style(style(col, row));
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layers = &self.layers;

        MapWidget::render_layer(&layers.coastlines, area, buf, |_, _| Style::default().fg(Color::Cyan));
        MapWidget::render_layer(&layers.borders, area, buf, |_, _| Style::default().fg(Color::DarkGray));

        MapWidget::render_layer(&layers.markers, area, buf, |col, row| match layers.marker_cell(col, row) {
            Some(cell) if cell.dimmed => Style::default().fg(Color::DarkGray),
            Some(cell) => Style::default().fg(cell.tier.style().color),
            None => Style::default().fg(Color::White),
        });

        MapWidget::render_layer(&layers.rings, area, buf, |_, _| {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        });

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let max_len = (area.width - *lx) as usize;
            for (i, ch) in text.chars().take(max_len.min(24)).enumerate() {
                buf[(area.x + *lx + i as u16, area.y + *ly)]
                    .set_char(ch)
                    .set_style(label_style);
            }
        }
    }
}

fn render_legend(frame: &mut Frame, app: &App, inner: Rect) {
    let tiers = app.legend_tiers();
    let area = legend_area(inner, tiers.len());
    if area.height < 3 {
        return;
    }

    let counts = app.tier_counts();
    let highlight = app.ui.highlight_tier();

    let lines: Vec<Line> = tiers
        .iter()
        .map(|&tier| {
            let style = tier.style();
            let emphasis = if highlight == Some(tier) {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if highlight.is_some() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", style.swatch), Style::default().fg(style.color)),
                Span::styled(format!("{:<8}", tier.label()), emphasis),
                Span::styled(format!("{:>5}", counts[tier.index()]), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Legend ");

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tooltip(frame: &mut Frame, app: &App, inner: Rect) {
    if app.ui.popup.is_some() {
        return;
    }
    let (Some(city), Some((col, row))) = (app.hovered_city(), app.mouse_pos) else {
        return;
    };

    let text = format!(" {}, {} · {} ", city.name, city.country, city.tier().label());
    let width = (text.chars().count() as u16 + 2).min(inner.width);
    let height = 3.min(inner.height);

    // Above-right of the cursor, pushed back inside the map
    let x = (col + 2).min(inner.right().saturating_sub(width)).max(inner.x);
    let y = row.saturating_sub(height).max(inner.y);
    let area = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(city.tier().style().color));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Centered rect of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

/// Lines for the popup's left half: place, description, image
pub fn popup_overview(city: &City) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", city.continent.to_uppercase()),
            Style::default().fg(Color::Black).bg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled(city.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(city.country.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::default(),
    ];

    if city.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "No description available.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(city.description.clone()));
    }

    if !city.image.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Image: {}", city.image),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

/// Lines for the popup's right half: tier pill, population, ranked genres
pub fn popup_stats(city: &City) -> Vec<Line<'static>> {
    let style = city.tier().style();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} {} ", style.swatch, style.pill),
            Style::default().fg(style.color).add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )),
        Line::default(),
        section_title("Population"),
        Line::from(format_population(city.population)),
        Line::default(),
        section_title("Top Genres"),
    ];

    if city.top_genres.is_empty() {
        lines.push(Line::from(Span::styled("None listed", Style::default().fg(Color::DarkGray))));
    }
    for (rank, genre) in city.top_genres.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2} ", rank + 1), Style::default().fg(Color::DarkGray)),
            Span::raw(genre.clone()),
        ]));
    }
    lines
}

fn render_popup(frame: &mut Frame, city: &City, area: Rect) {
    let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(city.tier().style().color))
        .title(Span::styled(
            format!(" {} ", city.name),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc:close  n/N:next/prev ").right_aligned());

    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(popup_overview(city))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::RIGHT).border_style(Style::default().fg(Color::DarkGray))),
        halves[0].inner(ratatui::layout::Margin { horizontal: 1, vertical: 0 }),
    );
    frame.render_widget(
        Paragraph::new(popup_stats(city)),
        halves[1].inner(ratatui::layout::Margin { horizontal: 2, vertical: 0 }),
    );
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["City", "Country", "Continent", "Tier", "Population", "Top Genre"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = app.cities.iter().map(|city| {
        let tier = city.tier();
        Row::new(vec![
            Cell::from(city.name.clone()),
            Cell::from(city.country.clone()),
            Cell::from(city.continent.clone()),
            Cell::from(tier.label()),
            Cell::from(Line::from(format_population(city.population)).right_aligned()),
            Cell::from(city.top_genres.first().cloned().unwrap_or_default()),
        ])
        .style(Style::default().fg(tier.style().color))
    });

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
        Constraint::Length(8),
        Constraint::Length(13),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    format!(" Trigger Cities · {} ", app.cities.len()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !app.cities.is_empty() {
        state.select(Some(app.ui.table_selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            match app.ui.view {
                View::Map => " MAP ",
                View::Table => " TABLE ",
            },
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(app.lod_level(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", dim),
        Span::styled(
            if app.map_renderer.settings.show_borders { "[B]order " } else { "[b]order " },
            Style::default().fg(if app.map_renderer.settings.show_borders { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            if app.map_renderer.settings.show_labels { "[L]abels " } else { "[l]abels " },
            Style::default().fg(if app.map_renderer.settings.show_labels { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
    ];

    if let Some(tier) = app.ui.focused_tier {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(tier.label(), Style::default().fg(tier.style().color)));
    }

    if let Some(err) = &app.load_error {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(format!("data unavailable: {}", err), Style::default().fg(Color::Red)));
    }

    spans.push(Span::styled(
        " | tab:table 1-4:tier n/N:cycle +/-:zoom r:reset q:quit",
        dim,
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::marker::test_city;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn screen_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_inner_area_leaves_room_for_status_bar() {
        let inner = map_inner_area(Rect::new(0, 0, 80, 24));
        assert_eq!(inner, Rect::new(1, 1, 78, 21));
    }

    #[test]
    fn test_legend_rows() {
        let inner = Rect::new(1, 1, 78, 21);
        let legend = legend_area(inner, 4);
        assert_eq!(legend.bottom(), inner.bottom());
        assert_eq!(legend_row_at(legend, legend.x + 2, legend.y + 1), Some(0));
        assert_eq!(legend_row_at(legend, legend.x + 2, legend.y + 4), Some(3));
        // Border rows don't count
        assert_eq!(legend_row_at(legend, legend.x + 2, legend.y), None);
        assert_eq!(legend_row_at(legend, legend.x + 2, legend.bottom() - 1), None);

        let (col, row) = legend_row_cell(legend, 2);
        assert_eq!(legend_row_at(legend, col, row), Some(2));
    }

    #[test]
    fn test_popup_stats_ranks_genres_from_one() {
        let mut city = test_city(1, 1_234_567, 0.0, 0.0, "Tier 2");
        city.top_genres = vec!["Afrobeats".into(), "Highlife".into()];
        let text: Vec<String> = popup_stats(&city).iter().map(line_text).collect();
        assert!(text[0].contains("TIER 2"));
        assert!(text.contains(&"1,234,567".to_string()));
        assert!(text.iter().any(|l| l.trim_start().starts_with("1 Afrobeats")));
        assert!(text.iter().any(|l| l.trim_start().starts_with("2 Highlife")));
    }

    #[test]
    fn test_popup_overview_defaults() {
        let city = test_city(1, 10, 0.0, 0.0, "Tier 9");
        let text: Vec<String> = popup_overview(&city).iter().map(line_text).collect();
        assert!(text[0].contains("EUROPE"));
        assert!(text.iter().any(|l| l == "No description available."));
        assert!(!text.iter().any(|l| l.starts_with("Image:")));
        assert_eq!(city.tier().style().pill, "UNTIERED");
    }

    #[test]
    fn test_render_map_with_popup() {
        let cities = vec![
            test_city(1, 100, -87.6, 41.9, "Tier 1"),
            test_city(2, 1000, 3.4, 6.5, "Tier 3"),
        ];
        let mut app = App::new(cities, &Config::default(), 100, 30);
        app.open_popup(1);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("Trigger Cities"));
        assert!(text.contains("Legend"));
        assert!(text.contains("TIER 3"));
        assert!(text.contains("MAP"));
    }

    #[test]
    fn test_tooltip_follows_hover_and_yields_to_popup() {
        let cities = vec![test_city(1, 100, 0.0, 20.0, "Tier 2")];
        let mut app = App::new(cities, &Config::default(), 100, 30);
        app.ui.hovered = Some(0);
        app.mouse_pos = Some((40, 12));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("City 1, Testland · Tier 2"));

        app.open_popup(0);
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(terminal.backend().buffer());
        assert!(!text.contains("City 1, Testland"));
        assert!(text.contains("TIER 2"));
    }

    #[test]
    fn test_render_table_and_empty_notice() {
        let mut app = App::new(vec![], &Config::default(), 160, 30);
        app.load_error = Some("connection refused".into());
        app.toggle_view();

        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("TABLE"));
        assert!(text.contains("Population"));
        assert!(text.contains("data unavailable"));
    }
}
