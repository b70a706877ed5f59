use crate::city::City;
use crate::config::Config;
use crate::map::{Lod, MapRenderer, MarkerFocus, Viewport};
use crate::marker::{marker_at, place_markers, MarkerScale, PlacedMarker};
use crate::tier::Tier;
use crate::ui;
use log::debug;
use ratatui::layout::Rect;

/// Which surface fills the screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Map,
    Table,
}

/// Per-view selection state. `popup` holds the city index itself,
/// so an open popup always has a city.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub view: View,
    /// City under the mouse (tooltip)
    pub hovered: Option<usize>,
    /// Legend row under the mouse
    pub hovered_tier: Option<Tier>,
    /// Tier pinned from the legend or number keys
    pub focused_tier: Option<Tier>,
    /// City shown in the detail popup
    pub popup: Option<usize>,
    /// Highlighted row in the table view
    pub table_selected: usize,
}

impl UiState {
    /// Tier to emphasize: hover wins over the pinned focus
    pub fn highlight_tier(&self) -> Option<Tier> {
        self.hovered_tier.or(self.focused_tier)
    }
}

/// Application state
pub struct App {
    pub cities: Vec<City>,
    pub scale: MarkerScale,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub ui: UiState,
    pub should_quit: bool,
    /// Set when the dataset failed to load
    pub load_error: Option<String>,
    /// Current mouse position for tooltip placement
    pub mouse_pos: Option<(u16, u16)>,
    /// Left-button press position, for telling clicks from drags
    last_mouse: Option<(u16, u16)>,
    dragged: bool,
    /// Terminal area
    area: Rect,
    initial_center: (f64, f64),
    initial_zoom: f64,
}

impl App {
    pub fn new(cities: Vec<City>, config: &Config, width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        let inner = ui::map_inner_area(area);
        let (lon, lat) = config.initial_center;

        Self {
            cities,
            scale: config.scale,
            viewport: Viewport::new(
                lon,
                lat,
                config.initial_zoom,
                inner.width as usize * 2,
                inner.height as usize * 4,
            ),
            map_renderer: MapRenderer::new(),
            ui: UiState::default(),
            should_quit: false,
            load_error: None,
            mouse_pos: None,
            last_mouse: None,
            dragged: false,
            area,
            initial_center: config.initial_center,
            initial_zoom: config.initial_zoom,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let inner = ui::map_inner_area(self.area);
        self.viewport
            .set_size(inner.width as usize * 2, inner.height as usize * 4);
    }

    /// Back to the initial view, dropping every selection
    pub fn reset(&mut self) {
        let (lon, lat) = self.initial_center;
        self.viewport = Viewport::new(
            lon,
            lat,
            self.initial_zoom,
            self.viewport.width,
            self.viewport.height,
        );
        self.ui = UiState::default();
        self.last_mouse = None;
        self.dragged = false;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Map markers for the current viewport, in draw order
    pub fn markers(&self) -> Vec<PlacedMarker> {
        place_markers(&self.cities, &self.scale, &self.viewport)
    }

    pub fn marker_focus(&self) -> MarkerFocus {
        MarkerFocus {
            tier: self.ui.highlight_tier(),
            city: self.ui.popup.or(self.ui.hovered),
        }
    }

    /// Tiers shown in the legend: the four known ones, plus Unknown if the data has any
    pub fn legend_tiers(&self) -> Vec<Tier> {
        let mut tiers = Tier::KNOWN.to_vec();
        if self.cities.iter().any(|c| c.tier() == Tier::Unknown) {
            tiers.push(Tier::Unknown);
        }
        tiers
    }

    /// Number of cities per tier slot
    pub fn tier_counts(&self) -> [usize; crate::tier::TIER_SLOTS] {
        let mut counts = [0; crate::tier::TIER_SLOTS];
        for city in &self.cities {
            counts[city.tier().index()] += 1;
        }
        counts
    }

    pub fn popup_city(&self) -> Option<&City> {
        self.ui.popup.and_then(|idx| self.cities.get(idx))
    }

    pub fn hovered_city(&self) -> Option<&City> {
        self.ui.hovered.and_then(|idx| self.cities.get(idx))
    }

    // ═══ Popup ═══

    pub fn open_popup(&mut self, idx: usize) {
        if idx < self.cities.len() {
            debug!("popup open: {}", self.cities[idx].name);
            self.ui.popup = Some(idx);
        }
    }

    pub fn close_popup(&mut self) {
        self.ui.popup = None;
    }

    /// Step the popup through cities in dataset order and center the map on each
    pub fn cycle_popup(&mut self, forward: bool) {
        let len = self.cities.len();
        if len == 0 {
            return;
        }
        let next = match (self.ui.popup, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.open_popup(next);
        self.center_on(next);
    }

    /// Open the popup for whatever is under focus in the active view
    pub fn activate(&mut self) {
        match self.ui.view {
            View::Map => {
                if let Some(idx) = self.ui.hovered {
                    self.open_popup(idx);
                }
            }
            View::Table => self.open_popup(self.ui.table_selected),
        }
    }

    /// Esc closes the popup first, quits otherwise
    pub fn escape(&mut self) {
        if self.ui.popup.is_some() {
            self.close_popup();
        } else {
            self.quit();
        }
    }

    fn center_on(&mut self, idx: usize) {
        if let Some(city) = self.cities.get(idx) {
            self.viewport.center_lon = city.lon;
            self.viewport.center_lat = city.lat.clamp(-85.0, 85.0);
        }
    }

    // ═══ View and legend ═══

    pub fn toggle_view(&mut self) {
        self.ui.view = match self.ui.view {
            View::Map => View::Table,
            View::Table => View::Map,
        };
        self.ui.hovered = None;
        self.ui.hovered_tier = None;
    }

    /// Pin a tier highlight, or unpin it if it's already pinned
    pub fn toggle_tier_focus(&mut self, tier: Tier) {
        self.ui.focused_tier = if self.ui.focused_tier == Some(tier) {
            None
        } else {
            Some(tier)
        };
    }

    pub fn clear_tier_focus(&mut self) {
        self.ui.focused_tier = None;
    }

    // ═══ Table ═══

    pub fn select_row(&mut self, delta: i32) {
        if self.cities.is_empty() {
            return;
        }
        let last = self.cities.len() as i32 - 1;
        self.ui.table_selected = (self.ui.table_selected as i32 + delta).clamp(0, last) as usize;
    }

    // ═══ Navigation ═══

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Terminal cell to braille pixel at the cell's center, if it's on the map
    fn cell_to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = ui::map_inner_area(self.area);
        if col < inner.x || row < inner.y || col >= inner.right() || row >= inner.bottom() {
            return None;
        }
        let px = (col - inner.x) as i32 * 2 + 1;
        let py = (row - inner.y) as i32 * 4 + 2;
        Some((px, py))
    }

    /// Legend row under a terminal cell
    fn legend_tier_at(&self, col: u16, row: u16) -> Option<Tier> {
        let tiers = self.legend_tiers();
        let legend = ui::legend_area(ui::map_inner_area(self.area), tiers.len());
        ui::legend_row_at(legend, col, row).and_then(|i| tiers.get(i).copied())
    }

    // ═══ Mouse ═══

    /// Mouse moved: refresh hover state
    pub fn hover(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        if self.ui.view != View::Map {
            return;
        }

        self.ui.hovered_tier = self.legend_tier_at(col, row);
        if self.ui.hovered_tier.is_some() {
            self.ui.hovered = None;
            return;
        }

        self.ui.hovered = self.cell_to_pixel(col, row).and_then(|(px, py)| {
            let markers = self.markers();
            marker_at(&markers, px, py).map(|m| m.city)
        });
    }

    pub fn press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Drag pans the map by the cursor movement
    pub fn drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = last_col as i32 - col as i32;
            let dy = last_row as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
                // One cell is 2x4 braille pixels
                self.pan(dx * 2, dy * 4);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Button released: a press without movement counts as a click
    pub fn release(&mut self, col: u16, row: u16) {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if was_click {
            self.click(col, row);
        }
    }

    /// Click on the map: legend rows pin a tier, markers open the popup,
    /// anything else closes it
    pub fn click(&mut self, col: u16, row: u16) {
        if self.ui.view != View::Map {
            return;
        }
        if let Some(tier) = self.legend_tier_at(col, row) {
            self.toggle_tier_focus(tier);
            return;
        }

        let hit = self.cell_to_pixel(col, row).and_then(|(px, py)| {
            let markers = self.markers();
            marker_at(&markers, px, py).map(|m| m.city)
        });
        match hit {
            Some(idx) => self.open_popup(idx),
            None => self.close_popup(),
        }
    }

    // ═══ Status ═══

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn lod_level(&self) -> &'static str {
        Lod::from_zoom(self.viewport.zoom).label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::test_city;

    fn app_with(cities: Vec<City>) -> App {
        App::new(cities, &Config::default(), 120, 40)
    }

    fn sample() -> Vec<City> {
        vec![
            test_city(1, 2_700_000, -87.6, 41.9, "Tier 1"),
            test_city(2, 15_000_000, 3.4, 6.5, "Tier 2"),
            test_city(3, 600_000, 139.7, 35.7, "Platinum"),
        ]
    }

    /// Terminal cell holding a city's marker center
    fn cell_of(app: &App, idx: usize) -> (u16, u16) {
        let inner = ui::map_inner_area(app.area);
        let (px, py) = app.viewport.project(app.cities[idx].lon, app.cities[idx].lat);
        (inner.x + (px / 2) as u16, inner.y + (py / 4) as u16)
    }

    #[test]
    fn test_viewport_matches_map_area() {
        let app = app_with(vec![]);
        let inner = ui::map_inner_area(Rect::new(0, 0, 120, 40));
        assert_eq!(app.viewport.width, inner.width as usize * 2);
        assert_eq!(app.viewport.height, inner.height as usize * 4);
    }

    #[test]
    fn test_empty_dataset() {
        let mut app = app_with(vec![]);
        assert!(app.markers().is_empty());
        app.cycle_popup(true);
        app.activate();
        app.select_row(3);
        assert_eq!(app.ui.popup, None);
        assert_eq!(app.legend_tiers().len(), 4);
    }

    #[test]
    fn test_popup_requires_valid_city() {
        let mut app = app_with(sample());
        app.open_popup(99);
        assert_eq!(app.ui.popup, None);
        app.open_popup(1);
        assert_eq!(app.popup_city().map(|c| c.id), Some(2));
    }

    #[test]
    fn test_cycle_popup_wraps() {
        let mut app = app_with(sample());
        app.cycle_popup(false);
        assert_eq!(app.ui.popup, Some(2));
        app.cycle_popup(true);
        assert_eq!(app.ui.popup, Some(0));
        assert_eq!(app.viewport.center_lon, -87.6);
    }

    #[test]
    fn test_escape_closes_then_quits() {
        let mut app = app_with(sample());
        app.open_popup(0);
        app.escape();
        assert_eq!(app.ui.popup, None);
        assert!(!app.should_quit);
        app.escape();
        assert!(app.should_quit);
    }

    #[test]
    fn test_hover_and_click_marker() {
        let mut app = app_with(sample());
        let (col, row) = cell_of(&app, 1);

        app.hover(col, row);
        assert_eq!(app.ui.hovered, Some(1));
        assert_eq!(app.marker_focus().city, Some(1));

        app.press(col, row);
        app.release(col, row);
        assert_eq!(app.ui.popup, Some(1));
    }

    #[test]
    fn test_click_empty_map_closes_popup() {
        let mut app = app_with(sample());
        app.open_popup(0);
        let inner = ui::map_inner_area(app.area);
        // Top-right corner, far from every city
        app.click(inner.right() - 1, inner.y);
        assert_eq!(app.ui.popup, None);
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut app = app_with(sample());
        let (col, row) = cell_of(&app, 1);
        let before = app.viewport.center_lon;
        app.press(col + 5, row);
        app.drag(col, row);
        app.release(col, row);
        assert_eq!(app.ui.popup, None);
        assert!(app.viewport.center_lon > before);
    }

    #[test]
    fn test_legend_click_pins_tier() {
        let mut app = app_with(sample());
        let tiers = app.legend_tiers();
        assert_eq!(tiers.last(), Some(&Tier::Unknown));

        let legend = ui::legend_area(ui::map_inner_area(app.area), tiers.len());
        let (col, row) = ui::legend_row_cell(legend, 1);
        app.hover(col, row);
        assert_eq!(app.ui.hovered_tier, Some(Tier::Two));
        assert_eq!(app.ui.hovered, None);

        app.click(col, row);
        assert_eq!(app.ui.focused_tier, Some(Tier::Two));
        app.click(col, row);
        assert_eq!(app.ui.focused_tier, None);
    }

    #[test]
    fn test_hover_tier_beats_pinned_tier() {
        let mut app = app_with(sample());
        app.toggle_tier_focus(Tier::One);
        app.ui.hovered_tier = Some(Tier::Three);
        assert_eq!(app.marker_focus().tier, Some(Tier::Three));
        app.ui.hovered_tier = None;
        assert_eq!(app.marker_focus().tier, Some(Tier::One));
    }

    #[test]
    fn test_table_selection_clamps_and_opens() {
        let mut app = app_with(sample());
        app.toggle_view();
        app.select_row(-4);
        assert_eq!(app.ui.table_selected, 0);
        app.select_row(10);
        assert_eq!(app.ui.table_selected, 2);
        app.activate();
        assert_eq!(app.ui.popup, Some(2));
    }

    #[test]
    fn test_table_view_ignores_map_clicks() {
        let mut app = app_with(sample());
        app.toggle_view();
        let (col, row) = cell_of(&app, 1);
        app.hover(col, row);
        app.click(col, row);
        assert_eq!(app.ui.hovered, None);
        assert_eq!(app.ui.popup, None);
    }

    #[test]
    fn test_reset_restores_view() {
        let mut app = app_with(sample());
        app.zoom_in();
        app.pan(30, 10);
        app.open_popup(0);
        app.toggle_view();
        app.reset();
        assert_eq!(app.viewport.zoom, 1.0);
        assert_eq!(app.viewport.center_lon, 0.0);
        assert_eq!(app.ui, UiState::default());
    }

    #[test]
    fn test_tier_counts() {
        let app = app_with(sample());
        let counts = app.tier_counts();
        assert_eq!(counts[Tier::One.index()], 1);
        assert_eq!(counts[Tier::Unknown.index()], 1);
        assert_eq!(counts[Tier::Four.index()], 0);
    }
}
