use crate::braille::BrailleCanvas;
use crate::city::City;
use crate::map::geometry::{draw_disk, draw_line, draw_ring};
use crate::map::projection::Viewport;
use crate::marker::PlacedMarker;
use crate::tier::Tier;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// City names are only drawn past this zoom, the world view gets too crowded
const LABEL_MIN_ZOOM: f64 = 3.0;

/// Level of detail for basemap data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_labels: true,
        }
    }
}

/// Which markers stand out in the current frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarkerFocus {
    /// Markers of other tiers are dimmed
    pub tier: Option<Tier>,
    /// City that gets an outline ring (hovered or open in the popup)
    pub city: Option<usize>,
}

/// Style of the marker that owns a character cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerCell {
    pub tier: Tier,
    pub dimmed: bool,
}

/// Rendered layers, back to front
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub rings: BrailleCanvas,
    /// Char-cell positioned city names
    pub labels: Vec<(u16, u16, String)>,
    /// Topmost marker per character cell
    owners: Vec<Option<MarkerCell>>,
    width: usize,
}

impl MapLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            markers: BrailleCanvas::new(width, height),
            rings: BrailleCanvas::new(width, height),
            labels: Vec::new(),
            owners: vec![None; width * height],
            width,
        }
    }

    /// Marker style for a character cell
    pub fn marker_cell(&self, col: usize, row: usize) -> Option<MarkerCell> {
        if col >= self.width {
            return None;
        }
        self.owners.get(row * self.width + col).copied().flatten()
    }

    /// Claim every cell holding a dot of the marker disk. Later markers overwrite earlier ones.
    fn claim(&mut self, marker: &PlacedMarker, cell: MarkerCell) {
        let height = self.owners.len() / self.width.max(1);
        if self.width == 0 || height == 0 {
            return;
        }
        let (px, py, r) = (marker.px, marker.py, marker.radius);
        let min_col = (px - r).max(0) / 2;
        let max_col = ((px + r) / 2).min(self.width as i32 - 1);
        let min_row = (py - r).max(0) / 4;
        let max_row = ((py + r) / 4).min(height as i32 - 1);

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                // Dot of this cell closest to the disk center
                let dx = px.clamp(col * 2, col * 2 + 1) - px;
                let dy = py.clamp(row * 4, row * 4 + 3) - py;
                if dx * dx + dy * dy <= r * r {
                    self.owners[row as usize * self.width + col as usize] = Some(cell);
                }
            }
        }
    }
}

/// Basemap with multi-resolution coastline and border data
pub struct MapRenderer {
    pub coastlines_low: Vec<LineString>,
    pub coastlines_medium: Vec<LineString>,
    pub coastlines_high: Vec<LineString>,
    pub borders_medium: Vec<LineString>,
    pub borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            coastlines_high: Vec::new(),
            borders_medium: Vec::new(),
            borders_high: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Get coastlines for the given LOD, falling back to coarser data
    fn get_coastlines(&self, lod: Lod) -> &[LineString] {
        let ladder = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_low],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_medium],
        };
        ladder
            .into_iter()
            .find(|lines| !lines.is_empty())
            .map(|lines| lines.as_slice())
            .unwrap_or(&[])
    }

    /// Get borders for the given LOD
    fn get_borders(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.borders_high.is_empty() => &self.borders_high,
            _ => &self.borders_medium,
        }
    }

    /// Render basemap and city markers for a canvas of `width` x `height` character cells
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        cities: &[City],
        markers: &[PlacedMarker],
        focus: MarkerFocus,
    ) -> MapLayers {
        let lod = Lod::from_zoom(viewport.zoom);
        let mut layers = MapLayers::new(width, height);

        if self.settings.show_coastlines {
            for line in self.get_coastlines(lod) {
                draw_linestring(&mut layers.coastlines, line, viewport);
            }
        }

        if self.settings.show_borders {
            for line in self.get_borders(lod) {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        for marker in markers {
            draw_disk(&mut layers.markers, (marker.px, marker.py), marker.radius);
            let dimmed = focus.tier.is_some_and(|t| t != marker.tier);
            layers.claim(marker, MarkerCell { tier: marker.tier, dimmed });

            if focus.city == Some(marker.city) {
                draw_ring(&mut layers.rings, (marker.px, marker.py), marker.radius);
            }

            if self.settings.show_labels && viewport.zoom >= LABEL_MIN_ZOOM && !dimmed {
                if let Some(city) = cities.get(marker.city) {
                    // Right of the disk, on the marker's text row
                    let char_x = ((marker.px + marker.radius) / 2 + 2) as u16;
                    let char_y = (marker.py / 4) as u16;
                    layers.labels.push((char_x, char_y, city.name.clone()));
                }
            }
        }

        layers
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    /// Add border data at a specific LOD
    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    /// Check if any coastline data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            // Long jumps are antimeridian wraps, not real segments
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, (prev_x, prev_y), (px, py));
            }
        }

        prev = Some((px, py));
    }
}
