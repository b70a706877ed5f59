use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 60.0;
const ZOOM_STEP: f64 = 1.5;

/// Visible map area in braille pixels, Web Mercator
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Mercator y in [0, 1] for a latitude in degrees
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-85.0511, 85.0511) * PI / 180.0;
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Latitude in degrees for a normalized Mercator y
#[inline]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-85.0, 85.0),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Resize the canvas, keeping center and zoom
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale().max(1.0);
        self.center_lon += dx as f64 / scale * 360.0;

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        let y = mercator_y(self.center_lat) + dy as f64 / scale;
        self.center_lat = inverse_mercator_y(y).clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor, keeping the point under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = inverse_mercator_y(y);

        (lon, lat)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon + 180.0) / 360.0;
        let y = mercator_y(lat);

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);
        let scale = self.scale();

        let px = ((x - center_x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0) as i32;

        (px, py)
    }

    /// Check if anything within `margin` pixels of a projected point lands on the canvas
    pub fn is_visible(&self, px: i32, py: i32, margin: i32) -> bool {
        px.saturating_add(margin) >= 0
            && px.saturating_sub(margin) < self.width as i32
            && py.saturating_add(margin) >= 0
            && py.saturating_sub(margin) < self.height as i32
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, -10_000);
        assert_eq!(vp.center_lat, 85.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(10.0, 20.0, 3.0, 400, 200);
        let (px, py) = vp.project(12.0, 22.0);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 12.0).abs() < 0.5);
        assert!((lat - 22.0).abs() < 0.5);
    }

    #[test]
    fn test_visibility_margin() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert!(vp.is_visible(0, 99, 0));
        assert!(!vp.is_visible(-3, 50, 0));
        assert!(vp.is_visible(-3, 50, 3));
        assert!(!vp.is_visible(104, 50, 3));
        assert!(vp.is_visible(50, 102, 5));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_point() {
        let mut vp = Viewport::new(0.0, 0.0, 2.0, 400, 200);
        let (lon, lat) = vp.unproject(300, 60);
        vp.zoom_in_at(300, 60);
        let (px, py) = vp.project(lon, lat);
        assert!((px - 300).abs() <= 3, "px drifted to {}", px);
        assert!((py - 60).abs() <= 3, "py drifted to {}", py);
    }
}
