use crate::city::City;
use crate::map::Viewport;
use crate::tier::Tier;

/// Population bounds used when the dataset is empty
pub const DEFAULT_MIN_POPULATION: u64 = 0;
pub const DEFAULT_MAX_POPULATION: u64 = 100_000;

/// Largest marker diameter a config may ask for, in display pixels
pub const MAX_MARKER_SIZE: u32 = 512;
/// Smallest display-pixel-per-dot ratio a config may ask for
pub const MIN_PIXELS_PER_DOT: f64 = 1.0;
/// Dot radius ceiling, whatever the scale says
pub const MAX_DOT_RADIUS: i32 = (MAX_MARKER_SIZE / 2) as i32;

/// Smallest and largest population in a dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopulationRange {
    pub min: u64,
    pub max: u64,
}

impl Default for PopulationRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_POPULATION,
            max: DEFAULT_MAX_POPULATION,
        }
    }
}

impl PopulationRange {
    /// Single pass over the cities. Never reorders them.
    pub fn scan(cities: &[City]) -> Self {
        let mut iter = cities.iter().map(|c| c.population);
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min >= self.max
    }
}

/// Linear population -> marker diameter scale, in display pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerScale {
    pub min_size: u32,
    pub max_size: u32,
    /// Display pixels per braille dot, for converting sizes onto the canvas
    pub pixels_per_dot: f64,
}

impl Default for MarkerScale {
    fn default() -> Self {
        Self {
            min_size: 22,
            max_size: 92,
            pixels_per_dot: 8.0,
        }
    }
}

impl MarkerScale {
    /// Diameter used when every city has the same population
    pub fn midpoint(&self) -> u32 {
        let (lo, hi) = (self.min_size.min(self.max_size), self.min_size.max(self.max_size));
        lo + (hi - lo) / 2
    }

    /// Marker diameter for a population, floored to whole pixels
    pub fn size(&self, population: u64, range: PopulationRange) -> u32 {
        if range.is_degenerate() {
            return self.midpoint();
        }
        let clamped = population.clamp(range.min, range.max);
        let ratio = (clamped - range.min) as f64 / (range.max - range.min) as f64;
        let span = self.max_size.saturating_sub(self.min_size) as f64;
        (ratio * span + self.min_size as f64).floor() as u32
    }

    /// Braille dot radius for a marker diameter (at least one dot)
    pub fn dot_radius(&self, size: u32) -> i32 {
        let per_dot = self.pixels_per_dot.max(MIN_PIXELS_PER_DOT);
        ((size as f64 / per_dot / 2.0).floor() as i32).clamp(1, MAX_DOT_RADIUS)
    }
}

/// A city marker positioned on the braille canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedMarker {
    /// Index into the city list
    pub city: usize,
    pub px: i32,
    pub py: i32,
    pub radius: i32,
    pub tier: Tier,
}

impl PlacedMarker {
    fn contains(&self, px: i32, py: i32) -> bool {
        // One extra dot so single-dot markers are still clickable
        let r = i64::from(self.radius) + 1;
        let dx = i64::from(px) - i64::from(self.px);
        let dy = i64::from(py) - i64::from(self.py);
        dx * dx + dy * dy <= r * r
    }
}

/// Project every visible city to a marker. Output follows input order,
/// which is also draw order (last one ends up on top).
pub fn place_markers(cities: &[City], scale: &MarkerScale, viewport: &Viewport) -> Vec<PlacedMarker> {
    let range = PopulationRange::scan(cities);

    cities
        .iter()
        .enumerate()
        .filter_map(|(idx, city)| {
            let (px, py) = viewport.project(city.lon, city.lat);
            let radius = scale.dot_radius(scale.size(city.population, range));
            // Keep markers whose disk still reaches the canvas edge
            if !viewport.is_visible(px, py, radius) {
                return None;
            }
            Some(PlacedMarker {
                city: idx,
                px,
                py,
                radius,
                tier: city.tier(),
            })
        })
        .collect()
}

/// Topmost marker under a braille pixel position
pub fn marker_at(markers: &[PlacedMarker], px: i32, py: i32) -> Option<&PlacedMarker> {
    markers.iter().rev().find(|m| m.contains(px, py))
}

#[cfg(test)]
pub(crate) fn test_city(id: u64, population: u64, lon: f64, lat: f64, tier: &str) -> City {
    City {
        id,
        name: format!("City {}", id),
        population,
        lat,
        lon,
        country: "Testland".into(),
        continent: "Europe".into(),
        tier_label: tier.into(),
        top_genres: vec!["Pop".into()],
        description: String::new(),
        image: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_pops(pops: &[u64]) -> Vec<City> {
        pops.iter()
            .enumerate()
            .map(|(i, &p)| test_city(i as u64, p, 0.0, 0.0, "Tier 1"))
            .collect()
    }

    #[test]
    fn test_scan_empty_uses_defaults() {
        let range = PopulationRange::scan(&[]);
        assert_eq!(range, PopulationRange { min: 0, max: 100_000 });
    }

    #[test]
    fn test_scan_does_not_reorder() {
        let cities = with_pops(&[500, 100, 900, 300]);
        let before: Vec<u64> = cities.iter().map(|c| c.id).collect();
        let range = PopulationRange::scan(&cities);
        let again = PopulationRange::scan(&cities);
        let after: Vec<u64> = cities.iter().map(|c| c.id).collect();
        assert_eq!(range, PopulationRange { min: 100, max: 900 });
        assert_eq!(range, again);
        assert_eq!(before, after);
    }

    #[test]
    fn test_scenario_sizes() {
        let cities = with_pops(&[100, 100, 1000]);
        let range = PopulationRange::scan(&cities);
        assert_eq!(range, PopulationRange { min: 100, max: 1000 });

        let scale = MarkerScale::default();
        assert_eq!(scale.size(100, range), 22);
        assert_eq!(scale.size(1000, range), 92);
        assert_eq!(scale.size(550, range), 57);
    }

    #[test]
    fn test_size_endpoints_and_monotonic() {
        let cities = with_pops(&[3_000, 45_000, 1_200_000, 8_000_000, 21_000_000]);
        let range = PopulationRange::scan(&cities);
        let scale = MarkerScale::default();

        assert_eq!(scale.size(range.min, range), scale.min_size);
        assert_eq!(scale.size(range.max, range), scale.max_size);

        let mut last = 0;
        for pop in (range.min..=range.max).step_by(250_000) {
            let size = scale.size(pop, range);
            assert!(size >= last, "size dropped at population {}", pop);
            last = size;
        }
    }

    #[test]
    fn test_degenerate_range_uses_midpoint() {
        let cities = with_pops(&[42, 42, 42]);
        let range = PopulationRange::scan(&cities);
        let scale = MarkerScale::default();
        assert!(range.is_degenerate());
        for city in &cities {
            assert_eq!(scale.size(city.population, range), 57);
        }

        let single = with_pops(&[7]);
        assert_eq!(scale.size(7, PopulationRange::scan(&single)), 57);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let range = PopulationRange { min: 100, max: 200 };
        let scale = MarkerScale::default();
        assert_eq!(scale.size(0, range), 22);
        assert_eq!(scale.size(10_000, range), 92);
    }

    #[test]
    fn test_dot_radius() {
        let scale = MarkerScale::default();
        assert_eq!(scale.dot_radius(22), 1);
        assert_eq!(scale.dot_radius(92), 5);
        assert_eq!(scale.dot_radius(0), 1);
    }

    #[test]
    fn test_midpoint_of_huge_sizes_does_not_overflow() {
        let scale = MarkerScale {
            min_size: 3_000_000_000,
            max_size: 4_000_000_000,
            pixels_per_dot: 8.0,
        };
        assert_eq!(scale.midpoint(), 3_500_000_000);
        assert_eq!(scale.size(5, PopulationRange { min: 5, max: 5 }), 3_500_000_000);
    }

    #[test]
    fn test_dot_radius_is_bounded() {
        let scale = MarkerScale {
            min_size: 22,
            max_size: u32::MAX,
            pixels_per_dot: 1e-12,
        };
        assert_eq!(scale.dot_radius(u32::MAX), MAX_DOT_RADIUS);

        let marker = PlacedMarker {
            city: 0,
            px: 0,
            py: 0,
            radius: i32::MAX,
            tier: Tier::One,
        };
        assert!(marker_at(&[marker], 10, 10).is_some());
    }

    #[test]
    fn test_edge_marker_kept_while_disk_is_on_canvas() {
        let vp = Viewport::new(0.0, 0.0, 4.0, 200, 100);
        let (lon, lat) = vp.unproject(-2, 50);
        let cities = vec![
            test_city(1, 10, lon, lat, "Tier 1"),
            test_city(2, 10, 170.0, 0.0, "Tier 2"),
        ];
        let markers = place_markers(&cities, &MarkerScale::default(), &vp);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].city, 0);
        assert!(markers[0].px < 0);
        assert!(markers[0].px + markers[0].radius >= 0);
    }

    #[test]
    fn test_empty_places_nothing() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 200, 100);
        assert!(place_markers(&[], &MarkerScale::default(), &vp).is_empty());
    }

    #[test]
    fn test_place_keeps_order_and_culls() {
        let vp = Viewport::new(0.0, 0.0, 4.0, 200, 100);
        let cities = vec![
            test_city(1, 10, 0.0, 0.0, "Tier 1"),
            test_city(2, 20, 170.0, 0.0, "Tier 2"), // off screen at this zoom
            test_city(3, 30, 1.0, 1.0, "Tier 3"),
        ];
        let markers = place_markers(&cities, &MarkerScale::default(), &vp);
        let idx: Vec<usize> = markers.iter().map(|m| m.city).collect();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(markers[1].tier, Tier::Three);
    }

    #[test]
    fn test_marker_at_prefers_topmost() {
        let markers = vec![
            PlacedMarker { city: 0, px: 10, py: 10, radius: 4, tier: Tier::One },
            PlacedMarker { city: 1, px: 12, py: 10, radius: 2, tier: Tier::Two },
        ];
        assert_eq!(marker_at(&markers, 12, 10).map(|m| m.city), Some(1));
        assert_eq!(marker_at(&markers, 7, 10).map(|m| m.city), Some(0));
        assert_eq!(marker_at(&markers, 40, 40), None);
    }
}
