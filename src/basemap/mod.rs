mod fallback;

use crate::map::{LineString, Lod, MapRenderer};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

pub use fallback::load_fallback;

/// Natural Earth coastline files, one per level of detail
const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

/// Natural Earth admin-0 boundary lines
const BORDER_FILES: [(&str, Lod); 2] = [
    ("ne_50m_borders.json", Lod::Medium),
    ("ne_10m_borders.json", Lod::High),
];

/// Load whatever Natural Earth data is present in `data_dir`.
/// Missing files are skipped, broken ones are logged and skipped.
/// Returns the number of files loaded.
pub fn load_dir(renderer: &mut MapRenderer, data_dir: &Path) -> usize {
    let mut loaded = 0;

    for (filename, lod) in COASTLINE_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            debug!("basemap file {} not found", path.display());
            continue;
        }
        match load_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|line| renderer.add_coastline(line, lod));
                loaded += 1;
            }
            Err(e) => warn!("failed to load {}: {:#}", filename, e),
        }
    }

    for (filename, lod) in BORDER_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match load_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|line| renderer.add_border(line, lod));
                loaded += 1;
            }
            Err(e) => warn!("failed to load {}: {:#}", filename, e),
        }
    }

    info!("loaded {} basemap files from {}", loaded, data_dir.display());
    loaded
}

/// Load the basemap, falling back to the built-in outline if nothing usable is on disk
pub fn load_or_fallback(renderer: &mut MapRenderer, data_dir: &Path) {
    if data_dir.exists() {
        load_dir(renderer, data_dir);
    }
    if !renderer.has_data() {
        info!("no coastline data found, using built-in outline");
        load_fallback(renderer);
    }
}

/// Read a GeoJSON file and flatten its geometries to polylines
fn load_lines(path: &Path) -> Result<Vec<LineString>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut lines = Vec::new();
    collect_geojson_lines(&geojson, &mut lines);
    Ok(lines)
}

fn collect_geojson_lines(geojson: &GeoJson, out: &mut Vec<LineString>) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry_lines(geometry, out);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry_lines(geometry, out);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry_lines(geometry, out),
    }
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

fn collect_geometry_lines(geometry: &Geometry, out: &mut Vec<LineString>) {
    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(|l| to_line(l))),
        // Polygons only contribute their exterior ring
        Value::Polygon(rings) => out.extend(rings.first().map(|r| to_line(r))),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first().map(|r| to_line(r))))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry_lines(g, out);
            }
        }
        _ => {}
    }
}
