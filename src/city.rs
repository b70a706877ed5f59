use crate::tier::Tier;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Most genres a city carries
pub const MAX_GENRES: usize = 5;

/// A trigger city record, keyed by the dataset's column names
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct City {
    #[serde(rename = "CITY_ID")]
    pub id: u64,
    #[serde(rename = "CITY_NAME")]
    pub name: String,
    #[serde(rename = "CITY_POPULATION")]
    pub population: u64,
    #[serde(rename = "CITY_LAT")]
    pub lat: f64,
    #[serde(rename = "CITY_LNG")]
    pub lon: f64,
    #[serde(rename = "COUNTRY_NAME")]
    pub country: String,
    #[serde(rename = "CONTINENT")]
    pub continent: String,
    #[serde(rename = "TRIGGER_CITY_TIER")]
    pub tier_label: String,
    #[serde(rename = "CITY_TOP_5_GENRES", default)]
    pub top_genres: Vec<String>,
    #[serde(rename = "CITY_DESCRIPTION", default)]
    pub description: String,
    #[serde(rename = "CITY_IMAGE", default)]
    pub image: String,
}

impl City {
    pub fn tier(&self) -> Tier {
        Tier::classify(&self.tier_label)
    }

    fn has_valid_coords(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("invalid city data: {0}")]
    Parse(#[from] simd_json::Error),
}

/// Where the dataset comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(String),
    Url(String),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(location.to_string())
        }
    }

    /// Fetch raw bytes with a single read or GET
    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            Source::File(path) => fs::read(Path::new(path)).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Source::Url(url) => {
                let resp = ureq::get(url).call().map_err(|e| LoadError::Http {
                    url: url.clone(),
                    source: Box::new(e),
                })?;
                let mut bytes = Vec::new();
                resp.into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|source| LoadError::Io {
                        path: url.clone(),
                        source,
                    })?;
                Ok(bytes)
            }
        }
    }
}

/// Parse a JSON array of cities, dropping records that can't be placed on the map.
/// Input order is kept since it decides draw order.
pub fn parse_cities(mut bytes: Vec<u8>) -> Result<Vec<City>, LoadError> {
    let raw: Vec<City> = simd_json::serde::from_slice(&mut bytes)?;
    Ok(sanitize(raw))
}

fn sanitize(raw: Vec<City>) -> Vec<City> {
    raw.into_iter()
        .filter_map(|mut city| {
            if !city.has_valid_coords() {
                warn!(
                    "dropping {} (id {}): coordinates out of range ({}, {})",
                    city.name, city.id, city.lat, city.lon
                );
                return None;
            }
            if city.top_genres.len() > MAX_GENRES {
                warn!(
                    "{} lists {} genres, keeping the first {}",
                    city.name,
                    city.top_genres.len(),
                    MAX_GENRES
                );
                city.top_genres.truncate(MAX_GENRES);
            }
            if city.tier() == Tier::Unknown {
                warn!("{} has unrecognized tier {:?}", city.name, city.tier_label);
            }
            Some(city)
        })
        .collect()
}

/// Load the dataset from a file path or URL
pub fn load(source: &Source) -> Result<Vec<City>, LoadError> {
    let bytes = source.fetch()?;
    let cities = parse_cities(bytes)?;
    info!("loaded {} cities from {:?}", cities.len(), source);
    Ok(cities)
}

/// Format an integer with comma thousands separators
pub fn format_population(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
