//! Terminal world map of music trigger cities: markers sized by population,
//! colored by tier, with hover tooltips, a detail popup and a table view.

pub mod app;
pub mod basemap;
pub mod braille;
pub mod city;
pub mod config;
pub mod logging;
pub mod map;
pub mod marker;
pub mod tier;
pub mod ui;
