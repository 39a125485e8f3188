/// Site registry for the climate monitoring service.
///
/// Defines the canonical list of geocoded sites whose climate history is
/// aggregated, loaded from a TOML file (`sites.toml` by default). This is
/// the single source of truth for site ids — all other modules should
/// reference sites from here rather than hardcoding coordinates.
///
/// Registry keys become site ids, so uniqueness within a run is guaranteed
/// by the TOML table itself; `BTreeMap` keeps iteration order deterministic.

use crate::model::Site;
use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Registry file format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SitesFile {
    sites: BTreeMap<String, SiteEntry>,
}

#[derive(Debug, Deserialize)]
struct SiteEntry {
    address: String,
    latitude: f64,
    longitude: f64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RegistryError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A site carries coordinates outside WGS84 bounds.
    InvalidCoordinates {
        site_id: String,
        latitude: f64,
        longitude: f64,
    },
    /// The file parsed but defined no sites at all.
    Empty,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Io(e) => write!(f, "Failed to read site registry: {}", e),
            RegistryError::Parse(e) => write!(f, "Failed to parse site registry: {}", e),
            RegistryError::InvalidCoordinates {
                site_id,
                latitude,
                longitude,
            } => write!(
                f,
                "Site '{}' has out-of-range coordinates ({}, {})",
                site_id, latitude, longitude
            ),
            RegistryError::Empty => write!(f, "Site registry defines no sites"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads and validates the site registry from a TOML file.
///
/// Sites are returned in key order. Coordinates are range-checked here so
/// the rest of the pipeline never sees an impossible point.
pub fn load_sites(path: &str) -> Result<Vec<Site>, RegistryError> {
    let contents = std::fs::read_to_string(path).map_err(RegistryError::Io)?;
    parse_sites(&contents)
}

/// Parses registry TOML. Split out from `load_sites` so tests never touch
/// the filesystem.
pub fn parse_sites(contents: &str) -> Result<Vec<Site>, RegistryError> {
    let file: SitesFile = toml::from_str(contents).map_err(RegistryError::Parse)?;
    if file.sites.is_empty() {
        return Err(RegistryError::Empty);
    }

    let mut sites = Vec::with_capacity(file.sites.len());
    for (site_id, entry) in file.sites {
        if !(-90.0..=90.0).contains(&entry.latitude)
            || !(-180.0..=180.0).contains(&entry.longitude)
        {
            return Err(RegistryError::InvalidCoordinates {
                site_id,
                latitude: entry.latitude,
                longitude: entry.longitude,
            });
        }
        sites.push(Site {
            site_id,
            address: entry.address,
            latitude: entry.latitude,
            longitude: entry.longitude,
        });
    }
    Ok(sites)
}

/// Looks up a site by id. Returns `None` if not found.
pub fn find_site<'a>(sites: &'a [Site], site_id: &str) -> Option<&'a Site> {
    sites.iter().find(|s| s.site_id == site_id)
}

/// Returns the ids of all registered sites.
pub fn all_site_ids(sites: &[Site]) -> Vec<&str> {
    sites.iter().map(|s| s.site_id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
