//! Planet catalog.
//!
//! Parses the two JSON payloads served next to the viewer:
//!
//! - the planet list, one record per exoplanet with its size and position
//!   (coordinates may arrive as JSON numbers or as numeric strings, the way a
//!   SQL-backed endpoint tends to emit them),
//! - the planet detail record shown in the info panel, or `{ "error": ... }`.
//!
//! Also extracts the preselected planet from a `?planet=Name` query string.

use std::fmt;

use glam::Vec3;
use serde::Deserialize;

use crate::errors::{OrreryError, Result};

/// A JSON value that is either a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    /// Numeric value, parsing text when needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrString::Number(n) => write!(f, "{n}"),
            NumberOrString::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlanetRecord {
    #[serde(rename = "Name")]
    name: String,
    size_earth_radii: NumberOrString,
    xcoordinates: NumberOrString,
    ycoordinates: NumberOrString,
    zcoordinates: NumberOrString,
}

impl TryFrom<RawPlanetRecord> for PlanetRecord {
    type Error = OrreryError;

    fn try_from(raw: RawPlanetRecord) -> Result<Self> {
        let number = |value: &NumberOrString, field: &str| -> Result<f32> {
            match value.as_f64() {
                Some(n) if n.is_finite() => Ok(n as f32),
                _ => Err(OrreryError::InvalidRecord {
                    name: raw.name.clone(),
                    reason: format!("{field} is not a number: {value}"),
                }),
            }
        };

        let size_earth_radii = number(&raw.size_earth_radii, "size_earth_radii")?;
        if size_earth_radii <= 0.0 {
            return Err(OrreryError::InvalidRecord {
                name: raw.name.clone(),
                reason: format!("size_earth_radii must be positive, got {size_earth_radii}"),
            });
        }
        let position = Vec3::new(
            number(&raw.xcoordinates, "xcoordinates")?,
            number(&raw.ycoordinates, "ycoordinates")?,
            number(&raw.zcoordinates, "zcoordinates")?,
        );

        Ok(PlanetRecord {
            name: raw.name,
            size_earth_radii,
            position,
        })
    }
}

/// One exoplanet from the planet list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetRecord {
    pub name: String,
    /// Radius in Earth radii; also the uniform scale the model is spawned at.
    pub size_earth_radii: f32,
    /// Scene-space position.
    pub position: Vec3,
}

/// The parsed planet list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    planets: Vec<PlanetRecord>,
}

impl Catalog {
    #[must_use]
    pub fn new(planets: Vec<PlanetRecord>) -> Self {
        Self { planets }
    }

    /// Parses the planet-list JSON array.
    ///
    /// Records with unusable values are skipped with a warning; only a payload
    /// that is not a JSON array of records at all is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawPlanetRecord> = serde_json::from_str(json)?;
        let mut planets = Vec::with_capacity(raw.len());
        for record in raw {
            match PlanetRecord::try_from(record) {
                Ok(planet) => planets.push(planet),
                Err(e) => log::warn!("Skipping catalog record: {e}"),
            }
        }
        log::info!("Catalog loaded: {} planets", planets.len());
        Ok(Self { planets })
    }

    /// Planets within `max_distance` of `origin` (inclusive), in catalog order.
    pub fn within(&self, origin: Vec3, max_distance: f32) -> impl Iterator<Item = &PlanetRecord> {
        self.planets
            .iter()
            .filter(move |p| p.position.distance(origin) <= max_distance)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PlanetRecord> {
        self.planets.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetRecord> {
        self.planets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.planets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }
}

// ============================================================================
// Planet details
// ============================================================================

pub const NO_DATA_DESCRIPTION: &str = "No additional data available.";
pub const FETCH_ERROR_DESCRIPTION: &str = "Error fetching data.";

/// Detail record for the info panel. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanetDetails {
    pub mass_earths: Option<NumberOrString>,
    pub size_earth_radii: Option<NumberOrString>,
    pub location_days: Option<NumberOrString>,
    #[serde(rename = "orbital_radius_AU")]
    pub orbital_radius_au: Option<NumberOrString>,
    pub description: Option<String>,
    pub discovery_date: Option<String>,
    pub discovery_method: Option<String>,
}

#[derive(Deserialize)]
struct DetailsPayload {
    error: Option<serde_json::Value>,
    #[serde(flatten)]
    details: PlanetDetails,
}

impl PlanetDetails {
    /// Parses a planet-detail payload.
    ///
    /// A payload carrying an `error` key yields
    /// [`OrreryError::PlanetDataUnavailable`].
    pub fn from_json(planet: &str, json: &str) -> Result<Self> {
        let payload: DetailsPayload = serde_json::from_str(json)?;
        if let Some(error) = payload.error {
            log::debug!("Planet data for {planet} unavailable: {error}");
            return Err(OrreryError::PlanetDataUnavailable(planet.to_string()));
        }
        Ok(payload.details)
    }

    /// Details consisting of a description only.
    #[must_use]
    pub fn description_only(description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            ..Self::default()
        }
    }

    /// Info panel lines, one per field.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        fn show<T: fmt::Display>(value: Option<&T>) -> String {
            value.map_or_else(|| "unknown".to_string(), ToString::to_string)
        }

        vec![
            format!("Mass: {} Earth masses", show(self.mass_earths.as_ref())),
            format!("Radius: {} Earth radii", show(self.size_earth_radii.as_ref())),
            format!("Orbital Period: {} days", show(self.location_days.as_ref())),
            format!("Orbital Radius: {} AU", show(self.orbital_radius_au.as_ref())),
            format!("Description: {}", show(self.description.as_ref())),
            format!("Discovery Date: {}", show(self.discovery_date.as_ref())),
            format!("Discovery Method: {}", show(self.discovery_method.as_ref())),
        ]
    }
}

/// Contents of the planet info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub title: String,
    pub lines: Vec<String>,
}

impl InfoPanel {
    /// Builds the panel for `planet` from the outcome of fetching its details.
    ///
    /// An error payload shows the "no data" description; any other failure
    /// shows the fetch-error description.
    #[must_use]
    pub fn for_planet(planet: &str, details: &Result<PlanetDetails>) -> Self {
        let details = match details {
            Ok(details) => details.clone(),
            Err(OrreryError::PlanetDataUnavailable(_)) => PlanetDetails::description_only(NO_DATA_DESCRIPTION),
            Err(e) => {
                log::error!("Error fetching planet data for {planet}: {e}");
                PlanetDetails::description_only(FETCH_ERROR_DESCRIPTION)
            }
        };
        Self {
            title: planet.to_string(),
            lines: details.summary(),
        }
    }
}

// ============================================================================
// Query string
// ============================================================================

/// Extracts the `planet` parameter from a URL query string.
///
/// Accepts the query with or without the leading `?`. `+` decodes to a space
/// and `%XX` escapes are decoded. An empty value counts as absent.
#[must_use]
pub fn selected_planet_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "planet")
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.is_empty())
}
