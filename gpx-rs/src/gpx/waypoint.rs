//! Waypoints, route points and track points.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::constants::{MAX_DEGREES, MAX_DGPS_STATION};
use crate::element::{ElementType, GpxElement};
use crate::error::{Error, Result};
use crate::render::BodyWriter;

use super::{check_range, latitude, longitude};

const ELEMENT: &str = "wpt";

/// Type of GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fix {
    /// No fix. Distinct from an unknown fix, which is `None` on the point.
    None,
    TwoD,
    ThreeD,
    Dgps,
    /// Military signal.
    Pps,
}

impl Fix {
    /// Returns the schema value for this fix.
    pub fn as_str(self) -> &'static str {
        match self {
            Fix::None => "none",
            Fix::TwoD => "2d",
            Fix::ThreeD => "3d",
            Fix::Dgps => "dgps",
            Fix::Pps => "pps",
        }
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point: a waypoint under `<gpx>`, a route point under `<rte>`, or a
/// track point under `<trkseg>`.
///
/// Latitude and longitude are options so that an incompletely built point
/// can exist in a tree; rendering it fails until both are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waypoint {
    /// Latitude in decimal degrees, WGS84.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, WGS84.
    pub longitude: Option<f64>,
    /// Elevation in meters.
    pub elevation: Option<f64>,
    /// Time of the fix, UTC.
    pub time: Option<DateTime<Utc>>,
    /// Magnetic variation in degrees.
    pub magnetic_variation: Option<f64>,
    /// Height of the geoid above the WGS84 ellipsoid, in meters.
    pub geoid_height: Option<f64>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    /// Source of the data.
    pub source: Option<String>,
    /// Symbol name used by GPS receivers.
    pub symbol: Option<String>,
    /// Classification of the point (`<type>`).
    pub category: Option<String>,
    pub fix: Option<Fix>,
    /// Number of satellites used for the fix.
    pub satellites: Option<u32>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    /// Seconds since the last DGPS update.
    pub age_of_dgps_data: Option<f64>,
    /// DGPS station id.
    pub dgps_id: Option<u16>,
}

impl Waypoint {
    /// Creates a point at the given coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Waypoint {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Waypoint::default()
        }
    }
}

impl GpxElement for Waypoint {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("lat".to_string(), latitude(ELEMENT, "lat", self.latitude)?),
            ("lon".to_string(), longitude(ELEMENT, "lon", self.longitude)?),
        ])
    }

    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        if let Some(magvar) = self.magnetic_variation {
            check_range(ELEMENT, "magvar", magvar, (0.0, MAX_DEGREES), false)?;
        }
        if let Some(id) = self.dgps_id {
            if id > MAX_DGPS_STATION {
                return Err(Error::contract(
                    ELEMENT,
                    format!("`dgpsid` = {} exceeds {}", id, MAX_DGPS_STATION),
                ));
            }
        }

        body.decimal("ele", self.elevation)?;
        body.time("time", self.time.as_ref());
        body.decimal("magvar", self.magnetic_variation)?;
        body.decimal("geoidheight", self.geoid_height)?;
        body.text("name", self.name.as_deref())?;
        body.text("cmt", self.comment.as_deref())?;
        body.text("desc", self.description.as_deref())?;
        body.text("src", self.source.as_deref())?;
        body.children(ElementType::Link)?;
        body.text("sym", self.symbol.as_deref())?;
        body.text("type", self.category.as_deref())?;
        body.text("fix", self.fix.map(Fix::as_str))?;
        body.integer("sat", self.satellites);
        body.decimal("hdop", self.hdop)?;
        body.decimal("vdop", self.vdop)?;
        body.decimal("pdop", self.pdop)?;
        body.decimal("ageofdgpsdata", self.age_of_dgps_data)?;
        body.integer("dgpsid", self.dgps_id);
        body.children(ElementType::Extensions)
    }
}
