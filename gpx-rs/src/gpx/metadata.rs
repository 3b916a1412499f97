//! Document metadata and its parts.

use chrono::{DateTime, Utc};

use crate::element::{ElementType, GpxElement};
use crate::error::{Error, Result};
use crate::render::{format_year, BodyWriter};

use super::{latitude, longitude, required, required_text};

/// Information about the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Creation time of the document.
    pub time: Option<DateTime<Utc>>,
    pub keywords: Option<String>,
}

impl GpxElement for Metadata {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("name", self.name.as_deref())?;
        body.text("desc", self.description.as_deref())?;
        body.children(ElementType::Person)?;
        body.children(ElementType::Copyright)?;
        body.children(ElementType::Link)?;
        body.time("time", self.time.as_ref());
        body.text("keywords", self.keywords.as_deref())?;
        body.children(ElementType::Bounds)?;
        body.children(ElementType::Extensions)
    }
}

/// A person or organization, rendered as the document `<author>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: Option<String>,
}

impl Person {
    pub fn named(name: impl Into<String>) -> Self {
        Person {
            name: Some(name.into()),
        }
    }
}

impl GpxElement for Person {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("name", self.name.as_deref())?;
        body.children(ElementType::Email)?;
        body.children(ElementType::Link)
    }
}

/// An email address, split in two to hinder harvesting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Email {
    /// Part before the `@`.
    pub id: String,
    /// Part after the `@`.
    pub domain: String,
}

impl Email {
    pub fn new(id: impl Into<String>, domain: impl Into<String>) -> Self {
        Email {
            id: id.into(),
            domain: domain.into(),
        }
    }

    /// Splits `address` at its last `@`.
    pub fn parse(address: &str) -> Option<Self> {
        let (id, domain) = address.rsplit_once('@')?;
        if id.is_empty() || domain.is_empty() {
            return None;
        }
        Some(Email::new(id, domain))
    }
}

impl GpxElement for Email {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (
                "id".to_string(),
                required_text("email", "id", &self.id)?.to_string(),
            ),
            (
                "domain".to_string(),
                required_text("email", "domain", &self.domain)?.to_string(),
            ),
        ])
    }
}

/// Copyright holder and license terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Copyright {
    /// Copyright holder.
    pub author: String,
    pub year: Option<i32>,
    /// URL of the license.
    pub license: Option<String>,
}

impl Copyright {
    pub fn new(author: impl Into<String>) -> Self {
        Copyright {
            author: author.into(),
            ..Copyright::default()
        }
    }
}

impl GpxElement for Copyright {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        let author = required_text("copyright", "author", &self.author)?;
        Ok(vec![("author".to_string(), author.to_string())])
    }

    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("year", self.year.map(format_year).as_deref())?;
        body.text("license", self.license.as_deref())?;
        Ok(())
    }
}

const BOUNDS: &str = "bounds";

/// Two lat/lon pairs defining the extent of the document's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min_latitude: Option<f64>,
    pub min_longitude: Option<f64>,
    pub max_latitude: Option<f64>,
    pub max_longitude: Option<f64>,
}

impl Bounds {
    pub fn new(min_latitude: f64, min_longitude: f64, max_latitude: f64, max_longitude: f64) -> Self {
        Bounds {
            min_latitude: Some(min_latitude),
            min_longitude: Some(min_longitude),
            max_latitude: Some(max_latitude),
            max_longitude: Some(max_longitude),
        }
    }
}

impl GpxElement for Bounds {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        let attributes = vec![
            ("minlat".to_string(), latitude(BOUNDS, "minlat", self.min_latitude)?),
            ("minlon".to_string(), longitude(BOUNDS, "minlon", self.min_longitude)?),
            ("maxlat".to_string(), latitude(BOUNDS, "maxlat", self.max_latitude)?),
            ("maxlon".to_string(), longitude(BOUNDS, "maxlon", self.max_longitude)?),
        ];
        if required(BOUNDS, "minlat", self.min_latitude)?
            > required(BOUNDS, "maxlat", self.max_latitude)?
        {
            return Err(Error::contract(BOUNDS, "`minlat` is greater than `maxlat`"));
        }
        Ok(attributes)
    }
}
