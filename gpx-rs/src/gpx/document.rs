//! The `<gpx>` document root.

use crate::constants::{
    DEFAULT_CREATOR, GPX_NAMESPACE, GPX_SCHEMA_LOCATION, GPX_VERSION, XSI_NAMESPACE,
};
use crate::element::{ElementType, GpxElement};
use crate::error::{Error, Result};
use crate::render::BodyWriter;

use super::{required_text, Namespace};

const ELEMENT: &str = "gpx";

/// The root of a GPX document.
///
/// Holds metadata, waypoints, routes, tracks and an extensions block, in
/// that order. Rendering it writes the XML declaration first.
#[derive(Debug, Clone, PartialEq)]
pub struct Gpx {
    /// Name of the software that created the document.
    pub creator: String,
    /// Extra namespace declarations for extension schemas.
    pub namespaces: Vec<Namespace>,
}

impl Default for Gpx {
    fn default() -> Self {
        Gpx::new(DEFAULT_CREATOR)
    }
}

impl Gpx {
    /// Creates a document root with the given creator.
    pub fn new(creator: impl Into<String>) -> Self {
        Gpx {
            creator: creator.into(),
            namespaces: Vec::new(),
        }
    }

    /// Returns true if the root binds `prefix` to `uri`.
    pub fn binds_namespace(&self, prefix: &str, uri: &str) -> bool {
        (prefix.is_empty() && uri == GPX_NAMESPACE)
            || (prefix == "xsi" && uri == XSI_NAMESPACE)
            || self
                .namespaces
                .iter()
                .any(|ns| ns.prefix == prefix && ns.uri == uri)
    }
}

impl GpxElement for Gpx {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        let creator = required_text(ELEMENT, "creator", &self.creator)?;
        let mut attributes = vec![
            ("version".to_string(), GPX_VERSION.to_string()),
            ("creator".to_string(), creator.to_string()),
            ("xmlns".to_string(), GPX_NAMESPACE.to_string()),
            ("xmlns:xsi".to_string(), XSI_NAMESPACE.to_string()),
            (
                "xsi:schemaLocation".to_string(),
                GPX_SCHEMA_LOCATION.to_string(),
            ),
        ];
        for (i, ns) in self.namespaces.iter().enumerate() {
            if ns.prefix.is_empty() || ns.prefix == "xsi" {
                return Err(Error::contract(
                    ELEMENT,
                    format!("prefix `{}` is reserved on the document root", ns.prefix),
                ));
            }
            ns.validate(ELEMENT)?;
            if self.namespaces[..i].iter().any(|other| other.prefix == ns.prefix) {
                return Err(Error::contract(
                    ELEMENT,
                    format!("prefix `{}` is declared twice", ns.prefix),
                ));
            }
            attributes.push((ns.attribute_name(), ns.uri.clone()));
        }
        Ok(attributes)
    }

    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.children(ElementType::Metadata)?;
        body.children(ElementType::Waypoint)?;
        body.children(ElementType::Route)?;
        body.children(ElementType::Track)?;
        body.children(ElementType::Extensions)
    }
}
