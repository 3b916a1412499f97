//! Extension blocks carrying elements from other schemas.

use crate::element::{ElementType, GpxElement};
use crate::error::{Error, Result};
use crate::render::BodyWriter;

use super::required_text;

/// A namespace binding: `xmlns:prefix="uri"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Prefix; empty for a default namespace declaration.
    pub prefix: String,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Namespace {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// Returns the declaring attribute name.
    pub fn attribute_name(&self) -> String {
        if self.prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", self.prefix)
        }
    }

    pub(crate) fn validate(&self, element: &'static str) -> Result<()> {
        required_text(element, "namespace uri", &self.uri)?;
        if !self.prefix.is_empty() && !is_xml_name(&self.prefix) {
            return Err(Error::contract(
                element,
                format!("`{}` is not a valid namespace prefix", self.prefix),
            ));
        }
        Ok(())
    }
}

/// An `<extensions>` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions;

impl GpxElement for Extensions {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.children(ElementType::Extension)
    }
}

const EXTENSION: &str = "extension";

/// An element from a foreign schema inside an extensions block.
///
/// Its tag is the qualified `name`. Namespace declarations are written
/// only where no ancestor already binds the same prefix to the same URI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    /// Qualified tag name, e.g. `gpxtpx:hr`.
    pub name: String,
    /// Namespaces declared on this element.
    pub namespaces: Vec<Namespace>,
    /// Attributes in output order.
    pub attributes: Vec<(String, String)>,
    /// Character content.
    pub text: Option<String>,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Extension {
            name: name.into(),
            ..Extension::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Extension {
            name: name.into(),
            text: Some(text.into()),
            ..Extension::default()
        }
    }
}

impl GpxElement for Extension {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        if !is_qualified_name(&self.name) {
            return Err(Error::contract(
                EXTENSION,
                format!("`{}` is not a valid element name", self.name),
            ));
        }
        for (i, ns) in self.namespaces.iter().enumerate() {
            ns.validate(EXTENSION)?;
            if self.namespaces[..i].iter().any(|other| other.prefix == ns.prefix) {
                return Err(Error::contract(
                    EXTENSION,
                    format!("prefix `{}` is declared twice on <{}>", ns.prefix, self.name),
                ));
            }
        }
        for (i, (name, _)) in self.attributes.iter().enumerate() {
            if !is_qualified_name(name) || name == "xmlns" || name.starts_with("xmlns:") {
                return Err(Error::contract(
                    EXTENSION,
                    format!("`{}` is not a valid attribute name", name),
                ));
            }
            if self.attributes[..i].iter().any(|(other, _)| other == name) {
                return Err(Error::contract(
                    EXTENSION,
                    format!("attribute `{}` is set twice on <{}>", name, self.name),
                ));
            }
        }
        Ok(self.attributes.clone())
    }

    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        if let Some(text) = &self.text {
            body.content(text)?;
        }
        body.children(ElementType::Extension)
    }
}

/// Checks an XML name without a colon.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Checks a name of the form `local` or `prefix:local`.
fn is_qualified_name(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_xml_name(prefix) && is_xml_name(local),
        None => is_xml_name(name),
    }
}
