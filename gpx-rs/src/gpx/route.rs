//! Routes.

use crate::element::{ElementType, GpxElement};
use crate::error::Result;
use crate::render::BodyWriter;

/// An ordered list of route points leading to a destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    /// Source of the data.
    pub source: Option<String>,
    /// GPS route number.
    pub number: Option<u32>,
    /// Classification of the route (`<type>`).
    pub category: Option<String>,
}

impl Route {
    /// Creates a named route.
    pub fn named(name: impl Into<String>) -> Self {
        Route {
            name: Some(name.into()),
            ..Route::default()
        }
    }
}

impl GpxElement for Route {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("name", self.name.as_deref())?;
        body.text("cmt", self.comment.as_deref())?;
        body.text("desc", self.description.as_deref())?;
        body.text("src", self.source.as_deref())?;
        body.children(ElementType::Link)?;
        body.integer("number", self.number);
        body.text("type", self.category.as_deref())?;
        body.children(ElementType::Extensions)?;
        body.children(ElementType::Waypoint)
    }
}
