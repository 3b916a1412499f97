//! Body writer handed to each element while it renders.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use super::format::{escape_checked, format_decimal, format_time};
use super::{write_element, RenderOptions};
use crate::element::{ElementRef, ElementType};
use crate::error::{Error, Result};

/// Collects the body of one element.
///
/// Fields are written as text sub-elements one level deeper than the
/// element itself. Children are pulled from the element's child collection
/// in order; [`BodyWriter::children`] renders the run of children of one
/// type, so an element interleaves fields and child slots simply by calling
/// the methods in schema order.
pub struct BodyWriter<'a> {
    element: &'static str,
    options: &'a RenderOptions,
    depth: usize,
    children: &'a [ElementRef],
    next_child: usize,
    markup: String,
    content: Option<String>,
}

/// A finished element body.
pub(crate) struct Body {
    /// Sub-element markup.
    pub markup: String,
    /// Character content of the element itself, already escaped.
    pub content: Option<String>,
}

impl<'a> BodyWriter<'a> {
    pub(crate) fn new(
        element: &'static str,
        options: &'a RenderOptions,
        depth: usize,
        children: &'a [ElementRef],
    ) -> Self {
        BodyWriter {
            element,
            options,
            depth,
            children,
            next_child: 0,
            markup: String::new(),
            content: None,
        }
    }

    /// Writes `<tag>value</tag>` if `value` is set.
    ///
    /// Fails if the value holds characters XML cannot represent.
    pub fn text(&mut self, tag: &str, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            let text = escape_checked(self.element, tag, value)?;
            self.field(tag, &text);
        }
        Ok(())
    }

    /// Writes a decimal field if `value` is set.
    pub fn decimal(&mut self, tag: &str, value: Option<f64>) -> Result<()> {
        if let Some(value) = value {
            let text = format_decimal(value).ok_or_else(|| {
                Error::contract(self.element, format!("<{}> is not a finite number", tag))
            })?;
            self.field(tag, &text);
        }
        Ok(())
    }

    /// Writes an integer field if `value` is set.
    pub fn integer<T: Display>(&mut self, tag: &str, value: Option<T>) {
        if let Some(value) = value {
            self.field(tag, &value.to_string());
        }
    }

    /// Writes a time field if `value` is set.
    pub fn time(&mut self, tag: &str, value: Option<&DateTime<Utc>>) {
        if let Some(value) = value {
            self.field(tag, &format_time(value));
        }
    }

    /// Sets the character content of the element itself.
    pub fn content(&mut self, text: &str) -> Result<()> {
        self.content = Some(escape_checked(self.element, "text", text)?.into_owned());
        Ok(())
    }

    /// Renders the run of children of `element_type` at the current position.
    pub fn children(&mut self, element_type: ElementType) -> Result<()> {
        let children = self.children;
        while let Some(child_ref) = children.get(self.next_child) {
            let child = child_ref.borrow();
            if child.element_type() != element_type {
                break;
            }
            write_element(&child, &mut self.markup, self.options, self.depth)?;
            self.next_child += 1;
        }
        Ok(())
    }

    /// Finishes the body, checking that every child was placed.
    pub(crate) fn finish(self) -> Result<Body> {
        if let Some(stray) = self.children.get(self.next_child) {
            return Err(Error::contract(
                self.element,
                format!(
                    "child <{}> at position {} is out of schema order",
                    stray.borrow().element_type().name(),
                    self.next_child
                ),
            ));
        }
        Ok(Body {
            markup: self.markup,
            content: self.content,
        })
    }

    fn field(&mut self, tag: &str, text: &str) {
        self.markup.push_str(&self.options.indent_for(self.depth));
        self.markup.push('<');
        self.markup.push_str(tag);
        self.markup.push('>');
        self.markup.push_str(text);
        self.markup.push_str("</");
        self.markup.push_str(tag);
        self.markup.push('>');
        self.markup.push_str(self.options.newline());
    }
}
