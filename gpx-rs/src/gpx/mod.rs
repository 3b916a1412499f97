//! Concrete GPX 1.1 elements.
//!
//! Each type here is plain data plus a [`GpxElement`](crate::element::GpxElement)
//! implementation that lays out its attributes and body in schema order.
//! Wrap one in an element with [`new_element`](crate::element::new_element)
//! to place it in a tree.

mod document;
mod extensions;
mod link;
mod metadata;
mod route;
mod track;
mod waypoint;

pub use document::Gpx;
pub use extensions::{Extension, Extensions, Namespace};
pub use link::Link;
pub use metadata::{Bounds, Copyright, Email, Metadata, Person};
pub use route::Route;
pub use track::{Track, TrackSegment};
pub use waypoint::{Fix, Waypoint};

use crate::constants::{LATITUDE_RANGE, LONGITUDE_RANGE};
use crate::error::{Error, Result};
use crate::render::format_decimal;

/// Returns a required value or a contract violation naming the missing field.
fn required<T: Copy>(element: &'static str, field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::contract(element, format!("required `{}` is not set", field)))
}

/// Returns a required string, refusing empty or blank values.
fn required_text<'a>(element: &'static str, field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::contract(
            element,
            format!("required `{}` is empty", field),
        ));
    }
    Ok(value)
}

/// Checks `min <= value <= max` (or `< max` when `max_inclusive` is false).
fn check_range(
    element: &'static str,
    field: &str,
    value: f64,
    (min, max): (f64, f64),
    max_inclusive: bool,
) -> Result<f64> {
    let below_max = if max_inclusive {
        value <= max
    } else {
        value < max
    };
    if value >= min && below_max {
        Ok(value)
    } else {
        let close = if max_inclusive { ']' } else { ')' };
        Err(Error::contract(
            element,
            format!("`{}` = {} is outside [{}, {}{}", field, value, min, max, close),
        ))
    }
}

/// Formats a decimal attribute, refusing non-finite values.
fn decimal_attribute(element: &'static str, field: &str, value: f64) -> Result<String> {
    format_decimal(value)
        .ok_or_else(|| Error::contract(element, format!("`{}` is not a finite number", field)))
}

/// Validates and formats a required latitude.
fn latitude(element: &'static str, field: &str, value: Option<f64>) -> Result<String> {
    let value = required(element, field, value)?;
    let text = decimal_attribute(element, field, value)?;
    check_range(element, field, value, LATITUDE_RANGE, true)?;
    Ok(text)
}

/// Validates and formats a required longitude.
fn longitude(element: &'static str, field: &str, value: Option<f64>) -> Result<String> {
    let value = required(element, field, value)?;
    let text = decimal_attribute(element, field, value)?;
    check_range(element, field, value, LONGITUDE_RANGE, true)?;
    Ok(text)
}
