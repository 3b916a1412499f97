//! GPX Model - an in-memory GPX 1.1 element tree
//!
//! This library represents a GPX (GPS Exchange Format) document as a tree of
//! elements that can render themselves back to GPX text.
//!
//! # Overview
//!
//! Every node is an [`ElementInner`] behind an [`ElementRef`]. Parents own
//! their children; each child keeps a weak link back to its parent, used
//! for navigation and for presentation decisions while rendering
//! (indentation depth, point tag names, namespace declarations).
//!
//! Children are changed only through the structural operations on
//! [`ElementInner`] (`append_child`, `insert_child`, `remove_child`,
//! `detach`, `move_child`). They refuse edits that would give a node two
//! parents, create a cycle, or break the GPX content model, leaving the
//! tree untouched when they do.
//!
//! Rendering is read-only and repeatable. An element with missing required
//! data makes the render fail with [`Error::ContractViolation`] instead of
//! producing partial markup.
//!
//! # Example
//!
//! ```
//! use gpx_model::{new_element, ElementInner, Gpx, Waypoint};
//!
//! let root = new_element(Gpx::new("example"));
//! let summit = new_element(Waypoint {
//!     name: Some("Summit".to_string()),
//!     ..Waypoint::new(45.0, -93.0)
//! });
//! ElementInner::append_child(&root, summit)?;
//!
//! let text = root.borrow().render()?;
//! assert!(text.contains(r#"<wpt lat="45.0" lon="-93.0"><name>Summit</name></wpt>"#));
//! # Ok::<(), gpx_model::Error>(())
//! ```

pub mod constants;
pub mod element;
pub mod error;
pub mod gpx;
pub mod render;

// Re-export commonly used types
pub use constants::*;
pub use element::{
    new_element, ElementData, ElementInner, ElementKind, ElementRef, ElementType, GpxElement,
    Slot, WeakElementRef,
};
pub use error::{Error, Result};
pub use gpx::{
    Bounds, Copyright, Email, Extension, Extensions, Fix, Gpx, Link, Metadata, Namespace, Person,
    Route, Track, TrackSegment, Waypoint,
};
pub use render::{
    render_to_string, render_to_string_pretty, render_to_writer, BodyWriter, RenderOptions,
};
