//! The closed set of GPX element kinds.
//!
//! [`ElementKind`] wraps the concrete data of each GPX 1.1 element.
//! [`ElementType`] is its fieldless counterpart, used for the child slot
//! table that decides which kinds may nest inside which, and in what order.

use crate::error::Result;
use crate::gpx::{
    Bounds, Copyright, Email, Extension, Extensions, Gpx, Link, Metadata, Person, Route, Track,
    TrackSegment, Waypoint,
};
use crate::render::BodyWriter;

/// Behaviour every concrete GPX element provides to the renderer.
///
/// The renderer writes the opening tag with [`GpxElement::attributes`], then
/// lets the element lay out its body: simple-typed fields as text
/// sub-elements, and its children through [`BodyWriter::children`] at the
/// points where the schema places them.
pub trait GpxElement {
    /// Attributes of the opening tag, in output order.
    ///
    /// Fails with a contract violation if a required attribute is unset.
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        Ok(Vec::new())
    }

    /// Writes the element body. Elements with attributes only keep the default.
    fn write_body(&self, _body: &mut BodyWriter<'_>) -> Result<()> {
        Ok(())
    }
}

/// Access to a concrete element struct inside an [`ElementKind`].
pub trait ElementData: Sized {
    /// Returns the data if `kind` holds this type.
    fn from_kind(kind: &ElementKind) -> Option<&Self>;

    /// Returns the data mutably if `kind` holds this type.
    fn from_kind_mut(kind: &mut ElementKind) -> Option<&mut Self>;
}

/// Kind-specific data for elements.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// The `<gpx>` document root.
    Gpx(Gpx),
    /// Document metadata.
    Metadata(Metadata),
    /// A waypoint, route point or track point.
    Waypoint(Waypoint),
    /// A route.
    Route(Route),
    /// A track.
    Track(Track),
    /// A track segment.
    TrackSegment(TrackSegment),
    /// The author of the document.
    Person(Person),
    /// An email address.
    Email(Email),
    /// Copyright and license information.
    Copyright(Copyright),
    /// A link to an external resource.
    Link(Link),
    /// Coordinate bounds.
    Bounds(Bounds),
    /// An `<extensions>` block.
    Extensions(Extensions),
    /// A foreign element inside an extensions block.
    Extension(Extension),
}

/// Fieldless element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Gpx,
    Metadata,
    Waypoint,
    Route,
    Track,
    TrackSegment,
    Person,
    Email,
    Copyright,
    Link,
    Bounds,
    Extensions,
    Extension,
}

/// A position in a parent's content model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Position of the slot among the parent's slots.
    pub index: usize,
    /// Element type the slot holds.
    pub element_type: ElementType,
    /// Whether the slot holds at most one element.
    pub single: bool,
}

const fn one(index: usize, element_type: ElementType) -> Slot {
    Slot {
        index,
        element_type,
        single: true,
    }
}

const fn many(index: usize, element_type: ElementType) -> Slot {
    Slot {
        index,
        element_type,
        single: false,
    }
}

const GPX_SLOTS: &[Slot] = &[
    one(0, ElementType::Metadata),
    many(1, ElementType::Waypoint),
    many(2, ElementType::Route),
    many(3, ElementType::Track),
    one(4, ElementType::Extensions),
];

const METADATA_SLOTS: &[Slot] = &[
    one(0, ElementType::Person),
    one(1, ElementType::Copyright),
    many(2, ElementType::Link),
    one(3, ElementType::Bounds),
    one(4, ElementType::Extensions),
];

const WAYPOINT_SLOTS: &[Slot] = &[
    many(0, ElementType::Link),
    one(1, ElementType::Extensions),
];

const ROUTE_SLOTS: &[Slot] = &[
    many(0, ElementType::Link),
    one(1, ElementType::Extensions),
    many(2, ElementType::Waypoint),
];

const TRACK_SLOTS: &[Slot] = &[
    many(0, ElementType::Link),
    one(1, ElementType::Extensions),
    many(2, ElementType::TrackSegment),
];

const TRACK_SEGMENT_SLOTS: &[Slot] = &[
    many(0, ElementType::Waypoint),
    one(1, ElementType::Extensions),
];

const PERSON_SLOTS: &[Slot] = &[one(0, ElementType::Email), one(1, ElementType::Link)];

const EXTENSION_SLOTS: &[Slot] = &[many(0, ElementType::Extension)];

impl ElementType {
    /// Returns the name used for this type in messages.
    ///
    /// This is the GPX tag name, except that waypoints are always `wpt`
    /// and extension elements, whose tag is caller-defined, are `extension`.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Gpx => "gpx",
            ElementType::Metadata => "metadata",
            ElementType::Waypoint => "wpt",
            ElementType::Route => "rte",
            ElementType::Track => "trk",
            ElementType::TrackSegment => "trkseg",
            ElementType::Person => "author",
            ElementType::Email => "email",
            ElementType::Copyright => "copyright",
            ElementType::Link => "link",
            ElementType::Bounds => "bounds",
            ElementType::Extensions => "extensions",
            ElementType::Extension => "extension",
        }
    }

    /// Returns the child slots of this type, in schema order.
    pub fn slots(self) -> &'static [Slot] {
        match self {
            ElementType::Gpx => GPX_SLOTS,
            ElementType::Metadata => METADATA_SLOTS,
            ElementType::Waypoint => WAYPOINT_SLOTS,
            ElementType::Route => ROUTE_SLOTS,
            ElementType::Track => TRACK_SLOTS,
            ElementType::TrackSegment => TRACK_SEGMENT_SLOTS,
            ElementType::Person => PERSON_SLOTS,
            ElementType::Extensions | ElementType::Extension => EXTENSION_SLOTS,
            ElementType::Email
            | ElementType::Copyright
            | ElementType::Link
            | ElementType::Bounds => &[],
        }
    }

    /// Returns the slot a child of type `child` occupies, if allowed at all.
    pub fn slot_of(self, child: ElementType) -> Option<Slot> {
        self.slots().iter().copied().find(|s| s.element_type == child)
    }

    /// Returns true if elements of this type may contain `child`.
    pub fn accepts(self, child: ElementType) -> bool {
        self.slot_of(child).is_some()
    }
}

impl ElementKind {
    /// Returns the fieldless type of this kind.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Gpx(_) => ElementType::Gpx,
            ElementKind::Metadata(_) => ElementType::Metadata,
            ElementKind::Waypoint(_) => ElementType::Waypoint,
            ElementKind::Route(_) => ElementType::Route,
            ElementKind::Track(_) => ElementType::Track,
            ElementKind::TrackSegment(_) => ElementType::TrackSegment,
            ElementKind::Person(_) => ElementType::Person,
            ElementKind::Email(_) => ElementType::Email,
            ElementKind::Copyright(_) => ElementType::Copyright,
            ElementKind::Link(_) => ElementType::Link,
            ElementKind::Bounds(_) => ElementType::Bounds,
            ElementKind::Extensions(_) => ElementType::Extensions,
            ElementKind::Extension(_) => ElementType::Extension,
        }
    }

    /// Returns the tag this element renders under a parent of `parent` type.
    ///
    /// A waypoint is `rtept` inside a route, `trkpt` inside a track segment,
    /// and `wpt` anywhere else.
    pub fn tag_name(&self, parent: Option<ElementType>) -> &str {
        match self {
            ElementKind::Waypoint(_) => match parent {
                Some(ElementType::Route) => "rtept",
                Some(ElementType::TrackSegment) => "trkpt",
                _ => "wpt",
            },
            ElementKind::Extension(ext) => &ext.name,
            other => other.element_type().name(),
        }
    }

    /// Returns true if this element binds `prefix` to `uri` for its subtree.
    pub fn binds_namespace(&self, prefix: &str, uri: &str) -> bool {
        match self {
            ElementKind::Gpx(gpx) => gpx.binds_namespace(prefix, uri),
            ElementKind::Extension(ext) => ext
                .namespaces
                .iter()
                .any(|ns| ns.prefix == prefix && ns.uri == uri),
            _ => false,
        }
    }

    /// Returns the concrete element as a trait object.
    pub fn as_element(&self) -> &dyn GpxElement {
        match self {
            ElementKind::Gpx(e) => e,
            ElementKind::Metadata(e) => e,
            ElementKind::Waypoint(e) => e,
            ElementKind::Route(e) => e,
            ElementKind::Track(e) => e,
            ElementKind::TrackSegment(e) => e,
            ElementKind::Person(e) => e,
            ElementKind::Email(e) => e,
            ElementKind::Copyright(e) => e,
            ElementKind::Link(e) => e,
            ElementKind::Bounds(e) => e,
            ElementKind::Extensions(e) => e,
            ElementKind::Extension(e) => e,
        }
    }
}

macro_rules! element_data {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ElementKind {
                fn from(value: $variant) -> Self {
                    ElementKind::$variant(value)
                }
            }

            impl ElementData for $variant {
                fn from_kind(kind: &ElementKind) -> Option<&Self> {
                    match kind {
                        ElementKind::$variant(e) => Some(e),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut ElementKind) -> Option<&mut Self> {
                    match kind {
                        ElementKind::$variant(e) => Some(e),
                        _ => None,
                    }
                }
            }
        )*
    };
}

element_data!(
    Gpx,
    Metadata,
    Waypoint,
    Route,
    Track,
    TrackSegment,
    Person,
    Email,
    Copyright,
    Link,
    Bounds,
    Extensions,
    Extension,
);
