//! Tracks and track segments.

use crate::element::{ElementType, GpxElement};
use crate::error::Result;
use crate::render::BodyWriter;

/// An ordered list of track segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    /// Source of the data.
    pub source: Option<String>,
    /// GPS track number.
    pub number: Option<u32>,
    /// Classification of the track (`<type>`).
    pub category: Option<String>,
}

impl Track {
    /// Creates a named track.
    pub fn named(name: impl Into<String>) -> Self {
        Track {
            name: Some(name.into()),
            ..Track::default()
        }
    }
}

impl GpxElement for Track {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("name", self.name.as_deref())?;
        body.text("cmt", self.comment.as_deref())?;
        body.text("desc", self.description.as_deref())?;
        body.text("src", self.source.as_deref())?;
        body.children(ElementType::Link)?;
        body.integer("number", self.number);
        body.text("type", self.category.as_deref())?;
        body.children(ElementType::Extensions)?;
        body.children(ElementType::TrackSegment)
    }
}

/// A run of track points that are logically connected in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSegment;

impl GpxElement for TrackSegment {
    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.children(ElementType::Waypoint)?;
        body.children(ElementType::Extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{new_element, ElementInner};
    use crate::gpx::{Link, Waypoint};

    #[test]
    fn test_track_layout() {
        let trk = new_element(Track::named("Morning run"));
        let seg = new_element(TrackSegment);
        ElementInner::append_child(&trk, seg.clone()).unwrap();
        ElementInner::append_child(&trk, new_element(Link::new("https://example.com/run")))
            .unwrap();
        ElementInner::append_child(&seg, new_element(Waypoint::new(10.0, 20.0))).unwrap();

        let out = trk.borrow().render().unwrap();
        assert_eq!(
            out,
            "<trk><name>Morning run</name><link href=\"https://example.com/run\"></link>\
             <trkseg><trkpt lat=\"10.0\" lon=\"20.0\"></trkpt></trkseg></trk>"
        );
    }

    #[test]
    fn test_empty_segment() {
        let seg = new_element(TrackSegment);
        assert_eq!(seg.borrow().render().unwrap(), "<trkseg></trkseg>");
    }
}
