//! Constants used when rendering GPX documents.

/// GPX schema version written on the root element.
pub const GPX_VERSION: &str = "1.1";

/// Default namespace of GPX 1.1 documents.
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Location of the GPX 1.1 schema, paired with its namespace.
pub const GPX_SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML declaration written before the `<gpx>` root.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Creator written on documents when the caller does not supply one.
pub const DEFAULT_CREATOR: &str = concat!("gpx-model ", env!("CARGO_PKG_VERSION"));

/// Indentation unit used by pretty printing.
pub const DEFAULT_INDENT: &str = "  ";

/// Valid latitude range in decimal degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range in decimal degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Magnetic variation is an angle in `[0, 360)`.
pub const MAX_DEGREES: f64 = 360.0;

/// Largest DGPS station id allowed by the schema.
pub const MAX_DGPS_STATION: u16 = 1023;
