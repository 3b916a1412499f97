//! Text forms of GPX simple types.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;

use crate::error::{Error, Result};

/// Formats an `xsd:decimal` value.
///
/// Integral values keep one fractional digit (`45.0`), others use the
/// shortest exact representation. No exponent is ever written, since the
/// schema type does not allow one. Returns `None` for NaN and infinities.
pub fn format_decimal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Some(format!("{:.1}", value))
    } else {
        Some(format!("{}", value))
    }
}

/// Formats an `xsd:gYear` value, padded to at least four digits.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{:04}", year)
    }
}

/// Formats an `xsd:dateTime` value in UTC with a `Z` suffix.
pub fn format_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Returns true if `c` may appear in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escapes markup characters in `text`, refusing characters XML cannot carry.
pub(crate) fn escape_checked<'t>(
    element: &'static str,
    field: &str,
    text: &'t str,
) -> Result<Cow<'t, str>> {
    if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
        return Err(Error::contract(
            element,
            format!("`{}` contains U+{:04X}, which XML cannot represent", field, c as u32),
        ));
    }
    Ok(escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integral_decimals_keep_one_digit() {
        assert_eq!(format_decimal(45.0).as_deref(), Some("45.0"));
        assert_eq!(format_decimal(-93.0).as_deref(), Some("-93.0"));
        assert_eq!(format_decimal(0.0).as_deref(), Some("0.0"));
    }

    #[test]
    fn test_fractional_decimals() {
        assert_eq!(format_decimal(45.123456).as_deref(), Some("45.123456"));
        assert_eq!(format_decimal(-0.5).as_deref(), Some("-0.5"));
    }

    #[test]
    fn test_no_exponent() {
        assert_eq!(format_decimal(1e-7).as_deref(), Some("0.0000001"));
        assert_eq!(
            format_decimal(1e20).as_deref(),
            Some("100000000000000000000")
        );
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert!(format_decimal(f64::NAN).is_none());
        assert!(format_decimal(f64::INFINITY).is_none());
        assert!(format_decimal(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn test_year_padding() {
        assert_eq!(format_year(2012), "2012");
        assert_eq!(format_year(5), "0005");
        assert_eq!(format_year(-44), "-0044");
        assert_eq!(format_year(12345), "12345");
    }

    #[test]
    fn test_xml_chars() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('é'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{1}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    #[test]
    fn test_escape_checked() {
        assert_eq!(escape_checked("wpt", "name", "a & b").unwrap(), "a &amp; b");
        let err = escape_checked("wpt", "name", "a\u{1}b").unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("U+0001"), "{}", err);
    }

    #[test]
    fn test_time_is_utc_with_z() {
        let t = Utc.with_ymd_and_hms(2012, 4, 6, 9, 30, 0).unwrap();
        assert_eq!(format_time(&t), "2012-04-06T09:30:00Z");
    }
}
