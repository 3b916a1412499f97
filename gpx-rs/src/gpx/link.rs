//! Links to external resources.

use crate::element::GpxElement;
use crate::error::Result;
use crate::render::BodyWriter;

use super::required_text;

/// A link to an external resource with additional information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    /// URL of the resource.
    pub href: String,
    /// Text of the hyperlink.
    pub text: Option<String>,
    /// MIME type of the content.
    pub mime_type: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            ..Link::default()
        }
    }
}

impl GpxElement for Link {
    fn attributes(&self) -> Result<Vec<(String, String)>> {
        let href = required_text("link", "href", &self.href)?;
        Ok(vec![("href".to_string(), href.to_string())])
    }

    fn write_body(&self, body: &mut BodyWriter<'_>) -> Result<()> {
        body.text("text", self.text.as_deref())?;
        body.text("type", self.mime_type.as_deref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::new_element;

    #[test]
    fn test_link_with_text() {
        let link = new_element(Link {
            text: Some("Home".to_string()),
            mime_type: Some("text/html".to_string()),
            ..Link::new("https://example.com/?a=1&b=2")
        });
        assert_eq!(
            link.borrow().render().unwrap(),
            "<link href=\"https://example.com/?a=1&amp;b=2\"><text>Home</text><type>text/html</type></link>"
        );
    }

    #[test]
    fn test_link_requires_href() {
        let link = new_element(Link::default());
        assert!(link.borrow().render().unwrap_err().is_contract_violation());
    }
}
