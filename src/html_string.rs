use std::ops::Deref;

use derive_more::Display;

/// Text that is safe to embed in html content and attribute values.
#[derive(Debug, Clone, Display, PartialEq, Eq)]
#[display("{}", _0)]
pub struct HtmlString(String);

impl HtmlString {
    #[must_use]
    pub fn escape(value: &str) -> Self {
        Self(v_htmlescape::escape(value).to_string())
    }

    /// Escapes an url for an attribute value, slashes are kept readable.
    #[must_use]
    pub fn escape_url(value: &str) -> Self {
        Self(Self::escape(value).0.replace("&#x2f;", "/"))
    }
}

impl Deref for HtmlString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
