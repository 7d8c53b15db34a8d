//! Transport-neutral request model.
//!
//! # Responsibility
//! - Carry the request path and decoded form values into the workflow.
//! - Resolve form fields the way HTML form posts expect (body before query).
//! - Percent-decode the path before it is validated.

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Decoded form fields from the request body and URL query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    body: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl FormValues {
    /// Decodes a query string (without the leading `?`).
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = decode(query.as_bytes());
        self
    }

    /// Decodes a form-encoded request body.
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = decode(body);
        self
    }

    /// Uses already-decoded body fields, e.g. text parts of a multipart body.
    pub fn with_body_fields(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = fields;
        self
    }

    /// Returns the first value for `key`, preferring body fields over query
    /// fields. Missing keys yield an empty string.
    pub fn value(&self, key: &str) -> &str {
        self.body
            .iter()
            .chain(self.query.iter())
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

fn decode(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input).into_owned().collect()
}

/// Returns whether a `Content-Type` header value denotes a url-encoded form body.
pub fn is_form_content_type(content_type: &str) -> bool {
    media_type_is(content_type, FORM_CONTENT_TYPE)
}

/// Returns whether a `Content-Type` header value denotes a multipart form body.
///
/// Multipart bodies are decoded by the transport and handed over through
/// [`PageRequest::with_form_fields`].
pub fn is_multipart_content_type(content_type: &str) -> bool {
    media_type_is(content_type, MULTIPART_CONTENT_TYPE)
}

fn media_type_is(content_type: &str, expected: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// Percent-decodes a raw URL path.
///
/// Sequences that do not decode to UTF-8 leave the path untouched, so the
/// page grammar rejects it.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// One inbound page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// URL path, already stripped of query and fragment.
    pub path: String,
    pub form: FormValues,
}

impl PageRequest {
    /// Creates a request with no form values.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            form: FormValues::default(),
        }
    }

    /// Builds a request from raw HTTP parts.
    ///
    /// `raw_path` is percent-decoded. The body is decoded only when
    /// `content_type` is url-encoded.
    pub fn from_parts(
        raw_path: &str,
        query: Option<&str>,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Self {
        let mut form = FormValues::default();
        if let Some(query) = query {
            form = form.with_query(query);
        }
        if content_type.map(is_form_content_type).unwrap_or(false) {
            form = form.with_body(body);
        }
        Self {
            path: decode_path(raw_path),
            form,
        }
    }

    /// Replaces body form values with already-decoded fields.
    pub fn with_form_fields(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = self.form.with_body_fields(fields);
        self
    }

    /// Replaces form values with a decoded form-encoded body.
    pub fn with_form_body(mut self, body: &[u8]) -> Self {
        self.form = self.form.with_body(body);
        self
    }
}
