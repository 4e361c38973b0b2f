//! A single REST method described by a discovery document.

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::DocumentError;

/// One callable method: HTTP verb plus a URL template.
///
/// Templates use discovery syntax: `{name}` stands for a single path
/// segment and `{+name}` for a reserved expansion that may contain `/`.
#[derive(Debug, Clone)]
pub struct DiscoveryEndpoint {
    base_url: String,
    id: Option<String>,
    http_method: String,
    path: String,
    description: Option<String>,
    pattern: Regex,
}

impl DiscoveryEndpoint {
    /// Build an endpoint from a discovery `methods` entry.
    ///
    /// `field` is the dotted location of the entry, used in errors.
    pub(crate) fn from_method(
        base_url: &str,
        method: &Map<String, Value>,
        field: &str,
    ) -> Result<Self, DocumentError> {
        let path = method
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| DocumentError::MissingField {
                field: format!("{field}.path"),
            })?;

        let string_field = |key: &str| method.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            base_url: base_url.to_string(),
            id: string_field("id"),
            http_method: string_field("httpMethod").unwrap_or_else(|| "GET".to_string()),
            path: path.to_string(),
            description: string_field("description"),
            pattern: compile_template(&format!("{base_url}{path}"))?,
        })
    }

    /// Method id, e.g. `drive.files.list`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    /// Path template relative to the document's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Full URL template: base URL followed by the path template.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// Whether a concrete URL is an instance of this endpoint's template.
    /// Any query string or fragment on `url` is ignored.
    pub fn matches(&self, url: &str) -> bool {
        let without_query = url.split(['?', '#']).next().unwrap_or_default();
        self.pattern.is_match(without_query)
    }
}

/// Translate a URL template into an anchored regex.
fn compile_template(template: &str) -> Result<Regex, DocumentError> {
    let invalid = |reason: &str| DocumentError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    let mut pattern = String::from("^");
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));

        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
        let name = &after[..close];
        if name.is_empty() || name == "+" {
            return Err(invalid("empty parameter name"));
        }

        if name.starts_with('+') {
            pattern.push_str("(.+)");
        } else {
            pattern.push_str("([^/]+)");
        }

        rest = &after[close + 1..];
    }

    if rest.contains('}') {
        return Err(invalid("unmatched '}'"));
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))
}
