//! Parsed discovery document.
//!
//! See <https://developers.google.com/discovery/v1/using> for the format.
//! Beyond being a JSON object the document is not validated; the accessors
//! below read the parts they need and report shape mismatches as
//! [`DocumentError`].

use std::collections::HashSet;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::discovery::endpoint::DiscoveryEndpoint;
use crate::error::{DocumentError, json_kind};

/// One service's API description, as fetched.
///
/// Endpoints are extracted and their URL patterns compiled on first use,
/// then reused by every later call.
#[derive(Debug, Clone)]
pub struct DiscoveryDocument {
    value: Map<String, Value>,
    endpoints: OnceLock<Result<Vec<DiscoveryEndpoint>, DocumentError>>,
}

impl PartialEq for DiscoveryDocument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl DiscoveryDocument {
    pub fn new(value: Map<String, Value>) -> Self {
        Self {
            value,
            endpoints: OnceLock::new(),
        }
    }

    /// Parse document text. The top level must be a JSON object.
    pub fn parse(definition: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(definition)?))
    }

    /// The underlying JSON object.
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.value
    }

    pub fn into_json(self) -> Map<String, Value> {
        self.value
    }

    /// `rootUrl` followed by `servicePath`, falling back to the legacy
    /// `baseUrl` field when neither is present.
    pub fn base_url(&self) -> String {
        let root = self.str_field("rootUrl");
        let service_path = self.str_field("servicePath");

        match (root, service_path) {
            (None, None) => self.str_field("baseUrl").unwrap_or_default().to_string(),
            (root, service_path) => {
                format!("{}{}", root.unwrap_or_default(), service_path.unwrap_or_default())
            }
        }
    }

    /// Human readable API name (`title`).
    pub fn api_name(&self) -> Result<&str, DocumentError> {
        self.required_str("title")
    }

    /// Documentation link (`documentationLink`).
    pub fn doc_link(&self) -> Result<&str, DocumentError> {
        self.required_str("documentationLink")
    }

    /// Every method in the document: top-level methods first, then each
    /// resource's methods followed by its nested resources, depth first.
    pub fn endpoints(&self) -> Result<&[DiscoveryEndpoint], DocumentError> {
        self.endpoints
            .get_or_init(|| self.collect_endpoints())
            .as_deref()
            .map_err(|e| e.clone())
    }

    fn collect_endpoints(&self) -> Result<Vec<DiscoveryEndpoint>, DocumentError> {
        let base_url = self.base_url();
        let mut endpoints = Vec::new();

        collect_methods(&self.value, "", &base_url, &mut endpoints)?;
        expand_resources(&self.value, "", &base_url, &mut endpoints)?;

        Ok(endpoints)
    }

    /// Distinct endpoint URL templates, in discovery order.
    pub fn urls(&self) -> Result<Vec<String>, DocumentError> {
        let mut seen = HashSet::new();
        Ok(self
            .endpoints()?
            .iter()
            .map(DiscoveryEndpoint::url)
            .filter(|url| seen.insert(url.clone()))
            .collect())
    }

    /// The endpoint for a concrete URL, preferring GET when several match.
    pub fn find_endpoint(&self, url: &str) -> Result<Option<&DiscoveryEndpoint>, DocumentError> {
        // min_by_key keeps the first of equals, i.e. discovery order.
        Ok(self
            .endpoints()?
            .iter()
            .filter(|e| e.url() == url || e.matches(url))
            .min_by_key(|e| e.http_method() != "GET"))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(Value::as_str)
    }

    fn required_str(&self, key: &str) -> Result<&str, DocumentError> {
        match self.value.get(key) {
            None => Err(DocumentError::MissingField {
                field: key.to_string(),
            }),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(DocumentError::InvalidShape {
                field: key.to_string(),
                expected: "a string",
                found: json_kind(other),
            }),
        }
    }
}

fn join_field(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// An optional object-valued field. Absent means empty; any other kind is
/// a shape error.
fn object_field<'a>(
    node: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<&'a Map<String, Value>>, DocumentError> {
    match node.get(key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(DocumentError::InvalidShape {
            field: field.to_string(),
            expected: "an object",
            found: json_kind(other),
        }),
    }
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, DocumentError> {
    value.as_object().ok_or_else(|| DocumentError::InvalidShape {
        field: field.to_string(),
        expected: "an object",
        found: json_kind(value),
    })
}

fn collect_methods(
    node: &Map<String, Value>,
    field: &str,
    base_url: &str,
    out: &mut Vec<DiscoveryEndpoint>,
) -> Result<(), DocumentError> {
    let methods_field = join_field(field, "methods");
    let Some(methods) = object_field(node, "methods", &methods_field)? else {
        return Ok(());
    };

    for (name, method) in methods {
        let method_field = join_field(&methods_field, name);
        let method = as_object(method, &method_field)?;
        out.push(DiscoveryEndpoint::from_method(base_url, method, &method_field)?);
    }
    Ok(())
}

fn expand_resources(
    node: &Map<String, Value>,
    field: &str,
    base_url: &str,
    out: &mut Vec<DiscoveryEndpoint>,
) -> Result<(), DocumentError> {
    let resources_field = join_field(field, "resources");
    let Some(resources) = object_field(node, "resources", &resources_field)? else {
        return Ok(());
    };

    for (name, resource) in resources {
        let resource_field = join_field(&resources_field, name);
        let resource = as_object(resource, &resource_field)?;
        collect_methods(resource, &resource_field, base_url, out)?;
        expand_resources(resource, &resource_field, base_url, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_document() -> DiscoveryDocument {
        DiscoveryDocument::parse(
            r#"{
                "kind": "discovery#restDescription",
                "id": "drive:v3",
                "title": "Google Drive API",
                "documentationLink": "https://developers.google.com/drive/",
                "rootUrl": "https://www.googleapis.com/",
                "servicePath": "drive/v3/",
                "resources": {
                    "files": {
                        "methods": {
                            "get": {
                                "id": "drive.files.get",
                                "path": "files/{fileId}",
                                "httpMethod": "GET"
                            },
                            "delete": {
                                "id": "drive.files.delete",
                                "path": "files/{fileId}",
                                "httpMethod": "DELETE"
                            },
                            "list": {
                                "id": "drive.files.list",
                                "path": "files",
                                "httpMethod": "GET"
                            }
                        },
                        "resources": {
                            "revisions": {
                                "methods": {
                                    "list": {
                                        "id": "drive.files.revisions.list",
                                        "path": "files/{fileId}/revisions",
                                        "httpMethod": "GET"
                                    }
                                }
                            }
                        }
                    },
                    "about": {
                        "methods": {
                            "get": {
                                "id": "drive.about.get",
                                "path": "about",
                                "httpMethod": "GET"
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_and_metadata() {
        let doc = drive_document();
        assert_eq!(doc.base_url(), "https://www.googleapis.com/drive/v3/");
        assert_eq!(doc.api_name().unwrap(), "Google Drive API");
        assert_eq!(doc.doc_link().unwrap(), "https://developers.google.com/drive/");
    }

    #[test]
    fn test_base_url_fallbacks() {
        let doc = DiscoveryDocument::parse(r#"{"baseUrl": "https://legacy.example.com/api/"}"#).unwrap();
        assert_eq!(doc.base_url(), "https://legacy.example.com/api/");

        let doc = DiscoveryDocument::parse(r#"{"rootUrl": "https://x.example.com/"}"#).unwrap();
        assert_eq!(doc.base_url(), "https://x.example.com/");

        let doc = DiscoveryDocument::parse("{}").unwrap();
        assert_eq!(doc.base_url(), "");
    }

    #[test]
    fn test_metadata_shape_errors() {
        let doc = DiscoveryDocument::parse(r#"{"title": 42}"#).unwrap();
        assert_eq!(
            doc.api_name().unwrap_err(),
            DocumentError::InvalidShape {
                field: "title".to_string(),
                expected: "a string",
                found: "number",
            }
        );
        assert!(matches!(
            doc.doc_link().unwrap_err(),
            DocumentError::MissingField { .. }
        ));
    }

    #[test]
    fn test_endpoints_recurse_into_nested_resources() {
        let doc = drive_document();
        let ids: Vec<_> = doc
            .endpoints()
            .unwrap()
            .iter()
            .map(|e| e.id().unwrap().to_string())
            .collect();

        // serde_json orders keys, so "about" comes before "files".
        assert_eq!(
            ids,
            vec![
                "drive.about.get",
                "drive.files.delete",
                "drive.files.get",
                "drive.files.list",
                "drive.files.revisions.list",
            ]
        );
    }

    #[test]
    fn test_urls_are_distinct() {
        let urls = drive_document().urls().unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.googleapis.com/drive/v3/about",
                "https://www.googleapis.com/drive/v3/files/{fileId}",
                "https://www.googleapis.com/drive/v3/files",
                "https://www.googleapis.com/drive/v3/files/{fileId}/revisions",
            ]
        );
    }

    #[test]
    fn test_find_endpoint_prefers_get() {
        let doc = drive_document();
        let endpoint = doc
            .find_endpoint("https://www.googleapis.com/drive/v3/files/abc")
            .unwrap()
            .unwrap();
        assert_eq!(endpoint.id(), Some("drive.files.get"));
        assert_eq!(endpoint.http_method(), "GET");
    }

    #[test]
    fn test_find_endpoint_by_template_url() {
        let doc = drive_document();
        let endpoint = doc
            .find_endpoint("https://www.googleapis.com/drive/v3/files/{fileId}/revisions")
            .unwrap()
            .unwrap();
        assert_eq!(endpoint.id(), Some("drive.files.revisions.list"));
    }

    #[test]
    fn test_find_endpoint_no_match() {
        let doc = drive_document();
        assert!(
            doc.find_endpoint("https://www.googleapis.com/gmail/v1/users/me")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_resources_wrong_shape() {
        let doc = DiscoveryDocument::parse(r#"{"resources": {"files": {"methods": []}}}"#).unwrap();
        assert_eq!(
            doc.endpoints().unwrap_err(),
            DocumentError::InvalidShape {
                field: "resources.files.methods".to_string(),
                expected: "an object",
                found: "array",
            }
        );
    }

    #[test]
    fn test_top_level_methods_included() {
        let doc = DiscoveryDocument::parse(
            r#"{
                "rootUrl": "https://x.example.com/",
                "servicePath": "",
                "methods": {"ping": {"id": "x.ping", "path": "ping", "httpMethod": "GET"}}
            }"#,
        )
        .unwrap();
        let endpoints = doc.endpoints().unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].url(), "https://x.example.com/ping");
    }

    #[test]
    fn test_endpoints_computed_once() {
        let doc = drive_document();
        let first = doc.endpoints().unwrap();
        let second = doc.endpoints().unwrap();
        assert!(std::ptr::eq(first, second));

        // The cache does not take part in equality.
        assert_eq!(doc, drive_document());
    }

    #[test]
    fn test_endpoint_errors_repeat() {
        let doc = DiscoveryDocument::parse(r#"{"methods": {"ping": {"httpMethod": "GET"}}}"#).unwrap();
        let first = doc.endpoints().unwrap_err();
        assert_eq!(doc.endpoints().unwrap_err(), first);
        assert!(doc.urls().is_err());
    }

    #[test]
    fn test_round_trip_value() {
        let value = serde_json::json!({"id": "x"});
        let doc = DiscoveryDocument::new(value.as_object().unwrap().clone());
        assert_eq!(Value::Object(doc.into_json()), value);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(DiscoveryDocument::parse("[]").is_err());
        assert!(DiscoveryDocument::parse("not json").is_err());
    }
}
