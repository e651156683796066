//! Request parsing for the service facade.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ApiError, ApiResult};

/// HTTP method understood by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ApiError::BadRequest(format!("Unsupported method: {s}"))),
        }
    }
}

/// A parsed request: method, decoded path segments, query and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    segments: Vec<String>,
    query: BTreeMap<String, String>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Parse a request target such as `/clients?visibleTo=Jane%20Smith&role=Admin`.
    ///
    /// An optional `/api` prefix is accepted and stripped.
    pub fn new(method: Method, target: &str) -> ApiResult<Self> {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let path = path
            .strip_prefix("/api")
            .filter(|p| p.is_empty() || p.starts_with('/'))
            .unwrap_or(path);

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect::<ApiResult<Vec<_>>>()?;

        let mut pairs = BTreeMap::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            pairs.insert(decode_query(key)?, decode_query(value)?);
        }

        let path = format!("/{}", segments.join("/"));
        Ok(Self { method, path, segments, query: pairs, body: None })
    }

    /// Shorthand for a `GET` request.
    pub fn get(target: &str) -> ApiResult<Self> {
        Self::new(Method::Get, target)
    }

    /// Shorthand for a `POST` request.
    pub fn post(target: &str) -> ApiResult<Self> {
        Self::new(Method::Post, target)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a body given as JSON text.
    pub fn with_body_str(self, body: &str) -> ApiResult<Self> {
        let value = serde_json::from_str(body)
            .map_err(|e| ApiError::Serialization(format!("Invalid JSON body: {e}")))?;
        Ok(self.with_body(value))
    }

    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    /// A decoded query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// A query parameter parsed into `T`, or `None` when absent.
    pub fn query_parsed<T: FromStr>(&self, key: &str) -> ApiResult<Option<T>> {
        self.query(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid value for {key}: {raw}")))
            })
            .transpose()
    }

    /// Deserialize the body, failing when it is missing or malformed.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body =
            self.body.clone().ok_or_else(|| ApiError::BadRequest("Request body is required".into()))?;
        serde_json::from_value(body).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Percent-decode one path segment. `+` is kept as is.
fn decode_segment(raw: &str) -> ApiResult<String> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| ApiError::BadRequest(format!("Malformed URL component: {raw}")))
}

/// Percent-decode one query key or value; `+` stands for a space.
fn decode_query(raw: &str) -> ApiResult<String> {
    decode_segment(&raw.replace('+', " "))
        .map_err(|_| ApiError::BadRequest(format!("Malformed URL component: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert!("PATCH".parse::<Method>().is_err());
    }

    #[test]
    fn test_query_decoding() {
        let request = ApiRequest::get("/clients?visibleTo=Jane%20Smith&role=Pathways+Representative")
            .unwrap();
        assert_eq!(request.segments(), vec!["clients"]);
        assert_eq!(request.query("visibleTo"), Some("Jane Smith"));
        assert_eq!(request.query("role"), Some("Pathways Representative"));
        assert_eq!(request.query("missing"), None);
    }

    #[test]
    fn test_plus_only_means_space_in_query() {
        let request = ApiRequest::get("/clients/a+b/workflow?visibleTo=a+b").unwrap();
        assert_eq!(request.segments(), vec!["clients", "a+b", "workflow"]);
        assert_eq!(request.path, "/clients/a+b/workflow");
        assert_eq!(request.query("visibleTo"), Some("a b"));

        let encoded = ApiRequest::get("/clients/a%20b/workflow").unwrap();
        assert_eq!(encoded.segments(), vec!["clients", "a b", "workflow"]);
    }

    #[test]
    fn test_api_prefix_stripped() {
        let request = ApiRequest::get("/api/clients/1/workflow").unwrap();
        assert_eq!(request.path, "/clients/1/workflow");
        assert_eq!(request.segments(), vec!["clients", "1", "workflow"]);

        let request = ApiRequest::get("/apiary").unwrap();
        assert_eq!(request.segments(), vec!["apiary"]);
    }

    #[test]
    fn test_query_parsed() {
        let request = ApiRequest::post("/x?expectedVersion=3&bad=abc").unwrap();
        assert_eq!(request.query_parsed::<u64>("expectedVersion").unwrap(), Some(3));
        assert_eq!(request.query_parsed::<u64>("absent").unwrap(), None);
        assert!(request.query_parsed::<u64>("bad").is_err());
    }

    #[test]
    fn test_body_errors() {
        let request = ApiRequest::post("/users").unwrap();
        assert!(matches!(request.json::<Value>(), Err(ApiError::BadRequest(_))));
        assert!(matches!(request.with_body_str("{not json"), Err(ApiError::Serialization(_))));
    }
}
