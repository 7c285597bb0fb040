//! Request construction.
//!
//! A [`RequestBuilder`] turns a path template, typed parameters and a
//! [`RequestOptions`] bag into a [`Request`]: a plain value that any
//! [`Transport`](crate::Transport) can execute. Nothing here touches the
//! network, so every validation error surfaces before a call is attempted.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{AsanaError, Result};
use crate::params::{is_blank, query_string_value, RequestOptions};

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A fully resolved request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    /// Resolved path relative to the API base URL, always starting with `/`.
    pub path: String,
    /// Query parameters, sorted by name. Blank values never appear here.
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl Request {
    /// Look up a query parameter.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The same request continued at a pagination offset.
    #[must_use]
    pub fn with_offset(&self, offset: &str) -> Self {
        let mut next = self.clone();
        next.query.insert("offset".to_string(), offset.to_string());
        next
    }

    /// Percent-encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Builds a [`Request`] from a path template such as `/users/{user_gid}`.
///
/// # Example
///
/// ```
/// use asanapi::{HttpMethod, RequestBuilder};
///
/// let request = RequestBuilder::new(HttpMethod::Get, "/workspaces/{workspace_gid}/users")
///     .path_param("workspace_gid", "1234")
///     .query("limit", 20)
///     .query("offset", serde_json::Value::Null)
///     .build()
///     .unwrap();
/// assert_eq!(request.path, "/workspaces/1234/users");
/// assert_eq!(request.query_value("limit"), Some("20"));
/// assert_eq!(request.query_value("offset"), None);
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: HttpMethod,
    template: String,
    path_params: Vec<(String, String)>,
    query: BTreeMap<String, Value>,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl RequestBuilder {
    pub fn new(method: HttpMethod, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: Vec::new(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(template: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, template)
    }

    /// Bind a `{name}` placeholder. The value is percent-encoded verbatim.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Set a query parameter. Later calls win.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Merge an options bag: extra params, headers, body and `opt_*` flags.
    ///
    /// Page size is not applied here; callers resolve it against the client default.
    #[must_use]
    pub fn options(mut self, options: &RequestOptions) -> Self {
        for (name, value) in &options.params {
            self.query.insert(name.clone(), value.clone());
        }
        for (name, value) in options.option_params() {
            self.query.insert(name.to_string(), value);
        }
        self.headers
            .extend(options.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(body) = &options.body {
            self.body = Some(body.clone());
        }
        self
    }

    /// Resolve the template and strip blank query values.
    ///
    /// # Errors
    ///
    /// Returns [`AsanaError::InvalidPath`] if a placeholder is unbound or bound to
    /// an empty, `.` or `..` value.
    pub fn build(&self) -> Result<Request> {
        let path = self.render_path()?;
        let query = self
            .query
            .iter()
            .filter(|(_, value)| !is_blank(value))
            .map(|(name, value)| (name.clone(), query_string_value(value)))
            .collect();

        Ok(Request {
            method: self.method,
            path,
            query,
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }

    fn render_path(&self) -> Result<String> {
        let template = self.template.as_str();
        let mut out = String::with_capacity(template.len());
        if !template.starts_with('/') {
            out.push('/');
        }

        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                return Err(self.unresolved(after));
            };
            let name = &after[..end];
            let value = self
                .path_params
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .filter(|v| !is_dot_segment(v))
                .ok_or_else(|| self.unresolved(name))?;
            out.push_str(&urlencoding::encode(value));
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn unresolved(&self, placeholder: &str) -> AsanaError {
        AsanaError::InvalidPath {
            template: self.template.clone(),
            placeholder: placeholder.to_string(),
        }
    }
}

/// Values that would vanish from the path or climb out of it once resolved.
fn is_dot_segment(value: &str) -> bool {
    matches!(value, "" | "." | "..")
}
