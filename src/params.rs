//! Parameter contracts and per-request options.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{AsanaError, Result};

/// Default number of records fetched per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Unwrap a required parameter, failing before any request is built.
///
/// # Errors
///
/// Returns [`AsanaError::MissingParameter`] when `value` is `None`.
pub fn require<T>(operation: &'static str, name: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or(AsanaError::MissingParameter { operation, name })
}

/// Whether a query value carries nothing worth sending.
///
/// `false`, `0` and `""` are real values and are kept.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Render a query value the way the API expects it on the query string.
pub fn query_string_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(query_string_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Request I/O options accepted by every operation.
///
/// # Example
///
/// ```
/// use asanapi::RequestOptions;
///
/// let options = RequestOptions::new()
///     .per_page(50)
///     .fields(["name", "email"])
///     .param("workspace", "1234");
/// assert_eq!(options.per_page, Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Extra query parameters.
    pub params: BTreeMap<String, Value>,
    /// JSON body, sent unchanged.
    pub body: Option<Value>,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Records per page; falls back to the client default.
    pub per_page: Option<u32>,
    /// Sent as `opt_fields`.
    pub fields: Vec<String>,
    /// Sent as `opt_expand`.
    pub expand: Vec<String>,
    /// Sent as `opt_pretty`.
    pub pretty: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn expand<S: Into<String>>(mut self, expand: impl IntoIterator<Item = S>) -> Self {
        self.expand = expand.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Resolve the page size against a default.
    ///
    /// # Errors
    ///
    /// Returns [`AsanaError::InvalidParameter`] for a page size of zero.
    pub fn resolved_per_page(&self, default: u32) -> Result<u32> {
        match self.per_page.unwrap_or(default) {
            0 => Err(AsanaError::InvalidParameter {
                name: "per_page",
                reason: "must be a positive integer".to_string(),
            }),
            n => Ok(n),
        }
    }

    /// The `opt_*` parameters implied by these options.
    pub(crate) fn option_params(&self) -> Vec<(&'static str, Value)> {
        let mut out = Vec::new();
        if !self.fields.is_empty() {
            out.push(("opt_fields", Value::from(self.fields.clone())));
        }
        if !self.expand.is_empty() {
            out.push(("opt_expand", Value::from(self.expand.clone())));
        }
        if self.pretty {
            out.push(("opt_pretty", Value::Bool(true)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_present_value() {
        assert_eq!(require("op", "workspace", Some("W")).unwrap(), "W");
    }

    #[test]
    fn test_require_missing_value_names_parameter() {
        let err = require::<&str>("User::favorites", "resource_type", None).unwrap_err();
        match err {
            AsanaError::MissingParameter { operation, name } => {
                assert_eq!(operation, "User::favorites");
                assert_eq!(name, "resource_type");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_blank_keeps_false_and_zero() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!("")));
    }

    #[test]
    fn test_query_string_value_formats() {
        assert_eq!(query_string_value(&json!("abc")), "abc");
        assert_eq!(query_string_value(&json!(20)), "20");
        assert_eq!(query_string_value(&json!(false)), "false");
        assert_eq!(query_string_value(&json!(["name", "email"])), "name,email");
    }

    #[test]
    fn test_per_page_must_be_positive() {
        assert_eq!(RequestOptions::new().resolved_per_page(20).unwrap(), 20);
        assert_eq!(RequestOptions::new().per_page(5).resolved_per_page(20).unwrap(), 5);
        assert!(matches!(
            RequestOptions::new().per_page(0).resolved_per_page(20),
            Err(AsanaError::InvalidParameter { name: "per_page", .. })
        ));
    }

    #[test]
    fn test_option_params() {
        let options = RequestOptions::new()
            .fields(["name", "email"])
            .expand(["workspaces"])
            .pretty(true);
        let params = options.option_params();
        assert_eq!(params[0], ("opt_fields", json!(["name", "email"])));
        assert_eq!(params[1], ("opt_expand", json!(["workspaces"])));
        assert_eq!(params[2], ("opt_pretty", json!(true)));
    }
}
