//! Response envelope parsing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AsanaError, ErrorBody, Result};
use crate::request::Request;
use crate::transport::RawResponse;

/// A JSON object as returned by the API.
pub type RawObject = Map<String, Value>;

/// The `data` member of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(RawObject),
    Many(Vec<RawObject>),
}

impl Payload {
    /// Items of a list payload; a single object becomes a one-item list.
    pub fn into_many(self) -> Vec<RawObject> {
        match self {
            Self::One(object) => vec![object],
            Self::Many(objects) => objects,
        }
    }
}

/// Continuation token for the next page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NextPage {
    pub offset: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Parsed response: the payload plus pagination metadata, kept apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub data: Payload,
    pub next_page: Option<NextPage>,
}

impl Envelope {
    /// The single object of a non-list response.
    ///
    /// # Errors
    ///
    /// Returns [`AsanaError::MalformedResponse`] if the payload is a list.
    pub fn into_one(self, request: &Request) -> Result<RawObject> {
        match self.data {
            Payload::One(object) => Ok(object),
            Payload::Many(_) => Err(malformed(request, "expected a single object in `data`")),
        }
    }
}

/// Turn a raw response into an [`Envelope`].
///
/// # Errors
///
/// - [`AsanaError::Api`] for any non-2xx status
/// - [`AsanaError::MalformedResponse`] for a 2xx body that is not JSON or lacks `data`
pub fn parse(request: &Request, raw: RawResponse) -> Result<Envelope> {
    if !raw.is_success() {
        let retry_after_secs = raw.header("retry-after").and_then(|v| v.trim().parse().ok());
        let body = ErrorBody::from_bytes(&raw.body);
        tracing::warn!(status = raw.status, %request, error = %body, "API request failed");
        return Err(AsanaError::Api {
            status: raw.status,
            method: request.method,
            path: request.path.clone(),
            body,
            retry_after_secs,
        });
    }

    let json: Value = serde_json::from_slice(&raw.body)
        .map_err(|e| malformed(request, &format!("body is not valid JSON: {e}")))?;

    let Value::Object(mut envelope) = json else {
        return Err(malformed(request, "body is not a JSON object"));
    };

    let data = match envelope.remove("data") {
        Some(Value::Object(object)) => Payload::One(object),
        Some(Value::Array(items)) => Payload::Many(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => Ok(object),
                    _ => Err(malformed(request, "`data` array contains a non-object")),
                })
                .collect::<Result<_>>()?,
        ),
        Some(_) => return Err(malformed(request, "`data` is neither an object nor an array")),
        None => return Err(malformed(request, "missing `data` member")),
    };

    let next_page = match envelope.remove("next_page") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<NextPage>(value)
                .map_err(|e| malformed(request, &format!("invalid `next_page`: {e}")))?,
        ),
    };

    Ok(Envelope { data, next_page })
}

fn malformed(request: &Request, reason: &str) -> AsanaError {
    AsanaError::MalformedResponse {
        method: request.method,
        path: request.path.clone(),
        reason: reason.to_string(),
    }
}
