//! Unwraps OData response envelopes.
//!
//! Verbose responses wrap the payload in `{"d": ...}` and collections in
//! `{"d": {"results": [...]}}`; the lighter formats use `{"value": ...}`.

use crate::domain::http::HttpResponse;
use crate::utils::error::{Result, SpError};
use serde_json::Value;

/// Returns the payload of a successful response, or the error it describes.
pub fn parse_response(url: &str, response: &HttpResponse) -> Result<Value> {
    check_status(url, response)?;

    if response.status == 204 || response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    let json: Value = serde_json::from_slice(&response.body)?;
    Ok(unwrap_envelope(json))
}

pub fn check_status(url: &str, response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    tracing::warn!("Request to {} failed with status {}", url, response.status);

    if response.status == 404 {
        return Err(SpError::NotFound {
            url: url.to_string(),
        });
    }

    let body = response.body_text();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| error_message(&json))
        .unwrap_or(body);

    Err(SpError::HttpStatus {
        status: response.status,
        url: url.to_string(),
        message,
    })
}

pub fn unwrap_envelope(json: Value) -> Value {
    match json {
        Value::Object(mut obj) => {
            if let Some(d) = obj.remove("d") {
                match d {
                    Value::Object(mut inner) if inner.contains_key("results") => {
                        inner.remove("results").unwrap_or(Value::Null)
                    }
                    other => other,
                }
            } else if let Some(value) = obj.remove("value") {
                value
            } else {
                Value::Object(obj)
            }
        }
        other => other,
    }
}

/// Pulls the human readable message out of an OData error body.
fn error_message(json: &Value) -> Option<String> {
    let error = json.get("error").or_else(|| json.get("odata.error"))?;
    match error.get("message")? {
        Value::String(s) => Some(s.clone()),
        message => message.get("value")?.as_str().map(str::to_string),
    }
}

/// A scalar answer such as `{"d": {"Recycle": "<guid>"}}` reduces to its single value.
pub fn single_value(payload: Value) -> Option<Value> {
    match payload {
        Value::Object(mut obj) => {
            obj.remove("__metadata");
            if obj.len() == 1 {
                obj.into_iter().next().map(|(_, v)| v)
            } else {
                None
            }
        }
        Value::Null => None,
        other => Some(other),
    }
}
