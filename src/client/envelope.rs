use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{FetchError, FetchErrorKind, RawResponse};
use crate::resource::Pagination;

/// A decoded success envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<P> {
    pub payload: P,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Interprets `{ <field>: payload, pagination? }` or `{ error }`.
pub fn decode_envelope<P: DeserializeOwned>(
    field: &str,
    raw: &RawResponse,
) -> Result<Fetched<P>, FetchError> {
    let mut body = accepted_body(raw)?;

    let payload = body
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| FetchError::decode(format!("response has no '{}' field", field)))?;
    let payload = serde_json::from_value::<P>(payload)
        .map_err(|e| FetchError::decode(format!("malformed '{}': {e}", field)))?;

    let pagination = match body.get_mut("pagination").map(Value::take) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<Pagination>(value)
                .map_err(|e| FetchError::decode(format!("malformed 'pagination': {e}")))?,
        ),
    };

    Ok(Fetched {
        payload,
        pagination,
    })
}

/// Checks a mutation response. A 2xx body that is empty or not JSON is
/// accepted as `null`; a JSON body still goes through `success: false`.
pub fn decode_ack(raw: &RawResponse) -> Result<Value, FetchError> {
    check_status(raw)?;
    match serde_json::from_slice::<Value>(&raw.body) {
        Ok(body) => {
            check_rejection(raw.status, &body)?;
            Ok(body)
        }
        Err(_) => Ok(Value::Null),
    }
}

/// Fails on a non-2xx status, taking the message from an `{ error }` body
/// when there is one.
pub fn check_status(raw: &RawResponse) -> Result<(), FetchError> {
    if raw.is_success() {
        return Ok(());
    }
    let message = serde_json::from_slice::<ErrorBody>(&raw.body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("request failed with status {}", raw.status));
    Err(FetchError::http(raw.status, message))
}

/// Parses the body and applies the rejection rules shared by every endpoint.
fn accepted_body(raw: &RawResponse) -> Result<Value, FetchError> {
    check_status(raw)?;

    let body: Value = serde_json::from_slice(&raw.body)
        .map_err(|e| FetchError::decode(format!("invalid JSON body: {e}")))?;
    check_rejection(raw.status, &body)?;
    Ok(body)
}

fn check_rejection(status: u16, body: &Value) -> Result<(), FetchError> {
    if body.get("success") != Some(&Value::Bool(false)) {
        return Ok(());
    }
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request rejected by server")
        .to_string();
    Err(FetchError {
        kind: FetchErrorKind::Http4xx,
        status: Some(status),
        message,
    })
}
