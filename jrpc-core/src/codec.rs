//! Codec between generic JSON values and validated message aggregates
//!
//! This module owns the two directions of the message contract:
//!
//! - **Validation**: [`Request::from_value`] / [`Response::from_value`] turn
//!   an already-parsed [`serde_json::Value`] into a validated aggregate
//! - **Serialization**: [`ToValue::to_value`] turns items and aggregates
//!   back into a wire-correct [`serde_json::Value`]
//!
//! # Total Validation
//!
//! Validation never fails. A malformed element degrades to an invalid item
//! carrying the appropriate [`ErrorKind`], with the element's id attached
//! when one could be extracted, so a caller can answer per-item failures
//! without discarding valid siblings. The only failure handled elsewhere is
//! the input not being JSON at all, which belongs to the transport that
//! parses raw text.
//!
//! # Batches
//!
//! A JSON array validates to a batch aggregate, elements in source order.
//! Nested arrays are flattened into the single-level item list, depth-first
//! and left-to-right. An empty batch yields a single invalid item, matching
//! the single Invalid Request error the protocol prescribes for `[]`.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{Request, ToValue};
//! use serde_json::json;
//!
//! let request = Request::from_value(&json!({
//!     "jsonrpc": "2.0", "id": 1, "method": "sum", "params": [1, 1]
//! }));
//! assert!(!request.is_batch());
//!
//! let item = &request.items()[0];
//! assert_eq!(item.method(), Some("sum"));
//! assert_eq!(item.params(), Some(&json!([1, 1])));
//!
//! // And back out to JSON
//! assert_eq!(request.to_value()["method"], json!("sum"));
//! ```

use crate::error::ErrorKind;
use crate::types::{
    Envelope, Id, Request, RequestBody, RequestItem, Response, ResponseBody, ResponseItem,
};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The protocol tag required on every message
pub const VERSION: &str = "2.0";

/// Conversion of a validated message back into a generic JSON value
///
/// Implemented by both item kinds; aggregates serialize through it, emitting
/// a JSON array for batches and the lone item's object otherwise.
pub trait ToValue {
    /// Produce the wire-correct JSON value for this message
    fn to_value(&self) -> Value;
}

/// Extract the correlation id, if the element carries a usable one
///
/// Only integer and string ids are recognized; an `"id"` of any other type
/// (float, bool, null, ...) is treated as absent rather than rejected.
fn extract_id(value: &Value) -> Option<Id> {
    match value.get("id") {
        Some(Value::String(text)) => Some(Id::Text(text.clone())),
        Some(Value::Number(number)) => number.as_i64().map(Id::Number),
        _ => None,
    }
}

/// Whether the element carries the required `"jsonrpc": "2.0"` tag
fn version_ok(value: &Value) -> bool {
    value.get("jsonrpc").and_then(Value::as_str) == Some(VERSION)
}

/// Recursively flatten arrays into a single-level item list
///
/// Depth-first, left-to-right: an array-of-arrays collapses into one flat
/// sequence in discovery order. Non-array elements are validated in place.
fn flatten_into<T>(value: &Value, validate_one: fn(&Value) -> T, out: &mut Vec<T>) {
    match value {
        Value::Array(elements) => {
            tracing::trace!(len = elements.len(), "flattening batch array");
            for element in elements {
                flatten_into(element, validate_one, out);
            }
        }
        element => out.push(validate_one(element)),
    }
}

fn validate<T>(
    value: &Value,
    validate_one: fn(&Value) -> T,
    empty_batch: fn() -> T,
) -> Envelope<T> {
    if value.is_array() {
        let mut items = Vec::new();
        flatten_into(value, validate_one, &mut items);
        if items.is_empty() {
            tracing::debug!("empty batch degraded to a single invalid item");
            items.push(empty_batch());
        }
        Envelope::from_parts(true, items)
    } else {
        Envelope::from_parts(false, vec![validate_one(value)])
    }
}

impl RequestItem {
    /// Validate one request element
    ///
    /// Field rules, applied in order:
    ///
    /// 1. an integer or string `"id"` is extracted; other types count as
    ///    absent
    /// 2. `"jsonrpc"` must be exactly the string `"2.0"`
    /// 3. `"method"` must be a string
    /// 4. `"params"` is carried iff the key exists, whatever its value
    ///
    /// A failed rule degrades the element to an invalid item; the extracted
    /// id is attached either way.
    pub fn from_value(value: &Value) -> Self {
        let id = extract_id(value);
        if !version_ok(value) {
            tracing::debug!(id = ?id, "request element missing or mismatched jsonrpc tag");
            return Self::invalid(id, ErrorKind::InvalidRequest);
        }
        let Some(method) = value.get("method").and_then(Value::as_str) else {
            tracing::debug!(id = ?id, "request element missing string method");
            return Self::invalid(id, ErrorKind::InvalidRequest);
        };
        Self {
            id,
            body: RequestBody::Call {
                method: method.to_owned(),
                params: value.get("params").cloned(),
            },
        }
    }
}

impl ResponseItem {
    /// Validate one response element
    ///
    /// Mirrors the request rules for id and version. An `"error"` object
    /// must carry an integer `"code"` and a string `"message"`; if either is
    /// missing the element degrades to a parse-error item, otherwise the
    /// raw pair is preserved verbatim (peers may use codes outside the fixed
    /// taxonomy). Without an error, `"result"` is carried iff the key
    /// exists.
    pub fn from_value(value: &Value) -> Self {
        let id = extract_id(value);
        if !version_ok(value) {
            tracing::debug!(id = ?id, "response element missing or mismatched jsonrpc tag");
            return Self::failure(id, ErrorKind::InvalidRequest);
        }
        if let Some(error) = value.get("error") {
            let code = error.get("code").and_then(Value::as_i64);
            let message = error.get("message").and_then(Value::as_str);
            return match (code, message) {
                (Some(code), Some(message)) => Self::failure_raw(id, code, message),
                _ => {
                    tracing::debug!(id = ?id, "response error object missing code or message");
                    Self::failure(id, ErrorKind::ParseError)
                }
            };
        }
        Self::success(id, value.get("result").cloned())
    }
}

impl Request {
    /// Validate a raw JSON value into a request aggregate
    ///
    /// A JSON array validates to a batch (nested arrays flattened,
    /// elements validated independently in order); anything else validates
    /// to a single-item aggregate. This function is total: malformed
    /// elements become invalid items, never errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_core::Request;
    /// use serde_json::json;
    ///
    /// let batch = Request::from_value(&json!([
    ///     {"jsonrpc": "2.0", "id": 1, "method": "a"},
    ///     {"id": 2, "method": "b"}, // no jsonrpc tag
    /// ]));
    /// assert!(batch.is_batch());
    /// assert!(batch.items()[0].is_valid());
    /// assert!(!batch.items()[1].is_valid());
    /// ```
    pub fn from_value(value: &Value) -> Self {
        validate(value, RequestItem::from_value, || {
            RequestItem::invalid(None, ErrorKind::InvalidRequest)
        })
    }
}

impl Response {
    /// Validate a raw JSON value into a response aggregate
    ///
    /// Batch detection and flattening are identical to
    /// [`Request::from_value`].
    pub fn from_value(value: &Value) -> Self {
        validate(value, ResponseItem::from_value, || {
            ResponseItem::failure(None, ErrorKind::InvalidRequest)
        })
    }
}

fn error_object(code: i64, message: &str) -> Value {
    let mut object = Map::new();
    object.insert("code".to_owned(), Value::from(code));
    object.insert("message".to_owned(), Value::from(message));
    Value::Object(object)
}

fn envelope_base(id: &Option<Id>) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("jsonrpc".to_owned(), Value::from(VERSION));
    if let Some(id) = id {
        let id = match id {
            Id::Number(n) => Value::from(*n),
            Id::Text(s) => Value::from(s.as_str()),
        };
        object.insert("id".to_owned(), id);
    }
    object
}

impl ToValue for RequestItem {
    /// Emit `jsonrpc`, the id when present, and either the call fields
    /// (`method`, plus `params` only when carried) or the error object
    fn to_value(&self) -> Value {
        let mut object = envelope_base(&self.id);
        match &self.body {
            RequestBody::Call { method, params } => {
                object.insert("method".to_owned(), Value::from(method.as_str()));
                if let Some(params) = params {
                    object.insert("params".to_owned(), params.clone());
                }
            }
            RequestBody::Invalid { error } => {
                object.insert(
                    "error".to_owned(),
                    error_object(error.code(), error.message()),
                );
            }
        }
        Value::Object(object)
    }
}

impl ToValue for ResponseItem {
    /// Emit `jsonrpc`, the id when present, and either `result` (only when
    /// carried) or the error object with the raw code/message verbatim
    fn to_value(&self) -> Value {
        let mut object = envelope_base(&self.id);
        match &self.body {
            ResponseBody::Success { result } => {
                if let Some(result) = result {
                    object.insert("result".to_owned(), result.clone());
                }
            }
            ResponseBody::Failure(error) => {
                object.insert(
                    "error".to_owned(),
                    error_object(error.code, &error.message),
                );
            }
        }
        Value::Object(object)
    }
}

impl<T: ToValue> ToValue for Envelope<T> {
    /// A batch emits a JSON array of its items in order; a non-batch
    /// envelope emits its only item's object
    fn to_value(&self) -> Value {
        if self.is_batch {
            Value::Array(self.items.iter().map(ToValue::to_value).collect())
        } else {
            self.items[0].to_value()
        }
    }
}

// Serde integration: messages encode through any serde sink by delegating
// to their wire-value construction.

impl Serialize for RequestItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl Serialize for ResponseItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<T: ToValue> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_single_request() {
        let request = Request::from_value(&json!({
            "jsonrpc": "2.0", "id": 1, "method": "sum", "params": [1, 1]
        }));
        assert!(!request.is_batch());
        assert_eq!(request.items().len(), 1);

        let item = &request.items()[0];
        assert_eq!(item.id, Some(Id::Number(1)));
        assert_eq!(item.method(), Some("sum"));
        assert_eq!(item.params(), Some(&json!([1, 1])));
    }

    #[test]
    fn test_validate_request_missing_version() {
        let request = Request::from_value(&json!({"id": 1, "method": "sum"}));
        let item = &request.items()[0];
        assert_eq!(item.error(), Some(ErrorKind::InvalidRequest));
        // The id is still attached to the invalid item
        assert_eq!(item.id, Some(Id::Number(1)));
    }

    #[test]
    fn test_validate_request_wrong_version() {
        let request = Request::from_value(&json!({
            "jsonrpc": "1.0", "id": 1, "method": "sum"
        }));
        assert_eq!(
            request.items()[0].error(),
            Some(ErrorKind::InvalidRequest)
        );
    }

    #[test]
    fn test_validate_request_missing_method() {
        let request = Request::from_value(&json!({"jsonrpc": "2.0", "id": 1}));
        assert_eq!(
            request.items()[0].error(),
            Some(ErrorKind::InvalidRequest)
        );
    }

    #[test]
    fn test_validate_request_non_string_method() {
        let request = Request::from_value(&json!({
            "jsonrpc": "2.0", "id": 1, "method": 42
        }));
        assert_eq!(
            request.items()[0].error(),
            Some(ErrorKind::InvalidRequest)
        );
    }

    #[test]
    fn test_validate_params_absence_vs_null() {
        let absent = Request::from_value(&json!({"jsonrpc": "2.0", "method": "m"}));
        assert_eq!(absent.items()[0].params(), None);

        let null = Request::from_value(&json!({
            "jsonrpc": "2.0", "method": "m", "params": null
        }));
        assert_eq!(null.items()[0].params(), Some(&Value::Null));
    }

    #[test]
    fn test_id_silent_downgrade() {
        for bad_id in [json!(1.5), json!(true), json!(null), json!([1])] {
            let request = Request::from_value(&json!({
                "jsonrpc": "2.0", "id": bad_id, "method": "m"
            }));
            let item = &request.items()[0];
            assert_eq!(item.id, None);
            assert!(item.is_valid());
        }
    }

    #[test]
    fn test_string_id() {
        let request = Request::from_value(&json!({
            "jsonrpc": "2.0", "id": "req-1", "method": "m"
        }));
        assert_eq!(request.items()[0].id, Some(Id::Text("req-1".to_string())));
    }

    #[test]
    fn test_validate_non_object_element() {
        let request = Request::from_value(&json!("just a string"));
        assert!(!request.is_batch());
        assert_eq!(
            request.items()[0].error(),
            Some(ErrorKind::InvalidRequest)
        );
    }

    #[test]
    fn test_validate_empty_batch() {
        let request = Request::from_value(&json!([]));
        assert!(request.is_batch());
        assert_eq!(request.items().len(), 1);
        assert_eq!(
            request.items()[0].error(),
            Some(ErrorKind::InvalidRequest)
        );
    }

    #[test]
    fn test_validate_nested_batch_flattens() {
        let request = Request::from_value(&json!([
            {"jsonrpc": "2.0", "id": 1, "method": "a"},
            [
                {"jsonrpc": "2.0", "id": 2, "method": "b"},
                [{"jsonrpc": "2.0", "id": 3, "method": "c"}],
            ],
            {"jsonrpc": "2.0", "id": 4, "method": "d"},
        ]));
        assert!(request.is_batch());
        let methods: Vec<_> = request.items().iter().map(|i| i.method()).collect();
        assert_eq!(
            methods,
            vec![Some("a"), Some("b"), Some("c"), Some("d")]
        );
    }

    #[test]
    fn test_validate_single_response_result() {
        let response = Response::from_value(&json!({
            "jsonrpc": "2.0", "id": 1, "result": [1]
        }));
        assert!(!response.is_batch());
        let item = &response.items()[0];
        assert_eq!(item.result(), Some(&json!([1])));
    }

    #[test]
    fn test_validate_response_result_absence() {
        let response = Response::from_value(&json!({"jsonrpc": "2.0", "id": 1}));
        let item = &response.items()[0];
        assert!(item.is_valid());
        assert_eq!(item.result(), None);
    }

    #[test]
    fn test_validate_response_error() {
        let response = Response::from_value(&json!({
            "jsonrpc": "2.0", "id": 2,
            "error": {"code": -32700, "message": "Parse Error"}
        }));
        let error = response.items()[0].error().unwrap();
        assert_eq!(error.kind, Some(ErrorKind::ParseError));
        assert_eq!(error.code, -32700);
        assert_eq!(error.message, "Parse Error");
    }

    #[test]
    fn test_validate_response_unmapped_error_code() {
        let response = Response::from_value(&json!({
            "jsonrpc": "2.0", "id": 2,
            "error": {"code": 1001, "message": "Insufficient funds"}
        }));
        let error = response.items()[0].error().unwrap();
        assert_eq!(error.kind, None);
        assert_eq!(error.code, 1001);
        assert_eq!(error.message, "Insufficient funds");
    }

    #[test]
    fn test_validate_response_error_missing_fields() {
        let missing_message = Response::from_value(&json!({
            "jsonrpc": "2.0", "id": 2, "error": {"code": -32700}
        }));
        assert_eq!(
            missing_message.items()[0].error().unwrap().kind,
            Some(ErrorKind::ParseError)
        );

        let missing_code = Response::from_value(&json!({
            "jsonrpc": "2.0", "id": 2, "error": {"message": "oops"}
        }));
        assert_eq!(
            missing_code.items()[0].error().unwrap().kind,
            Some(ErrorKind::ParseError)
        );
    }

    #[test]
    fn test_validate_response_missing_version() {
        let response = Response::from_value(&json!({"id": 1, "result": 1}));
        let error = response.items()[0].error().unwrap();
        assert_eq!(error.kind, Some(ErrorKind::InvalidRequest));
        assert_eq!(error.code, -32600);
        assert_eq!(error.message, "Invalid Request");
    }

    #[test]
    fn test_serialize_valid_request_item() {
        let item = RequestItem::call(Some(Id::Number(1)), "sum", Some(json!([1, 1]))).unwrap();
        assert_eq!(
            item.to_value(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "sum", "params": [1, 1]})
        );
    }

    #[test]
    fn test_serialize_request_item_without_params() {
        let item = RequestItem::call(Some(Id::Text("a".into())), "ping", None).unwrap();
        let value = item.to_value();
        assert_eq!(value["id"], json!("a"));
        assert_eq!(value["method"], json!("ping"));
        assert!(value.get("params").is_none());
    }

    #[test]
    fn test_serialize_invalid_request_item() {
        let item = RequestItem::invalid(Some(Id::Number(3)), ErrorKind::MethodNotFound);
        assert_eq!(
            item.to_value(),
            json!({
                "jsonrpc": "2.0", "id": 3,
                "error": {"code": -32601, "message": "Method Not Found"}
            })
        );
    }

    #[test]
    fn test_serialize_response_item_result_presence() {
        let with = ResponseItem::success(Some(Id::Number(1)), Some(json!(null)));
        let value = with.to_value();
        assert!(value.get("result").is_some());
        assert_eq!(value["result"], Value::Null);

        let without = ResponseItem::success(Some(Id::Number(1)), None);
        assert!(without.to_value().get("result").is_none());
    }

    #[test]
    fn test_serialize_response_item_raw_error() {
        let item = ResponseItem::failure_raw(Some(Id::Number(2)), 1001, "Insufficient funds");
        assert_eq!(
            item.to_value(),
            json!({
                "jsonrpc": "2.0", "id": 2,
                "error": {"code": 1001, "message": "Insufficient funds"}
            })
        );
    }

    #[test]
    fn test_serialize_batch_envelope() {
        let response = Response::batch(vec![
            ResponseItem::success(Some(Id::Number(1)), Some(json!([1, 2]))),
            ResponseItem::failure(Some(Id::Number(2)), ErrorKind::InvalidRequest),
        ])
        .unwrap();
        assert_eq!(
            response.to_value(),
            json!([
                {"jsonrpc": "2.0", "id": 1, "result": [1, 2]},
                {
                    "jsonrpc": "2.0", "id": 2,
                    "error": {"code": -32600, "message": "Invalid Request"}
                },
            ])
        );
    }

    #[test]
    fn test_serialize_single_envelope_is_object() {
        let request =
            Request::single(RequestItem::call(Some(Id::Number(1)), "ping", None).unwrap());
        assert!(request.to_value().is_object());
    }

    #[test]
    fn test_serde_delegation() {
        let item = RequestItem::call(Some(Id::Number(1)), "ping", None).unwrap();
        let encoded = serde_json::to_string(&item).unwrap();
        let reparsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed, item.to_value());

        let envelope = Request::single(item);
        let encoded = serde_json::to_string(&envelope).unwrap();
        let reparsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed, envelope.to_value());
    }
}
