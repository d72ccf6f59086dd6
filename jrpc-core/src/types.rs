//! JSON-RPC 2.0 message types
//!
//! This module declares the validated message shapes this crate converts to
//! and from generic JSON values:
//!
//! 1. **Id**: the request/response correlation identifier
//! 2. **RequestItem / ResponseItem**: one logical message, valid or invalid
//! 3. **Envelope** (aliased as [`Request`] / [`Response`]): an ordered,
//!    non-empty collection of items plus a batch flag
//!
//! # Valid or Invalid, Never Both
//!
//! Every item body is a two-variant enum: a valid payload or a validation
//! error. A message can therefore never carry a method and an error (or a
//! result and an error) at the same time; the exclusivity is a compile-time
//! property rather than a runtime check over nullable fields.
//!
//! # Immutability
//!
//! All types here are plain value objects. They are built once, by the
//! validator or by a caller assembling an outbound message, and never
//! mutated afterwards.

use crate::error::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-RPC 2.0 correlation id
///
/// An id can be a number or a string; a message without an id is modeled as
/// `Option<Id>` being `None` on the item rather than a dedicated variant.
///
/// # Implementation Notes
///
/// This enum uses `#[serde(untagged)]` to serialize directly as the inner
/// value without a type discriminator, matching the wire format exactly.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.as_text(), Some("req-123"));
/// assert_eq!(id2.as_number(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier - efficient for sequential request counters
    Number(i64),
    /// String identifier - useful for UUIDs or correlation tokens
    Text(String),
}

impl Id {
    /// The numeric value, if this id is a number
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Id::Number(n) => Some(*n),
            Id::Text(_) => None,
        }
    }

    /// The string value, if this id is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Id::Number(_) => None,
            Id::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Id {
    /// Format the id in a JSON-like representation: strings quoted,
    /// numbers as-is
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Text(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

/// Body of a request item: a method call or a validation error
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A well-formed call
    Call {
        /// Name of the remote method to invoke
        method: String,
        /// Parameters exactly as they appeared in the source object.
        /// `None` means the `"params"` key was absent; `Some(Value::Null)`
        /// means it was present with a null value. The distinction survives
        /// serialization.
        params: Option<Value>,
    },
    /// The element failed validation
    Invalid {
        /// Why the element was rejected
        error: ErrorKind,
    },
}

/// One logical JSON-RPC request message
///
/// Carries its own correlation id and either a call body or the validation
/// error the element degraded to. Items are produced by
/// [`Request::from_value`](crate::Request::from_value) for inbound traffic
/// or by [`RequestItem::call`] / [`RequestItem::invalid`] for outbound
/// construction.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{Id, RequestItem};
/// use serde_json::json;
///
/// let item = RequestItem::call(Some(Id::Number(1)), "sum", Some(json!([1, 1]))).unwrap();
/// assert!(item.is_valid());
/// assert_eq!(item.method(), Some("sum"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestItem {
    /// Correlation id, absent for notifications
    pub id: Option<Id>,
    /// Call payload or validation error
    pub body: RequestBody,
}

impl RequestItem {
    /// Create a well-formed call item
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMethod`] if `method` is empty. Pass
    /// `params: None` to omit the `"params"` key entirely.
    pub fn call(id: Option<Id>, method: impl Into<String>, params: Option<Value>) -> Result<Self> {
        let method = method.into();
        if method.is_empty() {
            return Err(Error::EmptyMethod);
        }
        Ok(Self {
            id,
            body: RequestBody::Call { method, params },
        })
    }

    /// Create an item recording a validation failure
    pub fn invalid(id: Option<Id>, error: ErrorKind) -> Self {
        Self {
            id,
            body: RequestBody::Invalid { error },
        }
    }

    /// Whether this item carries a call rather than an error
    pub fn is_valid(&self) -> bool {
        matches!(self.body, RequestBody::Call { .. })
    }

    /// The method name, if this item is a valid call
    pub fn method(&self) -> Option<&str> {
        match &self.body {
            RequestBody::Call { method, .. } => Some(method),
            RequestBody::Invalid { .. } => None,
        }
    }

    /// The params value, if this item is a valid call that carried one
    pub fn params(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Call { params, .. } => params.as_ref(),
            RequestBody::Invalid { .. } => None,
        }
    }

    /// The validation error, if this item is invalid
    pub fn error(&self) -> Option<ErrorKind> {
        match &self.body {
            RequestBody::Call { .. } => None,
            RequestBody::Invalid { error } => Some(*error),
        }
    }
}

/// Wire error carried by an invalid response item
///
/// Inbound peers may answer with application-defined error codes outside
/// the fixed taxonomy, so the raw code and message are kept verbatim and
/// are authoritative for round-tripping. `kind` is a best-effort
/// classification for dispatch and logging; `None` marks a code this
/// taxonomy cannot name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError {
    /// Best-effort classification of `code`, `None` for unmapped codes
    pub kind: Option<ErrorKind>,
    /// Error code exactly as received (or as fixed by the kind)
    pub code: i64,
    /// Error message exactly as received (or as fixed by the kind)
    pub message: String,
}

impl ResponseError {
    /// Build from a taxonomy kind, taking its fixed code and message
    pub fn known(kind: ErrorKind) -> Self {
        Self {
            kind: Some(kind),
            code: kind.code(),
            message: kind.message().to_string(),
        }
    }

    /// Build from a raw code/message pair received off the wire
    ///
    /// The kind is reconstructed when the code belongs to the taxonomy and
    /// left `None` otherwise; the raw pair is preserved either way.
    pub fn raw(code: i64, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::from_code(code),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ResponseError {
    /// Formats as "[code] message" for easy readability in logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Body of a response item: a result or an error
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The call succeeded
    Success {
        /// Result exactly as it appeared in the source object; `None` means
        /// the `"result"` key was absent (same presence rule as params)
        result: Option<Value>,
    },
    /// The call failed or the element failed validation
    Failure(ResponseError),
}

/// One logical JSON-RPC response message
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{ErrorKind, Id, ResponseItem};
/// use serde_json::json;
///
/// let ok = ResponseItem::success(Some(Id::Number(1)), Some(json!([1, 2])));
/// assert!(ok.is_valid());
///
/// let failed = ResponseItem::failure(Some(Id::Number(2)), ErrorKind::InvalidRequest);
/// assert_eq!(failed.error().map(|e| e.code), Some(-32600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseItem {
    /// Correlation id echoed from the request
    pub id: Option<Id>,
    /// Result payload or error
    pub body: ResponseBody,
}

impl ResponseItem {
    /// Create a successful response item
    ///
    /// Pass `result: None` to omit the `"result"` key entirely.
    pub fn success(id: Option<Id>, result: Option<Value>) -> Self {
        Self {
            id,
            body: ResponseBody::Success { result },
        }
    }

    /// Create a failed response item from a taxonomy kind
    pub fn failure(id: Option<Id>, kind: ErrorKind) -> Self {
        Self {
            id,
            body: ResponseBody::Failure(ResponseError::known(kind)),
        }
    }

    /// Create a failed response item from a raw code/message pair
    ///
    /// Use this for codes received off the wire, which may fall outside the
    /// fixed taxonomy.
    pub fn failure_raw(id: Option<Id>, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            body: ResponseBody::Failure(ResponseError::raw(code, message)),
        }
    }

    /// Whether this item carries a result rather than an error
    pub fn is_valid(&self) -> bool {
        matches!(self.body, ResponseBody::Success { .. })
    }

    /// The result value, if this item succeeded and carried one
    pub fn result(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Success { result } => result.as_ref(),
            ResponseBody::Failure(_) => None,
        }
    }

    /// The error, if this item failed
    pub fn error(&self) -> Option<&ResponseError> {
        match &self.body {
            ResponseBody::Success { .. } => None,
            ResponseBody::Failure(error) => Some(error),
        }
    }
}

/// Ordered collection of message items plus a batch flag
///
/// [`Request`] and [`Response`] are aliases of this type over their item
/// kinds. Fields are private so the two structural invariants hold by
/// construction:
///
/// - `items` is never empty
/// - a non-batch envelope holds exactly one item
///
/// This makes serialization total: a non-batch envelope always has a first
/// item and never silently drops extras, because the extra-item state cannot
/// be built.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{Id, Request, RequestItem};
///
/// let single = Request::single(RequestItem::call(Some(Id::Number(1)), "ping", None).unwrap());
/// assert!(!single.is_batch());
/// assert_eq!(single.items().len(), 1);
///
/// assert!(Request::batch(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub(crate) is_batch: bool,
    pub(crate) items: Vec<T>,
}

/// A validated JSON-RPC request, single or batch
pub type Request = Envelope<RequestItem>;

/// A validated JSON-RPC response, single or batch
pub type Response = Envelope<ResponseItem>;

impl<T> Envelope<T> {
    /// Create a non-batch envelope holding exactly one item
    pub fn single(item: T) -> Self {
        Self {
            is_batch: false,
            items: vec![item],
        }
    }

    /// Create a batch envelope from an ordered list of items
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBatch`] if `items` is empty.
    pub fn batch(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyBatch);
        }
        Ok(Self {
            is_batch: true,
            items,
        })
    }

    /// Internal constructor for the validator, which upholds the
    /// invariants itself
    pub(crate) fn from_parts(is_batch: bool, items: Vec<T>) -> Self {
        debug_assert!(!items.is_empty());
        debug_assert!(is_batch || items.len() == 1);
        Self { is_batch, items }
    }

    /// Whether the source was a JSON array
    pub fn is_batch(&self) -> bool {
        self.is_batch
    }

    /// The items in source order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope, yielding the items in source order
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
