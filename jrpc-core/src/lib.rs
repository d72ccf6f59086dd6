//! Core JSON-RPC 2.0 message contract for jrpc
//!
//! This crate implements the JSON-RPC 2.0 message contract: it converts an
//! already-parsed, generic JSON value tree into strongly validated
//! request/response aggregates, and converts those aggregates back into
//! wire-correct JSON values. It includes:
//!
//! - **Types**: correlation ids, per-message items, and the batch-aware
//!   aggregate envelope
//! - **Error taxonomy**: the fixed JSON-RPC 2.0 error codes with
//!   code-to-kind reconstruction
//! - **Codec**: total validation from [`serde_json::Value`] and
//!   serialization back to it
//!
//! # Architecture
//!
//! The crate sits between a transport layer and an RPC dispatcher and owns
//! neither. It never parses raw text, performs I/O, or executes a method:
//! the transport hands it a parsed JSON value, it hands the dispatcher a
//! validated aggregate, and the dispatcher's response aggregate comes back
//! through it as a JSON value for encoding.
//!
//! Malformed input is data, not failure: a batch element that is not a
//! well-formed message degrades to an invalid item carrying its error kind
//! and, when extractable, its id — sibling elements are unaffected and the
//! validate call itself cannot fail.
//!
//! All operations are pure and synchronous, allocate only their return
//! value, and share no state; calling them concurrently from any number of
//! threads needs no synchronization.
//!
//! # Example
//!
//! ```rust
//! use jrpc_core::{ErrorKind, Id, Request, Response, ResponseItem, ToValue};
//! use serde_json::json;
//!
//! // Validate an inbound batch; the second element is malformed
//! let request = Request::from_value(&json!([
//!     {"jsonrpc": "2.0", "id": 1, "method": "sum", "params": [1, 1]},
//!     {"id": 2, "method": "sum"},
//! ]));
//! assert!(request.is_batch());
//! assert!(request.items()[0].is_valid());
//! assert_eq!(request.items()[1].error(), Some(ErrorKind::InvalidRequest));
//!
//! // Answer per item, preserving ids, and serialize back out
//! let response = Response::batch(vec![
//!     ResponseItem::success(Some(Id::Number(1)), Some(json!(2))),
//!     ResponseItem::failure(Some(Id::Number(2)), ErrorKind::InvalidRequest),
//! ]).unwrap();
//! let wire = response.to_value();
//! assert_eq!(wire[0]["result"], json!(2));
//! assert_eq!(wire[1]["error"]["code"], json!(-32600));
//! ```

pub mod codec;
pub mod error;
pub mod types;

// Re-export the most commonly used types for convenience
// This allows users to use `jrpc_core::Request` instead of `jrpc_core::types::Request`
pub use codec::{ToValue, VERSION};
pub use error::{Error, ErrorKind, Result};
pub use types::{
    Envelope, Id, Request, RequestBody, RequestItem, Response, ResponseBody, ResponseError,
    ResponseItem,
};
