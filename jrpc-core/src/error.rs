//! Error types for jrpc
//!
//! This module provides two distinct error surfaces:
//!
//! - **ErrorKind**: the fixed JSON-RPC 2.0 error taxonomy that travels on the
//!   wire inside `"error"` objects
//! - **Error**: library-level errors raised when a caller tries to construct
//!   a message that violates an aggregate invariant (uses thiserror)
//!
//! # Spec-Defined Error Codes
//!
//! JSON-RPC 2.0 reserves the following codes:
//! - `-32700`: Parse Error (invalid JSON)
//! - `-32600`: Invalid Request (missing required fields)
//! - `-32601`: Method Not Found
//! - `-32602`: Invalid Params
//! - `-32603`: Internal error
//! - `-32000` to `-32099`: Server error (implementation-defined)
//!
//! Peers may also use application-defined codes outside these ranges.
//! Those have no `ErrorKind`; inbound responses preserve such codes verbatim
//! (see [`crate::types::ResponseError`]).
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::ErrorKind;
//!
//! assert_eq!(ErrorKind::MethodNotFound.code(), -32601);
//! assert_eq!(ErrorKind::from_code(-32050), Some(ErrorKind::ServerError(-32050)));
//! assert_eq!(ErrorKind::from_code(-1), None);
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for jrpc operations
///
/// Used by the outbound constructors that enforce aggregate invariants.
/// Validation never returns this type: malformed input degrades to invalid
/// items instead of failing the call.
pub type Result<T> = std::result::Result<T, Error>;

/// Library-level error for invariant violations at construction time
///
/// These errors cannot come out of validation; they exist so that the states
/// the serializer must never see (an empty batch, a call with no method name)
/// are rejected when a caller builds messages directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A batch aggregate must contain at least one item
    #[error("batch must contain at least one item")]
    EmptyBatch,

    /// A request call must name a method
    #[error("method name must not be empty")]
    EmptyMethod,
}

/// The fixed JSON-RPC 2.0 error taxonomy
///
/// Each kind carries a fixed code and message, except `ServerError` which
/// spans the reserved range `-32000..=-32099` and therefore carries its
/// concrete code. Keeping the code on the variant lets a server error
/// round-trip without collapsing to one end of the range.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::ErrorKind;
///
/// assert_eq!(ErrorKind::InvalidRequest.code(), -32600);
/// assert_eq!(ErrorKind::InvalidRequest.message(), "Invalid Request");
/// assert_eq!(ErrorKind::ServerError(-32042).code(), -32042);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid JSON was received (-32700)
    ParseError,
    /// The JSON is not a valid request object (-32600)
    InvalidRequest,
    /// The method does not exist or is not available (-32601)
    MethodNotFound,
    /// Invalid method parameters (-32602)
    InvalidParams,
    /// Internal JSON-RPC error (-32603)
    InternalError,
    /// Implementation-defined server error (-32000 to -32099)
    ServerError(i64),
}

impl ErrorKind {
    /// Wire code for this kind
    pub fn code(&self) -> i64 {
        match self {
            ErrorKind::ParseError => -32700,
            ErrorKind::InvalidRequest => -32600,
            ErrorKind::MethodNotFound => -32601,
            ErrorKind::InvalidParams => -32602,
            ErrorKind::InternalError => -32603,
            ErrorKind::ServerError(code) => *code,
        }
    }

    /// Fixed human-readable message for this kind
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "Parse Error",
            ErrorKind::InvalidRequest => "Invalid Request",
            ErrorKind::MethodNotFound => "Method Not Found",
            ErrorKind::InvalidParams => "Invalid Params",
            ErrorKind::InternalError => "Internal error",
            ErrorKind::ServerError(_) => "Server error",
        }
    }

    /// Reconstruct a kind from a wire code
    ///
    /// Exact matches map to the four fixed kinds and `InternalError`;
    /// any code inside the reserved `-32099..=-32000` range maps to
    /// `ServerError` carrying that code. Every other code has no kind under
    /// this taxonomy and yields `None` — callers that need to preserve such
    /// codes keep the raw value alongside (see
    /// [`crate::types::ResponseError`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_core::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_code(-32601), Some(ErrorKind::MethodNotFound));
    /// assert_eq!(ErrorKind::from_code(-32050), Some(ErrorKind::ServerError(-32050)));
    /// assert_eq!(ErrorKind::from_code(1001), None);
    /// ```
    pub fn from_code(code: i64) -> Option<ErrorKind> {
        match code {
            -32700 => Some(ErrorKind::ParseError),
            -32600 => Some(ErrorKind::InvalidRequest),
            -32601 => Some(ErrorKind::MethodNotFound),
            -32602 => Some(ErrorKind::InvalidParams),
            -32603 => Some(ErrorKind::InternalError),
            code if (-32099..=-32000).contains(&code) => Some(ErrorKind::ServerError(code)),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    /// Formats as "code: message" for log readability
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codes() {
        assert_eq!(ErrorKind::ParseError.code(), -32700);
        assert_eq!(ErrorKind::InvalidRequest.code(), -32600);
        assert_eq!(ErrorKind::MethodNotFound.code(), -32601);
        assert_eq!(ErrorKind::InvalidParams.code(), -32602);
        assert_eq!(ErrorKind::InternalError.code(), -32603);
        assert_eq!(ErrorKind::ServerError(-32000).code(), -32000);
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(ErrorKind::ParseError.message(), "Parse Error");
        assert_eq!(ErrorKind::InvalidRequest.message(), "Invalid Request");
        assert_eq!(ErrorKind::MethodNotFound.message(), "Method Not Found");
        assert_eq!(ErrorKind::InvalidParams.message(), "Invalid Params");
        assert_eq!(ErrorKind::InternalError.message(), "Internal error");
        assert_eq!(ErrorKind::ServerError(-32010).message(), "Server error");
    }

    #[test]
    fn test_from_code_exact() {
        assert_eq!(ErrorKind::from_code(-32700), Some(ErrorKind::ParseError));
        assert_eq!(ErrorKind::from_code(-32600), Some(ErrorKind::InvalidRequest));
        assert_eq!(ErrorKind::from_code(-32601), Some(ErrorKind::MethodNotFound));
        assert_eq!(ErrorKind::from_code(-32602), Some(ErrorKind::InvalidParams));
        assert_eq!(ErrorKind::from_code(-32603), Some(ErrorKind::InternalError));
    }

    #[test]
    fn test_from_code_server_range() {
        assert_eq!(
            ErrorKind::from_code(-32050),
            Some(ErrorKind::ServerError(-32050))
        );
        assert_eq!(
            ErrorKind::from_code(-32000),
            Some(ErrorKind::ServerError(-32000))
        );
        assert_eq!(
            ErrorKind::from_code(-32099),
            Some(ErrorKind::ServerError(-32099))
        );
    }

    #[test]
    fn test_from_code_unmapped() {
        assert_eq!(ErrorKind::from_code(-1), None);
        assert_eq!(ErrorKind::from_code(0), None);
        assert_eq!(ErrorKind::from_code(1001), None);
        // One past each end of the reserved server range
        assert_eq!(ErrorKind::from_code(-32100), None);
        assert_eq!(ErrorKind::from_code(-31999), None);
    }

    #[test]
    fn test_display() {
        let display = format!("{}", ErrorKind::MethodNotFound);
        assert!(display.contains("-32601"));
        assert!(display.contains("Method Not Found"));
    }

    #[test]
    fn test_invariant_error_messages() {
        assert_eq!(
            Error::EmptyBatch.to_string(),
            "batch must contain at least one item"
        );
        assert_eq!(
            Error::EmptyMethod.to_string(),
            "method name must not be empty"
        );
    }
}
