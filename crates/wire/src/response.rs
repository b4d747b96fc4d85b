// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use exostream_core::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{code, message, data?}` object nested in an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One JSON-RPC 2.0 response frame (§4.E). Exactly one of `result`/`error`
/// is ever populated; the two constructors are the only way to build one so
/// that invariant can't be violated from outside this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

impl Response {
    pub fn success(result: Value, id: Option<i64>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(code: i32, message: impl Into<String>, data: Option<Value>, id: Option<i64>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: None,
            error: Some(ErrorObject {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    /// Builds an error response from a domain error, using its bit-exact
    /// wire code (§4.E).
    pub fn from_domain_error(err: &DomainError, id: Option<i64>) -> Self {
        Self::error(err.code(), err.to_string(), None, id)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod response_tests;
