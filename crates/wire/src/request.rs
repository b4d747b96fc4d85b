// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One JSON-RPC 2.0 request frame (§4.E). `params` is left as a raw
/// [`Value`] here; the router deserializes it into a method-specific type
/// once it knows which handler owns the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default = "default_params")]
    pub params: Value,
    pub id: Option<i64>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

fn default_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Request {
    pub fn new(method: impl Into<String>, params: Value, id: Option<i64>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            method: method.into(),
            params,
            id,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod request_tests;
