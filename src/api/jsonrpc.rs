//! JSON-RPC 2.0 message types as spoken by the Zabbix API
//!
//! Requests carry the session token in a top-level `auth` member, which is
//! how `api_jsonrpc.php` expects authenticated calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// API method, e.g. `maintenance.get`
    pub method: String,
    /// Method parameters (object or array)
    pub params: Value,
    /// Request identifier
    pub id: u64,
    /// Session token; absent for `user.login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC 2.0 error object
///
/// Zabbix puts the human-readable detail in `data`, e.g.
/// `{"code": -32602, "message": "Invalid params.", "data": "Incorrect user name or password."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcRequest {
    /// Create an unauthenticated request
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
            auth: None,
        }
    }

    /// Attach a session token
    #[must_use]
    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Value::from(id),
        }
    }

    /// Create an error response
    pub fn error(id: u64, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Value::from(id),
        }
    }
}

impl JsonRpcError {
    /// Message with the server's `data` detail appended when present
    pub fn detail(&self) -> String {
        match &self.data {
            Some(Value::String(data)) if !data.is_empty() => format!("{} {}", self.message, data),
            Some(Value::String(_) | Value::Null) | None => self.message.clone(),
            Some(other) => format!("{} {}", self.message, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_has_no_auth_member() {
        let request = JsonRpcRequest::new("user.login", json!({"username": "admin"}), 1);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "user.login");
        assert_eq!(value["id"], 1);
        assert!(value.get("auth").is_none());
    }

    #[test]
    fn test_authenticated_request_serializes_token() {
        let request = JsonRpcRequest::new("hostgroup.get", json!({}), 2).with_auth("abc123");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["auth"], "abc123");
    }

    #[test]
    fn test_parse_zabbix_error_response() {
        let body = r#"{
            "jsonrpc": "2.0",
            "error": {"code": -32602, "message": "Invalid params.", "data": "Incorrect user name or password or account is temporarily blocked."},
            "id": 1
        }"#;
        let response: JsonRpcResponse = serde_json::from_str(body).unwrap();

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(
            error.detail(),
            "Invalid params. Incorrect user name or password or account is temporarily blocked."
        );
    }

    #[test]
    fn test_error_detail_without_data() {
        let error = JsonRpcError {
            code: -32601,
            message: "Method not found.".to_string(),
            data: None,
        };
        assert_eq!(error.detail(), "Method not found.");
    }

    #[test]
    fn test_error_detail_with_empty_data() {
        let error = JsonRpcError {
            code: -32500,
            message: "Application error.".to_string(),
            data: Some(json!("")),
        };
        assert_eq!(error.detail(), "Application error.");
    }

    #[test]
    fn test_error_detail_with_structured_data() {
        let error = JsonRpcError {
            code: -32500,
            message: "Application error.".to_string(),
            data: Some(json!({"field": "name"})),
        };
        assert_eq!(error.detail(), r#"Application error. {"field":"name"}"#);
    }
}
