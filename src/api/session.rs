//! Authenticated API session
//!
//! A session logs in once and then stamps every call with the returned token.

use crate::{
    api::{
        jsonrpc::JsonRpcRequest,
        transport::{HttpTransport, Transport},
    },
    config::{Config, Credentials},
    error::{MaintenanceError, Result},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::cell::Cell;
use tracing::{debug, info, instrument};

/// Logged-in handle to the Zabbix API
#[derive(Debug)]
pub struct Session<T: Transport> {
    transport: T,
    token: String,
    next_id: Cell<u64>,
}

impl<T: Transport> Session<T> {
    /// Log in with the given credentials
    #[instrument(skip(transport, credentials), fields(user = %credentials.user))]
    pub fn connect(transport: T, credentials: &Credentials) -> Result<Self> {
        let login = JsonRpcRequest::new(
            "user.login",
            json!({
                "username": credentials.user,
                "password": credentials.password,
            }),
            1,
        );

        let result = unwrap_response(&transport, &login)?;
        let token = match result {
            Value::String(token) => token,
            other => {
                return Err(MaintenanceError::invalid_response(
                    "user.login",
                    format!("expected a session token, got {other}"),
                ));
            }
        };

        info!("Logged in to {}", credentials.server_url);

        Ok(Self {
            transport,
            token,
            next_id: Cell::new(2),
        })
    }

    /// Call an API method and return the raw `result` member
    pub fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let request = JsonRpcRequest::new(method, params, id).with_auth(self.token.clone());
        debug!("Calling {} (id {})", method, id);

        unwrap_response(&self.transport, &request)
    }

    /// Call an API method and decode its `result` member
    pub fn call_as<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let result = self.call(method, params)?;
        serde_json::from_value(result)
            .map_err(|e| MaintenanceError::invalid_response(method, e.to_string()))
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Open a session over HTTP using the configured server and credentials
pub fn connect_http(config: &Config) -> Result<Session<HttpTransport>> {
    let credentials = config.credentials()?;
    let transport = HttpTransport::new(&credentials.server_url, config.server.timeout())?;
    Session::connect(transport, &credentials)
}

fn unwrap_response<T: Transport>(transport: &T, request: &JsonRpcRequest) -> Result<Value> {
    let response = transport.send(request)?;

    if let Some(error) = response.error {
        return Err(MaintenanceError::api(
            request.method.clone(),
            error.code,
            error.detail(),
            error.data,
        ));
    }

    response.result.ok_or_else(|| {
        MaintenanceError::invalid_response(
            request.method.clone(),
            "response has neither result nor error",
        )
    })
}
