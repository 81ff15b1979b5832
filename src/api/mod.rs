//! Zabbix JSON-RPC client
//!
//! Message types, the transport seam and the authenticated session.

pub mod jsonrpc;
pub mod session;
pub mod transport;

pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use session::{Session, connect_http};
pub use transport::{HttpTransport, Transport};
