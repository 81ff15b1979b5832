//! Zabbix API stand-in for driving the binary end to end
//!
//! A hyper server on its own runtime thread, so the tests themselves stay
//! synchronous like the binary they run.

use assert_cmd::Command;
use http_body_util::{BodyExt, Full};
use hyper::{
    Request, Response,
    body::{Bytes, Incoming},
    server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, mpsc},
    thread,
};
use tokio::{net::TcpListener, sync::oneshot};

type Table = Arc<HashMap<String, Reply>>;
type Seen = Arc<Mutex<Vec<Value>>>;

/// Answers JSON-RPC calls by method name and records every request body
pub struct StubServer {
    url: String,
    requests: Seen,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

/// Canned answer for one method
#[derive(Clone)]
pub enum Reply {
    Result(Value),
    Error { code: i64, message: String, data: String },
    /// Sent verbatim with the given HTTP status
    Raw { status: u16, body: String },
}

impl StubServer {
    pub fn start(replies: Vec<(&str, Reply)>) -> Self {
        let mut table: HashMap<String, Reply> = replies
            .into_iter()
            .map(|(method, reply)| (method.to_string(), reply))
            .collect();
        table
            .entry("user.login".to_string())
            .or_insert_with(|| Reply::Result(json!("0424bd59b807674191e7d77572075f33")));

        let requests: Seen = Arc::new(Mutex::new(Vec::new()));
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let table = Arc::new(table);
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
                .unwrap();
            runtime.block_on(serve(table, seen, addr_tx, shutdown_rx));
        });

        let addr = addr_rx.recv().unwrap();
        Self {
            url: format!("http://{addr}"),
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn last(&self, method: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r["method"] == method)
    }

    /// The binary pointed at this server with valid-looking credentials
    pub fn command(&self) -> Command {
        let mut cmd = bin();
        cmd.args(["--server", self.url(), "--user", "deployer", "--password", "secret"]);
        cmd
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// The binary with a clean environment
pub fn bin() -> Command {
    let mut cmd = Command::cargo_bin("zabbix-maintenance").unwrap();
    for var in [
        "ZABBIX_SERVER",
        "ZABBIX_USER",
        "ZABBIX_PASSWORD",
        "ZABBIX_TIMEOUT",
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("TZ", "UTC");
    cmd
}

async fn serve(
    table: Table,
    seen: Seen,
    addr_tx: mpsc::Sender<SocketAddr>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    addr_tx.send(listener.local_addr().unwrap()).unwrap();

    loop {
        tokio::select! {
            result = listener.accept() => {
                let Ok((stream, _)) = result else { continue };
                let table = Arc::clone(&table);
                let seen = Arc::clone(&seen);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        answer(req, Arc::clone(&table), Arc::clone(&seen))
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        eprintln!("Stub server error: {err}");
                    }
                });
            }
            _ = &mut shutdown_rx => break,
        }
    }
}

async fn answer(
    req: Request<Incoming>,
    table: Table,
    seen: Seen,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let body = req.into_body().collect().await?.to_bytes();
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    seen.lock().unwrap().push(request.clone());

    let method = request["method"].as_str().unwrap_or_default();
    let id = request["id"].clone();
    let (status, payload) = match table.get(method) {
        Some(Reply::Raw { status, body }) => (*status, body.clone()),
        Some(Reply::Result(result)) => (
            200,
            json!({"jsonrpc": "2.0", "result": result, "id": id}).to_string(),
        ),
        Some(Reply::Error { code, message, data }) => (
            200,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": code, "message": message, "data": data},
                "id": id,
            })
            .to_string(),
        ),
        None => (
            200,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": "Method not found.", "data": method},
                "id": id,
            })
            .to_string(),
        ),
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(payload)))
        .unwrap())
}
