//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use add_header::config::{AddHeaderConfig, BackendConfig, ProxyConfig, RemapConfig};
use add_header::http::HttpServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Start a backend that answers every request with its own header block as the body.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }
                        let head = String::from_utf8_lossy(&buf).to_string();
                        let head = head.split("\r\n\r\n").next().unwrap_or_default().to_string();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            head.len(),
                            head
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Header lines of an echoed request head, names lowercased, in wire order.
pub fn parse_echo(body: &str) -> Vec<(String, String)> {
    body.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect()
}

/// All echoed values for `name`.
#[allow(dead_code)]
pub fn values<'a>(headers: &'a [(String, String)], name: &'a str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// A config with one origin and one catch-all remap entry carrying `rules`.
pub fn config_with_rules(backend: SocketAddr, rules: &[(&str, Option<&str>)]) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backends.push(BackendConfig {
        name: "origin".into(),
        address: backend.to_string(),
    });
    config.remap.push(RemapConfig {
        name: "all".into(),
        host: None,
        path_prefix: Some("/".into()),
        backend: "origin".into(),
        priority: 0,
        add_header: rules
            .iter()
            .map(|(header, policy)| AddHeaderConfig {
                header: header.to_string(),
                policy: policy.map(str::to_string),
                id: None,
            })
            .collect(),
    });
    config
}

/// Start the proxy on an ephemeral port. Dropping the sender stops it.
pub async fn start_proxy(server: HttpServer) -> (SocketAddr, broadcast::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = broadcast::channel(1);

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, tx)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
