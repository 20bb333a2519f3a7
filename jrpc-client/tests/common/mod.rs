//! Common test utilities for jrpc-client integration tests
//!
//! Provides a tiny HTTP/1.1 server on a raw `TcpListener` that records what the
//! client sent, answers with a canned body and reports when the client hangs up.
//! The same server can sit behind rustls, optionally demanding a client
//! certificate, using a throwaway PKI from `TestPki`.

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::server::WebPkiClientVerifier;
use tokio_rustls::rustls::{self, RootCertStore, ServerConfig};
use tokio_rustls::TlsAcceptor;

/// A request as seen on the wire
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lower-cased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// DER of the certificate the client presented over TLS
    pub client_certificate: Option<Vec<u8>>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// Things the mock server observed, in order
#[derive(Debug)]
pub enum ServerEvent {
    /// A TCP connection was accepted
    Accepted,
    /// A complete HTTP request was read
    Request(CapturedRequest),
    /// The first bytes on a connection were not HTTP (e.g. a TLS ClientHello)
    NonHttp(Vec<u8>),
    /// The client closed its side of the connection
    ClientClosed,
    /// The TLS handshake was rejected
    HandshakeFailed(String),
}

#[derive(Clone)]
enum Reply {
    Respond { status: u16, body: Vec<u8> },
    Silent,
}

/// Mock HTTP server for client testing
pub struct MockHttpServer {
    addr: SocketAddr,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl MockHttpServer {
    /// Answer every request with `200 OK` and the given body
    pub async fn respond_with(body: impl Into<Vec<u8>>) -> Self {
        Self::respond_with_status(200, body).await
    }

    /// Answer every request with the given status and body
    pub async fn respond_with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::start(Reply::Respond {
            status,
            body: body.into(),
        })
        .await
    }

    /// Read requests but never answer
    pub async fn silent() -> Self {
        Self::start(Reply::Silent).await
    }

    /// Answer over TLS with the server certificate from `pki`
    ///
    /// With `require_client_cert` the handshake fails unless the client
    /// presents a certificate issued by the same CA.
    pub async fn tls_respond_with(
        pki: &TestPki,
        require_client_cert: bool,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let acceptor = pki.acceptor(require_client_cert);
        Self::start_with(
            Reply::Respond {
                status: 200,
                body: body.into(),
            },
            Some(acceptor),
        )
        .await
    }

    async fn start(reply: Reply) -> Self {
        Self::start_with(reply, None).await
    }

    async fn start_with(reply: Reply, acceptor: Option<TlsAcceptor>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let _ = tx.send(ServerEvent::Accepted);
                let reply = reply.clone();
                let tx = tx.clone();
                let acceptor = acceptor.clone();

                tokio::spawn(async move {
                    match acceptor {
                        None => handle_connection(stream, reply, None, tx).await,
                        Some(acceptor) => match acceptor.accept(stream).await {
                            Ok(tls) => {
                                let certificate = tls
                                    .get_ref()
                                    .1
                                    .peer_certificates()
                                    .and_then(|chain| chain.first())
                                    .map(|leaf| leaf.to_vec());
                                handle_connection(tls, reply, certificate, tx).await
                            }
                            Err(e) => {
                                let _ = tx.send(ServerEvent::HandshakeFailed(e.to_string()));
                            }
                        },
                    }
                });
            }
        });

        Self { addr, events }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL with the given scheme and path pointing at this server
    pub fn url(&self, scheme: &str, path: &str) -> String {
        format!("{}://{}{}", scheme, self.addr, path)
    }

    /// Wait up to five seconds for the next event
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        timeout(Duration::from_secs(5), self.events.recv())
            .await
            .ok()
            .flatten()
    }

    /// Wait for the next captured request, skipping other events
    pub async fn next_request(&mut self) -> Option<CapturedRequest> {
        while let Some(event) = self.next_event().await {
            if let ServerEvent::Request(request) = event {
                return Some(request);
            }
        }
        None
    }

    /// Drain events that are already queued
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

async fn handle_connection<S>(
    mut stream: S,
    reply: Reply,
    client_certificate: Option<Vec<u8>>,
    tx: mpsc::UnboundedSender<ServerEvent>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => {
                let _ = tx.send(ServerEvent::ClientClosed);
                return;
            }
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if !buf[0].is_ascii_uppercase() {
            let _ = tx.send(ServerEvent::NonHttp(buf.clone()));
            return;
        }
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    let _ = tx.send(ServerEvent::Request(CapturedRequest {
        method,
        path,
        headers,
        body,
        client_certificate,
    }));

    if let Reply::Respond { status, body } = reply {
        let head = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            status,
            body.len()
        );
        let _ = stream.write_all(head.as_bytes()).await;
        let _ = stream.write_all(&body).await;
        let _ = stream.flush().await;
    }

    // Keep the connection open from our side and report when the client drops it.
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => {
                let _ = tx.send(ServerEvent::ClientClosed);
                return;
            }
            Ok(_) => {}
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Throwaway PKI: one CA, a server leaf for localhost and 127.0.0.1, a client leaf
pub struct TestPki {
    pub ca_pem: String,
    ca_der: CertificateDer<'static>,
    server_cert_der: CertificateDer<'static>,
    server_key_der: Vec<u8>,
    pub client_cert_pem: String,
    pub client_key_pem: String,
    pub client_cert_der: Vec<u8>,
}

impl TestPki {
    pub fn generate() -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params
            .distinguished_name
            .push(DnType::CommonName, "jrpc test CA");
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let server_key = KeyPair::generate().unwrap();
        let mut server_params =
            CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()])
                .unwrap();
        server_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        let server_cert = server_params
            .signed_by(&server_key, &ca_cert, &ca_key)
            .unwrap();

        let client_key = KeyPair::generate().unwrap();
        let mut client_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        client_params
            .distinguished_name
            .push(DnType::CommonName, "jrpc test client");
        client_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ClientAuth];
        let client_cert = client_params
            .signed_by(&client_key, &ca_cert, &ca_key)
            .unwrap();

        Self {
            ca_pem: ca_cert.pem(),
            ca_der: ca_cert.der().clone(),
            server_cert_der: server_cert.der().clone(),
            server_key_der: server_key.serialize_der(),
            client_cert_pem: client_cert.pem(),
            client_key_pem: client_key.serialize_pem(),
            client_cert_der: client_cert.der().to_vec(),
        }
    }

    fn acceptor(&self, require_client_cert: bool) -> TlsAcceptor {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ServerConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .unwrap();

        let builder = if require_client_cert {
            let mut roots = RootCertStore::empty();
            roots.add(self.ca_der.clone()).unwrap();
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .unwrap();
            builder.with_client_cert_verifier(verifier)
        } else {
            builder.with_no_client_auth()
        };

        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.server_key_der.clone()));
        let config = builder
            .with_single_cert(vec![self.server_cert_der.clone()], key)
            .unwrap();
        TlsAcceptor::from(Arc::new(config))
    }
}

/// Snapshot of the entries in the system temp directory
pub fn temp_entries() -> HashSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default()
}

/// Temp entries created since `before` whose content includes `needle`
pub fn new_temp_files_containing(before: &HashSet<PathBuf>, needle: &str) -> Vec<PathBuf> {
    temp_entries()
        .difference(before)
        .filter(|path| {
            std::fs::read_to_string(path)
                .map(|content| content.contains(needle))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Helper to create a JSON-RPC success body
pub fn mock_response(id: i64, result: serde_json::Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
    .to_string()
}

/// Helper to create a JSON-RPC error body
pub fn mock_error_response(id: i64, code: i64, message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}

/// A port on localhost that nothing listens on
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
