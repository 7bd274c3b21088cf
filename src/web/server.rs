//! HTTP server for the admin pages.

use anyhow::Result;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::controller::AdminController;
use super::render;
use super::request::{Method, RequestContext, Response, DEFAULT_USER};
use super::tokens::TokenSigner;
use crate::calling_codes::RestCountriesClient;
use crate::config::ServerConfig;
use crate::db::Database;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

const SOCKET_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a client may stall while sending its request. Connections are
/// served one at a time, so a stalled body holds up every other request
/// until this expires.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Header a fronting proxy uses to name the signed-in user.
const USER_HEADER: &str = "x-remote-user";

/// HTTP server for the admin pages.
pub struct AdminServer {
    address: String,
    db_path: PathBuf,
    calling_codes: RestCountriesClient,
    tokens: TokenSigner,
    read_timeout: Duration,
}

impl AdminServer {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        // Fail early if the database cannot be opened or migrated
        Database::open_at(config.db_path.clone())?;

        let calling_codes =
            RestCountriesClient::new(config.calling_codes_url.clone(), config.fetch_timeout)?;

        Ok(Self {
            address: config.address(),
            db_path: config.db_path.clone(),
            calling_codes,
            tokens: TokenSigner::new(config.secret.clone()),
            read_timeout: REQUEST_READ_TIMEOUT,
        })
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Bind the configured address and serve until `shutdown` is set (blocking).
    pub fn start(&self, shutdown: Arc<AtomicBool>) -> Result<()> {
        let listener = TcpListener::bind(&self.address)?;
        self.serve(listener, shutdown)
    }

    /// Serve connections from an already bound listener.
    pub fn serve(&self, listener: TcpListener, shutdown: Arc<AtomicBool>) -> Result<()> {
        listener.set_nonblocking(true)?;

        info!(address = %listener.local_addr()?, "admin server listening");

        while !shutdown.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, peer_addr)) => {
                    if let Err(e) = self.handle_connection(stream, peer_addr) {
                        warn!(peer = %peer_addr, error = %e, "request error");
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }

        info!("admin server stopped");
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream, peer_addr: SocketAddr) -> Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(self.read_timeout))?;
        stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;

        let started = Instant::now();
        let mut reader = BufReader::new(stream.try_clone()?);

        let outcome = match read_request(&mut reader) {
            Ok(outcome) => outcome,
            Err(e) if is_timeout(&e) => {
                warn!(peer = %peer_addr, "client stalled while sending its request");
                return send_text(&mut stream, 408, "Request Timeout");
            }
            Err(e) => return Err(e),
        };

        let request = match outcome {
            ReadOutcome::Request(request) => request,
            ReadOutcome::BadRequest => {
                return send_text(&mut stream, 400, "Bad Request");
            }
            ReadOutcome::TooLarge => {
                return send_text(&mut stream, 413, "Payload Too Large");
            }
        };

        let response = self.dispatch(&request);
        write_response(&mut stream, &response, request.method == "HEAD")?;

        info!(
            peer = %peer_addr,
            method = %request.method,
            path = %request.target,
            status = response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        Ok(())
    }

    /// Route a parsed request to the controller with a fresh connection.
    fn dispatch(&self, request: &RawRequest) -> Response {
        let method = match Method::parse(&request.method) {
            Some(method) => method,
            None => {
                return Response::html(
                    405,
                    render::render_message("Method Not Allowed", "Unsupported request method."),
                )
            }
        };

        let db = match Database::open_at(self.db_path.clone()) {
            Ok(db) => db,
            Err(e) => {
                error!(path = %self.db_path.display(), error = %e, "failed to open database");
                return Response::html(
                    500,
                    render::render_message("Error", "The database is unavailable."),
                );
            }
        };

        let user = request
            .headers
            .get(USER_HEADER)
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER);

        let ctx = RequestContext::from_target(method, &request.target, &request.body, user);
        let controller = AdminController::new(&db, &db, &self.calling_codes, &self.tokens);
        controller.handle(&ctx)
    }
}

/// Request as read off the wire, before any interpretation.
#[derive(Debug)]
struct RawRequest {
    method: String,
    target: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

#[derive(Debug)]
enum ReadOutcome {
    Request(RawRequest),
    BadRequest,
    TooLarge,
}

fn read_request<R: BufRead>(reader: &mut R) -> Result<ReadOutcome> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Ok(ReadOutcome::BadRequest);
    }

    let method = parts[0].to_string();
    let target = parts[1].to_string();

    // Parse headers
    let mut headers = HashMap::new();
    let mut content_length = 0usize;

    loop {
        let mut header_line = String::new();
        if reader.read_line(&mut header_line)? == 0 {
            break;
        }
        let header_line = header_line.trim();
        if header_line.is_empty() {
            break;
        }
        if let Some((key, value)) = header_line.split_once(':') {
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();
            if key == "content-length" {
                content_length = match value.parse() {
                    Ok(len) => len,
                    Err(_) => return Ok(ReadOutcome::BadRequest),
                };
            }
            headers.insert(key, value);
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Ok(ReadOutcome::TooLarge);
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body)?;
    }

    Ok(ReadOutcome::Request(RawRequest {
        method,
        target,
        headers,
        body,
    }))
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>().is_some_and(|e| {
        matches!(
            e.kind(),
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
        )
    })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        303 => "See Other",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

fn write_response<W: Write>(out: &mut W, response: &Response, head_only: bool) -> Result<()> {
    let head = match response {
        Response::Redirect { location } => format!(
            "HTTP/1.1 303 {}\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status_text(303),
            location
        ),
        Response::Html { status, body } => format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            status,
            status_text(*status),
            body.len()
        ),
    };

    out.write_all(head.as_bytes())?;
    if !head_only {
        out.write_all(response.body().as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn send_text<W: Write>(out: &mut W, status: u16, message: &str) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        message.len(),
        message
    );
    out.write_all(response.as_bytes())?;
    out.flush()?;
    Ok(())
}
