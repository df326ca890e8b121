//! Minimal HTTP/1.1 codec: one request per connection, `Content-Length`
//! bodies only, `Connection: close` on every response.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on the request line plus headers.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl HttpError {
    /// Status code sent back for a request that failed to parse.
    pub fn status(&self) -> u16 {
        match self {
            HttpError::BodyTooLarge { .. } => 413,
            HttpError::HeadTooLarge(_) => 431,
            HttpError::Io(_) | HttpError::Malformed(_) => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Read one request. Returns `Ok(None)` when the peer closed the connection
/// before sending anything.
pub async fn read_request<R>(reader: &mut R, max_body: usize) -> Result<Option<Request>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = (&mut *reader).take(MAX_HEAD_BYTES as u64);

    let mut line = String::new();
    if head.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    check_line_complete(&line, head.limit())?;

    let mut parts = line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v)) => (m.to_string(), t, v),
        _ => return Err(HttpError::Malformed(format!("bad request line '{}'", line.trim_end()))),
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed(format!("unsupported version {}", version)));
    }
    let path = target.split('?').next().unwrap_or("/").to_string();

    let mut headers = HashMap::new();
    loop {
        line.clear();
        if head.read_line(&mut line).await? == 0 {
            return Err(HttpError::Malformed("connection closed inside headers".into()));
        }
        check_line_complete(&line, head.limit())?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        let (name, value) = trimmed
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("bad header line '{}'", trimmed)))?;
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    if headers
        .get("transfer-encoding")
        .is_some_and(|te| !te.eq_ignore_ascii_case("identity"))
    {
        return Err(HttpError::Malformed("chunked bodies are not supported".into()));
    }

    let length = match headers.get("content-length") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| HttpError::Malformed(format!("bad content-length '{}'", raw)))?,
        None => 0,
    };
    if length > max_body {
        return Err(HttpError::BodyTooLarge { limit: max_body });
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;

    Ok(Some(Request {
        method,
        path,
        headers,
        body,
    }))
}

fn check_line_complete(line: &str, remaining: u64) -> Result<(), HttpError> {
    if line.ends_with('\n') {
        Ok(())
    } else if remaining == 0 {
        Err(HttpError::HeadTooLarge(MAX_HEAD_BYTES))
    } else {
        Err(HttpError::Malformed("connection closed mid-line".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::empty(status)
                .with_header("Content-Type", "application/json")
                .with_body(body),
            Err(e) => Self::error(500, &format!("serialization failed: {}", e)),
        }
    }

    /// JSON `{ "error": message }` body.
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::empty(status)
            .with_header("Content-Type", "application/json")
            .with_body(body.into_bytes())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        writer.write_all(head.as_bytes()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn parse(raw: &str, max_body: usize) -> Result<Option<Request>, HttpError> {
        let mut reader = BufReader::new(raw.as_bytes());
        read_request(&mut reader, max_body).await
    }

    #[tokio::test]
    async fn parses_post_with_body() {
        let raw = "POST /command?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 22\r\n\r\n{\"command\":\"go north\"}";
        let req = parse(raw, 1024).await.unwrap().unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/command");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("Host"), Some("localhost"));
        assert_eq!(req.body, br#"{"command":"go north"}"#.to_vec());
    }

    #[tokio::test]
    async fn parses_get_without_body() {
        let req = parse("GET /start HTTP/1.1\r\n\r\n", 16).await.unwrap().unwrap();
        assert_eq!(req.path, "/start");
        assert!(req.body.is_empty());
    }

    #[tokio::test]
    async fn request_split_across_reads() {
        let mock = tokio_test::io::Builder::new()
            .read(b"POST /command HT")
            .read(b"TP/1.1\r\nContent-Le")
            .read(b"ngth: 4\r\n\r\nlo")
            .read(b"ok")
            .build();
        let mut reader = BufReader::new(mock);
        let req = read_request(&mut reader, 64).await.unwrap().unwrap();
        assert_eq!(req.path, "/command");
        assert_eq!(req.body, b"look".to_vec());
    }

    #[tokio::test]
    async fn empty_stream_is_none() {
        assert!(parse("", 16).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let raw = "POST /command HTTP/1.1\r\nContent-Length: 500\r\n\r\n";
        let err = parse(raw, 100).await.unwrap_err();
        assert!(matches!(err, HttpError::BodyTooLarge { limit: 100 }));
        assert_eq!(err.status(), 413);
    }

    #[tokio::test]
    async fn rejects_garbage() {
        assert!(matches!(
            parse("HELLO\r\n\r\n", 16).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("GET / SPDY/3\r\n\r\n", 16).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("GET / HTTP/1.1\r\nNoColonHere\r\n\r\n", 16).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n", 16).await,
            Err(HttpError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn rejects_endless_headers() {
        let mut raw = String::from("GET / HTTP/1.1\r\n");
        raw.push_str("X-Filler: ");
        raw.push_str(&"a".repeat(MAX_HEAD_BYTES * 2));
        raw.push_str("\r\n\r\n");
        assert!(matches!(
            parse(&raw, 16).await,
            Err(HttpError::HeadTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn writes_status_headers_and_body() {
        let resp = Response::json(200, &serde_json::json!({"ok": true}))
            .with_header("Access-Control-Allow-Origin", "*");
        let mut out: Vec<u8> = Vec::new();
        resp.write_to(&mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.contains("Content-Length: 11\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"ok\":true}"));
    }

    #[test]
    fn error_body_is_json() {
        let resp = Response::error(404, "no such route");
        let value: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(value["error"], "no such route");
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }
}
