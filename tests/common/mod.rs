#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// A request as received by `MockServer`.
pub struct Captured {
    pub head: String,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Answers one connection per canned response, in order, then stops.
pub struct MockServer {
    pub url: String,
    handle: JoinHandle<Vec<Captured>>,
}

impl MockServer {
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        Self::start_raw(
            responses
                .into_iter()
                .map(|(status, body)| response(status, body, body.len()))
                .collect(),
        )
    }

    /// Like `start`, but each response is written to the socket as is.
    pub fn start_raw(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for resp in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                captured.push(read_request(&mut stream));
                stream.write_all(resp.as_bytes()).expect("write response");
            }
            captured
        });
        MockServer { url, handle }
    }

    /// Wait for all canned responses to be served.
    pub fn requests(self) -> Vec<Captured> {
        self.handle.join().expect("mock server thread")
    }
}

/// Raw HTTP response announcing `content_length` bytes of body. A length
/// larger than `body` makes the client see a truncated body.
pub fn response(status: u16, body: &str, content_length: usize) -> String {
    let reason = if status == 200 { "OK" } else { "Error" };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status, reason, content_length, body
    )
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_request(stream: &mut impl Read) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).expect("read request head");
        assert!(n > 0, "connection closed before end of headers");
        buf.extend_from_slice(&chunk[..n]);
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut body = buf[head_end + 4..].to_vec();
    let lower = head.to_ascii_lowercase();

    if let Some(len) = lower
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
    {
        while body.len() < len {
            let n = stream.read(&mut chunk).expect("read request body");
            assert!(n > 0, "connection closed before end of body");
            body.extend_from_slice(&chunk[..n]);
        }
    } else if lower.contains("transfer-encoding: chunked") {
        while find(&body, b"0\r\n\r\n").is_none() {
            let n = stream.read(&mut chunk).expect("read chunked body");
            assert!(n > 0, "connection closed before last chunk");
            body.extend_from_slice(&chunk[..n]);
        }
    }
    Captured { head, body }
}

/// Scratch directory removed when the returned guard is dropped.
pub fn workdir() -> TempDir {
    tempfile::Builder::new()
        .prefix("imgup-tests")
        .tempdir()
        .expect("create temp dir")
}

pub fn temp_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path
}

/// A path inside `dir` that does not exist.
pub fn missing_file(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join("missing").join(name)
}
