//! Shared helpers for the integration tests: a minimal HTTP/1.1 responder
//! and a hand-built DNS answer, both served from the loopback interface.
#![allow(dead_code)]

// Standard library
use std::sync::Arc;

// 3rd party crates
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Serves every connection with one canned response computed from the
/// request body. Returns the base URL of the server.
pub async fn spawn_http_server<F>(respond: F) -> String
where
    F: Fn(&[u8]) -> (&'static str, Vec<u8>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let body = read_request(&mut stream).await;
                let (content_type, payload) = respond(&body);
                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    content_type,
                    payload.len()
                );
                let _ = stream.write_all(header.as_bytes()).await;
                let _ = stream.write_all(&payload).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{}/", addr)
}

/// Accepts connections and never answers them, simulating an unreachable
/// (blackholed) endpoint.
pub async fn spawn_hang_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buffer = [0u8; 1024];
                loop {
                    match stream.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
            });
        }
    });
    format!("http://{}/", addr)
}

/// Reads one HTTP request and returns its body.
async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            return Vec::new();
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = find(&buffer, b"\r\n\r\n") {
            break position + 4;
        }
        if buffer.len() > 64 * 1024 {
            return Vec::new();
        }
    };

    let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);
    body
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Hand-builds a one-answer TXT/CHAOS response to the query in
/// `request_body`, echoing its transaction id.
pub fn dns_txt_response(request_body: &[u8], txt: &str) -> Vec<u8> {
    assert!(request_body.len() >= 2, "request carries no DNS header");
    let mut message = Vec::new();
    message.extend_from_slice(&request_body[..2]);
    message.extend_from_slice(&0x8000u16.to_be_bytes()); // QR set, RCODE 0
    message.extend_from_slice(&0u16.to_be_bytes()); // QDCOUNT
    message.extend_from_slice(&1u16.to_be_bytes()); // ANCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT
    for label in ["whoami", "cloudflare"] {
        message.push(label.len() as u8);
        message.extend_from_slice(label.as_bytes());
    }
    message.push(0);
    message.extend_from_slice(&16u16.to_be_bytes()); // TXT
    message.extend_from_slice(&3u16.to_be_bytes()); // CHAOS
    message.extend_from_slice(&0u32.to_be_bytes()); // TTL
    message.extend_from_slice(&((txt.len() + 1) as u16).to_be_bytes());
    message.push(txt.len() as u8);
    message.extend_from_slice(txt.as_bytes());
    message
}
