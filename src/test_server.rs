//! Loopback HTTP server that answers with canned responses, one connection per
//! response, and records the request lines it saw.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct TestServer {
  pub base: String,
  requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
  pub async fn start(responses: Vec<(u16, String)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
      for (status, body) in responses {
        let Ok((mut socket, _)) = listener.accept().await else {
          return;
        };
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
          let n = socket.read(&mut chunk).await.unwrap_or(0);
          if n == 0 {
            break;
          }
          buf.extend_from_slice(&chunk[..n]);
          if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
          }
        }
        let head = String::from_utf8_lossy(&buf);
        let line = head.lines().next().unwrap_or_default().to_owned();
        seen.lock().unwrap().push(line);

        let response = format!(
          "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
          status,
          if status < 400 { "OK" } else { "Error" },
          body.len(),
          body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
      }
    });

    TestServer { base, requests }
  }

  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }
}
