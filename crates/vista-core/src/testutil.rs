//! Loopback HTTP server and image fixtures shared by unit tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned response for one request path (query string ignored).
#[derive(Clone)]
pub(crate) struct Route {
    path: String,
    status: u16,
    content_type: String,
    body: Vec<u8>,
    stall: Duration,
}

impl Route {
    pub(crate) fn ok(path: &str, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            content_type: content_type.to_string(),
            body,
            stall: Duration::ZERO,
        }
    }

    pub(crate) fn json(path: &str, body: &str) -> Self {
        Self::ok(path, "application/json", body.as_bytes().to_vec())
    }

    pub(crate) fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            content_type: "text/plain".to_string(),
            body: b"error".to_vec(),
            stall: Duration::ZERO,
        }
    }

    /// Wait `stall` before answering. Stalls block the (sequential) server.
    pub(crate) fn stalled(mut self, stall: Duration) -> Self {
        self.stall = stall;
        self
    }
}

pub(crate) struct TestServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    /// Raw request heads received so far, in arrival order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `routes` on 127.0.0.1 until the test runtime shuts down.
/// Unknown paths answer 404.
pub(crate) async fn serve(routes: Vec<Route>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let head = String::from_utf8_lossy(&head).to_string();
            let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
            let path = target.split('?').next().unwrap_or("/").to_string();
            seen.lock().unwrap().push(head);

            let route = routes
                .iter()
                .find(|r| r.path == path)
                .cloned()
                .unwrap_or_else(|| Route::status(&path, 404));

            if !route.stall.is_zero() {
                tokio::time::sleep(route.stall).await;
            }

            let reason = match route.status {
                200 => "OK",
                404 => "Not Found",
                _ => "Error",
            };
            let response_head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                route.status,
                reason,
                route.content_type,
                route.body.len()
            );
            let _ = socket.write_all(response_head.as_bytes()).await;
            let _ = socket.write_all(&route.body).await;
            let _ = socket.shutdown().await;
        }
    });

    TestServer { base, requests }
}

/// Encode a noise image so compressed size scales with pixel count.
pub(crate) fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(u64::from(width) << 32 | u64::from(height));
    let img = RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub(crate) fn jpeg(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}
