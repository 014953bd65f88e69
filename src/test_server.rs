//! Local HTTP server used by the tests so nothing depends on the public internet.
//!
//! Routes:
//! - `/ok` answers 200
//! - `/missing` answers 404
//! - `/redirect` answers 302 pointing to `/ok`
//! - `/slow` answers 200 after two seconds
//! - `/user-agent` answers 200 when the default probe user agent was sent, 400 otherwise
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, header};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::http_probe::probe::DEFAULT_USER_AGENT;

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("test server should bind");
        let addr = listener.local_addr().expect("bound address");

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let builder = auto::Builder::new(TokioExecutor::new());
                    let _ = builder
                        .serve_connection(TokioIo::new(stream), service_fn(respond))
                        .await;
                });
            }
        });

        TestServer { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A URL on a port that nothing listens on.
    pub async fn unused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind a free port");
        let addr = listener.local_addr().expect("bound address");
        drop(listener);
        format!("http://{addr}/")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn plain(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .expect("valid response")
}

async fn respond(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match req.uri().path() {
        "/ok" => plain(StatusCode::OK, "ok"),
        "/missing" => plain(StatusCode::NOT_FOUND, "missing"),
        "/redirect" => Response::builder()
            .status(StatusCode::FOUND)
            .header(header::LOCATION, "/ok")
            .body(Full::new(Bytes::new()))
            .expect("valid response"),
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            plain(StatusCode::OK, "finally")
        }
        "/user-agent" => {
            let expected = req
                .headers()
                .get(header::USER_AGENT)
                .is_some_and(|agent| agent.as_bytes() == DEFAULT_USER_AGENT.as_bytes());
            if expected {
                plain(StatusCode::OK, "hello browser")
            } else {
                plain(StatusCode::BAD_REQUEST, "unexpected user agent")
            }
        }
        _ => plain(StatusCode::NOT_FOUND, "no such route"),
    };

    Ok(response)
}
