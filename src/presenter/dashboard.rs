use std::convert::Infallible;
use std::sync::Arc;

use chrono::Local;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;

use crate::http_probe::prelude::*;
use crate::http_probe::report;

pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Connection Check Dashboard</title>
    <style>
      body { font-family: sans-serif; margin: 2rem auto; max-width: 900px; color: #222; }
      ul.results { list-style: none; padding: 0; }
      .result { border-radius: 6px; margin-bottom: 1rem; padding: 1rem; border-left: 6px solid; }
      .result.success { background: #e8f5e9; border-color: #2e7d32; }
      .result.failure { background: #ffebee; border-color: #c62828; }
      .result h2 { font-size: 1rem; margin: 0 0 .5rem 0; word-break: break-all; }
      .result dl { display: grid; grid-template-columns: max-content auto; gap: .25rem 1rem; margin: 0; }
      .result dt { font-weight: bold; }
      .result dd { margin: 0; }
      .result .error { color: #c62828; font-family: monospace; margin: .5rem 0 0 0; }
      .refresh { display: inline-block; padding: .5rem 1rem; background: #1565c0; color: #fff; border-radius: 4px; text-decoration: none; }
      .generated { color: #666; font-size: .9rem; }
    </style>
  </head>
  <body>
    <h1>Connection Check Dashboard</h1>
    <p class="generated">Checked at {{generated_at}}</p>
    <p><a class="refresh" href="/">Refresh</a></p>
    <ul class="results">
{{results}}
    </ul>
  </body>
</html>
"#;

/// Serves one page that re-checks every configured URL on each load.
///
/// Nothing is cached between requests.
pub struct Dashboard {
    prober: Prober,
    urls: Vec<String>,
    template: String,
}

impl Dashboard {
    pub fn new(prober: Prober, urls: Vec<String>, template: impl Into<String>) -> Self {
        Dashboard {
            prober,
            urls,
            template: template.into(),
        }
    }

    /// Checks the URLs one after the other. A failing probe becomes an error
    /// record instead of failing the whole batch.
    pub async fn check_all(&self) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            let result = match self.prober.check(url).await {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("Probe error for {url}: {}", report(&e));
                    CheckResult::failed(url, &e, Local::now())
                }
            };
            results.push(result);
        }
        results
    }

    pub fn render(&self, results: &[CheckResult], generated_at: &str) -> String {
        let rows: String = results.iter().map(render_row).collect();

        self.template
            .replace("{{generated_at}}", &escape_html(generated_at))
            .replace("{{results}}", &rows)
    }

    pub async fn route(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        match (method, path) {
            (&Method::GET, "/") => {
                let results = self.check_all().await;
                let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                let mut response = respond(
                    StatusCode::OK,
                    "text/html; charset=utf-8",
                    self.render(&results, &generated_at),
                );
                response
                    .headers_mut()
                    .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
                response
            }
            (_, "/") => {
                let mut response = respond(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "text/plain; charset=utf-8",
                    "Method Not Allowed".to_string(),
                );
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET"));
                response
            }
            _ => respond(
                StatusCode::NOT_FOUND,
                "text/plain; charset=utf-8",
                "Not Found".to_string(),
            ),
        }
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn render_row(result: &CheckResult) -> String {
    let class = if result.successful() { "success" } else { "failure" };
    let url = escape_html(result.url());
    let error = result
        .error()
        .map(|e| format!("\n        <p class=\"error\">{}</p>", escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"      <li class="result {class}">
        <h2><a href="{url}">{url}</a></h2>
        <dl>
          <dt>Status</dt><dd>{status}</dd>
          <dt>Successful</dt><dd>{successful}</dd>
          <dt>Response time</dt><dd>{response_time:.3} s</dd>
          <dt>Checked at</dt><dd>{timestamp}</dd>
        </dl>{error}
      </li>
"#,
        status = result.status(),
        successful = result.successful(),
        response_time = result.response_time(),
        timestamp = escape_html(result.timestamp()),
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Accepts connections until Ctrl-C, serving each one on its own task.
pub async fn serve(listener: TcpListener, dashboard: Arc<Dashboard>) -> std::io::Result<()> {
    log::info!("Dashboard listening on http://{}", listener.local_addr()?);

    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down dashboard");
                return Ok(());
            }
        };

        let (stream, peer) = match accepted {
            Ok(connection) => connection,
            Err(e) => {
                log::warn!("Failed to accept connection: {e}");
                continue;
            }
        };

        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let dashboard = Arc::clone(&dashboard);
                async move {
                    log::debug!("{} {} from {peer}", req.method(), req.uri().path());
                    Ok::<_, Infallible>(dashboard.route(req.method(), req.uri().path()).await)
                }
            });

            let builder = auto::Builder::new(TokioExecutor::new());
            if let Err(e) = builder
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                log::debug!("Connection from {peer} ended with error: {e}");
            }
        });
    }
}
