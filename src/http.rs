use std::fs;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{redirect, Client, Url};

use crate::config::Config;
use crate::model::{HttpMethod, KeyValue, RequestDraft};

/// Immutable copy of the draft taken when the send was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<KeyValue>,
    pub params: Vec<KeyValue>,
    pub body: Vec<u8>,
}

impl RequestSpec {
    pub fn snapshot(draft: &RequestDraft) -> Self {
        Self {
            method: draft.method,
            url: draft.url.clone(),
            headers: draft.headers.clone(),
            params: draft.params.clone(),
            body: draft.body.as_bytes().to_vec(),
        }
    }

    /// Parses the URL and appends the params to its existing query.
    /// Keys already present in the URL are kept alongside the params.
    pub fn resolve_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.url).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("relative URL without a base") {
                return "Invalid URL: missing scheme (try https://)".to_string();
            }
            format!("Invalid URL: {}", msg)
        })?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in &self.params {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseData {
    /// Status code plus reason phrase, e.g. `200 OK`.
    pub status: String,
    pub status_code: u16,
    pub body: String,
    pub elapsed: String,
}

pub fn build_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();

    if config.http.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(config.http.timeout));
    }

    builder = if config.http.follow_redirects {
        builder.redirect(redirect::Policy::limited(config.http.max_redirects as usize))
    } else {
        builder.redirect(redirect::Policy::none())
    };

    if let Some(ref proxy_url) = config.proxy.url {
        let mut proxy = reqwest::Proxy::all(proxy_url.as_str())
            .with_context(|| format!("invalid proxy url \"{}\"", proxy_url))?;
        if let Some(ref no_proxy) = config.proxy.no_proxy {
            proxy = proxy.no_proxy(reqwest::NoProxy::from_string(no_proxy));
        }
        builder = builder.proxy(proxy);
    }

    if !config.ssl.verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(ref path) = config.ssl.ca_cert {
        let pem = fs::read(path)
            .with_context(|| format!("could not read CA certificate \"{}\"", path.display()))?;
        let cert = reqwest::Certificate::from_pem(&pem)
            .with_context(|| format!("invalid CA certificate \"{}\"", path.display()))?;
        builder = builder.add_root_certificate(cert);
    }

    builder.build().context("failed to create HTTP client")
}

pub async fn send_request(client: &Client, spec: RequestSpec) -> Result<ResponseData, String> {
    let start = Instant::now();
    let url = spec.resolve_url()?;

    let method = reqwest::Method::from_bytes(spec.method.as_str().as_bytes())
        .map_err(|e| format!("Invalid HTTP method '{}': {}", spec.method, e))?;
    let mut builder = client.request(method, url);

    for header in &spec.headers {
        builder = builder.header(header.key.as_str(), header.value.as_str());
    }

    if !spec.body.is_empty() {
        builder = builder.body(spec.body);
    }

    let response = builder.send().await.map_err(format_request_error)?;

    let status = response.status();
    let status_text = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_str(), reason),
        None => status.as_str().to_string(),
    };

    let body = response.text().await.map_err(format_request_error)?;

    Ok(ResponseData {
        status: status_text,
        status_code: status.as_u16(),
        body,
        elapsed: format_elapsed(start.elapsed()),
    })
}

/// Millisecond-rounded duration text: `12ms`, `1.5s`, `2m3.25s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = (elapsed.as_micros() + 500) / 1000;
    if millis < 1000 {
        return format!("{}ms", millis);
    }
    let minutes = millis / 60_000;
    let rest = millis % 60_000;
    let seconds = format!("{}.{:03}", rest / 1000, rest % 1000);
    let seconds = seconds.trim_end_matches('0').trim_end_matches('.');
    if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn format_request_error(err: reqwest::Error) -> String {
    if err.is_timeout() {
        return "Request timed out".to_string();
    }
    if err.is_connect() {
        if let Some(url) = err.url() {
            if let Some(host) = url.host_str() {
                return format!("Connection failed: {}", host);
            }
        }
        return "Connection failed".to_string();
    }
    if err.is_builder() {
        return format!("Invalid request: {}", err);
    }
    if err.is_redirect() {
        return "Too many redirects".to_string();
    }
    if err.is_decode() || err.is_body() {
        return "Failed to decode response body".to_string();
    }
    format!("Request failed: {}", err)
}
