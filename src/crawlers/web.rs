use crate::crawlers::PageFetcher;
use crate::errors::FetchError;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fetches listing pages over HTTP with a fixed set of headers and timeout
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client sending `headers` with every request.
    ///
    /// # Arguments
    ///
    /// * `headers` - Header names and values, validated here
    /// * `timeout` - Applied to each request as a whole (connect + body)
    pub fn new(headers: &BTreeMap<String, String>, timeout: Duration) -> Result<Self, FetchError> {
        let mut header_map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            header_map.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Request {
                url: String::new(),
                source,
            })?;

        ::log::debug!(
            "HTTP client ready with {} default headers and a {:?} timeout",
            headers.len(),
            timeout
        );
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let started = std::time::Instant::now();
        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        ::log::debug!(
            "GET {} -> {} ({} bytes in {:.2} seconds)",
            url,
            status,
            body.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/alertas?page=0", addr)
    }

    /// Same client setup as `new`, but never routed through an environment proxy
    fn fetcher() -> HttpFetcher {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpFetcher { client }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let url = serve_once("HTTP/1.1 200 OK", "<html><body>listado</body></html>").await;
        let body = fetcher().fetch(&url).await.unwrap();
        assert_eq!(body, "<html><body>listado</body></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;
        match fetcher().fetch(&url).await {
            Err(FetchError::Status { status, url: failed }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_request_error() {
        // Bind then drop to get a port nothing listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let url = format!("http://{}/alertas", addr);
        assert!(matches!(
            fetcher().fetch(&url).await,
            Err(FetchError::Request { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "value".to_string());
        match HttpFetcher::new(&headers, Duration::from_secs(15)) {
            Err(FetchError::InvalidHeader { name, .. }) => assert_eq!(name, "Bad Header"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("invalid header accepted"),
        }
    }

    #[test]
    fn test_accepts_default_headers() {
        let config = crate::config::ScrapeConfig::default();
        assert!(HttpFetcher::new(&config.headers, config.request_timeout()).is_ok());
    }
}
