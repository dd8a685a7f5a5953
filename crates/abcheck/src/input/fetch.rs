//! Raw byte retrieval for local and remote sources.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::source::DataSource;
use crate::error::{AbError, Result};

/// Default timeout for remote sources.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read the raw contents of a source.
pub fn read_source(source: &DataSource, timeout: Duration) -> Result<Vec<u8>> {
    match source {
        DataSource::Path(path) => {
            log::debug!("reading local file {}", path.display());
            std::fs::read(path).map_err(|e| AbError::Io {
                path: path.clone(),
                source: e,
            })
        }
        DataSource::Url(url) => fetch_url(url, timeout),
    }
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    log::debug!("fetching {} (timeout {:?})", url, timeout);

    let mut builder = Client::builder().timeout(timeout);
    if is_loopback(url) {
        builder = builder.no_proxy();
    }
    let client = builder
        .build()
        .map_err(|e| AbError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let http_err = |source: reqwest::Error| AbError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(http_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AbError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(http_err)?;
    log::debug!("received {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Loopback hosts are never sent through a configured proxy.
fn is_loopback(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host == "localhost" || host == "127.0.0.1" || host == "[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_local_file_is_io_error() {
        let source = DataSource::Path(PathBuf::from("/definitely/not/here.csv"));
        let err = read_source(&source, DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, AbError::Io { .. }));
    }

    #[test]
    fn test_loopback_detection() {
        assert!(is_loopback("http://127.0.0.1:8080/a.csv"));
        assert!(is_loopback("http://LOCALHOST/a.csv"));
        assert!(is_loopback("http://[::1]:9/a.csv"));
        assert!(!is_loopback("https://example.com/a.csv"));
        assert!(!is_loopback("not a url"));
    }

    #[test]
    fn test_unreachable_url_is_http_error() {
        // Port 9 on loopback refuses connections on any sane test host.
        let source = DataSource::parse("http://127.0.0.1:9/orders.csv");
        let err = read_source(&source, Duration::from_secs(2)).unwrap_err();
        assert!(matches!(err, AbError::Http { .. }));
    }
}
