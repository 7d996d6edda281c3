//! HTTP GET with a single total timeout.
//!
//! Uses the curl crate (libcurl). One `Easy` handle per call; the whole body
//! is buffered in memory and returned regardless of the HTTP status code.

use std::time::Duration;

use crate::error::{FetchError, FetchErrorKind};

/// Maximum redirects followed per request.
const MAX_REDIRECTIONS: u32 = 10;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub body: Vec<u8>,
    /// Final HTTP status code (after redirects).
    pub status: u32,
}

impl Fetched {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one GET. Implementations are shared by all workers of a run.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Fetched, FetchError>;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlFetcher;

impl CurlFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Fetched, FetchError> {
        let mut body = Vec::new();
        let status = perform_get(url, timeout, &mut body).map_err(|e| FetchError {
            url: url.to_string(),
            kind: classify_curl_error(&e),
            reason: e.to_string(),
        })?;
        Ok(Fetched { body, status })
    }
}

fn perform_get(url: &str, timeout: Duration, body: &mut Vec<u8>) -> Result<u32, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTIONS)?;
    // Timeouts are enforced from worker threads; SIGALRM must stay off.
    easy.signal(false)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    easy.response_code()
}

/// Map a curl error onto the coarse fetch failure kinds.
pub fn classify_curl_error(e: &curl::Error) -> FetchErrorKind {
    if e.is_operation_timedout() {
        return FetchErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FetchErrorKind::Connection;
    }
    FetchErrorKind::Other
}
