//! Blocking HTTP GET via libcurl.
//!
//! Two shapes: fetch a body into memory as text (page, manifest) and stream a
//! body verbatim into a file (segment). Both follow redirects and treat any
//! non-2xx status as an error. Call from `spawn_blocking` when used from async code.

mod headers;

pub use headers::{page_headers, segment_headers, HeaderSet};

use crate::retry::SegmentError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Shared transfer settings. Each request gets its own curl handle.
#[derive(Debug, Clone, Copy)]
pub struct HttpClient {
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(15)),
        }
    }

    fn easy(&self, url: &str, headers: &HeaderSet) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if !headers.is_empty() {
            easy.http_headers(headers.to_curl_list()?)?;
        }
        Ok(easy)
    }

    /// GET `url` and return the body as (lossily decoded) UTF-8 text.
    pub fn get_text(&self, url: &str, headers: &HeaderSet) -> Result<String, SegmentError> {
        let mut body: Vec<u8> = Vec::new();
        let mut easy = self.easy(url, headers).map_err(SegmentError::Curl)?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(SegmentError::Curl)?;
            transfer.perform().map_err(SegmentError::Curl)?;
        }
        check_status(&mut easy)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GET `url` and write the body verbatim to `path` (truncating any previous file).
    /// Returns the number of bytes written.
    pub fn get_to_file(
        &self,
        url: &str,
        headers: &HeaderSet,
        path: &Path,
    ) -> Result<u64, SegmentError> {
        let mut easy = self.easy(url, headers).map_err(SegmentError::Curl)?;
        // Bodies of error responses are never written.
        easy.fail_on_error(true).map_err(SegmentError::Curl)?;

        let mut file = File::create(path).map_err(SegmentError::Storage)?;
        let mut written = 0u64;
        let mut storage_error: Option<std::io::Error> = None;
        let perform_result = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match file.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        storage_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(SegmentError::Curl)?;
            transfer.perform()
        };
        if let Err(e) = perform_result {
            if e.is_write_error() {
                if let Some(io_err) = storage_error.take() {
                    return Err(SegmentError::Storage(io_err));
                }
            }
            if e.is_http_returned_error() {
                let code = easy.response_code().map_err(SegmentError::Curl)?;
                return Err(SegmentError::Http(code));
            }
            return Err(SegmentError::Curl(e));
        }
        check_status(&mut easy)?;
        file.flush().map_err(SegmentError::Storage)?;
        Ok(written)
    }
}

fn check_status(easy: &mut curl::easy::Easy) -> Result<(), SegmentError> {
    let code = easy.response_code().map_err(SegmentError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(SegmentError::Http(code));
    }
    Ok(())
}
