//! Shared HTTP plumbing for the remote backends.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

use super::ProviderId;
use crate::error::CleanupError;

pub(crate) fn build_client(provider: ProviderId, timeout_secs: u64) -> Result<Client, CleanupError> {
    Client::builder()
        .user_agent(concat!("cleanup-native/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|error| transport_error(provider, error))
}

pub(crate) fn transport_error(provider: ProviderId, error: reqwest::Error) -> CleanupError {
    CleanupError::ProviderRequestFailed {
        provider,
        message: error.to_string(),
    }
}

/// Pass 2xx responses through. Quota and rate-limit signals become
/// `ProviderQuotaExceeded`; any other status becomes `ProviderRequestFailed`
/// carrying the status and body.
pub(crate) fn check_response(provider: ProviderId, resp: Response) -> Result<Response, CleanupError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = match resp.text() {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(%provider, %error, "failed to read error response body");
            String::new()
        }
    };
    tracing::warn!(%provider, status = status.as_u16(), "provider returned an error status");
    if is_quota_signal(status, &body) {
        return Err(CleanupError::ProviderQuotaExceeded {
            provider,
            message: body,
        });
    }
    Err(CleanupError::ProviderRequestFailed {
        provider,
        message: format!("{} {}", status.as_u16(), body),
    })
}

fn is_quota_signal(status: StatusCode, body: &str) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || body.contains("insufficient_quota")
        || body.contains("rate_limit")
}

/// One-shot loopback HTTP server for exercising backends end to end.
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve a single request with `status` and a JSON `body`. The handle
    /// yields the raw request (head and body) once it has been answered.
    pub(crate) fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let url = format!("http://{}/endpoint", listener.local_addr().expect("local addr"));
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("read header") == 0 {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
                let end_of_head = line == "\r\n";
                request.push_str(&line);
                if end_of_head {
                    break;
                }
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).expect("read body");
            request.push_str(&String::from_utf8_lossy(&payload));

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .expect("write response");
            stream.flush().expect("flush response");
            request
        });

        (url, handle)
    }
}
