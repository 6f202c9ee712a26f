use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// Upper bound on how much of an error response body is kept for logs.
pub const ERROR_BODY_LIMIT: usize = 2 * 1024;

const USER_AGENT: &str = concat!("DiscordBot (barnacle, ", env!("CARGO_PKG_VERSION"), ")");

/// Build a `reqwest::Client` with a 10 s connect timeout and the given overall timeout.
///
/// Falls back to the default client if the builder fails.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read a response body with a size limit, streaming via `chunk()` with a running counter.
///
/// Returns `(bytes, was_truncated)`.
pub async fn limited_body(resp: Response, max_bytes: usize) -> Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    let mut stream = resp;
    while let Some(chunk) = stream.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            let remaining = max_bytes.saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..remaining]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}

/// Same as [`limited_body`] but lossily decoded, with a `[truncated]` marker appended when
/// the body exceeded the limit.
pub async fn limited_text(resp: Response, max_bytes: usize) -> Result<String> {
    let (bytes, truncated) = limited_body(resp, max_bytes).await?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if truncated {
        text.push_str(" [truncated]");
    }
    Ok(text)
}
