// Remote profile download
// Plain blocking GET; anything but 200 is an error

use thiserror::Error;

/// Download timeout in seconds
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Remote profiles are not supported by this build")]
    Disabled,
}

/// Download a URL body (blocking)
#[cfg(feature = "remote-profiles")]
pub fn download_blocking(url: &str) -> Result<Vec<u8>, FetchError> {
    use reqwest::blocking::Client;
    use reqwest::StatusCode;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    tracing::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let bytes = response
        .bytes()
        .map_err(|e| FetchError::Request(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote-profiles"))]
pub fn download_blocking(_url: &str) -> Result<Vec<u8>, FetchError> {
    Err(FetchError::Disabled)
}
